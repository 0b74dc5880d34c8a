//! The vote ledger.
//!
//! Keeps `posts.rating` exactly equal to the sum of active vote values
//! for the post, under concurrent voting. The invariant after every
//! committed operation:
//!
//! ```text
//! posts.rating == SUM(votes.value WHERE votes.post_id = posts.id)
//! ```
//!
//! The ledger pre-checks the one-vote-per-(author, post) rule, but the
//! storage layer's unique constraint is the final arbiter: two
//! concurrent casts for the same pair can both pass the pre-check, and
//! the loser's insert then fails with a constraint violation that the
//! repository reports as `AlreadyVoted`. The vote row and the rating
//! adjustment commit in one transaction (read committed isolation plus
//! the constraint backstop), so an aborted request never leaves partial
//! state.

use std::sync::Arc;

use tracing::info;
use uuid::Uuid;

use quill_core::error::AppError;
use quill_database::repositories::post::PostRepository;
use quill_database::repositories::vote::VoteRepository;

use crate::context::RequestContext;

/// Maintains the one-vote-per-user-per-post invariant and the
/// denormalized post rating.
#[derive(Debug, Clone)]
pub struct VoteLedger {
    /// Vote repository (owns the transactional mutation unit).
    vote_repo: Arc<VoteRepository>,
    /// Post repository (existence checks).
    post_repo: Arc<PostRepository>,
}

impl VoteLedger {
    /// Creates a new vote ledger.
    pub fn new(vote_repo: Arc<VoteRepository>, post_repo: Arc<PostRepository>) -> Self {
        Self {
            vote_repo,
            post_repo,
        }
    }

    /// Casts a vote on a post and returns the new rating.
    ///
    /// Fails with `NotFound` when the post does not exist, with
    /// `Validation` when the value is not -1 or +1, and with
    /// `AlreadyVoted` when the user already has an active vote; callers
    /// must remove the existing vote before changing it, there is no
    /// implicit overwrite.
    pub async fn cast_vote(
        &self,
        ctx: &RequestContext,
        post_id: Uuid,
        value: i32,
    ) -> Result<i64, AppError> {
        if value != 1 && value != -1 {
            return Err(AppError::validation("Vote value must be -1 or +1"));
        }

        if !self.post_repo.exists(post_id).await? {
            return Err(AppError::not_found(format!("Post {post_id} not found")));
        }

        if self.vote_repo.find(ctx.user_id, post_id).await?.is_some() {
            return Err(AppError::already_voted());
        }

        // The unique constraint catches casts that raced past the check.
        let rating = self
            .vote_repo
            .insert_and_adjust_rating(ctx.user_id, post_id, value)
            .await?;

        info!(user_id = %ctx.user_id, post_id = %post_id, value, rating, "Vote cast");
        Ok(rating)
    }

    /// Removes the caller's vote from a post and returns the new rating.
    ///
    /// Fails with `NotFound` when the post does not exist and with
    /// `NoExistingVote` when the user has no vote to remove.
    pub async fn remove_vote(
        &self,
        ctx: &RequestContext,
        post_id: Uuid,
    ) -> Result<i64, AppError> {
        if !self.post_repo.exists(post_id).await? {
            return Err(AppError::not_found(format!("Post {post_id} not found")));
        }

        let rating = self
            .vote_repo
            .delete_and_adjust_rating(ctx.user_id, post_id)
            .await?
            .ok_or_else(AppError::no_existing_vote)?;

        info!(user_id = %ctx.user_id, post_id = %post_id, rating, "Vote removed");
        Ok(rating)
    }
}
