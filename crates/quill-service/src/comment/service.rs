//! Comment threads: creation, deletion, and listing.

use std::sync::Arc;

use tracing::info;
use uuid::Uuid;

use quill_core::error::AppError;
use quill_database::repositories::comment::CommentRepository;
use quill_database::repositories::post::PostRepository;
use quill_entity::comment::{Comment, CreateComment};

use crate::context::RequestContext;

/// Handles comment creation, deletion, and reply-tree listing.
#[derive(Debug, Clone)]
pub struct CommentService {
    /// Comment repository.
    comment_repo: Arc<CommentRepository>,
    /// Post repository (existence checks).
    post_repo: Arc<PostRepository>,
}

impl CommentService {
    /// Creates a new comment service.
    pub fn new(comment_repo: Arc<CommentRepository>, post_repo: Arc<PostRepository>) -> Self {
        Self {
            comment_repo,
            post_repo,
        }
    }

    /// Creates a comment on a post, optionally replying to another
    /// comment on the same post.
    pub async fn create_comment(
        &self,
        ctx: &RequestContext,
        post_id: Uuid,
        parent_id: Option<Uuid>,
        content: &str,
    ) -> Result<Comment, AppError> {
        if content.trim().is_empty() {
            return Err(AppError::validation("Comment cannot be empty"));
        }

        if !self.post_repo.exists(post_id).await? {
            return Err(AppError::not_found(format!("Post {post_id} not found")));
        }

        if let Some(parent) = parent_id {
            let parent_comment = self
                .comment_repo
                .find_by_id(parent)
                .await?
                .ok_or_else(|| AppError::not_found(format!("Comment {parent} not found")))?;

            if parent_comment.post_id != post_id {
                return Err(AppError::validation(
                    "Parent comment belongs to a different post",
                ));
            }
        }

        self.comment_repo
            .create(&CreateComment {
                author_id: ctx.user_id,
                post_id,
                parent_id,
                content: content.to_string(),
            })
            .await
    }

    /// Deletes a comment. Allowed for the author and for moderators.
    ///
    /// Replies are not deleted: the storage layer sets their parent to
    /// null, so they surface as top-level comments.
    pub async fn delete_comment(
        &self,
        ctx: &RequestContext,
        comment_id: Uuid,
    ) -> Result<(), AppError> {
        let comment = self
            .comment_repo
            .find_by_id(comment_id)
            .await?
            .ok_or_else(|| AppError::not_found(format!("Comment {comment_id} not found")))?;

        if comment.author_id != ctx.user_id && !ctx.is_moderator_or_above() {
            return Err(AppError::authorization(
                "Only the author or a moderator can delete this comment",
            ));
        }

        self.comment_repo.delete(comment_id).await?;

        info!(comment_id = %comment_id, by = %ctx.username, "Comment deleted");
        Ok(())
    }

    /// Lists all comments on a post, ordered by creation time.
    pub async fn comments_for_post(&self, post_id: Uuid) -> Result<Vec<Comment>, AppError> {
        if !self.post_repo.exists(post_id).await? {
            return Err(AppError::not_found(format!("Post {post_id} not found")));
        }
        self.comment_repo.find_by_post(post_id).await
    }

    /// Lists direct replies to a comment, ordered by creation time.
    pub async fn replies(&self, comment_id: Uuid) -> Result<Vec<Comment>, AppError> {
        if self.comment_repo.find_by_id(comment_id).await?.is_none() {
            return Err(AppError::not_found(format!(
                "Comment {comment_id} not found"
            )));
        }
        self.comment_repo.find_replies(comment_id).await
    }
}
