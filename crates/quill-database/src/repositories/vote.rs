//! Vote repository implementation.
//!
//! The vote row mutation and the denormalized `posts.rating` adjustment
//! always execute in one transaction, so they commit together or not at
//! all. The unique constraint on `(author_id, post_id)` is the final
//! arbiter for concurrent casts: a violation on insert is reported as
//! `AlreadyVoted` even when the ledger's pre-check raced past.

use sqlx::PgPool;
use uuid::Uuid;

use quill_core::error::{AppError, ErrorKind};
use quill_core::result::AppResult;
use quill_entity::vote::Vote;

/// Name of the unique constraint on `(author_id, post_id)`.
const VOTE_UNIQUE_CONSTRAINT: &str = "votes_author_post_key";

/// Repository for vote rows and the coupled rating counter.
#[derive(Debug, Clone)]
pub struct VoteRepository {
    pool: PgPool,
}

impl VoteRepository {
    /// Create a new vote repository.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Find the vote of one user on one post.
    pub async fn find(&self, author_id: Uuid, post_id: Uuid) -> AppResult<Option<Vote>> {
        sqlx::query_as::<_, Vote>(
            "SELECT * FROM votes WHERE author_id = $1 AND post_id = $2",
        )
        .bind(author_id)
        .bind(post_id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to find vote", e))
    }

    /// Sum of all active vote values for a post.
    ///
    /// Used by tests to check the rating invariant; production code
    /// reads the denormalized `posts.rating` instead.
    pub async fn sum_for_post(&self, post_id: Uuid) -> AppResult<i64> {
        let sum: Option<i64> =
            sqlx::query_scalar("SELECT SUM(value)::BIGINT FROM votes WHERE post_id = $1")
                .bind(post_id)
                .fetch_one(&self.pool)
                .await
                .map_err(|e| {
                    AppError::with_source(ErrorKind::Database, "Failed to sum votes", e)
                })?;
        Ok(sum.unwrap_or(0))
    }

    /// Insert a vote and adjust the post rating in one transaction.
    ///
    /// Returns the post-increment rating. A unique-constraint violation
    /// aborts the transaction and maps to `AlreadyVoted`.
    pub async fn insert_and_adjust_rating(
        &self,
        author_id: Uuid,
        post_id: Uuid,
        value: i32,
    ) -> AppResult<i64> {
        let mut tx = self.pool.begin().await.map_err(|e| {
            AppError::with_source(ErrorKind::Database, "Failed to begin vote transaction", e)
        })?;

        sqlx::query("INSERT INTO votes (author_id, post_id, value) VALUES ($1, $2, $3)")
            .bind(author_id)
            .bind(post_id)
            .bind(value)
            .execute(&mut *tx)
            .await
            .map_err(|e| match e {
                sqlx::Error::Database(ref db_err)
                    if db_err.constraint() == Some(VOTE_UNIQUE_CONSTRAINT) =>
                {
                    AppError::already_voted()
                }
                _ => AppError::with_source(ErrorKind::Database, "Failed to insert vote", e),
            })?;

        let rating: i64 = sqlx::query_scalar(
            "UPDATE posts SET rating = rating + $2, updated_at = NOW() \
             WHERE id = $1 RETURNING rating",
        )
        .bind(post_id)
        .bind(value as i64)
        .fetch_one(&mut *tx)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to adjust rating", e))?;

        tx.commit().await.map_err(|e| {
            AppError::with_source(ErrorKind::Database, "Failed to commit vote transaction", e)
        })?;

        Ok(rating)
    }

    /// Delete a vote and adjust the post rating in one transaction.
    ///
    /// Returns the post-adjustment rating, or `None` when the user had
    /// no vote on the post (the transaction is rolled back).
    pub async fn delete_and_adjust_rating(
        &self,
        author_id: Uuid,
        post_id: Uuid,
    ) -> AppResult<Option<i64>> {
        let mut tx = self.pool.begin().await.map_err(|e| {
            AppError::with_source(ErrorKind::Database, "Failed to begin vote transaction", e)
        })?;

        let deleted_value: Option<i32> = sqlx::query_scalar(
            "DELETE FROM votes WHERE author_id = $1 AND post_id = $2 RETURNING value",
        )
        .bind(author_id)
        .bind(post_id)
        .fetch_optional(&mut *tx)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to delete vote", e))?;

        let Some(value) = deleted_value else {
            // Nothing deleted; dropping the transaction rolls it back.
            return Ok(None);
        };

        let rating: i64 = sqlx::query_scalar(
            "UPDATE posts SET rating = rating - $2, updated_at = NOW() \
             WHERE id = $1 RETURNING rating",
        )
        .bind(post_id)
        .bind(value as i64)
        .fetch_one(&mut *tx)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to adjust rating", e))?;

        tx.commit().await.map_err(|e| {
            AppError::with_source(ErrorKind::Database, "Failed to commit vote transaction", e)
        })?;

        Ok(Some(rating))
    }
}
