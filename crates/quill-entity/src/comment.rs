//! Comment entity model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// A comment on a post, optionally replying to another comment.
///
/// `parent_id` is null for top-level comments. Deleting a parent does
/// not cascade to its replies: the foreign key sets their `parent_id`
/// to null, so orphaned replies surface as top-level.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Comment {
    /// Unique comment identifier.
    pub id: Uuid,
    /// The authoring user.
    pub author_id: Uuid,
    /// The post this comment belongs to.
    pub post_id: Uuid,
    /// Parent comment for replies; null for top-level comments.
    pub parent_id: Option<Uuid>,
    /// Comment body.
    pub content: String,
    /// When the comment was created. Replies are ordered by this within
    /// a parent.
    pub created_at: DateTime<Utc>,
}

/// Data required to create a new comment.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateComment {
    /// The authoring user.
    pub author_id: Uuid,
    /// The post being commented on.
    pub post_id: Uuid,
    /// Parent comment when replying.
    pub parent_id: Option<Uuid>,
    /// Comment body.
    pub content: String,
}
