//! Post entity model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

use super::status::PostStatus;

/// A blog post.
///
/// `rating` is the denormalized sum of all active vote values for the
/// post; the vote ledger keeps it consistent with the `votes` table.
/// `published_at` is set exactly once, the first time the status leaves
/// `Draft`.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Post {
    /// Unique post identifier.
    pub id: Uuid,
    /// The authoring user. Immutable after creation.
    pub author_id: Uuid,
    /// Post title.
    pub title: String,
    /// Post body.
    pub content: String,
    /// Denormalized sum of active vote values.
    pub rating: i64,
    /// Number of public views.
    pub view_count: i64,
    /// Lifecycle status.
    pub status: PostStatus,
    /// When the post first left draft status.
    pub published_at: Option<DateTime<Utc>>,
    /// When the post was created.
    pub created_at: DateTime<Utc>,
    /// Touched on every mutation.
    pub updated_at: DateTime<Utc>,
}

/// Data required to create a new post.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreatePost {
    /// The authoring user.
    pub author_id: Uuid,
    /// Post title.
    pub title: String,
    /// Post body.
    pub content: String,
}

/// Data for updating an existing post.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UpdatePost {
    /// New title.
    pub title: Option<String>,
    /// New body.
    pub content: Option<String>,
    /// New lifecycle status.
    pub status: Option<PostStatus>,
}
