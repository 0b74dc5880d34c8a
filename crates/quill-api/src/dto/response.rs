//! Response DTOs.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use quill_entity::comment::Comment;
use quill_entity::post::Post;
use quill_entity::tag::Tag;
use quill_entity::user::User;
use quill_service::user::Profile;

/// Simple message response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MessageResponse {
    /// Human-readable message.
    pub message: String,
}

impl MessageResponse {
    /// Creates a message response.
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

/// User summary for responses. Never carries the password hash.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserResponse {
    /// User ID.
    pub id: Uuid,
    /// Username.
    pub username: String,
    /// Email.
    pub email: String,
    /// Role.
    pub role: String,
    /// First name.
    pub first_name: Option<String>,
    /// Last name.
    pub last_name: Option<String>,
    /// Biography.
    pub bio: Option<String>,
    /// Whether the account is verified.
    pub is_verified: bool,
    /// Last login time.
    pub last_login_at: Option<DateTime<Utc>>,
    /// Account creation time.
    pub created_at: DateTime<Utc>,
}

impl From<User> for UserResponse {
    fn from(user: User) -> Self {
        Self {
            id: user.id,
            username: user.username,
            email: user.email,
            role: user.role.to_string(),
            first_name: user.first_name,
            last_name: user.last_name,
            bio: user.bio,
            is_verified: user.is_verified,
            last_login_at: user.last_login_at,
            created_at: user.created_at,
        }
    }
}

/// Post representation in responses.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PostResponse {
    /// Post ID.
    pub id: Uuid,
    /// Author ID.
    pub author_id: Uuid,
    /// Title.
    pub title: String,
    /// Body.
    pub content: String,
    /// Denormalized rating.
    pub rating: i64,
    /// View count.
    pub view_count: i64,
    /// Lifecycle status.
    pub status: String,
    /// First publication time.
    pub published_at: Option<DateTime<Utc>>,
    /// Creation time.
    pub created_at: DateTime<Utc>,
    /// Last mutation time.
    pub updated_at: DateTime<Utc>,
}

impl From<Post> for PostResponse {
    fn from(post: Post) -> Self {
        Self {
            id: post.id,
            author_id: post.author_id,
            title: post.title,
            content: post.content,
            rating: post.rating,
            view_count: post.view_count,
            status: post.status.to_string(),
            published_at: post.published_at,
            created_at: post.created_at,
            updated_at: post.updated_at,
        }
    }
}

/// Comment representation in responses.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CommentResponse {
    /// Comment ID.
    pub id: Uuid,
    /// Author ID.
    pub author_id: Uuid,
    /// Post ID.
    pub post_id: Uuid,
    /// Parent comment, if a reply.
    pub parent_id: Option<Uuid>,
    /// Body.
    pub content: String,
    /// Creation time.
    pub created_at: DateTime<Utc>,
}

impl From<Comment> for CommentResponse {
    fn from(comment: Comment) -> Self {
        Self {
            id: comment.id,
            author_id: comment.author_id,
            post_id: comment.post_id,
            parent_id: comment.parent_id,
            content: comment.content,
            created_at: comment.created_at,
        }
    }
}

/// Tag representation in responses.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TagResponse {
    /// Tag ID.
    pub id: Uuid,
    /// Tag name.
    pub name: String,
}

impl From<Tag> for TagResponse {
    fn from(tag: Tag) -> Self {
        Self {
            id: tag.id,
            name: tag.name,
        }
    }
}

/// Complete profile response: account plus bookmarks and favorites.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProfileResponse {
    /// The account.
    pub user: UserResponse,
    /// Bookmarked posts.
    pub bookmarks: Vec<PostResponse>,
    /// Favorited tags.
    pub favorite_tags: Vec<TagResponse>,
}

impl From<Profile> for ProfileResponse {
    fn from(profile: Profile) -> Self {
        Self {
            user: profile.user.into(),
            bookmarks: profile.bookmarks.into_iter().map(Into::into).collect(),
            favorite_tags: profile
                .favorite_tags
                .into_iter()
                .map(Into::into)
                .collect(),
        }
    }
}

/// Result of a vote ledger operation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RatingResponse {
    /// The voted post.
    pub post_id: Uuid,
    /// The post's rating after the operation.
    pub rating: i64,
}
