//! Request DTOs with validation.

use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

use quill_entity::post::PostStatus;
use quill_entity::user::UserRole;

/// Registration request body.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct RegisterRequest {
    /// Desired username.
    #[validate(length(min = 4, max = 25, message = "Username must be 4-25 characters"))]
    pub username: String,
    /// Email address.
    #[validate(email(message = "Invalid email address"))]
    pub email: String,
    /// Plaintext password (policy enforced by the user service).
    #[validate(length(min = 1, message = "Password is required"))]
    pub password: String,
}

/// Login form body.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct LoginForm {
    /// Username.
    #[validate(length(min = 1, message = "Username is required"))]
    pub username: String,
    /// Password.
    #[validate(length(min = 1, message = "Password is required"))]
    pub password: String,
}

/// Query parameters for the refresh endpoint.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RefreshParams {
    /// Where to send the client after minting the new access cookie.
    pub redirect_url: Option<String>,
}

/// Update-own-profile request.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UpdateProfileRequest {
    /// First name.
    pub first_name: Option<String>,
    /// Last name.
    pub last_name: Option<String>,
    /// Biography.
    pub bio: Option<String>,
}

/// Admin account deletion request. The requesting admin re-confirms
/// their own password.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct DeleteUserRequest {
    /// The account to delete.
    pub user_id: Uuid,
    /// The requesting admin's password.
    #[validate(length(min = 1, message = "Password confirmation is required"))]
    pub password: String,
}

/// Replace the caller's favorite tag set.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FavoriteTagsRequest {
    /// The full new set of favorite tag IDs.
    pub tag_ids: Vec<Uuid>,
}

/// Create post request.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct CreatePostRequest {
    /// Post title.
    #[validate(length(min = 1, max = 200, message = "Title must be 1-200 characters"))]
    pub title: String,
    /// Post body.
    #[validate(length(min = 1, message = "Content is required"))]
    pub content: String,
}

/// Update post request.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UpdatePostRequest {
    /// The post to update.
    pub post_id: Uuid,
    /// New title.
    pub title: Option<String>,
    /// New body.
    pub content: Option<String>,
    /// New lifecycle status.
    pub status: Option<PostStatus>,
}

/// Request carrying only a post ID (delete, bookmark, rating removal).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PostIdRequest {
    /// The target post.
    pub post_id: Uuid,
}

/// Rate-post request body.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RatePostRequest {
    /// The target post.
    pub post_id: Uuid,
    /// Vote value: -1 or +1.
    pub value: i32,
}

/// Replace the tag set on a post.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SetPostTagsRequest {
    /// The target post.
    pub post_id: Uuid,
    /// The full new set of tag IDs.
    pub tag_ids: Vec<Uuid>,
}

/// Search query parameters.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchParams {
    /// Full-text search query.
    pub query: String,
}

/// Create comment request.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct CreateCommentRequest {
    /// The post being commented on.
    pub post_id: Uuid,
    /// Parent comment when replying.
    pub parent_id: Option<Uuid>,
    /// Comment body.
    #[validate(length(min = 1, message = "Comment content is required"))]
    pub content: String,
}

/// Delete comment request.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DeleteCommentRequest {
    /// The comment to delete.
    pub comment_id: Uuid,
}

/// Create tag request.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct CreateTagRequest {
    /// Tag name.
    #[validate(length(min = 1, max = 50, message = "Tag name must be 1-50 characters"))]
    pub name: String,
}

/// Admin role change request.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChangeRoleRequest {
    /// The new role.
    pub role: UserRole,
}
