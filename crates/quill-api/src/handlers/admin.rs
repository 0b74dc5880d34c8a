//! Administrative JSON surface.
//!
//! Everything here is mounted under the `/admin` prefix and reached
//! only after the blanket moderator gate in
//! [`crate::middleware::admin`]. Operations that need more than
//! moderator privilege re-check with the role gate.

use axum::Json;
use axum::extract::{Path, Query, State};
use uuid::Uuid;

use quill_core::types::pagination::{PageRequest, PageResponse};

use crate::dto::request::ChangeRoleRequest;
use crate::dto::response::{PostResponse, UserResponse};
use crate::error::ApiError;
use crate::extractors::CurrentUser;
use crate::state::AppState;

/// GET /admin/users
pub async fn list_users(
    State(state): State<AppState>,
    Query(page): Query<PageRequest>,
) -> Result<Json<PageResponse<UserResponse>>, ApiError> {
    let users = state.user_repo.find_all(&page).await?;
    Ok(Json(users.map(Into::into)))
}

/// PUT /admin/users/{id}/role
///
/// Admin only; the service re-checks the caller's role.
pub async fn change_role(
    State(state): State<AppState>,
    user: CurrentUser,
    Path(target_id): Path<Uuid>,
    Json(req): Json<ChangeRoleRequest>,
) -> Result<Json<UserResponse>, ApiError> {
    let updated = state
        .user_service
        .change_role(&user, target_id, req.role)
        .await?;
    Ok(Json(updated.into()))
}

/// GET /admin/posts
///
/// Lists posts in every lifecycle status, drafts included.
pub async fn list_posts(
    State(state): State<AppState>,
    Query(page): Query<PageRequest>,
) -> Result<Json<PageResponse<PostResponse>>, ApiError> {
    let posts = state.post_repo.find_all(&page).await?;
    Ok(Json(posts.map(Into::into)))
}
