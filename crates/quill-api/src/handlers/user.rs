//! User handlers: profile, lookup, update, deletion, favorites.

use axum::Json;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use validator::Validate;

use quill_core::error::AppError;
use quill_entity::user::model::UpdateUser;

use crate::dto::request::{DeleteUserRequest, FavoriteTagsRequest, UpdateProfileRequest};
use crate::dto::response::{PostResponse, ProfileResponse, UserResponse};
use crate::error::ApiError;
use crate::extractors::CurrentUser;
use crate::state::AppState;

/// GET /user/profile/
pub async fn profile(
    State(state): State<AppState>,
    user: CurrentUser,
) -> Result<Json<ProfileResponse>, ApiError> {
    let profile = state.user_service.profile(&user).await?;
    Ok(Json(profile.into()))
}

/// GET /user/get_user/{ident}
///
/// The identifier is either a user ID or a username.
pub async fn get_user(
    State(state): State<AppState>,
    Path(ident): Path<String>,
) -> Result<Json<UserResponse>, ApiError> {
    let user = state.user_service.get_by_ident(&ident).await?;
    Ok(Json(user.into()))
}

/// GET /user/posts/
///
/// Lists the caller's own posts, drafts included.
pub async fn own_posts(
    State(state): State<AppState>,
    user: CurrentUser,
) -> Result<Json<Vec<PostResponse>>, ApiError> {
    let posts = state.post_service.posts_by_author(user.user_id).await?;
    Ok(Json(posts.into_iter().map(Into::into).collect()))
}

/// PATCH /user/update_user/
pub async fn update_user(
    State(state): State<AppState>,
    user: CurrentUser,
    Json(req): Json<UpdateProfileRequest>,
) -> Result<Json<UserResponse>, ApiError> {
    if req.first_name.is_none() && req.last_name.is_none() && req.bio.is_none() {
        return Err(AppError::validation("No fields to update").into());
    }

    let updated = state
        .user_service
        .update_profile(
            &user,
            &UpdateUser {
                first_name: req.first_name,
                last_name: req.last_name,
                bio: req.bio,
            },
        )
        .await?;

    Ok(Json(updated.into()))
}

/// DELETE /user/delete/
///
/// Admin only; the requesting admin re-confirms their own password in
/// the body.
pub async fn delete_user(
    State(state): State<AppState>,
    user: CurrentUser,
    Json(req): Json<DeleteUserRequest>,
) -> Result<StatusCode, ApiError> {
    req.validate()
        .map_err(|e| AppError::validation(e.to_string()))?;

    state
        .user_service
        .delete_user(&user, req.user_id, &req.password)
        .await?;

    Ok(StatusCode::NO_CONTENT)
}

/// POST /user/favorite_tags/
pub async fn set_favorite_tags(
    State(state): State<AppState>,
    user: CurrentUser,
    Json(req): Json<FavoriteTagsRequest>,
) -> Result<StatusCode, ApiError> {
    state
        .user_service
        .set_favorite_tags(&user, &req.tag_ids)
        .await?;
    Ok(StatusCode::NO_CONTENT)
}
