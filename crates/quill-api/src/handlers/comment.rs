//! Comment handlers.

use axum::Json;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use uuid::Uuid;
use validator::Validate;

use quill_core::error::AppError;

use crate::dto::request::{CreateCommentRequest, DeleteCommentRequest};
use crate::dto::response::CommentResponse;
use crate::error::ApiError;
use crate::extractors::CurrentUser;
use crate::state::AppState;

/// POST /comments/create/
pub async fn create_comment(
    State(state): State<AppState>,
    user: CurrentUser,
    Json(req): Json<CreateCommentRequest>,
) -> Result<(StatusCode, Json<CommentResponse>), ApiError> {
    req.validate()
        .map_err(|e| AppError::validation(e.to_string()))?;

    let comment = state
        .comment_service
        .create_comment(&user, req.post_id, req.parent_id, &req.content)
        .await?;

    Ok((StatusCode::CREATED, Json(comment.into())))
}

/// DELETE /comments/delete/
pub async fn delete_comment(
    State(state): State<AppState>,
    user: CurrentUser,
    Json(req): Json<DeleteCommentRequest>,
) -> Result<StatusCode, ApiError> {
    state
        .comment_service
        .delete_comment(&user, req.comment_id)
        .await?;
    Ok(StatusCode::NO_CONTENT)
}

/// GET /comments/for_post/{post_id}
pub async fn comments_for_post(
    State(state): State<AppState>,
    Path(post_id): Path<Uuid>,
) -> Result<Json<Vec<CommentResponse>>, ApiError> {
    let comments = state.comment_service.comments_for_post(post_id).await?;
    Ok(Json(comments.into_iter().map(Into::into).collect()))
}

/// GET /comments/replies/{comment_id}
pub async fn replies(
    State(state): State<AppState>,
    Path(comment_id): Path<Uuid>,
) -> Result<Json<Vec<CommentResponse>>, ApiError> {
    let comments = state.comment_service.replies(comment_id).await?;
    Ok(Json(comments.into_iter().map(Into::into).collect()))
}
