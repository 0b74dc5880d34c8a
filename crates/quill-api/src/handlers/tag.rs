//! Tag handlers.

use axum::Json;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use uuid::Uuid;
use validator::Validate;

use quill_core::error::AppError;

use crate::dto::request::CreateTagRequest;
use crate::dto::response::TagResponse;
use crate::error::ApiError;
use crate::extractors::CurrentUser;
use crate::state::AppState;

/// GET /tags/
pub async fn list_tags(
    State(state): State<AppState>,
) -> Result<Json<Vec<TagResponse>>, ApiError> {
    let tags = state.tag_service.list_tags().await?;
    Ok(Json(tags.into_iter().map(Into::into).collect()))
}

/// POST /tags/create/
pub async fn create_tag(
    State(state): State<AppState>,
    _user: CurrentUser,
    Json(req): Json<CreateTagRequest>,
) -> Result<(StatusCode, Json<TagResponse>), ApiError> {
    req.validate()
        .map_err(|e| AppError::validation(e.to_string()))?;

    let tag = state.tag_service.create_tag(&req.name).await?;
    Ok((StatusCode::CREATED, Json(tag.into())))
}

/// GET /tags/for_post/{post_id}
pub async fn tags_for_post(
    State(state): State<AppState>,
    Path(post_id): Path<Uuid>,
) -> Result<Json<Vec<TagResponse>>, ApiError> {
    let tags = state.tag_service.tags_for_post(post_id).await?;
    Ok(Json(tags.into_iter().map(Into::into).collect()))
}
