//! Post handlers: CRUD, listing, search, rating, bookmarks.

use axum::Json;
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use uuid::Uuid;
use validator::Validate;

use quill_core::error::AppError;
use quill_core::types::pagination::{PageRequest, PageResponse};
use quill_entity::post::model::UpdatePost;

use crate::dto::request::{
    CreatePostRequest, PostIdRequest, RatePostRequest, SearchParams, SetPostTagsRequest,
    UpdatePostRequest,
};
use crate::dto::response::{PostResponse, RatingResponse};
use crate::error::ApiError;
use crate::extractors::{CurrentUser, MaybeUser};
use crate::state::AppState;

/// POST /posts/create_post/
pub async fn create_post(
    State(state): State<AppState>,
    user: CurrentUser,
    Json(req): Json<CreatePostRequest>,
) -> Result<(StatusCode, Json<PostResponse>), ApiError> {
    req.validate()
        .map_err(|e| AppError::validation(e.to_string()))?;

    let post = state
        .post_service
        .create_post(&user, &req.title, &req.content)
        .await?;

    Ok((StatusCode::CREATED, Json(post.into())))
}

/// GET /posts/get_post/{id}
///
/// Public posts are visible to everyone; drafts and archived posts only
/// to their author or a moderator.
pub async fn get_post(
    State(state): State<AppState>,
    MaybeUser(viewer): MaybeUser,
    Path(id): Path<Uuid>,
) -> Result<Json<PostResponse>, ApiError> {
    let post = state.post_service.get_post(id, viewer.as_ref()).await?;
    Ok(Json(post.into()))
}

/// GET /posts/list/
pub async fn list_posts(
    State(state): State<AppState>,
    Query(page): Query<PageRequest>,
) -> Result<Json<PageResponse<PostResponse>>, ApiError> {
    let posts = state.post_service.list_public(&page).await?;
    Ok(Json(posts.map(Into::into)))
}

/// GET /posts/search_post/?query=...
pub async fn search_posts(
    State(state): State<AppState>,
    Query(params): Query<SearchParams>,
) -> Result<Json<Vec<PostResponse>>, ApiError> {
    if params.query.trim().is_empty() {
        return Err(AppError::validation("Search query cannot be empty").into());
    }

    let posts = state.post_service.search(&params.query).await?;
    Ok(Json(posts.into_iter().map(Into::into).collect()))
}

/// PATCH /posts/update_post/
pub async fn update_post(
    State(state): State<AppState>,
    user: CurrentUser,
    Json(req): Json<UpdatePostRequest>,
) -> Result<Json<PostResponse>, ApiError> {
    let post = state
        .post_service
        .update_post(
            &user,
            req.post_id,
            &UpdatePost {
                title: req.title,
                content: req.content,
                status: req.status,
            },
        )
        .await?;

    Ok(Json(post.into()))
}

/// DELETE /posts/delete_post/
pub async fn delete_post(
    State(state): State<AppState>,
    user: CurrentUser,
    Json(req): Json<PostIdRequest>,
) -> Result<StatusCode, ApiError> {
    state.post_service.delete_post(&user, req.post_id).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// POST /posts/rate/
///
/// Casts the caller's vote on a post. A second vote by the same caller
/// fails until the first is removed.
pub async fn rate_post(
    State(state): State<AppState>,
    user: CurrentUser,
    Json(req): Json<RatePostRequest>,
) -> Result<Json<RatingResponse>, ApiError> {
    let rating = state
        .vote_ledger
        .cast_vote(&user, req.post_id, req.value)
        .await?;

    Ok(Json(RatingResponse {
        post_id: req.post_id,
        rating,
    }))
}

/// DELETE /posts/delete_post_rating/
pub async fn delete_post_rating(
    State(state): State<AppState>,
    user: CurrentUser,
    Json(req): Json<PostIdRequest>,
) -> Result<Json<RatingResponse>, ApiError> {
    let rating = state.vote_ledger.remove_vote(&user, req.post_id).await?;

    Ok(Json(RatingResponse {
        post_id: req.post_id,
        rating,
    }))
}

/// POST /posts/bookmark/
pub async fn add_bookmark(
    State(state): State<AppState>,
    user: CurrentUser,
    Json(req): Json<PostIdRequest>,
) -> Result<StatusCode, ApiError> {
    state.post_service.bookmark(&user, req.post_id).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// DELETE /posts/bookmark/
pub async fn remove_bookmark(
    State(state): State<AppState>,
    user: CurrentUser,
    Json(req): Json<PostIdRequest>,
) -> Result<StatusCode, ApiError> {
    state
        .post_service
        .remove_bookmark(&user, req.post_id)
        .await?;
    Ok(StatusCode::NO_CONTENT)
}

/// POST /posts/tags/
pub async fn set_post_tags(
    State(state): State<AppState>,
    user: CurrentUser,
    Json(req): Json<SetPostTagsRequest>,
) -> Result<StatusCode, ApiError> {
    state
        .post_service
        .set_tags(&user, req.post_id, &req.tag_ids)
        .await?;
    Ok(StatusCode::NO_CONTENT)
}
