//! Health check handler.

use axum::Json;
use axum::extract::State;
use serde::{Deserialize, Serialize};

use quill_core::traits::cache::CacheProvider;

use crate::state::AppState;

/// Health check response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    /// Overall status: `"ok"` or `"degraded"`.
    pub status: String,
    /// Database reachability.
    pub database: bool,
    /// Cache reachability.
    pub cache: bool,
}

/// GET /health
pub async fn health_check(State(state): State<AppState>) -> Json<HealthResponse> {
    let database = quill_database::connection::health_check(&state.db_pool)
        .await
        .unwrap_or(false);
    let cache = state.cache.health_check().await.unwrap_or(false);

    let status = if database && cache { "ok" } else { "degraded" };

    Json(HealthResponse {
        status: status.to_string(),
        database,
        cache,
    })
}
