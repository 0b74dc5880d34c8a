//! Cookie-based authentication extractors.
//!
//! `CurrentUser` runs the session manager's credential state machine
//! over the request's cookies. A `NeedsRefresh` outcome rejects the
//! request with a single 307 redirect to the refresh endpoint carrying
//! the original target URL; the refresh endpoint itself never redirects
//! back here on failure, so the hop count is bounded at one.

use axum::extract::FromRequestParts;
use axum::http::request::Parts;
use axum::response::{IntoResponse, Redirect, Response};
use axum_extra::extract::cookie::CookieJar;

use quill_auth::session::Resolution;
use quill_core::error::AppError;
use quill_service::context::RequestContext;

use crate::cookies::{ACCESS_COOKIE, REFRESH_COOKIE};
use crate::error::ApiError;
use crate::state::AppState;

/// Extracted authenticated user context, required.
#[derive(Debug, Clone)]
pub struct CurrentUser(pub RequestContext);

impl std::ops::Deref for CurrentUser {
    type Target = RequestContext;
    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

/// Extracted user context for routes that serve both anonymous and
/// authenticated callers. Never rejects; any unusable credential
/// resolves to `None` without triggering the refresh flow.
#[derive(Debug, Clone)]
pub struct MaybeUser(pub Option<RequestContext>);

/// Rejection for `CurrentUser`: either a structured error response or
/// one redirect hop through the silent-refresh flow.
#[derive(Debug)]
pub enum AuthRejection {
    /// 401/500 style structured rejection.
    Error(AppError),
    /// 307 redirect to the refresh endpoint, preserving the original
    /// target.
    Refresh {
        /// Path and query of the originally requested resource.
        redirect_url: String,
    },
}

impl IntoResponse for AuthRejection {
    fn into_response(self) -> Response {
        match self {
            Self::Error(err) => ApiError(err).into_response(),
            Self::Refresh { redirect_url } => {
                let query = serde_urlencoded::to_string([("redirect_url", redirect_url.as_str())])
                    .unwrap_or_default();
                Redirect::temporary(&format!("/user/refresh/?{query}")).into_response()
            }
        }
    }
}

impl FromRequestParts<AppState> for CurrentUser {
    type Rejection = AuthRejection;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let jar = CookieJar::from_headers(&parts.headers);
        let access = jar.get(ACCESS_COOKIE).map(|c| c.value().to_string());
        let refresh = jar.get(REFRESH_COOKIE).map(|c| c.value().to_string());

        match state
            .session_manager
            .resolve(access.as_deref(), refresh.as_deref())
            .await
        {
            Ok(Resolution::Authenticated(user)) => {
                Ok(CurrentUser(RequestContext::from_user(&user)))
            }
            Ok(Resolution::NeedsRefresh) => {
                let redirect_url = parts
                    .uri
                    .path_and_query()
                    .map(|pq| pq.as_str().to_string())
                    .unwrap_or_else(|| "/".to_string());
                Err(AuthRejection::Refresh { redirect_url })
            }
            Err(err) => Err(AuthRejection::Error(err)),
        }
    }
}

impl FromRequestParts<AppState> for MaybeUser {
    type Rejection = std::convert::Infallible;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let jar = CookieJar::from_headers(&parts.headers);
        let access = jar.get(ACCESS_COOKIE).map(|c| c.value().to_string());
        let refresh = jar.get(REFRESH_COOKIE).map(|c| c.value().to_string());

        let ctx = match state
            .session_manager
            .resolve(access.as_deref(), refresh.as_deref())
            .await
        {
            Ok(Resolution::Authenticated(user)) => Some(RequestContext::from_user(&user)),
            Ok(Resolution::NeedsRefresh) | Err(_) => None,
        };

        Ok(MaybeUser(ctx))
    }
}
