//! Blanket gate in front of the administrative surface.
//!
//! Every request whose path falls under the `/admin` prefix must
//! resolve a user from its cookies and pass the moderator-or-above
//! check before reaching any admin handler. Unauthenticated requests
//! get a structured 401 and under-privileged ones a 403; the silent
//! refresh redirect is deliberately not offered here.

use axum::extract::{Request, State};
use axum::middleware::Next;
use axum::response::{IntoResponse, Response};
use axum_extra::extract::cookie::CookieJar;

use quill_auth::session::Resolution;
use quill_core::error::AppError;

use crate::cookies::{ACCESS_COOKIE, REFRESH_COOKIE};
use crate::error::ApiError;
use crate::state::AppState;

/// Middleware guarding the administrative route tree.
pub async fn admin_gate(
    State(state): State<AppState>,
    jar: CookieJar,
    request: Request,
    next: Next,
) -> Response {
    let access = jar.get(ACCESS_COOKIE).map(|c| c.value().to_string());
    let refresh = jar.get(REFRESH_COOKIE).map(|c| c.value().to_string());

    let user = match state
        .session_manager
        .resolve(access.as_deref(), refresh.as_deref())
        .await
    {
        Ok(Resolution::Authenticated(user)) => user,
        Ok(Resolution::NeedsRefresh) => {
            return ApiError(AppError::authentication("Authentication required"))
                .into_response();
        }
        Err(err) => return ApiError(err).into_response(),
    };

    if let Err(err) = state.role_gate.require_moderator(user.role) {
        return ApiError(err).into_response();
    }

    next.run(request).await
}
