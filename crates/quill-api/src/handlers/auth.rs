//! Auth handlers: register, login, silent refresh, logout.

use axum::Json;
use axum::extract::{Query, State};
use axum::http::StatusCode;
use axum::response::Redirect;
use axum_extra::extract::cookie::CookieJar;
use validator::Validate;

use quill_core::error::AppError;

use crate::cookies::{ACCESS_COOKIE, REFRESH_COOKIE, auth_cookie, removal_cookie};
use crate::dto::request::{LoginForm, RefreshParams, RegisterRequest};
use crate::dto::response::{MessageResponse, UserResponse};
use crate::error::ApiError;
use crate::extractors::CurrentUser;
use crate::state::AppState;

/// Attach fresh access + refresh cookies to the jar.
fn with_token_cookies(
    jar: CookieJar,
    state: &AppState,
    access_token: String,
    refresh_token: String,
) -> CookieJar {
    let auth = &state.config.auth;
    jar.add(auth_cookie(
        ACCESS_COOKIE,
        access_token,
        auth.access_ttl_seconds(),
    ))
    .add(auth_cookie(
        REFRESH_COOKIE,
        refresh_token,
        auth.refresh_ttl_seconds(),
    ))
}

/// POST /user/register/
///
/// Creates the account and signs the new user in: both token cookies
/// are set on the response.
pub async fn register(
    State(state): State<AppState>,
    jar: CookieJar,
    Json(req): Json<RegisterRequest>,
) -> Result<(StatusCode, CookieJar, Json<UserResponse>), ApiError> {
    req.validate()
        .map_err(|e| AppError::validation(e.to_string()))?;

    let user = state
        .user_service
        .register(&req.username, &req.email, &req.password)
        .await?;

    let tokens = state.session_manager.issue_tokens(&user.username)?;
    let jar = with_token_cookies(jar, &state, tokens.access_token, tokens.refresh_token);

    Ok((StatusCode::CREATED, jar, Json(user.into())))
}

/// POST /user/login
///
/// Verifies credentials and sets both token cookies. Unknown username
/// and wrong password are indistinguishable in the response.
pub async fn login(
    State(state): State<AppState>,
    jar: CookieJar,
    axum::extract::Form(form): axum::extract::Form<LoginForm>,
) -> Result<(CookieJar, Json<UserResponse>), ApiError> {
    form.validate()
        .map_err(|_| AppError::invalid_credentials())?;

    let (tokens, user) = state
        .session_manager
        .login(&form.username, &form.password)
        .await?;

    let jar = with_token_cookies(jar, &state, tokens.access_token, tokens.refresh_token);

    Ok((jar, Json(user.into())))
}

/// GET /user/refresh/?redirect_url=...
///
/// Mints a new access cookie from the refresh cookie and redirects to
/// the original target. An absent or invalid refresh token is terminal:
/// the client gets a 401, never another redirect, so the silent-refresh
/// flow is bounded at one hop.
pub async fn refresh(
    State(state): State<AppState>,
    jar: CookieJar,
    Query(params): Query<RefreshParams>,
) -> Result<(CookieJar, Redirect), ApiError> {
    let refresh_token = jar
        .get(REFRESH_COOKIE)
        .map(|c| c.value().to_string())
        .ok_or_else(|| AppError::authentication("Authentication required"))?;

    let (access_token, _expires_at) = state.session_manager.refresh(&refresh_token).await?;

    let jar = jar.add(auth_cookie(
        ACCESS_COOKIE,
        access_token,
        state.config.auth.access_ttl_seconds(),
    ));

    let target = sanitize_redirect(params.redirect_url.as_deref());
    Ok((jar, Redirect::temporary(&target)))
}

/// POST /user/logout/
///
/// Clears both cookies. Tokens are stateless, so no server-side
/// invalidation happens; an unexpired token remains valid until its
/// natural expiry.
pub async fn logout(
    State(state): State<AppState>,
    user: CurrentUser,
    jar: CookieJar,
) -> Result<(CookieJar, Json<MessageResponse>), ApiError> {
    state.session_manager.logout(&user.username);

    let jar = jar
        .add(removal_cookie(ACCESS_COOKIE))
        .add(removal_cookie(REFRESH_COOKIE));

    Ok((jar, Json(MessageResponse::new("Logged out"))))
}

/// Constrain redirect targets to same-site relative paths, and never
/// back into the refresh endpoint itself.
fn sanitize_redirect(redirect_url: Option<&str>) -> String {
    match redirect_url {
        Some(url)
            if url.starts_with('/')
                && !url.starts_with("//")
                && !url.starts_with("/user/refresh") =>
        {
            url.to_string()
        }
        _ => "/".to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sanitize_redirect_accepts_relative_paths() {
        assert_eq!(
            sanitize_redirect(Some("/posts/get_post/abc?x=1")),
            "/posts/get_post/abc?x=1"
        );
    }

    #[test]
    fn test_sanitize_redirect_rejects_external_and_loops() {
        assert_eq!(sanitize_redirect(Some("https://evil.example")), "/");
        assert_eq!(sanitize_redirect(Some("//evil.example")), "/");
        assert_eq!(sanitize_redirect(Some("/user/refresh/?x=1")), "/");
        assert_eq!(sanitize_redirect(None), "/");
    }
}
