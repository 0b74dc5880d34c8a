//! Route definitions for the Quill HTTP API.
//!
//! Routes are organized by domain. The router receives `AppState` and
//! passes it to all handlers via Axum's `State` extractor. The `/admin`
//! subtree sits behind the blanket moderator gate.

use axum::{
    Router,
    middleware as axum_middleware,
    routing::{delete, get, patch, post, put},
};
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use crate::handlers;
use crate::middleware;
use crate::state::AppState;

/// Build the complete Axum router with all routes and middleware.
pub fn build_router(state: AppState) -> Router {
    let admin_routes = admin_routes().route_layer(axum_middleware::from_fn_with_state(
        state.clone(),
        middleware::admin::admin_gate,
    ));

    let cors = build_cors_layer(&state);

    Router::new()
        .merge(auth_routes())
        .merge(user_routes())
        .merge(post_routes())
        .merge(comment_routes())
        .merge(tag_routes())
        .nest("/admin", admin_routes)
        .route("/health", get(handlers::health::health_check))
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .layer(axum_middleware::from_fn(
            middleware::logging::request_logging,
        ))
        .with_state(state)
}

/// Session endpoints: register, login, refresh, logout.
fn auth_routes() -> Router<AppState> {
    Router::new()
        .route("/user/register/", post(handlers::auth::register))
        .route("/user/login", post(handlers::auth::login))
        .route("/user/refresh/", get(handlers::auth::refresh))
        .route("/user/logout/", post(handlers::auth::logout))
}

/// User profile and account endpoints.
fn user_routes() -> Router<AppState> {
    Router::new()
        .route("/user/profile/", get(handlers::user::profile))
        .route("/user/get_user/{ident}", get(handlers::user::get_user))
        .route("/user/posts/", get(handlers::user::own_posts))
        .route("/user/update_user/", patch(handlers::user::update_user))
        .route("/user/delete/", delete(handlers::user::delete_user))
        .route(
            "/user/favorite_tags/",
            post(handlers::user::set_favorite_tags),
        )
}

/// Post CRUD, search, rating, bookmarks.
fn post_routes() -> Router<AppState> {
    Router::new()
        .route("/posts/create_post/", post(handlers::post::create_post))
        .route("/posts/get_post/{id}", get(handlers::post::get_post))
        .route("/posts/list/", get(handlers::post::list_posts))
        .route("/posts/search_post/", get(handlers::post::search_posts))
        .route("/posts/update_post/", patch(handlers::post::update_post))
        .route("/posts/delete_post/", delete(handlers::post::delete_post))
        .route("/posts/rate/", post(handlers::post::rate_post))
        .route(
            "/posts/delete_post_rating/",
            delete(handlers::post::delete_post_rating),
        )
        .route(
            "/posts/bookmark/",
            post(handlers::post::add_bookmark).delete(handlers::post::remove_bookmark),
        )
        .route("/posts/tags/", post(handlers::post::set_post_tags))
}

/// Comment threads.
fn comment_routes() -> Router<AppState> {
    Router::new()
        .route("/comments/create/", post(handlers::comment::create_comment))
        .route("/comments/delete/", delete(handlers::comment::delete_comment))
        .route(
            "/comments/for_post/{post_id}",
            get(handlers::comment::comments_for_post),
        )
        .route(
            "/comments/replies/{comment_id}",
            get(handlers::comment::replies),
        )
}

/// Tag listing and creation.
fn tag_routes() -> Router<AppState> {
    Router::new()
        .route("/tags/", get(handlers::tag::list_tags))
        .route("/tags/create/", post(handlers::tag::create_tag))
        .route(
            "/tags/for_post/{post_id}",
            get(handlers::tag::tags_for_post),
        )
}

/// Administrative surface (moderator-gated as a whole).
fn admin_routes() -> Router<AppState> {
    Router::new()
        .route("/users", get(handlers::admin::list_users))
        .route("/users/{id}/role", put(handlers::admin::change_role))
        .route("/posts", get(handlers::admin::list_posts))
}

/// Build CORS layer from configuration.
fn build_cors_layer(state: &AppState) -> CorsLayer {
    use axum::http::HeaderValue;
    use tower_http::cors::Any;

    let cors_config = &state.config.server.cors;

    let mut cors = CorsLayer::new().allow_methods(Any).allow_headers(Any);

    if cors_config.allowed_origins.contains(&"*".to_string()) {
        cors = cors.allow_origin(Any);
    } else {
        let origins: Vec<HeaderValue> = cors_config
            .allowed_origins
            .iter()
            .filter_map(|o| o.parse().ok())
            .collect();
        cors = cors.allow_origin(origins);
    }

    cors.max_age(std::time::Duration::from_secs(
        cors_config.max_age_seconds,
    ))
}
