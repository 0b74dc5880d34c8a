//! Application wiring: builds repositories, services, and state, then
//! runs the Axum server with graceful shutdown.

use std::sync::Arc;

use sqlx::PgPool;
use tracing::info;

use quill_auth::jwt::{JwtDecoder, JwtEncoder};
use quill_auth::password::PasswordHasher;
use quill_auth::rbac::RoleGate;
use quill_auth::session::SessionManager;
use quill_cache::provider::CacheManager;
use quill_core::config::AppConfig;
use quill_core::error::AppError;

use quill_database::repositories::comment::CommentRepository;
use quill_database::repositories::post::PostRepository;
use quill_database::repositories::tag::TagRepository;
use quill_database::repositories::user::UserRepository;
use quill_database::repositories::vote::VoteRepository;

use quill_service::comment::CommentService;
use quill_service::post::PostService;
use quill_service::tag::TagService;
use quill_service::user::UserService;
use quill_service::vote::VoteLedger;

use crate::router::build_router;
use crate::state::AppState;

/// Construct the full application state from configuration and an
/// established database pool.
pub async fn build_state(config: AppConfig, db_pool: PgPool) -> Result<AppState, AppError> {
    // Cache
    info!(provider = %config.cache.provider, "Initializing cache");
    let cache = Arc::new(CacheManager::new(&config.cache).await?);

    // Repositories
    let user_repo = Arc::new(UserRepository::new(db_pool.clone()));
    let post_repo = Arc::new(PostRepository::new(db_pool.clone()));
    let comment_repo = Arc::new(CommentRepository::new(db_pool.clone()));
    let tag_repo = Arc::new(TagRepository::new(db_pool.clone()));
    let vote_repo = Arc::new(VoteRepository::new(db_pool.clone()));

    // Auth
    let password_hasher = Arc::new(PasswordHasher::new());
    let jwt_encoder = Arc::new(JwtEncoder::new(&config.auth));
    let jwt_decoder = Arc::new(JwtDecoder::new(&config.auth));
    let session_manager = Arc::new(SessionManager::new(
        Arc::clone(&jwt_encoder),
        Arc::clone(&jwt_decoder),
        Arc::clone(&user_repo),
        Arc::clone(&password_hasher),
    ));

    // Services
    let user_service = Arc::new(UserService::new(
        Arc::clone(&user_repo),
        Arc::clone(&password_hasher),
        config.auth.clone(),
    ));
    let post_service = Arc::new(PostService::new(
        Arc::clone(&post_repo),
        Arc::clone(&tag_repo),
        Arc::clone(&cache),
    ));
    let comment_service = Arc::new(CommentService::new(
        Arc::clone(&comment_repo),
        Arc::clone(&post_repo),
    ));
    let tag_service = Arc::new(TagService::new(Arc::clone(&tag_repo)));
    let vote_ledger = Arc::new(VoteLedger::new(
        Arc::clone(&vote_repo),
        Arc::clone(&post_repo),
    ));

    Ok(AppState {
        config: Arc::new(config),
        db_pool,
        cache,
        session_manager,
        role_gate: RoleGate::new(),
        user_repo,
        post_repo,
        user_service,
        post_service,
        comment_service,
        tag_service,
        vote_ledger,
    })
}

/// Runs the Quill server with the given configuration and database pool.
pub async fn run_server(config: AppConfig, db_pool: PgPool) -> Result<(), AppError> {
    let host = config.server.host.clone();
    let port = config.server.port;

    let state = build_state(config, db_pool).await?;
    let app = build_router(state);

    let addr = format!("{host}:{port}");
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .map_err(|e| AppError::internal(format!("Failed to bind {addr}: {e}")))?;

    info!("Quill server listening on {addr}");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .map_err(|e| AppError::internal(format!("Server error: {e}")))?;

    info!("Quill server shut down gracefully");
    Ok(())
}

/// Wait for shutdown signal (Ctrl+C or SIGTERM).
async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("Failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("Failed to install SIGTERM handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
}
