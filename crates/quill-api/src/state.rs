//! Application state shared across all handlers and middleware.

use std::sync::Arc;

use sqlx::PgPool;

use quill_auth::rbac::RoleGate;
use quill_auth::session::SessionManager;
use quill_cache::provider::CacheManager;
use quill_core::config::AppConfig;

use quill_database::repositories::post::PostRepository;
use quill_database::repositories::user::UserRepository;

use quill_service::comment::CommentService;
use quill_service::post::PostService;
use quill_service::tag::TagService;
use quill_service::user::UserService;
use quill_service::vote::VoteLedger;

/// Application state containing all shared dependencies.
///
/// Passed to every Axum handler via `State<AppState>`. All fields are
/// `Arc`-wrapped for cheap cloning across tasks. The connection pools
/// are constructed once at process start and injected here; nothing in
/// the application reaches for an ambient singleton.
#[derive(Debug, Clone)]
pub struct AppState {
    /// Application configuration.
    pub config: Arc<AppConfig>,

    /// PostgreSQL connection pool.
    pub db_pool: PgPool,
    /// Cache manager (Redis or in-memory).
    pub cache: Arc<CacheManager>,

    /// Session lifecycle manager.
    pub session_manager: Arc<SessionManager>,
    /// Role-based authorization gate.
    pub role_gate: RoleGate,

    /// User repository (administrative listings).
    pub user_repo: Arc<UserRepository>,
    /// Post repository (administrative listings).
    pub post_repo: Arc<PostRepository>,

    /// User service.
    pub user_service: Arc<UserService>,
    /// Post service.
    pub post_service: Arc<PostService>,
    /// Comment service.
    pub comment_service: Arc<CommentService>,
    /// Tag service.
    pub tag_service: Arc<TagService>,
    /// Vote ledger.
    pub vote_ledger: Arc<VoteLedger>,
}
