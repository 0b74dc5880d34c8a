//! Shared test helpers for integration tests.

use std::sync::atomic::{AtomicU64, Ordering};

use axum::Router;
use axum::body::Body;
use http::{Request, StatusCode, header};
use serde_json::Value;
use sqlx::PgPool;
use tower::ServiceExt;
use uuid::Uuid;

use quill_core::config::app::ServerConfig;
use quill_core::config::auth::AuthConfig;
use quill_core::config::cache::CacheConfig;
use quill_core::config::logging::LoggingConfig;
use quill_core::config::{AppConfig, DatabaseConfig};

/// Per-process counter so concurrent tests never collide on usernames.
static UNIQUE: AtomicU64 = AtomicU64::new(0);

/// Produce a unique identifier-safe suffix for test data.
pub fn unique(prefix: &str) -> String {
    let n = UNIQUE.fetch_add(1, Ordering::Relaxed);
    format!("{prefix}{}{n}", std::process::id())
}

/// A decoded test response.
pub struct TestResponse {
    /// HTTP status.
    pub status: StatusCode,
    /// All Set-Cookie header values.
    pub set_cookies: Vec<String>,
    /// Location header, if any.
    pub location: Option<String>,
    /// Parsed JSON body (Value::Null when empty or not JSON).
    pub body: Value,
}

/// Test application context.
pub struct TestApp {
    /// The Axum router for making test requests.
    pub router: Router,
    /// Database pool for direct queries.
    pub db_pool: PgPool,
}

impl TestApp {
    /// Create a test application, or `None` when no test database is
    /// configured.
    pub async fn try_new() -> Option<Self> {
        let Ok(url) = std::env::var("QUILL_TEST_DATABASE_URL") else {
            eprintln!("skipping: QUILL_TEST_DATABASE_URL not set");
            return None;
        };

        let config = AppConfig {
            server: ServerConfig {
                host: "127.0.0.1".to_string(),
                port: 0,
                shutdown_grace_seconds: 5,
                cors: Default::default(),
            },
            database: DatabaseConfig {
                url,
                max_connections: 5,
                min_connections: 1,
                connect_timeout_seconds: 5,
                idle_timeout_seconds: 60,
            },
            cache: CacheConfig {
                provider: "memory".to_string(),
                default_ttl_seconds: 60,
                redis: Default::default(),
                memory: Default::default(),
            },
            auth: AuthConfig {
                jwt_secret: "integration-test-secret".to_string(),
                access_ttl_minutes: 30,
                refresh_ttl_days: 7,
                password_min_length: 8,
            },
            logging: LoggingConfig::default(),
        };

        let db_pool = quill_database::connection::create_pool(&config.database)
            .await
            .expect("Failed to connect to test database");

        quill_database::migration::run_migrations(&db_pool)
            .await
            .expect("Failed to run migrations");

        let state = quill_api::app::build_state(config, db_pool.clone())
            .await
            .expect("Failed to build state");
        let router = quill_api::router::build_router(state);

        Some(Self { router, db_pool })
    }

    /// Issue a request against the router.
    pub async fn request(
        &self,
        method: &str,
        path: &str,
        json_body: Option<Value>,
        cookies: Option<&str>,
    ) -> TestResponse {
        let mut builder = Request::builder().method(method).uri(path);

        if let Some(cookie_header) = cookies {
            builder = builder.header(header::COOKIE, cookie_header);
        }

        let request = match json_body {
            Some(body) => builder
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(body.to_string()))
                .unwrap(),
            None => builder.body(Body::empty()).unwrap(),
        };

        self.send(request).await
    }

    /// Issue a form-encoded request (the login endpoint takes a form).
    pub async fn request_form(
        &self,
        method: &str,
        path: &str,
        form_body: &str,
        cookies: Option<&str>,
    ) -> TestResponse {
        let mut builder = Request::builder()
            .method(method)
            .uri(path)
            .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded");

        if let Some(cookie_header) = cookies {
            builder = builder.header(header::COOKIE, cookie_header);
        }

        let request = builder.body(Body::from(form_body.to_string())).unwrap();
        self.send(request).await
    }

    async fn send(&self, request: Request<Body>) -> TestResponse {
        let response = self
            .router
            .clone()
            .oneshot(request)
            .await
            .expect("Request failed");

        let status = response.status();
        let set_cookies = response
            .headers()
            .get_all(header::SET_COOKIE)
            .iter()
            .filter_map(|v| v.to_str().ok())
            .map(String::from)
            .collect();
        let location = response
            .headers()
            .get(header::LOCATION)
            .and_then(|v| v.to_str().ok())
            .map(String::from);

        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .expect("Failed to read body");
        let body = serde_json::from_slice(&bytes).unwrap_or(Value::Null);

        TestResponse {
            status,
            set_cookies,
            location,
            body,
        }
    }

    /// Register a user and return (username, password).
    pub async fn register_user(&self) -> (String, String) {
        let username = unique("user");
        let password = "password123".to_string();

        let response = self
            .request(
                "POST",
                "/user/register/",
                Some(serde_json::json!({
                    "username": username,
                    "email": format!("{username}@example.com"),
                    "password": password,
                })),
                None,
            )
            .await;
        assert_eq!(response.status, StatusCode::CREATED);

        (username, password)
    }

    /// Log a user in and return a Cookie header carrying both tokens.
    pub async fn login(&self, username: &str, password: &str) -> String {
        let response = self
            .request_form(
                "POST",
                "/user/login",
                &format!("username={username}&password={password}"),
                None,
            )
            .await;
        assert_eq!(response.status, StatusCode::OK);

        cookie_header(&response.set_cookies)
    }

    /// Promote a user to the given role directly in the database.
    pub async fn set_role(&self, username: &str, role: &str) {
        sqlx::query("UPDATE users SET role = $2::user_role WHERE username = $1")
            .bind(username)
            .bind(role)
            .execute(&self.db_pool)
            .await
            .expect("Failed to set role");
    }

    /// Look up a user's ID.
    pub async fn user_id(&self, username: &str) -> Uuid {
        sqlx::query_scalar("SELECT id FROM users WHERE username = $1")
            .bind(username)
            .fetch_one(&self.db_pool)
            .await
            .expect("User not found")
    }

    /// Create a public post owned by the given session and return its ID.
    pub async fn create_public_post(&self, cookies: &str) -> Uuid {
        let response = self
            .request(
                "POST",
                "/posts/create_post/",
                Some(serde_json::json!({
                    "title": unique("title"),
                    "content": "Some content worth voting on.",
                })),
                Some(cookies),
            )
            .await;
        assert_eq!(response.status, StatusCode::CREATED);
        let post_id: Uuid = response.body["id"].as_str().unwrap().parse().unwrap();

        let response = self
            .request(
                "PATCH",
                "/posts/update_post/",
                Some(serde_json::json!({
                    "post_id": post_id,
                    "status": "public",
                })),
                Some(cookies),
            )
            .await;
        assert_eq!(response.status, StatusCode::OK);

        post_id
    }

    /// The denormalized rating column of a post.
    pub async fn post_rating(&self, post_id: Uuid) -> i64 {
        sqlx::query_scalar("SELECT rating FROM posts WHERE id = $1")
            .bind(post_id)
            .fetch_one(&self.db_pool)
            .await
            .expect("Post not found")
    }

    /// The actual sum of vote values for a post.
    pub async fn vote_sum(&self, post_id: Uuid) -> i64 {
        let sum: Option<i64> =
            sqlx::query_scalar("SELECT SUM(value)::BIGINT FROM votes WHERE post_id = $1")
                .bind(post_id)
                .fetch_one(&self.db_pool)
                .await
                .expect("Failed to sum votes");
        sum.unwrap_or(0)
    }

    /// Assert the ledger invariant: rating equals the sum of votes.
    pub async fn assert_rating_invariant(&self, post_id: Uuid) {
        assert_eq!(
            self.post_rating(post_id).await,
            self.vote_sum(post_id).await,
            "posts.rating diverged from SUM(votes.value)"
        );
    }
}

/// Turn Set-Cookie response headers into a Cookie request header.
pub fn cookie_header(set_cookies: &[String]) -> String {
    set_cookies
        .iter()
        .filter_map(|sc| sc.split(';').next())
        .collect::<Vec<_>>()
        .join("; ")
}

/// Extract one cookie's `name=value` pair from Set-Cookie headers.
pub fn extract_cookie(set_cookies: &[String], name: &str) -> Option<String> {
    set_cookies
        .iter()
        .filter_map(|sc| sc.split(';').next())
        .find(|pair| pair.starts_with(&format!("{name}=")))
        .map(String::from)
}
