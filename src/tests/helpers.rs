use std::sync::{Arc, Once};

use axum::{
    body::Body,
    http::{header::AUTHORIZATION, HeaderMap, HeaderValue, Request, StatusCode},
    Router,
};
use serde_json::{json, Value};
use sqlx::{sqlite::SqlitePoolOptions, SqlitePool};
use tower::ServiceExt;
use tracing::{info, Level};
use tracing_subscriber::fmt::format::FmtSpan;

use crate::{
    config::{Config, DEV_PLATFORM},
    create_router,
    db::{run_migrations, SqliteStore},
    utils::clock::{Clock, SystemClock},
    AppState,
};

pub const TEST_SECRET: &str = "test-jwt-secret";
pub const TEST_POLKA_KEY: &str = "f271c81ff7084ee5b99a5091b42d486e";

static INIT: Once = Once::new();

/// Initialize logging exactly once
pub fn init_tracing() {
    INIT.call_once(|| {
        tracing_subscriber::fmt()
            .with_test_writer()
            .with_target(false)
            .with_thread_ids(true)
            .with_level(true)
            .with_file(true)
            .with_line_number(true)
            .with_thread_names(true)
            .with_max_level(Level::ERROR)
            .with_span_events(FmtSpan::NONE)
            .init();
    });
}

pub async fn setup_test_db() -> SqlitePool {
    init_tracing();
    info!("Setting up test database");

    // One connection that never recycles, otherwise the in-memory database vanishes
    let pool = SqlitePoolOptions::new()
        .max_connections(1)
        .idle_timeout(None)
        .max_lifetime(None)
        .connect("sqlite::memory:")
        .await
        .expect("Failed to create test database");

    run_migrations(&pool)
        .await
        .expect("Failed to run migrations");

    info!("Test database setup complete");
    pool
}

pub fn test_config(platform: &str) -> Config {
    Config {
        database_url: "sqlite::memory:".to_string(),
        jwt_secret: TEST_SECRET.to_string(),
        platform: platform.to_string(),
        polka_key: TEST_POLKA_KEY.to_string(),
        bind_addr: "127.0.0.1:0".to_string(),
        access_token_ttl_secs: 3600,
    }
}

pub fn create_test_state(pool: SqlitePool, platform: &str, clock: Arc<dyn Clock>) -> AppState {
    AppState::with_clock(SqliteStore::new(pool), test_config(platform), clock)
}

pub fn create_test_app(pool: SqlitePool) -> Router {
    info!("Creating test application");
    create_router(create_test_state(pool, DEV_PLATFORM, Arc::new(SystemClock)))
}

pub fn auth_headers(value: &str) -> HeaderMap {
    let mut headers = HeaderMap::new();
    headers.insert(AUTHORIZATION, HeaderValue::from_str(value).unwrap());
    headers
}

pub fn bearer(token: &str) -> HeaderMap {
    auth_headers(&format!("Bearer {token}"))
}

pub async fn test_request(
    app: Router,
    method: &str,
    uri: &str,
    body: Option<Value>,
    headers: Option<HeaderMap>,
) -> (StatusCode, String, HeaderMap) {
    info!(method = %method, uri = %uri, "Making test request");

    let body = if let Some(json) = body {
        Body::from(serde_json::to_string(&json).unwrap())
    } else {
        Body::empty()
    };

    let mut request = Request::builder()
        .method(method)
        .uri(uri)
        .header("content-type", "application/json");

    // Add custom headers if provided
    if let Some(custom_headers) = headers {
        for (key, value) in custom_headers.iter() {
            request = request.header(key, value);
        }
    }

    let request = request.body(body).unwrap();

    let response = app.oneshot(request).await.unwrap();
    let status = response.status();
    let headers = response.headers().clone();
    let body = String::from_utf8(
        axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap()
            .to_vec(),
    )
    .unwrap();

    info!(status = %status, "Test response received");
    (status, body, headers)
}

pub async fn register_user(app: &Router, email: &str, password: &str) -> Value {
    let (status, body, _) = test_request(
        app.clone(),
        "POST",
        "/api/users",
        Some(json!({ "email": email, "password": password })),
        None,
    )
    .await;

    assert_eq!(status, StatusCode::CREATED, "register failed: {body}");
    serde_json::from_str(&body).unwrap()
}

pub async fn login_user(app: &Router, email: &str, password: &str) -> Value {
    let (status, body, _) = test_request(
        app.clone(),
        "POST",
        "/api/login",
        Some(json!({ "email": email, "password": password })),
        None,
    )
    .await;

    assert_eq!(status, StatusCode::OK, "login failed: {body}");
    serde_json::from_str(&body).unwrap()
}
