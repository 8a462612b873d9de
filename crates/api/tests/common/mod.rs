//! Common test utilities for integration tests.
//!
//! Each test gets its own in-memory SQLite database with all migrations
//! applied, so tests can run in parallel without cleanup.

// Allow dead code in this module - not every integration test uses every helper.
#![allow(dead_code)]

use std::sync::Arc;

use axum::{
    body::Body,
    http::{header, Method, Request, Response, StatusCode},
    Router,
};
use domain::services::{NoopNotifier, Notifier};
use kudos_api::{
    app::create_app_with_notifier,
    config::{
        CompositionConfig, Config, DatabaseConfig, DiscordConfig, GiphyConfig, LoggingConfig,
        SecurityConfig, ServerConfig,
    },
};
use serde_json::Value;
use sqlx::SqlitePool;
use tower::ServiceExt;

/// Test configuration with chat integrations disabled.
pub fn test_config() -> Config {
    Config {
        server: ServerConfig {
            host: "127.0.0.1".to_string(),
            port: 0, // Use random port
            request_timeout_secs: 30,
        },
        database: DatabaseConfig {
            url: "sqlite::memory:".to_string(),
            max_connections: 1,
            min_connections: 1,
            connect_timeout_secs: 10,
            idle_timeout_secs: 600,
        },
        logging: LoggingConfig {
            level: "debug".to_string(),
            format: "pretty".to_string(),
        },
        security: SecurityConfig::default(),
        composition: CompositionConfig::default(),
        discord: DiscordConfig::default(),
        giphy: GiphyConfig::default(),
    }
}

/// Create a migrated in-memory test database.
pub async fn test_pool() -> SqlitePool {
    let pool = persistence::db::create_in_memory_pool()
        .await
        .expect("Failed to open in-memory database");
    persistence::db::run_migrations(&pool)
        .await
        .expect("Failed to run migrations");
    pool
}

/// Create a test application router with the given notifier.
pub fn create_test_app(pool: SqlitePool, notifier: Arc<dyn Notifier>) -> Router {
    create_app_with_notifier(test_config(), pool, notifier)
}

/// Create a test application router that never relays to chat.
pub async fn setup() -> (Router, SqlitePool) {
    let pool = test_pool().await;
    let app = create_test_app(pool.clone(), Arc::new(NoopNotifier));
    (app, pool)
}

/// Build a request with a JSON body.
pub fn json_request(method: Method, uri: &str, body: Value) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(serde_json::to_string(&body).unwrap()))
        .unwrap()
}

/// Build a request without a body.
pub fn empty_request(method: Method, uri: &str) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .body(Body::empty())
        .unwrap()
}

/// Send a request through the router.
pub async fn send(app: &Router, request: Request<Body>) -> Response<Body> {
    app.clone().oneshot(request).await.unwrap()
}

/// Parse a response body as JSON.
pub async fn parse_response_body(response: Response<Body>) -> Value {
    let status = response.status();
    let body = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    serde_json::from_slice(&body).unwrap_or_else(|_| {
        panic!(
            "Failed to parse response body. Status: {}, Body: {:?}",
            status,
            String::from_utf8_lossy(&body)
        )
    })
}

/// Send a request and return the status with the parsed JSON body.
///
/// Bodiless responses come back as `Value::Null`.
pub async fn send_json(app: &Router, request: Request<Body>) -> (StatusCode, Value) {
    let response = send(app, request).await;
    let status = response.status();
    let body = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    if body.is_empty() {
        return (status, Value::Null);
    }
    let json = serde_json::from_slice(&body).unwrap_or_else(|_| {
        panic!(
            "Failed to parse response body. Status: {}, Body: {:?}",
            status,
            String::from_utf8_lossy(&body)
        )
    });
    (status, json)
}

/// Create a sprint through the API and return its JSON.
pub async fn create_sprint(app: &Router, code: &str, title: &str) -> Value {
    let (status, body) = send_json(
        app,
        json_request(
            Method::POST,
            "/api/v1/sprints",
            serde_json::json!({ "code": code, "title": title }),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED, "sprint creation failed: {}", body);
    body
}

/// Create a user through the API and return its JSON.
pub async fn create_user(app: &Router, username: &str) -> Value {
    let (status, body) = send_json(
        app,
        json_request(
            Method::POST,
            "/api/v1/users",
            serde_json::json!({ "username": username }),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED, "user creation failed: {}", body);
    body
}

/// Remove the seeded praises, templates and emojis.
pub async fn clear_content_pools(pool: &SqlitePool) {
    for table in ["praises", "templates", "emojis"] {
        sqlx::query(&format!("DELETE FROM {}", table))
            .execute(pool)
            .await
            .expect("Failed to clear content pool");
    }
}

/// Replace the content pools with exactly one entry each.
pub async fn seed_single_content(pool: &SqlitePool, praise: &str, template: &str, emoji: &str) {
    clear_content_pools(pool).await;
    sqlx::query("INSERT INTO praises (text) VALUES (?1)")
        .bind(praise)
        .execute(pool)
        .await
        .expect("Failed to seed praise");
    sqlx::query("INSERT INTO templates (text) VALUES (?1)")
        .bind(template)
        .execute(pool)
        .await
        .expect("Failed to seed template");
    sqlx::query("INSERT INTO emojis (glyph) VALUES (?1)")
        .bind(emoji)
        .execute(pool)
        .await
        .expect("Failed to seed emoji");
}
