//! Shared helpers for API integration tests.

// Each test binary compiles this module separately and uses a different
// subset of the helpers.
#![allow(dead_code)]

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use axum::body::Body;
use axum::http::{Method, Request, StatusCode};
use axum::response::Response;
use axum::Router;
use sqlx::SqlitePool;
use tempfile::TempDir;
use tower::ServiceExt;

use presswork_api::config::ServerConfig;
use presswork_api::router::build_app_router;
use presswork_api::state::AppState;
use presswork_uploads::UploadPool;

/// A fully wired application plus the temp directories backing it.
///
/// Holds the [`TempDir`] guard so the content directories live as long as
/// the test.
pub struct TestApp {
    pub router: Router,
    pub posts_dir: PathBuf,
    pub upload_dir: PathBuf,
    _tmp: TempDir,
}

/// Build a test `ServerConfig` rooted in a temp directory.
pub fn test_config(posts_dir: PathBuf, upload_dir: PathBuf) -> ServerConfig {
    ServerConfig {
        host: "127.0.0.1".to_string(),
        port: 0,
        cors_origins: vec!["http://localhost:3000".to_string()],
        request_timeout_secs: 30,
        posts_dir,
        upload_dir,
        public_base_url: "http://localhost:8080".to_string(),
        upload_workers: 2,
        upload_queue_capacity: 8,
        upload_reply_timeout_secs: 5,
    }
}

/// Build the full application router with all middleware layers, backed by
/// the given database pool and fresh temp content directories.
///
/// Uses the same [`build_app_router`] as `main.rs`, so tests exercise the
/// production middleware stack.
pub fn build_test_app(pool: SqlitePool) -> TestApp {
    let tmp = tempfile::tempdir().expect("failed to create temp dir");
    let posts_dir = tmp.path().join("posts");
    let upload_dir = posts_dir.join("assets");
    std::fs::create_dir_all(&upload_dir).expect("failed to create content dirs");

    let config = test_config(posts_dir.clone(), upload_dir.clone());
    let uploads = UploadPool::start(config.upload_pool_config());

    let state = AppState {
        pool,
        config: Arc::new(config.clone()),
        uploads,
    };

    TestApp {
        router: build_app_router(state, &config),
        posts_dir,
        upload_dir,
        _tmp: tmp,
    }
}

/// Issue a GET request against the app.
pub async fn get(app: Router, uri: &str) -> Response {
    let request = Request::builder()
        .method(Method::GET)
        .uri(uri)
        .body(Body::empty())
        .unwrap();
    app.oneshot(request).await.unwrap()
}

/// Issue a POST request with a JSON body against the app.
pub async fn post_json(app: Router, uri: &str, body: serde_json::Value) -> Response {
    let request = Request::builder()
        .method(Method::POST)
        .uri(uri)
        .header("content-type", "application/json")
        .body(Body::from(body.to_string()))
        .unwrap();
    app.oneshot(request).await.unwrap()
}

/// Collect a response body and parse it as JSON.
pub async fn body_json(response: Response) -> serde_json::Value {
    use http_body_util::BodyExt;
    let bytes = response
        .into_body()
        .collect()
        .await
        .expect("failed to read body")
        .to_bytes();
    serde_json::from_slice(&bytes).expect("body is not valid JSON")
}

/// Assert the standard `{error, code}` error envelope.
pub async fn assert_error_code(response: Response, status: StatusCode, code: &str) {
    assert_eq!(response.status(), status);
    let json = body_json(response).await;
    assert_eq!(json["code"], code, "unexpected error code: {json}");
    assert!(json["error"].is_string());
}
