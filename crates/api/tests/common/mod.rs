#![allow(dead_code)]

use std::sync::Arc;

use axum::body::Body;
use axum::http::{Method, Request, Response};
use axum::Router;
use http_body_util::BodyExt;
use tower::ServiceExt;

use villa_api::config::{LogFormat, ServerConfig, StorageBackend};
use villa_api::router::build_app_router;
use villa_api::state::AppState;
use villa_core::repository::{InMemoryVillaRepo, VillaRepository};
use villa_core::villa::seed_villas;

/// Build a test `ServerConfig` with safe defaults.
///
/// Uses `http://localhost:5173` as CORS origin (matching the dev default)
/// and a 30-second request timeout.
pub fn test_config() -> ServerConfig {
    ServerConfig {
        host: "127.0.0.1".to_string(),
        port: 0,
        cors_origins: vec!["http://localhost:5173".to_string()],
        request_timeout_secs: 30,
        storage: StorageBackend::Memory,
        database_url: None,
        seed_villas: true,
        log_format: LogFormat::Pretty,
    }
}

/// Build the full application router over `repo`.
///
/// Goes through `build_app_router` so integration tests exercise the same
/// middleware stack (CORS, request ID, timeout, tracing, panic recovery)
/// that production uses.
pub fn build_test_app(repo: Arc<dyn VillaRepository>) -> Router {
    let config = test_config();
    let state = AppState::new(repo, Arc::new(config.clone()));
    build_app_router(state, &config).unwrap()
}

/// App over a memory store seeded with "Pool View" (1) and "Beach View" (2).
pub fn seeded_app() -> (Router, Arc<InMemoryVillaRepo>) {
    let repo = Arc::new(InMemoryVillaRepo::with_villas(seed_villas()));
    (build_test_app(repo.clone()), repo)
}

/// App over a memory store holding only "Pool View" (1).
pub fn pool_view_app() -> (Router, Arc<InMemoryVillaRepo>) {
    let villas = seed_villas().into_iter().filter(|v| v.id == 1);
    let repo = Arc::new(InMemoryVillaRepo::with_villas(villas));
    (build_test_app(repo.clone()), repo)
}

pub async fn send(app: Router, request: Request<Body>) -> Response<Body> {
    app.oneshot(request).await.unwrap()
}

pub async fn get(app: Router, uri: &str) -> Response<Body> {
    send(
        app,
        Request::builder().uri(uri).body(Body::empty()).unwrap(),
    )
    .await
}

pub async fn delete(app: Router, uri: &str) -> Response<Body> {
    send(
        app,
        Request::builder()
            .method(Method::DELETE)
            .uri(uri)
            .body(Body::empty())
            .unwrap(),
    )
    .await
}

pub async fn send_json(
    app: Router,
    method: Method,
    uri: &str,
    body: serde_json::Value,
) -> Response<Body> {
    send_raw(app, method, uri, "application/json", body.to_string()).await
}

pub async fn send_raw(
    app: Router,
    method: Method,
    uri: &str,
    content_type: &str,
    body: impl Into<String>,
) -> Response<Body> {
    send(
        app,
        Request::builder()
            .method(method)
            .uri(uri)
            .header("content-type", content_type)
            .body(Body::from(body.into()))
            .unwrap(),
    )
    .await
}

pub async fn post_json(app: Router, uri: &str, body: serde_json::Value) -> Response<Body> {
    send_json(app, Method::POST, uri, body).await
}

pub async fn put_json(app: Router, uri: &str, body: serde_json::Value) -> Response<Body> {
    send_json(app, Method::PUT, uri, body).await
}

pub async fn patch_json(app: Router, uri: &str, body: serde_json::Value) -> Response<Body> {
    send_json(app, Method::PATCH, uri, body).await
}

pub async fn body_json(response: Response<Body>) -> serde_json::Value {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}
