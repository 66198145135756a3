// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1

//! Route registration tests.
//!
//! These tests verify that:
//! - The embedding routes accept POST and reject other methods
//! - /health and /models respond without any model loaded
//! - Unknown routes return 404
//! - Cross-origin requests are permitted unconditionally

use axum::body::Body;
use axum::http::{Method, Request, StatusCode};
use axum::Router;
use fabstir_embed_node::api::http_server::{create_app, AppState};
use fabstir_embed_node::config::ServerConfig;
use tower::ServiceExt; // for `oneshot`

fn test_app() -> Router {
    create_app(AppState::new(&ServerConfig::default()))
}

async fn body_json(response: axum::response::Response) -> serde_json::Value {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

#[tokio::test]
async fn embed_rejects_get() {
    let request = Request::builder()
        .method(Method::GET)
        .uri("/embed")
        .body(Body::empty())
        .unwrap();

    let response = test_app().oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::METHOD_NOT_ALLOWED);
}

#[tokio::test]
async fn embed_batch_rejects_get() {
    let request = Request::builder()
        .method(Method::GET)
        .uri("/embed-batch")
        .body(Body::empty())
        .unwrap();

    let response = test_app().oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::METHOD_NOT_ALLOWED);
}

#[tokio::test]
async fn unknown_route_returns_404() {
    let request = Request::builder()
        .method(Method::POST)
        .uri("/embeddings")
        .header("content-type", "application/json")
        .body(Body::from("{}"))
        .unwrap();

    let response = test_app().oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn health_returns_ok_without_any_model_loaded() {
    let request = Request::builder()
        .method(Method::GET)
        .uri("/health")
        .body(Body::empty())
        .unwrap();

    let response = test_app().oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let json = body_json(response).await;
    assert_eq!(json["status"], "ok");
}

#[tokio::test]
async fn models_is_empty_before_first_request() {
    let request = Request::builder()
        .method(Method::GET)
        .uri("/models")
        .body(Body::empty())
        .unwrap();

    let response = test_app().oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let json = body_json(response).await;
    assert_eq!(json["models"], serde_json::json!([]));
    assert_eq!(json["default_model"], "Xenova/all-MiniLM-L6-v2");
}

#[tokio::test]
async fn cors_preflight_allows_any_origin() {
    let request = Request::builder()
        .method(Method::OPTIONS)
        .uri("/embed")
        .header("origin", "https://example.com")
        .header("access-control-request-method", "POST")
        .body(Body::empty())
        .unwrap();

    let response = test_app().oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        response
            .headers()
            .get("access-control-allow-origin")
            .and_then(|v| v.to_str().ok()),
        Some("*")
    );
}
