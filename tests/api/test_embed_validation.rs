// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1

//! Validation tests for the embedding endpoints.
//!
//! These tests verify that caller mistakes are rejected with 400 and an
//! `{error}` JSON body before any model interaction. Model loading is lazy,
//! so none of these tests touch the network or model files.

use axum::body::Body;
use axum::http::{Method, Request, StatusCode};
use axum::Router;
use fabstir_embed_node::api::http_server::{create_app, AppState};
use fabstir_embed_node::config::ServerConfig;
use tower::ServiceExt; // for `oneshot`

fn test_app() -> Router {
    create_app(AppState::new(&ServerConfig::default()))
}

async fn post_json(app: Router, uri: &str, body: &str) -> (StatusCode, serde_json::Value) {
    let request = Request::builder()
        .method(Method::POST)
        .uri(uri)
        .header("content-type", "application/json")
        .body(Body::from(body.to_string()))
        .unwrap();

    let response = app.oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let json = serde_json::from_slice(&bytes).unwrap_or(serde_json::Value::Null);
    (status, json)
}

#[tokio::test]
async fn embed_with_empty_body_returns_400_with_error_field() {
    let (status, body) = post_json(test_app(), "/embed", "{}").await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["error"].is_string());
    assert_eq!(body["field"], "text");
}

#[tokio::test]
async fn embed_with_empty_text_returns_400() {
    let (status, body) = post_json(test_app(), "/embed", r#"{"text": ""}"#).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["error"].is_string());
}

#[tokio::test]
async fn embed_with_whitespace_text_returns_400() {
    let (status, _) = post_json(test_app(), "/embed", r#"{"text": "   "}"#).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn embed_with_empty_model_returns_400() {
    let (status, body) =
        post_json(test_app(), "/embed", r#"{"text": "hello", "model": ""}"#).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["field"], "model");
}

#[tokio::test]
async fn embed_with_malformed_json_returns_400() {
    let (status, body) = post_json(test_app(), "/embed", "{not json").await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["error"].is_string());
}

#[tokio::test]
async fn embed_with_wrong_text_type_returns_400() {
    let (status, body) = post_json(test_app(), "/embed", r#"{"text": 42}"#).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["error"].is_string());
}

#[tokio::test]
async fn batch_with_empty_body_returns_400_with_error_field() {
    let (status, body) = post_json(test_app(), "/embed-batch", "{}").await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["error"].is_string());
    assert_eq!(body["field"], "texts");
}

#[tokio::test]
async fn batch_with_empty_texts_returns_400_with_error_field() {
    let (status, body) = post_json(test_app(), "/embed-batch", r#"{"texts": []}"#).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["error"].is_string());
    assert_eq!(body["field"], "texts");
}

#[tokio::test]
async fn batch_with_non_array_texts_returns_400() {
    let (status, body) =
        post_json(test_app(), "/embed-batch", r#"{"texts": "not a list"}"#).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["error"].is_string());
}

#[tokio::test]
async fn batch_with_empty_element_returns_400_with_index() {
    let (status, body) =
        post_json(test_app(), "/embed-batch", r#"{"texts": ["ok", ""]}"#).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["field"], "texts[1]");
}
