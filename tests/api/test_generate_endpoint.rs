// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! POST /api/generate over the full router

use crate::common::{read_media, test_config, FakeProvider, Reply};
use axum::{
    body::Body,
    http::{header, Method, Request, StatusCode},
    Router,
};
use omokage_node::api::http_server::{create_app, AppState};
use omokage_node::config::{AppConfig, FALLBACK_A, FALLBACK_B};
use omokage_node::orchestrator::GENERATION_FALLBACK_NOTICE;
use serde_json::Value;
use std::sync::Arc;
use tempfile::TempDir;
use tower::util::ServiceExt; // for `oneshot`

fn app(provider: Arc<FakeProvider>, config: AppConfig) -> Router {
    create_app(AppState::with_provider(provider, config).unwrap())
}

fn post_json(body: &str) -> Request<Body> {
    Request::builder()
        .method(Method::POST)
        .uri("/api/generate")
        .header(header::CONTENT_TYPE, "application/json")
        .header(header::HOST, "portraits.local:8000")
        .body(Body::from(body.to_string()))
        .unwrap()
}

async fn json_body(response: axum::response::Response) -> Value {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

#[tokio::test]
async fn test_generate_returns_two_media_urls() {
    let dir = TempDir::new().unwrap();
    let provider = FakeProvider::new(vec![
        Reply::Inline(b"one".to_vec()),
        Reply::Inline(b"two".to_vec()),
    ]);
    let app = app(provider.clone(), test_config(dir.path()));

    let response = app
        .oneshot(post_json(
            r#"{"gender":"male","age":42,"hair":"grey","features":"glasses","similarTo":"a jazz pianist"}"#,
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = json_body(response).await;
    let options = body["options"].as_array().unwrap();
    assert_eq!(options.len(), 2);
    for option in options {
        let url = option.as_str().unwrap();
        assert!(url.starts_with("/media/generated/"));
        assert!(!read_media(dir.path(), url).is_empty());
    }
    assert!(body.get("error").is_none());
    assert!(body.get("notice").is_none());

    let prompt = &provider.calls()[0].prompt;
    assert!(prompt.contains("Age: 42."));
    assert!(prompt.contains("evoking the vibe of a jazz pianist"));
}

#[tokio::test]
async fn test_generate_provider_failure_serves_samples() {
    let dir = TempDir::new().unwrap();
    let provider = FakeProvider::new(vec![
        Reply::Fail("quota exceeded".to_string()),
        Reply::Fail("quota exceeded".to_string()),
    ]);
    let app = app(provider, test_config(dir.path()));

    let response = app.oneshot(post_json("{}")).await.unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = json_body(response).await;
    assert_eq!(body["options"][0], FALLBACK_A);
    assert_eq!(body["options"][1], FALLBACK_B);
    assert_eq!(body["error"], "quota exceeded");
    assert_eq!(body["notice"], GENERATION_FALLBACK_NOTICE);
}

#[tokio::test]
async fn test_generate_invalid_json() {
    let dir = TempDir::new().unwrap();
    let app = app(FakeProvider::new(vec![]), test_config(dir.path()));

    let response = app.oneshot(post_json("{not json")).await.unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body = json_body(response).await;
    assert_eq!(body["error"], "invalid json");
}

#[tokio::test]
async fn test_generate_absolute_urls_from_forwarded_headers() {
    let dir = TempDir::new().unwrap();
    let mut config = test_config(dir.path());
    config.absolute_media_urls = true;
    let provider = FakeProvider::new(vec![
        Reply::Inline(b"one".to_vec()),
        Reply::Inline(b"two".to_vec()),
    ]);
    let app = app(provider, config);

    let mut request = post_json("{}");
    request
        .headers_mut()
        .insert("x-forwarded-proto", "https".parse().unwrap());
    let response = app.oneshot(request).await.unwrap();

    let body = json_body(response).await;
    for option in body["options"].as_array().unwrap() {
        assert!(option
            .as_str()
            .unwrap()
            .starts_with("https://portraits.local:8000/media/generated/"));
    }
}

#[tokio::test]
async fn test_generate_get_not_allowed() {
    let dir = TempDir::new().unwrap();
    let app = app(FakeProvider::new(vec![]), test_config(dir.path()));

    let response = app
        .oneshot(
            Request::builder()
                .method(Method::GET)
                .uri("/api/generate")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::METHOD_NOT_ALLOWED);
    let body = json_body(response).await;
    assert_eq!(body["error"], "POST only");
}
