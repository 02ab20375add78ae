// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! POST /api/refine over the full router

use crate::common::{test_config, write_media, FakeProvider, Reply};
use axum::{
    body::Body,
    http::{header, Method, Request, StatusCode},
    Router,
};
use omokage_node::api::http_server::{create_app, AppState};
use omokage_node::orchestrator::SINGLE_REFINEMENT_NOTICE;
use serde_json::Value;
use std::sync::Arc;
use tempfile::TempDir;
use tower::util::ServiceExt;

const SELECTED: &str = "/media/generated/pick.png";

fn setup(replies: Vec<Reply>) -> (TempDir, Arc<FakeProvider>, Router) {
    let dir = TempDir::new().unwrap();
    write_media(dir.path(), "generated/pick.png", b"picked-image");
    let provider = FakeProvider::new(replies);
    let state = AppState::with_provider(provider.clone(), test_config(dir.path())).unwrap();
    (dir, provider, create_app(state))
}

fn post_json(body: &str) -> Request<Body> {
    Request::builder()
        .method(Method::POST)
        .uri("/api/refine")
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

async fn send(app: Router, body: &str) -> (StatusCode, Value) {
    let response = app.oneshot(post_json(body)).await.unwrap();
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    (status, serde_json::from_slice(&bytes).unwrap())
}

#[tokio::test]
async fn test_refine_two_variants() {
    let (_dir, provider, app) = setup(vec![
        Reply::Inline(b"edit-1".to_vec()),
        Reply::Inline(b"edit-2".to_vec()),
    ]);

    let (status, body) = send(
        app,
        &format!(
            r#"{{"selected":"{}","note":"add a warm smile","context":{{"age":"30"}}}}"#,
            SELECTED
        ),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    let options = body["options"].as_array().unwrap();
    assert_eq!(options.len(), 2);
    assert_ne!(options[0], options[1]);
    assert!(options
        .iter()
        .all(|o| o.as_str().unwrap().starts_with("/media/refined/")));

    let calls = provider.calls();
    assert!(calls[0].prompt.contains("Age: 30."));
    assert!(calls[0].prompt.contains("add a warm smile"));
    assert_eq!(calls[0].source.as_ref().unwrap().content.as_ref(), b"picked-image");
}

#[tokio::test]
async fn test_refine_single_success_notice() {
    let (_dir, _provider, app) = setup(vec![
        Reply::Inline(b"edit-1".to_vec()),
        Reply::Fail("moderation".to_string()),
    ]);

    let (status, body) = send(app, &format!(r#"{{"selected":"{}"}}"#, SELECTED)).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["options"][0], body["options"][1]);
    assert_eq!(body["notice"], SINGLE_REFINEMENT_NOTICE);
    assert!(body.get("error").is_none());
}

#[tokio::test]
async fn test_refine_failure_echoes_selected() {
    let (_dir, _provider, app) = setup(vec![
        Reply::Fail("upstream 500".to_string()),
        Reply::Fail("upstream 500".to_string()),
    ]);

    let (status, body) = send(app, &format!(r#"{{"selected":"{}"}}"#, SELECTED)).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["options"][0], SELECTED);
    assert_eq!(body["options"][1], SELECTED);
    assert_eq!(body["error"], "upstream 500");
}

#[tokio::test]
async fn test_refine_context_presence() {
    let cases = [
        (r#""context":{}"#, "Portrait photograph, head and shoulders"),
        (r#""context":null"#, "Portrait photograph, head and shoulders"),
        (r#""context":{"gender":""}"#, "Portrait photograph of a new, original person."),
    ];
    for (context, prefix) in cases {
        let (_dir, provider, app) = setup(vec![
            Reply::Inline(b"edit-1".to_vec()),
            Reply::Inline(b"edit-2".to_vec()),
        ]);
        let (status, _body) = send(
            app,
            &format!(r#"{{"selected":"{}",{}}}"#, SELECTED, context),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert!(
            provider.calls()[0].prompt.starts_with(prefix),
            "context {}",
            context
        );
    }
}

#[tokio::test]
async fn test_refine_requires_selected() {
    for payload in [r#"{}"#, r#"{"selected":""}"#, r#"{"note":"x"}"#] {
        let (_dir, provider, app) = setup(vec![]);
        let (status, body) = send(app, payload).await;
        assert_eq!(status, StatusCode::BAD_REQUEST, "payload {}", payload);
        assert_eq!(body["error"], "selected required");
        assert!(provider.calls().is_empty());
    }
}

#[tokio::test]
async fn test_refine_invalid_json() {
    let (_dir, _provider, app) = setup(vec![]);

    let (status, body) = send(app, "selected=/media/x.png").await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "invalid json");
}
