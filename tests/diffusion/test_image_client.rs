// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! OpenAiImageClient against a mock images API

use axum::{
    body::Bytes,
    extract::State,
    http::{HeaderMap, StatusCode},
    routing::post,
    Json, Router,
};
use base64::{engine::general_purpose::STANDARD, Engine as _};
use omokage_node::diffusion::{
    EditSource, ImageProvider, OpenAiImageClient, ProviderError, ProviderImage,
};
use serde_json::{json, Value};
use std::sync::{Arc, Mutex};
use std::time::Duration;

const IMAGE: &[u8] = b"\x89PNG\r\n\x1a\nprovider-output";

#[derive(Clone, Default)]
struct Captured {
    requests: Arc<Mutex<Vec<(HeaderMap, Bytes)>>>,
}

impl Captured {
    fn take(&self) -> Vec<(HeaderMap, Bytes)> {
        std::mem::take(&mut *self.requests.lock().unwrap())
    }
}

/// Mock provider answering both endpoints with `reply`
async fn mock_provider(status: StatusCode, reply: Value) -> (String, Captured) {
    let captured = Captured::default();
    let handler = move |State(captured): State<Captured>, headers: HeaderMap, body: Bytes| {
        let reply = reply.clone();
        async move {
            captured.requests.lock().unwrap().push((headers, body));
            (status, Json(reply))
        }
    };
    let app = Router::new()
        .route("/v1/images/generations", post(handler.clone()))
        .route("/v1/images/edits", post(handler))
        .with_state(captured.clone());

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    (format!("http://{}", addr), captured)
}

fn client(endpoint: &str) -> OpenAiImageClient {
    OpenAiImageClient::new(endpoint, "gpt-image-1", "sk-test", Duration::from_secs(5)).unwrap()
}

#[test]
fn test_client_model_name() {
    let client = OpenAiImageClient::new(
        "https://api.openai.com/",
        "gpt-image-1",
        "",
        Duration::from_secs(1),
    )
    .unwrap();
    assert_eq!(client.model_name(), "gpt-image-1");
    assert_eq!(client.name(), "openai-images");
}

#[tokio::test]
async fn test_create_image_inline_payload() {
    let (endpoint, captured) = mock_provider(
        StatusCode::OK,
        json!({"data": [{"b64_json": STANDARD.encode(IMAGE)}]}),
    )
    .await;
    let client = client(&endpoint).with_organization(Some("org-42".to_string()));

    let image = client.create_image("a portrait", "1024x1024").await.unwrap();
    match image {
        ProviderImage::Inline(bytes) => assert_eq!(bytes.as_ref(), IMAGE),
        other => panic!("expected inline image, got {:?}", other),
    }

    let requests = captured.take();
    assert_eq!(requests.len(), 1);
    let (headers, body) = &requests[0];
    assert_eq!(headers["authorization"], "Bearer sk-test");
    assert_eq!(headers["openai-organization"], "org-42");
    let body: Value = serde_json::from_slice(body).unwrap();
    assert_eq!(body["model"], "gpt-image-1");
    assert_eq!(body["prompt"], "a portrait");
    assert_eq!(body["size"], "1024x1024");
    assert_eq!(body["n"], 1);
}

#[tokio::test]
async fn test_create_image_remote_pointer() {
    let (endpoint, _captured) = mock_provider(
        StatusCode::OK,
        json!({"data": [{"url": "https://cdn.example/img.png", "revised_prompt": "x"}]}),
    )
    .await;

    let image = client(&endpoint).create_image("p", "1024x1024").await.unwrap();
    assert!(matches!(image, ProviderImage::Remote(ref url) if url == "https://cdn.example/img.png"));
}

#[tokio::test]
async fn test_edit_image_sends_multipart() {
    let (endpoint, captured) = mock_provider(
        StatusCode::OK,
        json!({"data": [{"b64_json": format!("data:image/png;base64,{}", STANDARD.encode(IMAGE))}]}),
    )
    .await;
    let source = EditSource {
        content: bytes::Bytes::from_static(b"jpeg-source-bytes"),
        extension: ".jpg".to_string(),
    };

    let image = client(&endpoint)
        .edit_image(source, "make it warmer", "1024x1024")
        .await
        .unwrap();
    assert!(matches!(image, ProviderImage::Inline(ref b) if b.as_ref() == IMAGE));

    let requests = captured.take();
    let (headers, body) = &requests[0];
    let content_type = headers["content-type"].to_str().unwrap();
    assert!(content_type.starts_with("multipart/form-data"));
    let body = String::from_utf8_lossy(body).to_ascii_lowercase();
    assert!(body.contains("filename=\"input.jpg\""));
    assert!(body.contains("content-type: image/jpeg"));
    assert!(body.contains("jpeg-source-bytes"));
    assert!(body.contains("make it warmer"));
}

#[tokio::test]
async fn test_error_status_is_reported() {
    let (endpoint, _captured) = mock_provider(
        StatusCode::TOO_MANY_REQUESTS,
        json!({"error": {"message": "slow down"}}),
    )
    .await;

    let err = client(&endpoint).create_image("p", "1024x1024").await.unwrap_err();
    match err {
        ProviderError::Status { status, body } => {
            assert_eq!(status, 429);
            assert!(body.contains("slow down"));
        }
        other => panic!("unexpected error {:?}", other),
    }
}

#[tokio::test]
async fn test_empty_data_is_no_image() {
    let (endpoint, _captured) = mock_provider(StatusCode::OK, json!({"data": []})).await;

    let err = client(&endpoint).create_image("p", "1024x1024").await.unwrap_err();
    assert!(matches!(err, ProviderError::EmptyResponse));
    assert_eq!(err.to_string(), "no image returned");
}

#[tokio::test]
async fn test_unreachable_provider() {
    let err = client("http://127.0.0.1:9")
        .create_image("p", "1024x1024")
        .await
        .unwrap_err();
    assert!(matches!(err, ProviderError::Http(_)));
}
