// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
use axum::http::{header, HeaderMap};
use axum::Json;
use serde::{Deserialize, Serialize};

use super::ApiError;
use crate::config::AppConfig;

/// `{"ok": true}`
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct OkResponse {
    pub ok: bool,
}

impl OkResponse {
    pub fn ok() -> Self {
        Self { ok: true }
    }
}

/// GET /api/healthz
pub async fn health_handler() -> Json<OkResponse> {
    Json(OkResponse::ok())
}

/// Fallback for non-POST methods on the POST endpoints
pub async fn method_not_allowed() -> ApiError {
    ApiError::MethodNotAllowed
}

/// Origin of the calling request: the configured public origin, else
/// `{X-Forwarded-Proto or http}://{Host}`
pub fn request_origin(config: &AppConfig, headers: &HeaderMap) -> Option<String> {
    if let Some(ref origin) = config.public_origin {
        return Some(origin.clone());
    }
    let host = headers.get(header::HOST)?.to_str().ok()?;
    let scheme = headers
        .get("x-forwarded-proto")
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.split(',').next())
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .unwrap_or("http");
    Some(format!("{}://{}", scheme, host))
}
