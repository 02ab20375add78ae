// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Completion endpoint
//!
//! Provides POST /api/complete. The chosen result is acknowledged but not
//! persisted.

use axum::{body::Bytes, Json};
use serde_json::Value;
use tracing::{info, warn};

use super::handlers::OkResponse;
use super::ApiError;

/// POST /api/complete - Acknowledge the final selection
pub async fn complete_handler(body: Bytes) -> Result<Json<OkResponse>, ApiError> {
    let payload: Value = serde_json::from_slice(&body).map_err(|e| {
        warn!("Completion request rejected: {}", e);
        ApiError::InvalidJson(e.to_string())
    })?;

    let image = payload
        .get("imageUrl")
        .and_then(Value::as_str)
        .unwrap_or("-");
    info!("Completion received: {} bytes, image={}", body.len(), image);
    Ok(Json(OkResponse::ok()))
}
