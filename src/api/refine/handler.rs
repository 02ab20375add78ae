// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Refinement endpoint handler

use axum::{body::Bytes, extract::State, http::HeaderMap, Json};
use tracing::{debug, error, warn};

use super::request::RefineBody;
use crate::api::handlers::request_origin;
use crate::api::http_server::AppState;
use crate::api::ApiError;
use crate::orchestrator::VariantPair;

/// POST /api/refine - Produce two refined variants of a chosen image
///
/// Only a malformed body or a missing `selected` is a 400; every other
/// failure, including an internal one, is answered with a 200 pair.
pub async fn refine_handler(
    State(state): State<AppState>,
    headers: HeaderMap,
    body: Bytes,
) -> Result<Json<VariantPair>, ApiError> {
    let body: RefineBody = serde_json::from_slice(&body).map_err(|e| {
        warn!("Refinement request rejected: {}", e);
        ApiError::InvalidJson(e.to_string())
    })?;
    let request = body.into_request()?;
    debug!(
        "Refinement request received: selected={}, note_len={}",
        request.selected,
        request.note.as_deref().map_or(0, str::len)
    );

    let origin = request_origin(&state.config, &headers);
    let selected = request.selected.clone();
    let orchestrator = state.refinement.clone();
    let task = tokio::spawn(async move {
        orchestrator
            .refine_pair(&request, origin.as_deref())
            .await
    });

    match task.await {
        Ok(pair) => Ok(Json(pair)),
        Err(e) => {
            error!("Refinement task failed: {}", e);
            Ok(Json(VariantPair::fallback(
                &selected,
                &selected,
                format!("internal error: {}", e),
            )))
        }
    }
}
