// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Portrait generation endpoint handler

use axum::{body::Bytes, extract::State, http::HeaderMap, http::StatusCode, Json};
use tracing::{debug, error, warn};

use crate::api::handlers::request_origin;
use crate::api::http_server::AppState;
use crate::api::ApiError;
use crate::orchestrator::variant::GENERATION_FALLBACK_NOTICE;
use crate::orchestrator::{GenerationRequest, VariantPair};

/// POST /api/generate - Generate two portrait variants
///
/// Pipeline:
/// 1. Parse the attribute body (400 on malformed JSON)
/// 2. Run the generation orchestrator on its own task
/// 3. Return the pair; provider failures arrive as a degraded 200 pair
pub async fn generate_handler(
    State(state): State<AppState>,
    headers: HeaderMap,
    body: Bytes,
) -> Result<(StatusCode, Json<VariantPair>), ApiError> {
    let request: GenerationRequest = serde_json::from_slice(&body).map_err(|e| {
        warn!("Generation request rejected: {}", e);
        ApiError::InvalidJson(e.to_string())
    })?;
    debug!("Generation request received: {:?}", request);

    let origin = request_origin(&state.config, &headers);
    let orchestrator = state.generation.clone();
    let task = tokio::spawn(async move {
        orchestrator
            .generate_pair(&request, origin.as_deref())
            .await
    });

    match task.await {
        Ok(pair) => Ok((StatusCode::OK, Json(pair))),
        Err(e) => {
            error!("Generation task failed: {}", e);
            let pair = VariantPair::fallback(
                &state.config.fallback_a,
                &state.config.fallback_b,
                format!("internal error: {}", e),
            )
            .with_notice(GENERATION_FALLBACK_NOTICE);
            Ok((StatusCode::INTERNAL_SERVER_ERROR, Json(pair)))
        }
    }
}
