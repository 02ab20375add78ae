// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
use anyhow::{Context, Result};
use axum::{
    http::HeaderValue,
    routing::{get, post},
    Router,
};
use std::{net::SocketAddr, sync::Arc};
use tower_http::cors::{AllowOrigin, Any, CorsLayer};
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;
use tracing::{info, warn};

use super::complete::complete_handler;
use super::generate::generate_handler;
use super::handlers::{health_handler, method_not_allowed};
use super::refine::refine_handler;
use crate::config::AppConfig;
use crate::diffusion::{ImageProvider, OpenAiImageClient};
use crate::orchestrator::{GenerationOrchestrator, MediaPipeline, RefinementOrchestrator};

#[derive(Clone)]
pub struct AppState {
    pub generation: Arc<GenerationOrchestrator>,
    pub refinement: Arc<RefinementOrchestrator>,
    pub config: Arc<AppConfig>,
}

impl AppState {
    pub fn new(pipeline: MediaPipeline) -> Self {
        Self {
            config: pipeline.config.clone(),
            generation: Arc::new(GenerationOrchestrator::new(pipeline.clone())),
            refinement: Arc::new(RefinementOrchestrator::new(pipeline)),
        }
    }

    /// Build state from configuration around any provider
    pub fn with_provider(provider: Arc<dyn ImageProvider>, config: AppConfig) -> Result<Self> {
        let pipeline = MediaPipeline::new(provider, Arc::new(config))?;
        Ok(Self::new(pipeline))
    }
}

fn cors_layer(config: &AppConfig) -> CorsLayer {
    let layer = CorsLayer::new().allow_methods(Any).allow_headers(Any);
    if config.cors_allowed_origins.is_empty() {
        return layer.allow_origin(Any);
    }

    let origins: Vec<HeaderValue> = config
        .cors_allowed_origins
        .iter()
        .filter_map(|origin| match origin.parse::<HeaderValue>() {
            Ok(value) => Some(value),
            Err(_) => {
                warn!("Ignoring invalid CORS origin: {}", origin);
                None
            }
        })
        .collect();
    layer.allow_origin(AllowOrigin::list(origins))
}

pub fn create_app(state: AppState) -> Router {
    let config = state.config.clone();

    let mut app = Router::new()
        .route(
            "/api/generate",
            post(generate_handler).fallback(method_not_allowed),
        )
        .route(
            "/api/refine",
            post(refine_handler).fallback(method_not_allowed),
        )
        .route(
            "/api/complete",
            post(complete_handler).fallback(method_not_allowed),
        )
        .route("/api/healthz", get(health_handler));

    // Persisted media, read-only
    let media_prefix = config.media_url.trim_end_matches('/');
    if !media_prefix.is_empty() {
        app = app.nest_service(media_prefix, ServeDir::new(&config.media_root));
    }

    app.layer(cors_layer(&config))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

pub async fn start_server(config: AppConfig) -> Result<()> {
    tokio::fs::create_dir_all(&config.media_root)
        .await
        .with_context(|| format!("creating media root {}", config.media_root.display()))?;

    let provider: Arc<dyn ImageProvider> = Arc::new(OpenAiImageClient::from_config(&config)?);
    let addr = config.listen_addr.parse::<SocketAddr>()?;
    let state = AppState::with_provider(provider, config)?;
    let app = create_app(state);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    info!("API server listening on {}", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(async {
            let _ = tokio::signal::ctrl_c().await;
            info!("Shutdown signal received");
        })
        .await?;

    Ok(())
}
