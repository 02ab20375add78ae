// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Two fresh portraits from one prompt

use std::future::Future;
use std::sync::Arc;

use tracing::{info, warn};

use super::request::GenerationRequest;
use super::variant::{VariantError, VariantPair, GENERATION_FALLBACK_NOTICE};
use super::workers::TaskPair;
use super::MediaPipeline;
use crate::diffusion::build_prompt;
use crate::media::Subcategory;

const GENERATION_FAILED: &str = "generation failed; showing samples";

pub struct GenerationOrchestrator {
    pipeline: MediaPipeline,
}

impl GenerationOrchestrator {
    pub fn new(pipeline: MediaPipeline) -> Self {
        Self { pipeline }
    }

    /// Generate two variants.
    ///
    /// Any failure, in either call or in the join, replaces the whole pair
    /// with the sample images. Never returns an error.
    pub async fn generate_pair(
        &self,
        request: &GenerationRequest,
        origin: Option<&str>,
    ) -> VariantPair {
        let prompt: Arc<str> = Arc::from(build_prompt(request));
        let origin = origin.map(str::to_string);

        let pair = TaskPair::spawn(
            self.generate_one(prompt.clone(), origin.clone()),
            self.generate_one(prompt, origin),
        );
        let (a, b) = pair.join().await;
        let a = a.map_err(VariantError::from).and_then(|r| r);
        let b = b.map_err(VariantError::from).and_then(|r| r);

        match (a, b) {
            (Ok(url_a), Ok(url_b)) => {
                info!("Generated variant pair: {}, {}", url_a, url_b);
                VariantPair::both(url_a, url_b)
            }
            (Err(e), _) | (_, Err(e)) => {
                warn!("Generation failed, returning samples: {}", e);
                let message = e.to_string();
                let message = if message.is_empty() {
                    GENERATION_FAILED.to_string()
                } else {
                    message
                };
                let config = &self.pipeline.config;
                VariantPair::fallback(&config.fallback_a, &config.fallback_b, message)
                    .with_notice(GENERATION_FALLBACK_NOTICE)
            }
        }
    }

    fn generate_one(
        &self,
        prompt: Arc<str>,
        origin: Option<String>,
    ) -> impl Future<Output = Result<String, VariantError>> + Send + 'static {
        let pipeline = self.pipeline.clone();
        async move {
            let size = pipeline.config.size.clone();
            let image = pipeline.provider.create_image(&prompt, &size).await?;
            pipeline
                .persist(image, Subcategory::Generated, origin.as_deref())
                .await
        }
    }
}
