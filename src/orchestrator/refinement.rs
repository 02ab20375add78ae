// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Two edits of a previously chosen image
//!
//! Unlike generation, a failed call only costs its own slot: one success is
//! duplicated into both slots, and only a double failure falls back.

use std::future::Future;
use std::sync::Arc;

use tracing::{info, warn};

use super::request::RefinementRequest;
use super::variant::{
    SlotResult, VariantError, VariantPair, NO_IMAGE_RETURNED, SINGLE_REFINEMENT_NOTICE,
};
use super::workers::TaskPair;
use super::MediaPipeline;
use crate::diffusion::build_refine_prompt;
use crate::media::{ResolvedSource, Subcategory};

pub struct RefinementOrchestrator {
    pipeline: MediaPipeline,
}

impl RefinementOrchestrator {
    pub fn new(pipeline: MediaPipeline) -> Self {
        Self { pipeline }
    }

    /// Refine the selected image into two variants. Never returns an error.
    pub async fn refine_pair(
        &self,
        request: &RefinementRequest,
        origin: Option<&str>,
    ) -> VariantPair {
        let fallback = if request.selected.is_empty() {
            self.pipeline.config.fallback_a.as_str()
        } else {
            request.selected.as_str()
        };

        let reference = match origin {
            Some(origin) if request.selected.starts_with('/') => {
                format!("{}{}", origin.trim_end_matches('/'), request.selected)
            }
            _ => request.selected.clone(),
        };

        // Read once; both calls share the same immutable buffer
        let source = match self.pipeline.resolver.resolve(&reference).await {
            Ok(source) => source,
            Err(e) => {
                warn!("Refinement source unavailable: {}", e);
                return VariantPair::fallback(fallback, fallback, e.to_string());
            }
        };

        let prompt: Arc<str> = Arc::from(build_refine_prompt(
            request.note.as_deref(),
            request.context.as_ref(),
        ));
        let origin = origin.map(str::to_string);

        let pair = TaskPair::spawn(
            self.refine_one(source.clone(), prompt.clone(), origin.clone()),
            self.refine_one(source, prompt, origin),
        );
        let (a, b) = pair.join().await;
        let slots = [a, b].map(|joined| match joined {
            Ok(slot) => slot,
            Err(e) => SlotResult::from(Err::<String, _>(VariantError::from(e))),
        });

        combine_refinements(slots, fallback)
    }

    fn refine_one(
        &self,
        source: ResolvedSource,
        prompt: Arc<str>,
        origin: Option<String>,
    ) -> impl Future<Output = SlotResult> + Send + 'static {
        let pipeline = self.pipeline.clone();
        async move {
            let result: Result<String, VariantError> = async {
                let size = pipeline.config.size.clone();
                let image = pipeline
                    .provider
                    .edit_image(source.edit_source(), &prompt, &size)
                    .await?;
                pipeline
                    .persist(image, Subcategory::Refined, origin.as_deref())
                    .await
            }
            .await;

            if let Err(ref e) = result {
                warn!("Refinement call failed: {}", e);
            }
            SlotResult::from(result)
        }
    }
}

/// Fold the two slot results into a pair
pub fn combine_refinements(slots: [SlotResult; 2], fallback: &str) -> VariantPair {
    let [a, b] = slots;
    match (a.url, b.url) {
        (Some(url_a), Some(url_b)) => {
            info!("Refined variant pair: {}, {}", url_a, url_b);
            VariantPair::both(url_a, url_b)
        }
        (Some(only), None) | (None, Some(only)) => {
            info!("Only one refined variant produced: {}", only);
            VariantPair::single(only, SINGLE_REFINEMENT_NOTICE)
        }
        (None, None) => {
            let error = a
                .error
                .or(b.error)
                .unwrap_or_else(|| NO_IMAGE_RETURNED.to_string());
            VariantPair::fallback(fallback, fallback, error)
        }
    }
}
