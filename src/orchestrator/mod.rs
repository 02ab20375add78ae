// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Dual-variant generation and refinement
//!
//! Each orchestration runs exactly two provider calls in parallel and always
//! produces a well-formed [`VariantPair`], degrading to fallback content when
//! calls fail.

pub mod generation;
pub mod refinement;
pub mod request;
pub mod variant;
pub mod workers;

use std::sync::Arc;

use anyhow::Result;
use tracing::debug;

use crate::config::AppConfig;
use crate::diffusion::{ImageProvider, ProviderImage};
use crate::media::{MediaResolver, MediaStore, Subcategory, UrlNormalizer};

pub use generation::GenerationOrchestrator;
pub use refinement::RefinementOrchestrator;
pub use request::{GenerationRequest, RefinementRequest};
pub use variant::{
    PairOutcome, SlotResult, VariantError, VariantPair, GENERATION_FALLBACK_NOTICE,
    NO_IMAGE_RETURNED, SINGLE_REFINEMENT_NOTICE,
};
pub use workers::TaskPair;

/// Collaborators shared by both orchestrators
#[derive(Clone)]
pub struct MediaPipeline {
    pub provider: Arc<dyn ImageProvider>,
    pub resolver: Arc<MediaResolver>,
    pub store: Arc<MediaStore>,
    pub urls: Arc<UrlNormalizer>,
    pub config: Arc<AppConfig>,
}

impl MediaPipeline {
    /// Wire the media components from configuration around `provider`
    pub fn new(provider: Arc<dyn ImageProvider>, config: Arc<AppConfig>) -> Result<Self> {
        Ok(Self {
            provider,
            resolver: Arc::new(MediaResolver::from_config(&config)?),
            store: Arc::new(MediaStore::from_config(&config)),
            urls: Arc::new(UrlNormalizer::from_config(&config)),
            config,
        })
    }

    /// Persist a provider image and return its public URL
    pub async fn persist(
        &self,
        image: ProviderImage,
        subcategory: Subcategory,
        origin: Option<&str>,
    ) -> Result<String, VariantError> {
        let content = match image {
            ProviderImage::Inline(content) => content,
            ProviderImage::Remote(url) => {
                debug!("Downloading provider output from {}", url);
                self.resolver.download(&url).await?
            }
        };
        let stored = self.store.save(content, subcategory).await?;
        Ok(self.urls.to_public_url(origin, &stored.relative_path()))
    }
}
