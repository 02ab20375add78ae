// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
pub mod api;
pub mod config;
pub mod diffusion;
pub mod media;
pub mod orchestrator;
pub mod version;

pub use config::AppConfig;
pub use diffusion::{ImageProvider, OpenAiImageClient, ProviderError, ProviderImage};
pub use media::{MediaResolver, MediaStore, UrlNormalizer};
pub use orchestrator::{
    GenerationOrchestrator, GenerationRequest, MediaPipeline, RefinementOrchestrator,
    RefinementRequest, VariantPair,
};
