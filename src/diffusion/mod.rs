// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Portrait image generation via an OpenAI-compatible image provider

pub mod client;
pub mod prompt;
pub mod provider;

pub use client::{ImageSize, OpenAiImageClient};
pub use prompt::{build_prompt, build_refine_prompt};
pub use provider::{decode_payload, EditSource, ImageProvider, ProviderError, ProviderImage};
