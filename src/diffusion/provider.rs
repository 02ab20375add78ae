// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Image provider capability consumed by the orchestrators

use async_trait::async_trait;
use base64::{engine::general_purpose::STANDARD, Engine as _};
use bytes::Bytes;
use thiserror::Error;

/// Errors from a single provider call
#[derive(Error, Debug)]
pub enum ProviderError {
    /// Transport failure talking to the provider
    #[error("provider request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// Provider answered with a non-success status
    #[error("provider returned {status}: {body}")]
    Status { status: u16, body: String },

    /// Response carried neither an inline payload nor a pointer
    #[error("no image returned")]
    EmptyResponse,

    /// Inline payload was not valid base64
    #[error("invalid base64 payload: {0}")]
    InvalidPayload(#[from] base64::DecodeError),

    #[error("{0}")]
    Other(String),
}

/// Image returned by the provider, decoded once at the call boundary
#[derive(Debug, Clone, PartialEq)]
pub enum ProviderImage {
    /// Decoded image bytes from an inline payload
    Inline(Bytes),
    /// Provider-issued URL the image must be downloaded from
    Remote(String),
}

impl ProviderImage {
    /// Build from the two optional fields of a provider response item.
    /// An inline payload wins over a pointer.
    pub fn from_parts(
        b64_json: Option<String>,
        url: Option<String>,
    ) -> Result<Self, ProviderError> {
        match (b64_json, url) {
            (Some(b64), _) if !b64.is_empty() => Ok(Self::Inline(decode_payload(&b64)?)),
            (_, Some(url)) if !url.is_empty() => Ok(Self::Remote(url)),
            _ => Err(ProviderError::EmptyResponse),
        }
    }
}

/// Source image handed to an edit call
#[derive(Debug, Clone)]
pub struct EditSource {
    pub content: Bytes,
    /// Extension including the dot, e.g. ".png"
    pub extension: String,
}

impl EditSource {
    /// File name presented to the provider; the extension drives its MIME sniffing
    pub fn file_name(&self) -> String {
        format!("input{}", self.extension)
    }

    pub fn mime_type(&self) -> &'static str {
        match self.extension.to_ascii_lowercase().as_str() {
            ".jpg" | ".jpeg" => "image/jpeg",
            ".webp" => "image/webp",
            ".gif" => "image/gif",
            _ => "image/png",
        }
    }
}

/// Decode a base64 image payload, stripping a `data:image/...;base64,` prefix
pub fn decode_payload(payload: &str) -> Result<Bytes, base64::DecodeError> {
    let data = if payload.starts_with("data:image") {
        payload.split_once(',').map(|(_, d)| d).unwrap_or("")
    } else {
        payload
    };
    Ok(Bytes::from(STANDARD.decode(data.trim())?))
}

/// Image generation and editing capability
///
/// Implemented by [`super::client::OpenAiImageClient`]; tests substitute fakes.
#[async_trait]
pub trait ImageProvider: Send + Sync {
    /// Create a new image from a text prompt
    async fn create_image(&self, prompt: &str, size: &str) -> Result<ProviderImage, ProviderError>;

    /// Edit an existing image according to a prompt
    async fn edit_image(
        &self,
        source: EditSource,
        prompt: &str,
        size: &str,
    ) -> Result<ProviderImage, ProviderError>;

    /// Provider name for logging
    fn name(&self) -> &str {
        "image-provider"
    }
}
