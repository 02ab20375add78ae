// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! OpenAI-compatible image API client (generations + edits)

use anyhow::Result;
use async_trait::async_trait;
use reqwest::multipart::{Form, Part};
use reqwest::{Client, RequestBuilder, Response};
use serde::Deserialize;
use std::time::{Duration, Instant};
use tracing::{debug, info};

use super::provider::{EditSource, ImageProvider, ProviderError, ProviderImage};
use crate::config::AppConfig;

/// Client for an OpenAI-compatible `/v1/images/*` API
pub struct OpenAiImageClient {
    client: Client,
    endpoint: String,
    api_key: String,
    organization: Option<String>,
    model_name: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ImageSize {
    pub width: u32,
    pub height: u32,
}

// --- OpenAI-compatible response types ---

#[derive(Debug, Deserialize)]
pub struct OpenAIImageResponse {
    pub data: Vec<OpenAIImageData>,
}

#[derive(Debug, Deserialize)]
pub struct OpenAIImageData {
    pub b64_json: Option<String>,
    pub url: Option<String>,
    pub revised_prompt: Option<String>,
}

// --- Implementations ---

impl ImageSize {
    /// Parse a size string like "1024x1024" into an ImageSize
    pub fn parse(s: &str) -> std::result::Result<Self, String> {
        let parts: Vec<&str> = s.split('x').collect();
        if parts.len() != 2 {
            return Err(format!(
                "invalid size format '{}'; expected WIDTHxHEIGHT",
                s
            ));
        }
        let width = parts[0]
            .parse::<u32>()
            .map_err(|_| format!("invalid width in '{}'", s))?;
        let height = parts[1]
            .parse::<u32>()
            .map_err(|_| format!("invalid height in '{}'", s))?;
        if width == 0 || height == 0 {
            return Err(format!("width and height must be > 0 in '{}'", s));
        }
        Ok(Self { width, height })
    }
}

impl OpenAIImageResponse {
    /// Take the first item as a provider image
    pub fn into_image(self) -> std::result::Result<ProviderImage, ProviderError> {
        let first = self
            .data
            .into_iter()
            .next()
            .ok_or(ProviderError::EmptyResponse)?;
        if let Some(ref revised) = first.revised_prompt {
            debug!("Provider revised prompt: {}", revised);
        }
        ProviderImage::from_parts(first.b64_json, first.url)
    }
}

impl OpenAiImageClient {
    /// Create a new client
    pub fn new(endpoint: &str, model_name: &str, api_key: &str, timeout: Duration) -> Result<Self> {
        let client = Client::builder().timeout(timeout).build()?;

        let endpoint = endpoint.trim_end_matches('/').to_string();
        info!(
            "Image provider configured: endpoint={}, model={}",
            endpoint, model_name
        );

        Ok(Self {
            client,
            endpoint,
            api_key: api_key.to_string(),
            organization: None,
            model_name: model_name.to_string(),
        })
    }

    /// Create a client from service configuration
    pub fn from_config(config: &AppConfig) -> Result<Self> {
        let client = Self::new(
            &config.provider_endpoint,
            &config.model,
            &config.api_key,
            Duration::from_secs(config.provider_timeout_secs),
        )?;
        Ok(client.with_organization(config.organization.clone()))
    }

    pub fn with_organization(mut self, organization: Option<String>) -> Self {
        self.organization = organization;
        self
    }

    /// Get the model name
    pub fn model_name(&self) -> &str {
        &self.model_name
    }

    fn authorize(&self, builder: RequestBuilder) -> RequestBuilder {
        let builder = if self.api_key.is_empty() {
            builder
        } else {
            builder.bearer_auth(&self.api_key)
        };
        match self.organization {
            Some(ref org) => builder.header("OpenAI-Organization", org),
            None => builder,
        }
    }

    async fn read_image(response: Response) -> std::result::Result<ProviderImage, ProviderError> {
        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(ProviderError::Status {
                status: status.as_u16(),
                body,
            });
        }

        let api_response: OpenAIImageResponse = response.json().await?;
        api_response.into_image()
    }
}

#[async_trait]
impl ImageProvider for OpenAiImageClient {
    async fn create_image(
        &self,
        prompt: &str,
        size: &str,
    ) -> std::result::Result<ProviderImage, ProviderError> {
        let start = Instant::now();
        let body = serde_json::json!({
            "model": self.model_name,
            "prompt": prompt,
            "size": size,
            "n": 1,
        });

        let url = format!("{}/v1/images/generations", self.endpoint);
        debug!("Image generate POST {}", url);

        let response = self
            .authorize(self.client.post(&url))
            .json(&body)
            .send()
            .await?;
        let image = Self::read_image(response).await?;

        info!(
            "Image generated: model={}, size={}, {}ms",
            self.model_name,
            size,
            start.elapsed().as_millis()
        );
        Ok(image)
    }

    async fn edit_image(
        &self,
        source: EditSource,
        prompt: &str,
        size: &str,
    ) -> std::result::Result<ProviderImage, ProviderError> {
        let start = Instant::now();
        let mime = source.mime_type();
        let file_name = source.file_name();
        let part = Part::bytes(source.content.to_vec())
            .file_name(file_name)
            .mime_str(mime)?;

        let form = Form::new()
            .text("model", self.model_name.clone())
            .text("prompt", prompt.to_string())
            .text("size", size.to_string())
            .text("n", "1")
            .part("image", part);

        let url = format!("{}/v1/images/edits", self.endpoint);
        debug!("Image edit POST {}", url);

        let response = self
            .authorize(self.client.post(&url))
            .multipart(form)
            .send()
            .await?;
        let image = Self::read_image(response).await?;

        info!(
            "Image edited: model={}, size={}, {}ms",
            self.model_name,
            size,
            start.elapsed().as_millis()
        );
        Ok(image)
    }

    fn name(&self) -> &str {
        "openai-images"
    }
}
