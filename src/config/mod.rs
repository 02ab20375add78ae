// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Service configuration
//!
//! All settings are read once at startup and handed to each component as an
//! immutable `AppConfig`.

use std::env;
use std::path::PathBuf;

use crate::diffusion::client::ImageSize;

/// Default image model used for both generation and edits
pub const DEFAULT_IMAGES_MODEL: &str = "gpt-image-1";

/// Default output size
pub const DEFAULT_IMAGES_SIZE: &str = "1024x1024";

/// Default public prefix for persisted media
pub const DEFAULT_MEDIA_URL: &str = "/media/";

/// Largest remote body the resolver will buffer (50 MiB)
pub const DEFAULT_FETCH_MAX_BYTES: u64 = 50 * 1024 * 1024;

/// Sample images shown when nothing could be generated
pub const FALLBACK_A: &str = "/images/sample_a.PNG";
pub const FALLBACK_B: &str = "/images/sample_b.PNG";

/// Configuration for the portrait service
#[derive(Debug, Clone)]
pub struct AppConfig {
    /// Provider API key (empty disables authenticated calls)
    pub api_key: String,
    /// Optional provider organization header
    pub organization: Option<String>,
    /// Base URL of the OpenAI-compatible image API
    pub provider_endpoint: String,
    /// Image model identifier (default: gpt-image-1)
    pub model: String,
    /// Output size, WIDTHxHEIGHT (default: 1024x1024)
    pub size: String,
    /// Timeout for a single provider call in seconds (default: 120)
    pub provider_timeout_secs: u64,
    /// Directory persisted media is written to
    pub media_root: PathBuf,
    /// Public URL prefix persisted media is served under (default: /media/)
    pub media_url: String,
    /// Join public media paths onto the request origin
    pub absolute_media_urls: bool,
    /// Timeout for fetching a remote source image in seconds (default: 20)
    pub fetch_timeout_secs: u64,
    /// Size cap for a fetched source or provider pointer (default: 50 MiB)
    pub fetch_max_bytes: u64,
    pub fallback_a: String,
    pub fallback_b: String,
    /// Origin used to absolutize origin-relative references
    pub public_origin: Option<String>,
    /// Address the HTTP server binds to
    pub listen_addr: String,
    /// Allowed CORS origins (empty allows any)
    pub cors_allowed_origins: Vec<String>,
}

fn csv_env(key: &str) -> Vec<String> {
    env::var(key)
        .unwrap_or_default()
        .split(',')
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .collect()
}

fn non_empty_env(key: &str) -> Option<String> {
    env::var(key).ok().filter(|v| !v.trim().is_empty())
}

impl AppConfig {
    /// Load configuration from environment variables
    pub fn from_env() -> Self {
        let defaults = Self::default();
        let host = env::var("API_HOST").unwrap_or_else(|_| "0.0.0.0".to_string());
        let port = env::var("API_PORT").unwrap_or_else(|_| "8000".to_string());

        Self {
            api_key: non_empty_env("OPENAI_API_KEY")
                .or_else(|| non_empty_env("OPENAI_KEY"))
                .unwrap_or_default(),
            organization: non_empty_env("OPENAI_ORG_ID"),
            provider_endpoint: non_empty_env("OPENAI_BASE_URL")
                .unwrap_or(defaults.provider_endpoint),
            model: non_empty_env("IMAGES_MODEL").unwrap_or(defaults.model),
            size: non_empty_env("IMAGES_SIZE").unwrap_or(defaults.size),
            provider_timeout_secs: env::var("PROVIDER_TIMEOUT_SECS")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(defaults.provider_timeout_secs),
            media_root: non_empty_env("MEDIA_ROOT")
                .map(PathBuf::from)
                .unwrap_or(defaults.media_root),
            media_url: non_empty_env("MEDIA_URL").unwrap_or(defaults.media_url),
            absolute_media_urls: env::var("MEDIA_ABSOLUTE_URLS")
                .map(|v| v.to_lowercase() == "true" || v == "1")
                .unwrap_or(false),
            fetch_timeout_secs: env::var("FETCH_TIMEOUT_SECS")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(defaults.fetch_timeout_secs),
            fetch_max_bytes: env::var("FETCH_MAX_BYTES")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(defaults.fetch_max_bytes),
            fallback_a: non_empty_env("FALLBACK_IMAGE_A").unwrap_or(defaults.fallback_a),
            fallback_b: non_empty_env("FALLBACK_IMAGE_B").unwrap_or(defaults.fallback_b),
            public_origin: non_empty_env("PUBLIC_ORIGIN")
                .map(|o| o.trim_end_matches('/').to_string()),
            listen_addr: format!("{}:{}", host, port),
            cors_allowed_origins: csv_env("CORS_ALLOWED_ORIGINS"),
        }
    }

    /// Validate configuration values
    pub fn validate(&self) -> Result<(), String> {
        ImageSize::parse(&self.size).map_err(|e| format!("IMAGES_SIZE: {}", e))?;
        if !self.media_url.starts_with('/') || !self.media_url.ends_with('/') {
            return Err(format!(
                "MEDIA_URL must start and end with '/', got '{}'",
                self.media_url
            ));
        }
        if self.provider_timeout_secs == 0 {
            return Err("provider_timeout_secs must be at least 1".to_string());
        }
        if self.fetch_timeout_secs == 0 {
            return Err("fetch_timeout_secs must be at least 1".to_string());
        }
        if self.fetch_max_bytes == 0 {
            return Err("FETCH_MAX_BYTES must be at least 1".to_string());
        }
        Ok(())
    }

    /// Whether an API key is configured
    pub fn has_api_key(&self) -> bool {
        !self.api_key.is_empty()
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            api_key: String::new(),
            organization: None,
            provider_endpoint: "https://api.openai.com".to_string(),
            model: DEFAULT_IMAGES_MODEL.to_string(),
            size: DEFAULT_IMAGES_SIZE.to_string(),
            provider_timeout_secs: 120,
            media_root: PathBuf::from("./media"),
            media_url: DEFAULT_MEDIA_URL.to_string(),
            absolute_media_urls: false,
            fetch_timeout_secs: 20,
            fetch_max_bytes: DEFAULT_FETCH_MAX_BYTES,
            fallback_a: FALLBACK_A.to_string(),
            fallback_b: FALLBACK_B.to_string(),
            public_origin: None,
            listen_addr: "0.0.0.0:8000".to_string(),
            cors_allowed_origins: Vec::new(),
        }
    }
}
