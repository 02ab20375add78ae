// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Source image resolution
//!
//! References under the media prefix are read straight from the storage root;
//! anything else is fetched over HTTP with a bounded timeout.

use std::path::{Component, Path, PathBuf};
use std::time::Duration;

use anyhow::Result;
use bytes::Bytes;
use futures::StreamExt;
use reqwest::{Client, Response};
use thiserror::Error;
use tokio::fs;
use tracing::{debug, info};
use url::Url;

use crate::config::{AppConfig, DEFAULT_FETCH_MAX_BYTES};
use crate::diffusion::EditSource;

const DEFAULT_EXTENSION: &str = ".png";

/// Underlying reason a source could not be read
#[derive(Error, Debug)]
pub enum SourceCause {
    #[error("file not found: {0}")]
    NotFound(String),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("path escapes the media root: {0}")]
    InvalidPath(String),

    #[error("timed out fetching {0}")]
    Timeout(String),

    #[error("HTTP {0}")]
    HttpStatus(u16),

    #[error("response too large: {size} bytes (max {max})")]
    TooLarge { size: u64, max: u64 },

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),
}

/// Errors from resolving a reference
#[derive(Error, Debug)]
pub enum ResolveError {
    #[error("source unavailable ({reference}): {cause}")]
    SourceUnavailable {
        reference: String,
        #[source]
        cause: SourceCause,
    },
}

impl ResolveError {
    fn unavailable(reference: &str, cause: impl Into<SourceCause>) -> Self {
        ResolveError::SourceUnavailable {
            reference: reference.to_string(),
            cause: cause.into(),
        }
    }
}

/// Source bytes plus the extension inferred for them
#[derive(Debug, Clone)]
pub struct ResolvedSource {
    pub content: Bytes,
    /// Includes the leading dot
    pub extension: String,
}

impl ResolvedSource {
    /// Cheap view over the same immutable buffer for one edit call
    pub fn edit_source(&self) -> EditSource {
        EditSource {
            content: self.content.clone(),
            extension: self.extension.clone(),
        }
    }
}

/// Reads local media and fetches remote references
pub struct MediaResolver {
    client: Client,
    media_root: PathBuf,
    /// Media URL without its trailing slash, e.g. "/media"
    media_prefix: String,
    max_bytes: u64,
}

impl MediaResolver {
    pub fn new(media_root: impl Into<PathBuf>, media_url: &str, timeout: Duration) -> Result<Self> {
        let client = Client::builder()
            .timeout(timeout)
            .redirect(reqwest::redirect::Policy::limited(5))
            .build()?;

        Ok(Self {
            client,
            media_root: media_root.into(),
            media_prefix: media_url.trim_end_matches('/').to_string(),
            max_bytes: DEFAULT_FETCH_MAX_BYTES,
        })
    }

    pub fn from_config(config: &AppConfig) -> Result<Self> {
        Ok(Self::new(
            config.media_root.clone(),
            &config.media_url,
            Duration::from_secs(config.fetch_timeout_secs),
        )?
        .with_max_bytes(config.fetch_max_bytes))
    }

    /// Cap the size of any remote body
    pub fn with_max_bytes(mut self, max_bytes: u64) -> Self {
        self.max_bytes = max_bytes;
        self
    }

    /// Read the bytes behind `reference`. Never mutates the source.
    pub async fn resolve(&self, reference: &str) -> Result<ResolvedSource, ResolveError> {
        let path = reference_path(reference);

        if let Some(remainder) = self.local_remainder(&path) {
            debug!("Resolving local media: {}", remainder);
            return self.read_local(reference, remainder).await;
        }

        debug!("Resolving remote source: {}", reference);
        let response = self.get(reference).await?;
        let content_type = response
            .headers()
            .get(reqwest::header::CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .map(|s| s.to_string());
        let content = self.read_limited(reference, response).await?;

        let extension = content_type
            .as_deref()
            .and_then(extension_for_mime)
            .map(str::to_string)
            .or_else(|| path_suffix(&path))
            .unwrap_or_else(|| DEFAULT_EXTENSION.to_string());

        info!("Fetched {} bytes from {}", content.len(), reference);
        Ok(ResolvedSource { content, extension })
    }

    /// Download a provider-issued pointer
    pub async fn download(&self, url: &str) -> Result<Bytes, ResolveError> {
        let response = self.get(url).await?;
        self.read_limited(url, response).await
    }

    /// Buffer the body, refusing anything over `max_bytes`
    async fn read_limited(&self, url: &str, response: Response) -> Result<Bytes, ResolveError> {
        let too_large = |size| {
            ResolveError::unavailable(
                url,
                SourceCause::TooLarge {
                    size,
                    max: self.max_bytes,
                },
            )
        };

        if let Some(length) = response.content_length() {
            if length > self.max_bytes {
                return Err(too_large(length));
            }
        }

        let mut body = Vec::new();
        let mut stream = response.bytes_stream();
        while let Some(chunk) = stream.next().await {
            let chunk = chunk.map_err(|e| ResolveError::unavailable(url, map_reqwest(url, e)))?;
            let size = (body.len() + chunk.len()) as u64;
            if size > self.max_bytes {
                return Err(too_large(size));
            }
            body.extend_from_slice(&chunk);
        }

        Ok(Bytes::from(body))
    }

    async fn get(&self, url: &str) -> Result<Response, ResolveError> {
        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| ResolveError::unavailable(url, map_reqwest(url, e)))?;

        let status = response.status();
        if !status.is_success() {
            return Err(ResolveError::unavailable(
                url,
                SourceCause::HttpStatus(status.as_u16()),
            ));
        }
        Ok(response)
    }

    fn local_remainder<'a>(&self, path: &'a str) -> Option<&'a str> {
        let rest = path.strip_prefix(self.media_prefix.as_str())?;
        if rest.is_empty() || rest.starts_with('/') || self.media_prefix.is_empty() {
            Some(rest.trim_start_matches('/'))
        } else {
            None
        }
    }

    async fn read_local(
        &self,
        reference: &str,
        remainder: &str,
    ) -> Result<ResolvedSource, ResolveError> {
        let relative = Path::new(remainder);
        if relative
            .components()
            .any(|c| !matches!(c, Component::Normal(_)))
        {
            return Err(ResolveError::unavailable(
                reference,
                SourceCause::InvalidPath(remainder.to_string()),
            ));
        }

        let fs_path = self.media_root.join(relative);
        let content = fs::read(&fs_path).await.map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                ResolveError::unavailable(
                    reference,
                    SourceCause::NotFound(fs_path.display().to_string()),
                )
            } else {
                ResolveError::unavailable(reference, e)
            }
        })?;

        let extension = fs_path
            .extension()
            .map(|ext| format!(".{}", ext.to_string_lossy()))
            .unwrap_or_else(|| DEFAULT_EXTENSION.to_string());

        Ok(ResolvedSource {
            content: Bytes::from(content),
            extension,
        })
    }
}

fn map_reqwest(url: &str, e: reqwest::Error) -> SourceCause {
    if e.is_timeout() {
        SourceCause::Timeout(url.to_string())
    } else {
        SourceCause::Http(e)
    }
}

/// Path component of a reference: the URL path for absolute URLs, otherwise
/// the reference minus any query or fragment
fn reference_path(reference: &str) -> String {
    match Url::parse(reference) {
        Ok(url) => url.path().to_string(),
        Err(_) => reference
            .split(['?', '#'])
            .next()
            .unwrap_or_default()
            .to_string(),
    }
}

fn extension_for_mime(content_type: &str) -> Option<&'static str> {
    let mime = content_type.split(';').next()?.trim().to_ascii_lowercase();
    match mime.as_str() {
        "image/png" => Some(".png"),
        "image/jpeg" | "image/jpg" => Some(".jpg"),
        "image/webp" => Some(".webp"),
        "image/gif" => Some(".gif"),
        "image/bmp" => Some(".bmp"),
        "image/tiff" => Some(".tiff"),
        _ => None,
    }
}

fn path_suffix(path: &str) -> Option<String> {
    Path::new(path)
        .extension()
        .map(|ext| format!(".{}", ext.to_string_lossy()))
}
