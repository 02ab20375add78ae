// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Public URL construction for persisted media

use crate::config::AppConfig;

/// Maps store-relative paths onto the public media prefix. Pure path algebra.
#[derive(Debug, Clone)]
pub struct UrlNormalizer {
    media_url: String,
    absolute: bool,
}

impl UrlNormalizer {
    pub fn new(media_url: &str, absolute: bool) -> Self {
        let media_url = format!("/{}/", media_url.trim_matches('/'));
        Self {
            media_url: media_url.replace("//", "/"),
            absolute,
        }
    }

    pub fn from_config(config: &AppConfig) -> Self {
        Self::new(&config.media_url, config.absolute_media_urls)
    }

    pub fn media_url(&self) -> &str {
        &self.media_url
    }

    /// Canonical public URL for `path`
    ///
    /// Paths already under the media prefix, other origin-relative paths and
    /// absolute URLs pass through; store-relative paths get the prefix.
    pub fn to_public_url(&self, origin: Option<&str>, path: &str) -> String {
        if path.starts_with("http://") || path.starts_with("https://") {
            return path.to_string();
        }

        let canonical = if path.starts_with(&self.media_url) || path.starts_with('/') {
            path.to_string()
        } else {
            let segment = format!("{}/", self.media_url.trim_matches('/'));
            let relative = path.strip_prefix(segment.as_str()).unwrap_or(path);
            format!("{}{}", self.media_url, relative)
        };

        match origin {
            Some(origin) if self.absolute => {
                format!("{}{}", origin.trim_end_matches('/'), canonical)
            }
            _ => canonical,
        }
    }
}
