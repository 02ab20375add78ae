// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Media store for provider output
//!
//! Every save gets a fresh random 128-bit identifier, so concurrent requests
//! never share mutable state and never overwrite each other's files.

use std::fmt;
use std::path::{Path, PathBuf};

use bytes::Bytes;
use thiserror::Error;
use tokio::fs;
use tracing::debug;
use uuid::Uuid;

use crate::config::AppConfig;

/// Storage namespace for persisted images
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Subcategory {
    Generated,
    Refined,
}

impl Subcategory {
    pub fn as_str(&self) -> &'static str {
        match self {
            Subcategory::Generated => "generated",
            Subcategory::Refined => "refined",
        }
    }
}

impl fmt::Display for Subcategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Errors that can occur while persisting media
#[derive(Error, Debug)]
pub enum StoreError {
    #[error("failed to create directory {path}: {source}")]
    CreateDir {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to write {path}: {source}")]
    Write {
        path: String,
        #[source]
        source: std::io::Error,
    },
}

/// An image persisted under a unique name
#[derive(Debug, Clone)]
pub struct StoredImage {
    /// 32 lowercase hex characters
    pub id: String,
    pub subcategory: Subcategory,
    pub content: Bytes,
}

impl StoredImage {
    /// Path relative to the storage root, e.g. `generated/<id>.png`
    pub fn relative_path(&self) -> String {
        format!("{}/{}.png", self.subcategory, self.id)
    }
}

/// Filesystem-backed store rooted at the configured media directory
#[derive(Debug, Clone)]
pub struct MediaStore {
    root: PathBuf,
}

impl MediaStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn from_config(config: &AppConfig) -> Self {
        Self::new(config.media_root.clone())
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Absolute filesystem location of a store-relative path
    pub fn absolute_path(&self, relative: &str) -> PathBuf {
        self.root.join(relative.trim_start_matches('/'))
    }

    /// Write `content` under a fresh identifier in `subcategory`
    pub async fn save(
        &self,
        content: Bytes,
        subcategory: Subcategory,
    ) -> Result<StoredImage, StoreError> {
        let folder = self.root.join(subcategory.as_str());
        fs::create_dir_all(&folder)
            .await
            .map_err(|source| StoreError::CreateDir {
                path: folder.display().to_string(),
                source,
            })?;

        let image = StoredImage {
            id: Uuid::new_v4().simple().to_string(),
            subcategory,
            content,
        };

        let path = self.absolute_path(&image.relative_path());
        fs::write(&path, &image.content)
            .await
            .map_err(|source| StoreError::Write {
                path: path.display().to_string(),
                source,
            })?;

        debug!(
            "Stored {} bytes at {}",
            image.content.len(),
            image.relative_path()
        );
        Ok(image)
    }
}
