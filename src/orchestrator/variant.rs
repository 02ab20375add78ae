// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! The two-slot result returned by both orchestrators

use serde::Serialize;
use thiserror::Error;
use tokio::task::JoinError;

use crate::diffusion::ProviderError;
use crate::media::{ResolveError, StoreError};

/// Notice shown when generation fell back to the sample images
pub const GENERATION_FALLBACK_NOTICE: &str =
    "Continuing with sample images (image generation API error).";

/// Notice shown when only one refinement call produced an image
pub const SINGLE_REFINEMENT_NOTICE: &str = "Only one refined variant was produced.";

pub const NO_IMAGE_RETURNED: &str = "no image returned";

/// Failure of one variant attempt
#[derive(Error, Debug)]
pub enum VariantError {
    #[error(transparent)]
    Provider(#[from] ProviderError),

    #[error(transparent)]
    Source(#[from] ResolveError),

    #[error(transparent)]
    Storage(#[from] StoreError),

    #[error("worker task failed: {0}")]
    Join(#[from] JoinError),
}

/// How many of the two attempts produced an image
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PairOutcome {
    BothSucceeded,
    OneSucceeded,
    NoneSucceeded,
}

/// Outcome of one slot: a public URL or the error that prevented it
#[derive(Debug, Clone, PartialEq)]
pub struct SlotResult {
    pub url: Option<String>,
    pub error: Option<String>,
}

impl SlotResult {
    pub fn success(url: String) -> Self {
        Self {
            url: Some(url),
            error: None,
        }
    }

    pub fn failure(error: impl Into<String>) -> Self {
        Self {
            url: None,
            error: Some(error.into()),
        }
    }
}

impl From<Result<String, VariantError>> for SlotResult {
    fn from(result: Result<String, VariantError>) -> Self {
        match result {
            Ok(url) => SlotResult::success(url),
            Err(e) => SlotResult::failure(e.to_string()),
        }
    }
}

/// Two-variant response. `options` always holds exactly two URL strings.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct VariantPair {
    pub options: [String; 2],
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notice: Option<String>,
    #[serde(skip)]
    pub outcome: PairOutcome,
}

impl VariantPair {
    pub fn both(a: String, b: String) -> Self {
        Self {
            options: [a, b],
            error: None,
            notice: None,
            outcome: PairOutcome::BothSucceeded,
        }
    }

    /// One success duplicated into both slots
    pub fn single(url: String, notice: impl Into<String>) -> Self {
        Self {
            options: [url.clone(), url],
            error: None,
            notice: Some(notice.into()),
            outcome: PairOutcome::OneSucceeded,
        }
    }

    /// Degraded pair carrying a diagnostic
    pub fn fallback(a: &str, b: &str, error: impl Into<String>) -> Self {
        Self {
            options: [a.to_string(), b.to_string()],
            error: Some(error.into()),
            notice: None,
            outcome: PairOutcome::NoneSucceeded,
        }
    }

    pub fn with_notice(mut self, notice: impl Into<String>) -> Self {
        self.notice = Some(notice.into());
        self
    }
}
