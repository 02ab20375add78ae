// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Refinement request body and validation

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::api::ApiError;
use crate::orchestrator::{GenerationRequest, RefinementRequest};

/// Body of POST /api/refine
///
/// `note` and `context` are tolerant: unusable values are dropped rather than
/// rejected, so the caller still gets a pair back.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RefineBody {
    /// Chosen image reference (required)
    #[serde(default)]
    pub selected: Option<String>,

    /// Free-text feedback
    #[serde(default)]
    pub note: Option<Value>,

    /// Attributes the selected image was generated from
    #[serde(default)]
    pub context: Option<Value>,
}

impl RefineBody {
    /// Validate and convert into an orchestrator request
    pub fn into_request(self) -> Result<RefinementRequest, ApiError> {
        let selected = self
            .selected
            .filter(|s| !s.trim().is_empty())
            .ok_or_else(|| ApiError::ValidationError {
                field: "selected".to_string(),
                message: "selected required".to_string(),
            })?;

        let note = match self.note {
            Some(Value::String(s)) => Some(s),
            Some(Value::Null) | None => None,
            Some(other) => Some(other.to_string()),
        };

        // Only a non-empty object counts as context
        let context = match self.context {
            Some(Value::Object(map)) if !map.is_empty() => {
                serde_json::from_value::<GenerationRequest>(Value::Object(map)).ok()
            }
            _ => None,
        };

        Ok(RefinementRequest {
            selected,
            note,
            context,
        })
    }
}
