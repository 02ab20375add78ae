// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Portrait attribute and refinement request types

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

/// Structured portrait attributes. Every field is optional; absent fields are
/// treated as empty and never rejected.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerationRequest {
    #[serde(default, deserialize_with = "loose_string")]
    pub gender: Option<String>,

    /// Sent as a number by the browser client
    #[serde(default, deserialize_with = "loose_string")]
    pub age: Option<String>,

    #[serde(default, deserialize_with = "loose_string")]
    pub hair: Option<String>,

    #[serde(default, deserialize_with = "loose_string")]
    pub features: Option<String>,

    #[serde(default, deserialize_with = "loose_string")]
    pub similar_to: Option<String>,
}

/// Request to refine a previously chosen image
#[derive(Debug, Clone, PartialEq)]
pub struct RefinementRequest {
    /// Reference to the chosen image (media path or URL), never empty
    pub selected: String,
    pub note: Option<String>,
    pub context: Option<GenerationRequest>,
}

/// Accepts strings, numbers and booleans, rendering non-strings as text
fn loose_string<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(match value {
        None | Some(Value::Null) => None,
        Some(Value::String(s)) => Some(s),
        Some(Value::Number(n)) => Some(n.to_string()),
        Some(Value::Bool(b)) => Some(b.to_string()),
        Some(other) => Some(other.to_string()),
    })
}
