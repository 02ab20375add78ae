// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Prompt construction from structured portrait attributes

use crate::orchestrator::GenerationRequest;

const PREAMBLE: &str = "Portrait photograph of a new, original person. \
Do not imitate any specific real individual. \
Natural skin and hair texture, no heavy retouching.";

const CLOSING: &str = "Simple background, head and shoulders facing the camera, \
photorealistic, soft lighting.";

const REFINE_DEFAULT_BASE: &str =
    "Portrait photograph, head and shoulders facing the camera, photorealistic.";

/// Build the generation prompt. Empty attributes contribute no clause.
pub fn build_prompt(request: &GenerationRequest) -> String {
    let mut clauses = vec![PREAMBLE.to_string()];

    let labelled = [
        ("Gender", &request.gender),
        ("Age", &request.age),
        ("Hair style/color", &request.hair),
        ("Features", &request.features),
    ];
    for (label, value) in labelled {
        if let Some(value) = non_empty(value) {
            clauses.push(format!("{}: {}.", label, value));
        }
    }

    // Referenced as an association only, never as a likeness request
    if let Some(similar) = non_empty(&request.similar_to) {
        clauses.push(format!("With elements evoking the vibe of {}.", similar));
    }

    clauses.push(CLOSING.to_string());
    clauses.join(" ")
}

/// Build the prompt for editing a previously chosen image
pub fn build_refine_prompt(note: Option<&str>, context: Option<&GenerationRequest>) -> String {
    let base = match context {
        Some(ctx) => build_prompt(ctx),
        None => REFINE_DEFAULT_BASE.to_string(),
    };

    let fix = match note.map(str::trim).filter(|n| !n.is_empty()) {
        Some(note) => format!(
            "Keep the facial features and lighting of the source image while applying: {}.",
            note
        ),
        None => "Keep the mood of the source image and make it look more natural with higher detail."
            .to_string(),
    };

    format!("{} {}", base, fix)
}

fn non_empty(value: &Option<String>) -> Option<&str> {
    value.as_deref().map(str::trim).filter(|v| !v.is_empty())
}
