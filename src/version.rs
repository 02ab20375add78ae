// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
// Version information for the Omokage node

/// Full version string with feature description
pub const VERSION: &str = "v0.1.0-dual-variant-2025-10-19";

/// Semantic version number
pub const VERSION_NUMBER: &str = env!("CARGO_PKG_VERSION");

/// Build date
pub const BUILD_DATE: &str = "2025-10-19";

/// Supported features in this version
pub const FEATURES: &[&str] = &[
    "dual-variant-generation",
    "dual-variant-refinement",
    "inline-and-remote-provider-output",
    "sample-fallback",
    "local-media-serving",
];

/// Get version information as a formatted string
pub fn get_version_string() -> String {
    format!("Omokage Node {} ({})", VERSION_NUMBER, BUILD_DATE)
}
