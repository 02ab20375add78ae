// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Portrait generation API endpoint module
//!
//! Provides POST /api/generate.

pub mod handler;

pub use crate::orchestrator::GenerationRequest;
pub use handler::generate_handler;
