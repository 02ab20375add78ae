// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Refinement API endpoint module
//!
//! Provides POST /api/refine.

pub mod handler;
pub mod request;

pub use handler::refine_handler;
pub use request::RefineBody;
