// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
pub mod complete;
pub mod errors;
pub mod generate;
pub mod handlers;
pub mod http_server;
pub mod refine;

pub use complete::complete_handler;
pub use errors::{ApiError, ErrorResponse};
pub use generate::{generate_handler, GenerationRequest};
pub use handlers::{health_handler, request_origin, OkResponse};
pub use http_server::{create_app, start_server, AppState};
pub use refine::{refine_handler, RefineBody};
