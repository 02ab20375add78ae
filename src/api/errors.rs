// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};
use std::fmt;

/// JSON error body: `{"error": "..."}`
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ErrorResponse {
    pub error: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub field: Option<String>,
}

#[derive(Debug, Clone)]
pub enum ApiError {
    /// Body could not be parsed as JSON of the expected shape
    InvalidJson(String),
    ValidationError { field: String, message: String },
    MethodNotAllowed,
    InternalError(String),
}

impl ApiError {
    pub fn to_response(&self) -> ErrorResponse {
        match self {
            ApiError::InvalidJson(_) => ErrorResponse {
                error: "invalid json".to_string(),
                field: None,
            },
            ApiError::ValidationError { field, message } => ErrorResponse {
                error: message.clone(),
                field: Some(field.clone()),
            },
            ApiError::MethodNotAllowed => ErrorResponse {
                error: "POST only".to_string(),
                field: None,
            },
            ApiError::InternalError(msg) => ErrorResponse {
                error: msg.clone(),
                field: None,
            },
        }
    }

    pub fn status_code(&self) -> u16 {
        match self {
            ApiError::InvalidJson(_) | ApiError::ValidationError { .. } => 400,
            ApiError::MethodNotAllowed => 405,
            ApiError::InternalError(_) => 500,
        }
    }
}

impl fmt::Display for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ApiError::InvalidJson(msg) => write!(f, "Invalid JSON: {}", msg),
            ApiError::ValidationError { field, message } => {
                write!(f, "Validation error for {}: {}", field, message)
            }
            ApiError::MethodNotAllowed => write!(f, "Method not allowed"),
            ApiError::InternalError(msg) => write!(f, "Internal error: {}", msg),
        }
    }
}

impl std::error::Error for ApiError {}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status =
            StatusCode::from_u16(self.status_code()).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
        (status, Json(self.to_response())).into_response()
    }
}
