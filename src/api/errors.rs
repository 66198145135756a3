// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// JSON body returned for every failed request: `{error, field?}`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ErrorResponse {
    pub error: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub field: Option<String>,
}

/// API-level errors.
///
/// Two families: caller mistakes (400), reported before any model
/// interaction, and load/inference failures (500). The 500 bodies carry a
/// classified static description; the underlying error chain is logged
/// server-side and never serialized to the caller.
#[derive(Debug, Clone, Error)]
pub enum ApiError {
    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    #[error("Validation error for {field}: {message}")]
    ValidationError { field: String, message: String },

    #[error("failed to load embedding model '{model}'")]
    ModelLoadFailed { model: String },

    #[error("embedding inference failed")]
    InferenceFailed,
}

impl ApiError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            ApiError::InvalidRequest(_) | ApiError::ValidationError { .. } => {
                StatusCode::BAD_REQUEST
            }
            ApiError::ModelLoadFailed { .. } | ApiError::InferenceFailed => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }

    pub fn to_response(&self) -> ErrorResponse {
        match self {
            ApiError::InvalidRequest(message) => ErrorResponse {
                error: message.clone(),
                field: None,
            },
            ApiError::ValidationError { field, message } => ErrorResponse {
                error: message.clone(),
                field: Some(field.clone()),
            },
            ApiError::ModelLoadFailed { model } => ErrorResponse {
                error: format!("failed to load embedding model '{}'", model),
                field: None,
            },
            ApiError::InferenceFailed => ErrorResponse {
                error: "embedding inference failed".to_string(),
                field: None,
            },
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (self.status_code(), Json(self.to_response())).into_response()
    }
}
