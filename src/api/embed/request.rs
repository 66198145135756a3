// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1

//! Request types for the embedding endpoints, with validation.
//!
//! Validation runs before any model interaction; a missing `text` and an
//! empty `text` are both reported as the same caller mistake.

use crate::api::ApiError;
use crate::config::DEFAULT_MODEL;
use serde::{Deserialize, Serialize};

fn default_model() -> String {
    DEFAULT_MODEL.to_string()
}

fn default_normalize() -> bool {
    true
}

/// Request body for POST /embed
///
/// ```json
/// { "text": "Hello world", "model": "Xenova/all-MiniLM-L6-v2", "normalize": true }
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EmbedRequest {
    /// Text to embed
    #[serde(default)]
    pub text: String,

    /// Embedding model name (default: "Xenova/all-MiniLM-L6-v2")
    #[serde(default = "default_model")]
    pub model: String,

    /// Whether to L2-normalize the output vector (default: true)
    #[serde(default = "default_normalize")]
    pub normalize: bool,
}

impl EmbedRequest {
    pub fn validate(&self) -> Result<(), ApiError> {
        if self.text.trim().is_empty() {
            return Err(ApiError::ValidationError {
                field: "text".to_string(),
                message: "text is required and cannot be empty".to_string(),
            });
        }

        validate_model_name(&self.model)
    }
}

/// Request body for POST /embed-batch
///
/// ```json
/// { "texts": ["one", "two"], "model": "Xenova/all-MiniLM-L6-v2", "normalize": true }
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BatchEmbedRequest {
    /// Texts to embed, each non-empty
    #[serde(default)]
    pub texts: Vec<String>,

    /// Embedding model name (default: "Xenova/all-MiniLM-L6-v2")
    #[serde(default = "default_model")]
    pub model: String,

    /// Whether to L2-normalize each output vector (default: true)
    #[serde(default = "default_normalize")]
    pub normalize: bool,
}

impl BatchEmbedRequest {
    pub fn validate(&self) -> Result<(), ApiError> {
        if self.texts.is_empty() {
            return Err(ApiError::ValidationError {
                field: "texts".to_string(),
                message: "texts array is required and must contain at least 1 item".to_string(),
            });
        }

        for (index, text) in self.texts.iter().enumerate() {
            if text.trim().is_empty() {
                return Err(ApiError::ValidationError {
                    field: format!("texts[{}]", index),
                    message: "text cannot be empty or contain only whitespace".to_string(),
                });
            }
        }

        validate_model_name(&self.model)
    }
}

fn validate_model_name(model: &str) -> Result<(), ApiError> {
    if model.trim().is_empty() {
        return Err(ApiError::ValidationError {
            field: "model".to_string(),
            message: "model name cannot be empty".to_string(),
        });
    }
    Ok(())
}
