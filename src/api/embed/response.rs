// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1

//! Response types for the embedding endpoints.

use serde::{Deserialize, Serialize};

/// Response body for POST /embed
///
/// ```json
/// { "embedding": [0.1, 0.2], "dimensions": 384, "model": "Xenova/all-MiniLM-L6-v2" }
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EmbedResponse {
    /// Embedding vector
    pub embedding: Vec<f32>,

    /// Vector length
    pub dimensions: usize,

    /// Model that produced the embedding
    pub model: String,
}

impl EmbedResponse {
    pub fn new(embedding: Vec<f32>, model: String) -> Self {
        let dimensions = embedding.len();
        Self {
            embedding,
            dimensions,
            model,
        }
    }
}

/// Response body for POST /embed-batch
///
/// `embeddings[i]` corresponds to the request's `texts[i]`; `dimensions` is
/// taken from the first vector's length.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BatchEmbedResponse {
    /// One embedding per input text, in input order
    pub embeddings: Vec<Vec<f32>>,

    /// Vector length, from the first embedding
    pub dimensions: usize,

    /// Model that produced the embeddings
    pub model: String,
}

impl BatchEmbedResponse {
    pub fn new(embeddings: Vec<Vec<f32>>, model: String) -> Self {
        let dimensions = embeddings.first().map(|e| e.len()).unwrap_or(0);
        Self {
            embeddings,
            dimensions,
            model,
        }
    }
}
