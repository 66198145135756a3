// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
pub mod api;
pub mod config;
pub mod embeddings;
pub mod models;
pub mod version;

// Re-export main types
pub use api::http_server::{create_app, start_server, AppState};
pub use api::{
    embed_batch_handler, embed_handler, ApiError, BatchEmbedRequest, BatchEmbedResponse,
    EmbedRequest, EmbedResponse, ErrorResponse, InferencePool,
};
pub use config::ServerConfig;
pub use embeddings::{l2_normalize, magnitude, ModelInfo, ModelRegistry, OnnxEmbeddingModel};
pub use models::{ModelFetcher, ModelFiles};
