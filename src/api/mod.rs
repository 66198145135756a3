// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
pub mod embed;
pub mod errors;
pub mod handlers;
pub mod http_server;
pub mod pool;

pub use embed::{
    embed_batch_handler, embed_handler, BatchEmbedRequest, BatchEmbedResponse, EmbedRequest,
    EmbedResponse,
};
pub use errors::{ApiError, ErrorResponse};
pub use handlers::{HealthResponse, ModelsResponse};
pub use http_server::{create_app, start_server, AppState};
pub use pool::InferencePool;
