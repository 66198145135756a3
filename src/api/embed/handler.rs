// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1

//! HTTP handlers for POST /embed and POST /embed-batch.
//!
//! Pipeline per request: decode body → validate → obtain the model handle
//! from the registry (loading it on first use) → run inference → optionally
//! L2-normalize → respond. Load and inference failures are logged with their
//! full error chains; the client sees a classified static message.

use crate::api::embed::{BatchEmbedRequest, BatchEmbedResponse, EmbedRequest, EmbedResponse};
use crate::api::http_server::AppState;
use crate::api::ApiError;
use crate::embeddings::{l2_normalize, OnnxEmbeddingModel};
use axum::extract::rejection::JsonRejection;
use axum::extract::State;
use axum::Json;
use std::sync::Arc;
use tracing::error;

/// POST /embed handler
pub async fn embed_handler(
    State(state): State<AppState>,
    payload: Result<Json<EmbedRequest>, JsonRejection>,
) -> Result<Json<EmbedResponse>, ApiError> {
    let Json(request) = payload.map_err(bad_body)?;
    request.validate()?;

    let model = load_model(&state, &request.model).await?;

    let mut embedding = model.embed(&request.text).await.map_err(|e| {
        error!("Embedding inference failed for model '{}': {:#}", request.model, e);
        ApiError::InferenceFailed
    })?;

    if request.normalize {
        embedding = l2_normalize(&embedding);
    }

    Ok(Json(EmbedResponse::new(embedding, request.model)))
}

/// POST /embed-batch handler
///
/// Runs one inference per input text through the bounded inference pool.
/// `embeddings[i]` always corresponds to `texts[i]`; a failed item fails the
/// whole batch and no partial results are returned.
pub async fn embed_batch_handler(
    State(state): State<AppState>,
    payload: Result<Json<BatchEmbedRequest>, JsonRejection>,
) -> Result<Json<BatchEmbedResponse>, ApiError> {
    let Json(request) = payload.map_err(bad_body)?;
    request.validate()?;

    let model = load_model(&state, &request.model).await?;
    let normalize = request.normalize;

    let embeddings = state
        .pool
        .run_ordered(request.texts, move |_, text| {
            let model = model.clone();
            async move {
                let embedding = model.embed(&text).await?;
                Ok(if normalize {
                    l2_normalize(&embedding)
                } else {
                    embedding
                })
            }
        })
        .await
        .map_err(|e| {
            error!("Batch embedding failed for model '{}': {:#}", request.model, e);
            ApiError::InferenceFailed
        })?;

    Ok(Json(BatchEmbedResponse::new(embeddings, request.model)))
}

/// Malformed JSON bodies surface as 400 with the decoder's description
/// instead of axum's default rejection response.
fn bad_body(rejection: JsonRejection) -> ApiError {
    ApiError::InvalidRequest(rejection.body_text())
}

async fn load_model(state: &AppState, name: &str) -> Result<Arc<OnnxEmbeddingModel>, ApiError> {
    state.registry.get_or_load(Some(name)).await.map_err(|e| {
        error!("Failed to load embedding model '{}': {:#}", name, e);
        ApiError::ModelLoadFailed {
            model: name.to_string(),
        }
    })
}
