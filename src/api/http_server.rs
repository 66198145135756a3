// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
use axum::extract::State;
use axum::response::IntoResponse;
use axum::routing::{get, post};
use axum::Router;
use std::net::SocketAddr;
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use super::embed::{embed_batch_handler, embed_handler};
use super::handlers::{HealthResponse, ModelsResponse};
use super::pool::InferencePool;
use crate::config::ServerConfig;
use crate::embeddings::ModelRegistry;
use crate::models::ModelFetcher;

#[derive(Clone)]
pub struct AppState {
    pub registry: Arc<ModelRegistry>,
    pub pool: InferencePool,
}

impl AppState {
    pub fn new(config: &ServerConfig) -> Self {
        let fetcher = ModelFetcher::new(config.models_dir.clone());
        Self {
            registry: Arc::new(ModelRegistry::new(config.default_model.clone(), fetcher)),
            pool: InferencePool::new(config.max_concurrent_inferences),
        }
    }
}

/// Builds the application router. Cross-origin requests are permitted
/// unconditionally.
pub fn create_app(state: AppState) -> Router {
    Router::new()
        // Embedding endpoints
        .route("/embed", post(embed_handler))
        .route("/embed-batch", post(embed_batch_handler))
        // Health check
        .route("/health", get(health_handler))
        // Model discovery
        .route("/models", get(models_handler))
        .layer(TraceLayer::new_for_http())
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
        .with_state(state)
}

pub async fn start_server(config: ServerConfig) -> anyhow::Result<()> {
    let state = AppState::new(&config);

    // Model loading is lazy by default; PRELOAD_MODELS warms the default
    // model before the listener accepts traffic.
    if config.preload_models {
        state.registry.get_or_load(None).await?;
    }

    let app = create_app(state);

    let addr = SocketAddr::from(([0, 0, 0, 0], config.port));
    let listener = tokio::net::TcpListener::bind(addr).await?;

    tracing::info!("Embedding API server listening on {}", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    Ok(())
}

async fn shutdown_signal() {
    let _ = tokio::signal::ctrl_c().await;
    tracing::info!("Shutdown signal received, stopping server");
}

async fn health_handler() -> impl IntoResponse {
    axum::response::Json(HealthResponse::ok())
}

async fn models_handler(State(state): State<AppState>) -> impl IntoResponse {
    let models = state.registry.list_models().await;
    axum::response::Json(ModelsResponse {
        models,
        default_model: state.registry.default_model_name().to_string(),
    })
}
