// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1

//! Environment-sourced server configuration.

use std::env;
use std::path::PathBuf;

/// Default HTTP port
pub const DEFAULT_PORT: u16 = 8000;

/// Default embedding model
pub const DEFAULT_MODEL: &str = "Xenova/all-MiniLM-L6-v2";

/// Default cap on concurrent per-item inferences within a batch request
pub const DEFAULT_MAX_CONCURRENT_INFERENCES: usize = 4;

#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// HTTP port (PORT)
    pub port: u16,

    /// Model used when a request does not name one (EMBED_NODE_DEFAULT_MODEL)
    pub default_model: String,

    /// Directory of pre-provisioned models (EMBED_NODE_MODELS_DIR); models
    /// not found there are downloaded from the Hugging Face Hub
    pub models_dir: Option<PathBuf>,

    /// Batch fan-out concurrency cap (MAX_CONCURRENT_INFERENCES)
    pub max_concurrent_inferences: usize,

    /// Load the default model at startup instead of on first request
    /// (PRELOAD_MODELS)
    pub preload_models: bool,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            port: DEFAULT_PORT,
            default_model: DEFAULT_MODEL.to_string(),
            models_dir: None,
            max_concurrent_inferences: DEFAULT_MAX_CONCURRENT_INFERENCES,
            preload_models: false,
        }
    }
}

impl ServerConfig {
    pub fn from_env() -> Self {
        let port = env::var("PORT")
            .ok()
            .and_then(|v| v.parse::<u16>().ok())
            .unwrap_or(DEFAULT_PORT);

        let default_model =
            env::var("EMBED_NODE_DEFAULT_MODEL").unwrap_or_else(|_| DEFAULT_MODEL.to_string());

        let models_dir = env::var("EMBED_NODE_MODELS_DIR").ok().map(PathBuf::from);

        let max_concurrent_inferences = env::var("MAX_CONCURRENT_INFERENCES")
            .ok()
            .and_then(|v| v.parse::<usize>().ok())
            .filter(|&n| n > 0)
            .unwrap_or(DEFAULT_MAX_CONCURRENT_INFERENCES);

        let preload_models = env::var("PRELOAD_MODELS")
            .map(|v| v.to_lowercase() == "true" || v == "1")
            .unwrap_or(false);

        Self {
            port,
            default_model,
            models_dir,
            max_concurrent_inferences,
            preload_models,
        }
    }
}
