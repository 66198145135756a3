// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1

//! Lazy registry of loaded embedding models.
//!
//! Models are loaded on first use and held for the lifetime of the process.
//! Each model name maps to a single-initialization slot, so two concurrent
//! first requests for the same uninitialized model trigger exactly one load;
//! the second caller awaits the first one's result. A failed load leaves the
//! slot empty and a later request retries.

use crate::embeddings::OnnxEmbeddingModel;
use crate::models::ModelFetcher;
use anyhow::{Context, Result};
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::{Mutex, OnceCell};
use tracing::info;

/// Information about a loaded embedding model
#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
pub struct ModelInfo {
    /// Model name
    pub name: String,
    /// Embedding dimensions
    pub dimensions: usize,
    /// Whether this is the default model
    pub is_default: bool,
}

type ModelSlot = Arc<OnceCell<Arc<OnnxEmbeddingModel>>>;

/// Registry of lazily-loaded ONNX embedding models.
pub struct ModelRegistry {
    /// One initialization slot per model name
    slots: Mutex<HashMap<String, ModelSlot>>,

    /// Resolves model names to on-disk model/tokenizer files
    fetcher: ModelFetcher,

    /// Model used when a request does not name one
    default_model: String,
}

impl ModelRegistry {
    pub fn new(default_model: impl Into<String>, fetcher: ModelFetcher) -> Self {
        Self {
            slots: Mutex::new(HashMap::new()),
            fetcher,
            default_model: default_model.into(),
        }
    }

    /// Returns the name of the default model
    pub fn default_model_name(&self) -> &str {
        &self.default_model
    }

    /// Gets a model by name (default model if `name` is None), loading it on
    /// first use.
    ///
    /// Loading resolves the model files (possibly downloading them) and
    /// constructs the ONNX session, which can take a while; concurrent callers
    /// for the same name share one load.
    pub async fn get_or_load(&self, name: Option<&str>) -> Result<Arc<OnnxEmbeddingModel>> {
        let name = name.unwrap_or(&self.default_model);
        let slot = self.slot(name).await;

        let model = slot
            .get_or_try_init(|| async {
                info!("Loading embedding model: {}", name);
                let files = self
                    .fetcher
                    .fetch(name)
                    .await
                    .context(format!("Failed to resolve model files for '{}'", name))?;
                let model =
                    OnnxEmbeddingModel::new(name, files.model.as_path(), files.tokenizer.as_path())
                        .await?;
                Ok::<_, anyhow::Error>(Arc::new(model))
            })
            .await?;

        Ok(model.clone())
    }

    /// Lists all currently loaded models, sorted by name.
    ///
    /// Models that have a slot but never finished loading are not listed.
    pub async fn list_models(&self) -> Vec<ModelInfo> {
        let slots = self.slots.lock().await;
        let mut models: Vec<ModelInfo> = slots
            .iter()
            .filter_map(|(name, slot)| {
                slot.get().map(|model| ModelInfo {
                    name: name.clone(),
                    dimensions: model.dimension(),
                    is_default: name == &self.default_model,
                })
            })
            .collect();

        models.sort_by(|a, b| a.name.cmp(&b.name));
        models
    }

    async fn slot(&self, name: &str) -> ModelSlot {
        let mut slots = self.slots.lock().await;
        slots
            .entry(name.to_string())
            .or_insert_with(|| Arc::new(OnceCell::new()))
            .clone()
    }
}
