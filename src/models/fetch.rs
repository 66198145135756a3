// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1

//! Model file resolution.
//!
//! A model name (a Hugging Face repository id such as
//! `Xenova/all-MiniLM-L6-v2`) resolves to a `model.onnx` + `tokenizer.json`
//! pair. A configured models directory takes priority; otherwise the files
//! are fetched from the Hugging Face Hub and cached on disk by `hf-hub`, so
//! only the first load of a model pays the download.

use anyhow::{Context, Result};
use hf_hub::api::tokio::Api;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Resolved on-disk locations of a model's files
#[derive(Debug, Clone)]
pub struct ModelFiles {
    /// ONNX model weights (model.onnx)
    pub model: PathBuf,
    /// Tokenizer definition (tokenizer.json)
    pub tokenizer: PathBuf,
}

/// Resolves model names to local files, downloading from the Hub on a miss.
#[derive(Debug, Clone, Default)]
pub struct ModelFetcher {
    /// Optional directory of pre-provisioned models, laid out as
    /// `<dir>/<sanitized name>/{model.onnx,tokenizer.json}`
    models_dir: Option<PathBuf>,
}

/// Turns a repository id into a single path component (`/` becomes `__`)
pub fn sanitize_model_name(name: &str) -> String {
    name.replace('/', "__")
}

impl ModelFetcher {
    pub fn new(models_dir: Option<PathBuf>) -> Self {
        Self { models_dir }
    }

    /// Resolves `model_name` to its ONNX weights and tokenizer files.
    pub async fn fetch(&self, model_name: &str) -> Result<ModelFiles> {
        if model_name.trim().is_empty() {
            anyhow::bail!("model name cannot be empty");
        }

        if let Some(dir) = &self.models_dir {
            if let Some(files) = local_files(dir, model_name) {
                debug!("Resolved model '{}' from models directory", model_name);
                return Ok(files);
            }
        }

        self.fetch_from_hub(model_name).await
    }

    async fn fetch_from_hub(&self, model_name: &str) -> Result<ModelFiles> {
        let api = Api::new().context("Failed to initialize Hugging Face Hub client")?;
        let repo = api.model(model_name.to_string());

        let tokenizer = repo.get("tokenizer.json").await.context(format!(
            "Failed to fetch tokenizer.json for '{}'",
            model_name
        ))?;

        // Xenova exports keep the weights under onnx/; other repositories put
        // model.onnx at the root
        let model = match repo.get("onnx/model.onnx").await {
            Ok(path) => path,
            Err(_) => repo.get("model.onnx").await.context(format!(
                "Failed to fetch ONNX weights for '{}'",
                model_name
            ))?,
        };

        Ok(ModelFiles { model, tokenizer })
    }
}

fn local_files(dir: &Path, model_name: &str) -> Option<ModelFiles> {
    let model_dir = dir.join(sanitize_model_name(model_name));
    let model = model_dir.join("model.onnx");
    let tokenizer = model_dir.join("tokenizer.json");
    if model.exists() && tokenizer.exists() {
        Some(ModelFiles { model, tokenizer })
    } else {
        None
    }
}
