// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1

//! ONNX Embedding Model Wrapper
//!
//! This module provides a wrapper around ONNX Runtime for running sentence
//! transformer models (default: Xenova/all-MiniLM-L6-v2).
//!
//! Features:
//! - ONNX model loading from disk
//! - BERT tokenization with truncation
//! - Mean pooling over token embeddings, weighted by the attention mask
//! - Raw (un-normalized) output vectors; L2 normalization is applied by the
//!   caller when the request asks for it

use anyhow::{Context, Result};
use ndarray::{Array2, Axis};
use ort::execution_providers::CPUExecutionProvider;
use ort::session::builder::GraphOptimizationLevel;
use ort::session::Session;
use ort::value::Value;
use std::path::Path;
use std::sync::{Arc, Mutex};
use tokenizers::{Tokenizer, TruncationParams};
use tracing::info;

/// Maximum input sequence length in tokens. Longer inputs are truncated.
const MAX_SEQUENCE_LENGTH: usize = 256;

/// ONNX-based sentence embedding model.
///
/// The model uses a sentence transformer architecture: a BERT-style tokenizer
/// feeding token-level inference, mean-pooled into one fixed-length vector per
/// input. The output dimension is detected from a validation inference at load
/// time and is constant for the lifetime of the handle.
///
/// # Thread Safety
/// All fields are wrapped in Arc for cheap cloning and thread-safe sharing.
/// The session itself requires exclusive access to run, so concurrent
/// inferences on one handle serialize at the session mutex.
#[derive(Clone)]
pub struct OnnxEmbeddingModel {
    /// ONNX Runtime session (Arc<Mutex> for thread-safe shared access)
    session: Arc<Mutex<Session>>,

    /// BERT tokenizer
    tokenizer: Arc<Tokenizer>,

    /// Model name (e.g., "Xenova/all-MiniLM-L6-v2")
    model_name: String,

    /// Output dimension (384 for all-MiniLM-L6-v2), detected at load time
    dimension: usize,
}

impl std::fmt::Debug for OnnxEmbeddingModel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OnnxEmbeddingModel")
            .field("model_name", &self.model_name)
            .field("dimension", &self.dimension)
            .finish_non_exhaustive()
    }
}

impl OnnxEmbeddingModel {
    /// Creates a new ONNX embedding model from disk paths.
    ///
    /// Loads the session and tokenizer, then runs a validation inference to
    /// detect the model's output dimension.
    ///
    /// # Errors
    /// Returns error if:
    /// - Model or tokenizer file not found or invalid
    /// - ONNX Runtime initialization fails
    /// - The model does not output token-level embeddings `[batch, seq, hidden]`
    pub async fn new<P: AsRef<Path>>(
        model_name: impl Into<String>,
        model_path: P,
        tokenizer_path: P,
    ) -> Result<Self> {
        let model_name = model_name.into();
        let model_path = model_path.as_ref();
        let tokenizer_path = tokenizer_path.as_ref();

        if !model_path.exists() {
            anyhow::bail!("ONNX model file not found: {}", model_path.display());
        }
        if !tokenizer_path.exists() {
            anyhow::bail!("Tokenizer file not found: {}", tokenizer_path.display());
        }

        let mut session = Session::builder()
            .context("Failed to create session builder")?
            .with_execution_providers([CPUExecutionProvider::default().build()])
            .context("Failed to set CPU execution provider")?
            .with_optimization_level(GraphOptimizationLevel::Level3)
            .context("Failed to set optimization level")?
            .with_intra_threads(4)
            .context("Failed to set intra threads")?
            .commit_from_file(model_path)
            .context(format!(
                "Failed to load ONNX model from {}",
                model_path.display()
            ))?;

        let mut tokenizer = Tokenizer::from_file(tokenizer_path)
            .map_err(|e| anyhow::anyhow!("Failed to load tokenizer: {}", e))?;
        tokenizer
            .with_truncation(Some(TruncationParams {
                max_length: MAX_SEQUENCE_LENGTH,
                ..Default::default()
            }))
            .map_err(|e| anyhow::anyhow!("Failed to configure tokenizer truncation: {}", e))?;

        // Detect the output dimension by running a test inference. The shape
        // check also catches models that pre-pool their outputs: mean pooling
        // here needs token-level embeddings.
        let dimension = {
            let test_encoding = tokenizer
                .encode("validation test", true)
                .map_err(|e| anyhow::anyhow!("Tokenizer validation failed: {}", e))?;

            let input_ids: Vec<i64> = test_encoding
                .get_ids()
                .iter()
                .map(|&id| id as i64)
                .collect();
            let attention_mask: Vec<i64> = test_encoding
                .get_attention_mask()
                .iter()
                .map(|&m| m as i64)
                .collect();
            let token_type_ids: Vec<i64> = vec![0i64; input_ids.len()];

            let input_ids_array = Array2::from_shape_vec((1, input_ids.len()), input_ids)
                .context("Failed to create input_ids array")?;
            let attention_mask_array =
                Array2::from_shape_vec((1, attention_mask.len()), attention_mask)
                    .context("Failed to create attention_mask array")?;
            let token_type_ids_array =
                Array2::from_shape_vec((1, token_type_ids.len()), token_type_ids)
                    .context("Failed to create token_type_ids array")?;

            let outputs = session.run(ort::inputs![
                "input_ids" => Value::from_array(input_ids_array)?,
                "attention_mask" => Value::from_array(attention_mask_array)?,
                "token_type_ids" => Value::from_array(token_type_ids_array)?
            ])?;

            // Use index [0] instead of name since different models may have
            // different output names
            let output_tensor = outputs[0]
                .try_extract_array::<f32>()
                .context("Failed to extract output tensor")?;
            let output_shape = output_tensor.shape();

            if output_shape.len() != 3 {
                anyhow::bail!(
                    "Model outputs unexpected shape: {:?} (expected [batch, seq_len, hidden_dim])",
                    output_shape
                );
            }
            output_shape[2]
        };

        info!(
            "Loaded ONNX embedding model '{}' ({} dimensions)",
            model_name, dimension
        );

        Ok(Self {
            session: Arc::new(Mutex::new(session)),
            tokenizer: Arc::new(tokenizer),
            model_name,
            dimension,
        })
    }

    /// Generates the raw (un-normalized) embedding for a single text.
    ///
    /// 1. Tokenize with the BERT tokenizer (truncation to max length)
    /// 2. Run ONNX inference
    /// 3. Mean-pool token embeddings, weighted by the attention mask
    ///
    /// Embedding the same text twice yields identical vectors.
    pub async fn embed(&self, text: &str) -> Result<Vec<f32>> {
        let encoding = self
            .tokenizer
            .encode(text, true)
            .map_err(|e| anyhow::anyhow!("Tokenization failed: {}", e))?;

        let input_ids: Vec<i64> = encoding.get_ids().iter().map(|&id| id as i64).collect();
        let attention_mask: Vec<i64> = encoding
            .get_attention_mask()
            .iter()
            .map(|&m| m as i64)
            .collect();
        let token_type_ids: Vec<i64> = vec![0i64; input_ids.len()];

        // Keep a copy of attention_mask for mean pooling
        let attention_mask_for_pooling = attention_mask.clone();

        let input_ids_array = Array2::from_shape_vec((1, input_ids.len()), input_ids)
            .context("Failed to create input_ids array")?;
        let attention_mask_array =
            Array2::from_shape_vec((1, attention_mask.len()), attention_mask)
                .context("Failed to create attention_mask array")?;
        let token_type_ids_array =
            Array2::from_shape_vec((1, token_type_ids.len()), token_type_ids)
                .context("Failed to create token_type_ids array")?;

        // Lock session for thread-safe access
        let mut session_guard = self.session.lock().unwrap();
        let outputs = session_guard.run(ort::inputs![
            "input_ids" => Value::from_array(input_ids_array)?,
            "attention_mask" => Value::from_array(attention_mask_array)?,
            "token_type_ids" => Value::from_array(token_type_ids_array)?
        ])?;

        let output_array = outputs[0]
            .try_extract_array::<f32>()
            .context("Failed to extract output tensor")?;

        // Model outputs token-level embeddings: [batch, seq_len, hidden_dim].
        // Mean-pool over the sequence dimension, weighting by the attention
        // mask so padding tokens are ignored.
        let batch_0 = output_array.index_axis(Axis(0), 0);
        let seq_len = batch_0.shape()[0];
        let hidden_dim = batch_0.shape()[1];

        let mut pooled = vec![0.0f32; hidden_dim];
        let mut sum_mask = 0.0f32;

        for i in 0..seq_len {
            let mask_value = attention_mask_for_pooling[i] as f32;
            sum_mask += mask_value;
            for j in 0..hidden_dim {
                pooled[j] += batch_0[[i, j]] * mask_value;
            }
        }

        // Avoid division by zero
        for val in &mut pooled {
            *val /= sum_mask.max(1e-9);
        }

        if pooled.len() != self.dimension {
            anyhow::bail!(
                "Unexpected embedding dimension: {} (expected {})",
                pooled.len(),
                self.dimension
            );
        }

        Ok(pooled)
    }

    /// Returns the output dimension of this model
    pub fn dimension(&self) -> usize {
        self.dimension
    }

    /// Returns the model name
    pub fn model_name(&self) -> &str {
        &self.model_name
    }
}
