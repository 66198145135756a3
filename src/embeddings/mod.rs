// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1

//! Embedding inference: ONNX model wrapper, lazy model registry, and the
//! vector math applied to inference output.

pub mod onnx_model;
pub mod registry;
pub mod vector;

pub use onnx_model::OnnxEmbeddingModel;
pub use registry::{ModelInfo, ModelRegistry};
pub use vector::{l2_normalize, magnitude};
