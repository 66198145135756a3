// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
pub mod fetch;

pub use fetch::{sanitize_model_name, ModelFetcher, ModelFiles};
