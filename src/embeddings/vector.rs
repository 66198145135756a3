// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1

//! Vector math for embedding post-processing.
//!
//! The inference path produces raw mean-pooled vectors; the API's `normalize`
//! flag applies the L2 normalization here.

/// Euclidean (L2) magnitude of a vector.
pub fn magnitude(v: &[f32]) -> f32 {
    v.iter().map(|x| x * x).sum::<f32>().sqrt()
}

/// Scales `v` so its Euclidean length equals 1.
///
/// Known limitation: an all-zero input has magnitude 0 and the division is not
/// special-cased, so every output component is NaN.
pub fn l2_normalize(v: &[f32]) -> Vec<f32> {
    let m = magnitude(v);
    v.iter().map(|x| x / m).collect()
}
