// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1

//! Bounded concurrent fan-out for batch inference.
//!
//! The batch endpoint runs one inference per input item. Spawning all of them
//! at once would let a single large batch exhaust the process, so items flow
//! through a semaphore: at most `max_concurrent` inferences are in flight at
//! any moment. Results are collected by input index, so output order always
//! matches input order regardless of completion order.

use anyhow::{Context, Result};
use std::future::Future;
use std::sync::Arc;
use tokio::sync::Semaphore;

#[derive(Debug, Clone)]
pub struct InferencePool {
    semaphore: Arc<Semaphore>,
    max_concurrent: usize,
}

impl InferencePool {
    /// Creates a pool allowing at most `max_concurrent` in-flight operations
    /// (clamped to at least 1).
    pub fn new(max_concurrent: usize) -> Self {
        let max_concurrent = max_concurrent.max(1);
        Self {
            semaphore: Arc::new(Semaphore::new(max_concurrent)),
            max_concurrent,
        }
    }

    pub fn max_concurrent(&self) -> usize {
        self.max_concurrent
    }

    /// Runs `op` over every item concurrently, bounded by the pool's cap, and
    /// returns the results in input order.
    ///
    /// The first failed item fails the whole call; no partial results are
    /// returned. Items already dispatched keep running to completion (there
    /// are no cancellation semantics for in-flight inference).
    pub async fn run_ordered<T, R, F, Fut>(&self, items: Vec<T>, op: F) -> Result<Vec<R>>
    where
        T: Send + 'static,
        R: Send + 'static,
        F: Fn(usize, T) -> Fut,
        Fut: Future<Output = Result<R>> + Send + 'static,
    {
        let mut handles = Vec::with_capacity(items.len());

        for (index, item) in items.into_iter().enumerate() {
            let semaphore = self.semaphore.clone();
            let fut = op(index, item);
            handles.push(tokio::spawn(async move {
                let _permit = semaphore
                    .acquire_owned()
                    .await
                    .map_err(|_| anyhow::anyhow!("inference pool is closed"))?;
                fut.await
            }));
        }

        // Handles are awaited in spawn order, so results line up with input
        // indices no matter which tasks finish first.
        let joined = futures::future::try_join_all(handles)
            .await
            .context("inference task panicked")?;

        joined.into_iter().collect()
    }
}
