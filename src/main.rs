// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
use anyhow::Result;
use fabstir_embed_node::{api::http_server::start_server, config::ServerConfig, version};
use std::env;

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize tracing subscriber for logging
    if env::var("RUST_LOG").is_err() {
        env::set_var("RUST_LOG", "info");
    }
    tracing_subscriber::fmt::init();

    println!("🚀 Starting {}...", version::get_version_string());
    println!("📦 BUILD VERSION: {}", version::VERSION);
    println!();

    let config = ServerConfig::from_env();
    tracing::info!(
        "Configuration: port={}, default_model={}, max_concurrent_inferences={}, preload_models={}",
        config.port,
        config.default_model,
        config.max_concurrent_inferences,
        config.preload_models
    );

    start_server(config).await
}
