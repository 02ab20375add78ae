// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
use anyhow::{anyhow, Result};
use clap::Parser;
use omokage_node::{api::start_server, config::AppConfig, version};
use std::{env, path::PathBuf};
use tracing::{info, warn};

/// Dual-variant portrait generation node
#[derive(Parser, Debug)]
#[command(name = "omokage-node", version)]
struct Args {
    /// Address to bind (overrides API_HOST)
    #[arg(long, env = "API_HOST")]
    host: Option<String>,

    /// Port to bind (overrides API_PORT)
    #[arg(long, env = "API_PORT")]
    port: Option<u16>,

    /// Directory persisted media is written to (overrides MEDIA_ROOT)
    #[arg(long, env = "MEDIA_ROOT")]
    media_root: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> Result<()> {
    // .env is optional
    dotenv::dotenv().ok();

    // Initialize tracing subscriber for logging
    if env::var("RUST_LOG").is_err() {
        env::set_var("RUST_LOG", "info");
    }
    tracing_subscriber::fmt::init();

    let args = Args::parse();
    info!("Starting {}", version::get_version_string());

    let mut config = AppConfig::from_env();
    if args.host.is_some() || args.port.is_some() {
        let (default_host, default_port) = config
            .listen_addr
            .rsplit_once(':')
            .map(|(h, p)| (h.to_string(), p.to_string()))
            .unwrap_or_else(|| ("0.0.0.0".to_string(), "8000".to_string()));
        config.listen_addr = format!(
            "{}:{}",
            args.host.unwrap_or(default_host),
            args.port.map(|p| p.to_string()).unwrap_or(default_port)
        );
    }
    if let Some(media_root) = args.media_root {
        config.media_root = media_root;
    }

    config
        .validate()
        .map_err(|e| anyhow!("invalid configuration: {}", e))?;

    if !config.has_api_key() {
        warn!("OPENAI_API_KEY is not set; provider calls will fail and samples will be served");
    }
    info!(
        "Images: model={}, size={}, media_root={}, media_url={}",
        config.model,
        config.size,
        config.media_root.display(),
        config.media_url
    );

    start_server(config).await
}
