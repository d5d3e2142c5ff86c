//! Vaultboard - eligible Morpho vaults per underlying asset
//!
//! Polls the Morpho API for each configured chain, groups the vaults by asset
//! and serves the latest grouping over HTTP.

use anyhow::{Context, Result};
use std::sync::Arc;
use tokio::net::TcpListener;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use vaultboard_backend::{
    api::create_router,
    config::{load_env, Config},
    scrapers::MorphoClient,
    vault::{spawn_refresh_loop, AssetBoard, VaultSource},
};

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize environment and logging
    load_env();
    init_tracing();

    let config = Config::from_env().context("Invalid configuration")?;

    info!("🚀 Vaultboard starting");
    info!(
        chains = ?config.chain_ids,
        refresh_secs = config.refresh_interval.as_secs(),
        endpoint = %config.morpho_api_url,
        "⚙️ configuration loaded"
    );

    let client = MorphoClient::new(config.morpho_api_url.clone(), config.http_timeout)?;
    let source: Arc<dyn VaultSource> = Arc::new(client);
    let board = Arc::new(AssetBoard::new());

    let _refresh = spawn_refresh_loop(
        board.clone(),
        source,
        config.chain_ids.clone(),
        config.refresh_interval,
    );

    let app = create_router(board);

    // Start server
    let addr = format!("0.0.0.0:{}", config.port);
    let listener = TcpListener::bind(&addr)
        .await
        .with_context(|| format!("Failed to bind {}", addr))?;
    info!("🎯 API server listening on {}", addr);

    axum::serve(listener, app).await.context("Server error")?;

    Ok(())
}

fn init_tracing() {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "vaultboard_backend=debug,vaultboard=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();
}
