//! SpokSpace backend entry point.

use std::sync::Arc;

use anyhow::{Context, Result};
use spok_02_api_gateway::{ApiGatewayService, InMemoryKvStore};
use tracing::{info, warn};

#[tokio::main]
async fn main() -> Result<()> {
    spok_runtime::init_logging()?;

    info!(
        version = spok_02_api_gateway::VERSION,
        "Starting SpokSpace backend"
    );

    let config = spok_runtime::load_config().context("failed to load configuration")?;
    if !config.auth.expose_reasons {
        info!("Auth rejection reasons are hidden from clients");
    }

    let store = Arc::new(InMemoryKvStore::new());
    warn!("Using in-memory storage; data is lost on restart");

    let service = ApiGatewayService::new(config, store).context("invalid configuration")?;

    service
        .run(shutdown_signal())
        .await
        .context("HTTP server failed")?;

    info!("Shutdown complete");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        warn!(error = %e, "Failed to listen for Ctrl-C; shutting down");
        return;
    }
    info!("Received shutdown signal");
}
