//! readme-searcher API server
//!
//! Serves the search pipeline over HTTP.

use anyhow::Result;
use readme_searcher::{
    config,
    metrics::Metrics,
    web::{create_router, AppState},
};
use std::net::SocketAddr;
use std::sync::Arc;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<()> {
    // Load configuration
    let settings = config::load(None)?;

    // Initialize logging
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(settings.log_filter()));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .init();

    info!("Starting readme-searcher v{}", readme_searcher::VERSION);

    for warning in settings.validate() {
        warn!("{}", warning);
    }

    // Statistics live for the whole process and are injected into the pipeline
    let stats = Arc::new(Metrics::new());

    // Create application state; this opens the GitHub transport
    let state = AppState::new(settings.clone(), stats)?;
    info!(
        "Search pipeline ready (api: {}, degraded: {})",
        settings.github.api_url,
        state.searcher.is_degraded()
    );

    // Create router
    let app = create_router(state);

    // Bind address
    let addr = SocketAddr::new(settings.server.host.parse()?, settings.server.port);

    info!(
        "Starting server on http://{}{}",
        addr,
        settings.server.route_prefix()
    );

    // Start server
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Shutting down readme-searcher");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        warn!("Failed to listen for shutdown signal: {}", e);
        std::future::pending::<()>().await;
    }
}
