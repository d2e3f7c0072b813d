use anyhow::Result;
use tokio::net::TcpListener;
use tracing::{error, info};

use catalog::{AppState, create_router};
use common::{config::AppConfig, telemetry::init_tracing};

#[tokio::main]
async fn main() -> Result<()> {
    let config = AppConfig::from_env()?;

    // Initialize logging
    init_tracing(&config.log_filter)?;

    info!("Starting film catalog service");

    let state = AppState::from_config(&config).await?;
    info!("Catalog initialized with {} films", state.film_store.len().await);

    // Start the web server
    let app = create_router(state);

    let listener = TcpListener::bind(config.bind_address()).await?;
    info!("Film catalog listening on {}", config.bind_address());

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Shutting down film catalog service");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        error!("Failed to listen for shutdown signal: {}", e);
        std::future::pending::<()>().await;
    }
}
