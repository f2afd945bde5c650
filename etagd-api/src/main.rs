//! etagd Server Entry Point
//!
//! Bootstraps configuration and tracing, then starts the Axum HTTP server.

use axum::Router;
use etagd_api::telemetry::{init_tracing, TelemetryConfig};
use etagd_api::{create_api_router, ApiConfig, ApiError, ApiResult};

#[tokio::main]
async fn main() -> ApiResult<()> {
    let api_config = ApiConfig::from_env();
    init_tracing(&TelemetryConfig::from_api_config(&api_config))?;

    let app: Router = create_api_router(&api_config)?;

    let addr = api_config.bind_addr()?;
    tracing::info!(
        %addr,
        refresh_secs = api_config.refresh_window.as_secs(),
        validator_hex_len = api_config.validator_hex_len,
        "Starting etagd server"
    );

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .map_err(|e| ApiError::internal_error(format!("Failed to bind {}: {}", addr, e)))?;

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .map_err(|e| ApiError::internal_error(format!("Server error: {}", e)))?;

    tracing::info!("Server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "Failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
    tracing::info!("Shutdown signal received");
}
