//! Running the gateway.

use std::time::Duration;

use tokio::net::TcpListener;

use crate::config::{validation::validate_bind, Config};
use crate::error::{Error, Result};
use crate::gateway::backend::BackendClient;
use crate::gateway::routes::{create_router, GatewayState};

/// Serve the gateway on `config.gateway.bind` until Ctrl-C.
pub async fn serve(config: &Config) -> Result<()> {
    let addr = validate_bind(&config.gateway.bind)?;
    let backend = BackendClient::new(
        &config.backend,
        Duration::from_secs(config.gateway.request_timeout_secs),
    )?;
    let backend_url = backend.base_url().clone();
    let state = GatewayState::new(backend, config.gateway.file_cache_max_age_secs);
    let app = create_router(state);

    let listener = TcpListener::bind(addr)
        .await
        .map_err(|e| Error::Server(format!("Failed to bind {}: {}", addr, e)))?;

    tracing::info!("Gateway listening on http://{}", addr);
    tracing::info!("Forwarding to backend at {}", backend_url);
    tracing::info!("  POST /api/parse");
    tracing::info!("  POST /api/download");
    tracing::info!("  GET  /api/status/{{task_id}}");
    tracing::info!("  GET  /api/files/{{filename}}");
    tracing::info!("  GET  /health");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .map_err(|e| Error::Server(e.to_string()))?;

    tracing::info!("Gateway stopped");
    Ok(())
}

async fn shutdown_signal() {
    match tokio::signal::ctrl_c().await {
        Ok(()) => tracing::info!("Shutdown requested"),
        Err(e) => {
            // Without a signal handler the server runs until killed.
            tracing::error!("Failed to listen for Ctrl-C: {}", e);
            std::future::pending::<()>().await;
        }
    }
}
