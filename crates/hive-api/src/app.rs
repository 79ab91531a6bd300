//! Application builder and server entry point.

use axum::Router;
use tracing::info;

use hive_core::config::AppConfig;
use hive_core::error::AppError;
use hive_core::result::AppResult;
use hive_entity::Storage;

use crate::router::build_router;
use crate::state::AppState;

/// Builds the complete Axum application.
pub fn build_app(state: AppState) -> Router {
    build_router(state)
}

/// Serve HTTP and WebSocket traffic over `storage` until Ctrl+C.
pub async fn run_server(config: AppConfig, storage: Storage) -> AppResult<()> {
    let addr = config.server.bind_address();
    let state = AppState::new(config, storage)?;
    let engine = state.realtime.clone();
    let app = build_app(state);

    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .map_err(|e| AppError::internal(format!("Failed to bind {addr}: {e}")))?;

    info!("Device hive listening on {}", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .map_err(|e| AppError::internal(format!("Server error: {e}")))?;

    engine.shutdown();
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "Failed to install Ctrl+C handler");
        std::future::pending::<()>().await;
    }
    info!("Shutdown signal received");
}
