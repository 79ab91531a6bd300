//! Application state shared across all handlers.

use std::sync::Arc;

use hive_core::config::AppConfig;
use hive_core::result::AppResult;
use hive_entity::Storage;
use hive_realtime::RealtimeEngine;
use hive_service::{DeviceDirectory, NetworkService};

/// Passed to every Axum handler via `State<AppState>`.
#[derive(Debug, Clone)]
pub struct AppState {
    pub config: Arc<AppConfig>,
    /// Repository handles of the selected backend.
    pub storage: Storage,
    pub networks: Arc<NetworkService>,
    /// WebSocket realtime engine.
    pub realtime: Arc<RealtimeEngine>,
}

impl AppState {
    pub fn new(config: AppConfig, storage: Storage) -> AppResult<Self> {
        let realtime = RealtimeEngine::new(
            &config.realtime,
            storage.clone(),
            config.server.rest_server_url.clone(),
        )?;
        let networks = NetworkService::new(storage.clone(), DeviceDirectory::new(storage.clone()));

        Ok(Self {
            config: Arc::new(config),
            storage,
            networks: Arc::new(networks),
            realtime: Arc::new(realtime),
        })
    }
}
