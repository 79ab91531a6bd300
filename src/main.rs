//! Device Hive server: device sessions over WebSocket plus the network
//! REST surface.
//!
//! Main entry point that picks a storage backend and starts the server.

use tracing_subscriber::{EnvFilter, fmt};

use hive_core::config::{AppConfig, LogFormat, StorageBackend};
use hive_core::error::AppError;
use hive_database::{DatabasePool, PgStorage};
use hive_entity::Storage;
use hive_kv::KvStore;

#[tokio::main]
async fn main() {
    let env = std::env::var("HIVE_ENV").unwrap_or_else(|_| "development".to_string());

    let config = match AppConfig::load(&env) {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Failed to load configuration: {}", e);
            std::process::exit(1);
        }
    };

    init_logging(&config);
    tracing::info!(env = %env, "Configuration loaded");

    if let Err(e) = run(config).await {
        tracing::error!("Server error: {}", e);
        std::process::exit(1);
    }
}

/// Initialize tracing/logging
fn init_logging(config: &AppConfig) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.logging.level));

    match config.logging.format {
        LogFormat::Json => {
            fmt()
                .json()
                .with_env_filter(filter)
                .with_target(true)
                .with_thread_ids(true)
                .init();
        }
        LogFormat::Pretty => {
            fmt()
                .pretty()
                .with_env_filter(filter)
                .with_target(true)
                .init();
        }
    }
}

async fn run(config: AppConfig) -> Result<(), AppError> {
    tracing::info!("Starting Device Hive v{}", env!("CARGO_PKG_VERSION"));

    let storage = open_storage(&config).await?;
    hive_api::run_server(config, storage).await?;

    tracing::info!("Device Hive shut down gracefully");
    Ok(())
}

async fn open_storage(config: &AppConfig) -> Result<Storage, AppError> {
    match config.storage.backend {
        StorageBackend::Memory => {
            tracing::info!("Using in-memory storage");
            Ok(KvStore::new().storage())
        }
        StorageBackend::Postgres => {
            let pool = DatabasePool::connect(&config.database).await?;
            hive_database::migration::run_migrations(pool.pool()).await?;
            Ok(PgStorage::storage(pool.into_pool()))
        }
    }
}
