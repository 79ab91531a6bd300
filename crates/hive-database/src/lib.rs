//! # hive-database
//!
//! PostgreSQL connection management and concrete repository
//! implementations for every device hive entity.

pub mod connection;
pub(crate) mod counters;
pub(crate) mod error;
pub mod migration;
pub mod repositories;

use std::sync::Arc;

use sqlx::PgPool;

use hive_entity::Storage;

pub use connection::DatabasePool;

/// Builds the repository bundle over a PostgreSQL pool.
#[derive(Debug)]
pub struct PgStorage;

impl PgStorage {
    pub fn storage(pool: PgPool) -> Storage {
        use repositories::*;

        Storage {
            devices: Arc::new(PgDeviceRepository::new(pool.clone())),
            networks: Arc::new(PgNetworkRepository::new(pool.clone())),
            device_classes: Arc::new(PgDeviceClassRepository::new(pool.clone())),
            commands: Arc::new(PgCommandRepository::new(pool.clone())),
            notifications: Arc::new(PgNotificationRepository::new(pool.clone())),
            users: Arc::new(PgUserRepository::new(pool.clone())),
            access_keys: Arc::new(PgAccessKeyRepository::new(pool)),
        }
    }
}
