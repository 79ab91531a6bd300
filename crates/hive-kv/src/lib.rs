//! # hive-kv
//!
//! Key-value storage backend. Every entity type lives in its own sharded
//! concurrent map keyed by id, devices carry a guid secondary index, and
//! ids come from a dedicated counter namespace. Listings are scan, filter,
//! sort, then page.

pub mod counters;
pub mod keyspace;
pub mod repositories;

use std::sync::Arc;

use hive_entity::Storage;

pub use counters::Counters;
pub use keyspace::Keyspace;

/// Handle to one in-memory keyspace.
#[derive(Debug, Clone, Default)]
pub struct KvStore {
    keyspace: Arc<Keyspace>,
}

impl KvStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build the repository bundle over this keyspace.
    pub fn storage(&self) -> Storage {
        use repositories::*;

        let ks = &self.keyspace;
        Storage {
            devices: Arc::new(KvDeviceRepository::new(ks.clone())),
            networks: Arc::new(KvNetworkRepository::new(ks.clone())),
            device_classes: Arc::new(KvDeviceClassRepository::new(ks.clone())),
            commands: Arc::new(KvCommandRepository::new(ks.clone())),
            notifications: Arc::new(KvNotificationRepository::new(ks.clone())),
            users: Arc::new(KvUserRepository::new(ks.clone())),
            access_keys: Arc::new(KvAccessKeyRepository::new(ks.clone())),
        }
    }

    pub fn keyspace(&self) -> &Arc<Keyspace> {
        &self.keyspace
    }
}
