//! Storage backend selection.

use serde::{Deserialize, Serialize};

/// Which storage backend implements the repositories.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StorageBackend {
    /// In-process key/value backend.
    #[default]
    Memory,
    /// PostgreSQL through sqlx.
    Postgres,
}

/// Storage configuration section.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct StorageConfig {
    /// Selected backend.
    #[serde(default)]
    pub backend: StorageBackend,
}
