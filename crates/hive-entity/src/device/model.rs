//! Device entity model.

use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// A registered device.
///
/// Devices are addressed by their `guid` everywhere outside storage; the
/// numeric `id` is assigned by the backend on first persist.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Device {
    /// Storage identifier, `None` until persisted.
    pub id: Option<i64>,
    /// Natural key.
    pub guid: String,
    /// Shared credential presented together with the guid.
    #[serde(skip_serializing)]
    pub key: String,
    /// Display name.
    pub name: String,
    /// Free-form status string reported by the device.
    pub status: Option<String>,
    /// Arbitrary device data.
    pub data: Option<serde_json::Value>,
    /// Owning network, if any.
    pub network_id: Option<i64>,
    /// Device class reference.
    pub device_class_id: Option<i64>,
}

impl Device {
    /// Create an unsaved device.
    pub fn new(guid: impl Into<String>, key: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: None,
            guid: guid.into(),
            key: key.into(),
            name: name.into(),
            status: None,
            data: None,
            network_id: None,
            device_class_id: None,
        }
    }

    /// Exact credential match.
    pub fn key_matches(&self, key: &str) -> bool {
        self.key == key
    }

    /// Whether both devices sit in the same (non-empty) network.
    pub fn shares_network_with(&self, other: &Device) -> bool {
        match (self.network_id, other.network_id) {
            (Some(a), Some(b)) => a == b,
            _ => false,
        }
    }
}
