//! Device class and equipment models.

use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// A piece of equipment attached to a device class.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Equipment {
    pub name: String,
    pub code: String,
    #[serde(rename = "type")]
    pub equipment_type: String,
    pub data: Option<serde_json::Value>,
}

/// A device class, identified by `(name, version)`.
///
/// Devices reference a class by id only; the class is looked up again on
/// every fetch so changes are always visible.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct DeviceClass {
    pub id: Option<i64>,
    pub name: String,
    pub version: String,
    /// Permanent classes are never overwritten by device registration.
    pub is_permanent: bool,
    /// Seconds without activity before a device of this class is offline.
    pub offline_timeout: Option<i32>,
    pub data: Option<serde_json::Value>,
    #[sqlx(json)]
    pub equipment: Vec<Equipment>,
}

impl DeviceClass {
    /// Create an unsaved, non-permanent class.
    pub fn new(name: impl Into<String>, version: impl Into<String>) -> Self {
        Self {
            id: None,
            name: name.into(),
            version: version.into(),
            is_permanent: false,
            offline_timeout: None,
            data: None,
            equipment: Vec::new(),
        }
    }

    /// Find an equipment entry by its code.
    pub fn equipment_by_code(&self, code: &str) -> Option<&Equipment> {
        self.equipment.iter().find(|e| e.code == code)
    }
}
