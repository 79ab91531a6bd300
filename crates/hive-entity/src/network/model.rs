//! Network entity model.

use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// A named group of devices. Users are granted access per network.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Network {
    pub id: Option<i64>,
    /// Unique network name.
    pub name: String,
    pub key: Option<String>,
    pub description: Option<String>,
}

impl Network {
    /// Create an unsaved network with only a name.
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            id: None,
            name: name.into(),
            key: None,
            description: None,
        }
    }

    /// Apply the provided fields of a partial update.
    pub fn apply(&mut self, update: NetworkUpdate) {
        if let Some(name) = update.name {
            self.name = name;
        }
        if let Some(key) = update.key {
            self.key = Some(key);
        }
        if let Some(description) = update.description {
            self.description = Some(description);
        }
    }
}

/// Partial update for a network. Absent fields are left untouched.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NetworkUpdate {
    pub name: Option<String>,
    pub key: Option<String>,
    pub description: Option<String>,
}
