//! Device notification model.

use chrono::{DateTime, SubsecRound, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// An immutable event emitted by a device.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Notification {
    pub id: Option<i64>,
    pub device_guid: String,
    /// Notification name.
    pub notification: String,
    pub parameters: Option<serde_json::Value>,
    pub timestamp: DateTime<Utc>,
}

impl Notification {
    /// Create an unsaved notification stamped with the current time
    /// (microsecond precision, as every backend stores it).
    pub fn new(device_guid: impl Into<String>, notification: impl Into<String>) -> Self {
        Self {
            id: None,
            device_guid: device_guid.into(),
            notification: notification.into(),
            parameters: None,
            timestamp: Utc::now().trunc_subsecs(6),
        }
    }
}
