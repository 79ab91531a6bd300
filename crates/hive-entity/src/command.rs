//! Device command model.

use chrono::{DateTime, SubsecRound, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// A command addressed to a device.
///
/// Only `status` and `result` change after creation, through
/// [`CommandUpdate`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Command {
    pub id: Option<i64>,
    /// Target device.
    pub device_guid: String,
    /// Command name.
    pub command: String,
    pub parameters: Option<serde_json::Value>,
    /// Lifetime in seconds.
    pub lifetime: Option<i32>,
    /// Server-assigned creation time.
    pub timestamp: DateTime<Utc>,
    /// Issuing user, if any.
    pub user_id: Option<i64>,
    pub status: Option<String>,
    pub result: Option<serde_json::Value>,
}

impl Command {
    /// Create an unsaved command stamped with the current time
    /// (microsecond precision, as every backend stores it).
    pub fn new(device_guid: impl Into<String>, command: impl Into<String>) -> Self {
        Self {
            id: None,
            device_guid: device_guid.into(),
            command: command.into(),
            parameters: None,
            lifetime: None,
            timestamp: Utc::now().trunc_subsecs(6),
            user_id: None,
            status: None,
            result: None,
        }
    }

    /// Apply a status/result update; every other field is untouched.
    pub fn apply(&mut self, update: CommandUpdate) {
        if let Some(status) = update.status {
            self.status = Some(status);
        }
        if let Some(result) = update.result {
            self.result = Some(result);
        }
    }
}

/// The mutable part of a command.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CommandUpdate {
    pub status: Option<String>,
    pub result: Option<serde_json::Value>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_update_touches_only_status_and_result() {
        let mut command = Command::new("guid-1", "reboot");
        command.id = Some(7);
        command.parameters = Some(serde_json::json!({"delay": 5}));
        let before = command.clone();

        command.apply(CommandUpdate {
            status: Some("done".into()),
            result: Some(serde_json::json!("ok")),
        });

        assert_eq!(command.status.as_deref(), Some("done"));
        assert_eq!(command.result, Some(serde_json::json!("ok")));
        assert_eq!(command.command, before.command);
        assert_eq!(command.parameters, before.parameters);
        assert_eq!(command.timestamp, before.timestamp);
    }

    #[test]
    fn test_update_ignores_unknown_fields() {
        let update: CommandUpdate =
            serde_json::from_value(serde_json::json!({"status": "x", "command": "hijack"})).unwrap();
        assert_eq!(update.status.as_deref(), Some("x"));
    }
}
