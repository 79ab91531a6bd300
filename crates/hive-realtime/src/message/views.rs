//! Per-action outbound views with explicit field allow-lists.

use chrono::{DateTime, SecondsFormat, Utc};
use serde::{Serialize, Serializer};
use serde_json::Value;

use hive_entity::{Command, Notification};

fn timestamp<S: Serializer>(ts: &DateTime<Utc>, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.serialize_str(&ts.to_rfc3339_opts(SecondsFormat::Micros, true))
}

/// A command as pushed to the target device or to update subscribers.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CommandView {
    pub id: Option<i64>,
    pub command: String,
    pub parameters: Option<Value>,
    pub lifetime: Option<i32>,
    #[serde(serialize_with = "timestamp")]
    pub timestamp: DateTime<Utc>,
    pub user_id: Option<i64>,
    pub status: Option<String>,
    pub result: Option<Value>,
}

impl From<&Command> for CommandView {
    fn from(command: &Command) -> Self {
        Self {
            id: command.id,
            command: command.command.clone(),
            parameters: command.parameters.clone(),
            lifetime: command.lifetime,
            timestamp: command.timestamp,
            user_id: command.user_id,
            status: command.status.clone(),
            result: command.result.clone(),
        }
    }
}

/// A notification as pushed to subscribers.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NotificationView {
    pub id: Option<i64>,
    pub notification: String,
    pub parameters: Option<Value>,
    #[serde(serialize_with = "timestamp")]
    pub timestamp: DateTime<Utc>,
}

impl From<&Notification> for NotificationView {
    fn from(notification: &Notification) -> Self {
        Self {
            id: notification.id,
            notification: notification.notification.clone(),
            parameters: notification.parameters.clone(),
            timestamp: notification.timestamp,
        }
    }
}

/// Reply body of an insert: the server-assigned fields only.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Created {
    pub id: Option<i64>,
    #[serde(serialize_with = "timestamp")]
    pub timestamp: DateTime<Utc>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user_id: Option<i64>,
}

impl From<&Command> for Created {
    fn from(command: &Command) -> Self {
        Self {
            id: command.id,
            timestamp: command.timestamp,
            user_id: command.user_id,
        }
    }
}

impl From<&Notification> for Created {
    fn from(notification: &Notification) -> Self {
        Self {
            id: notification.id,
            timestamp: notification.timestamp,
            user_id: None,
        }
    }
}

/// `server/info` body. Carries no websocket URL.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ServerInfo {
    pub api_version: String,
    #[serde(serialize_with = "timestamp")]
    pub server_timestamp: DateTime<Utc>,
    pub rest_server_url: Option<String>,
}
