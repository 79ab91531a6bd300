//! Inbound and outbound WebSocket message type definitions.
//!
//! Every inbound frame is a JSON object carrying an `action`. The common
//! fields are read into [`InboundEnvelope`]; each action then reads its own
//! request struct from the same object, so only the fields that action
//! knows about are ever looked at.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use hive_core::{AppError, ErrorKind};
use hive_entity::{CommandUpdate, Equipment};
use hive_service::{CommandDraft, DeviceClassRef, NetworkRef};

use super::views::{CommandView, NotificationView};

/// Fields shared by every inbound action.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InboundEnvelope {
    pub action: Option<String>,
    /// Opaque; echoed back unchanged.
    pub request_id: Option<Value>,
    /// Device guid.
    pub device_id: Option<String>,
    pub device_key: Option<String>,
}

/// `command/update`
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CommandUpdateRequest {
    pub command_id: Option<i64>,
    pub command: Option<CommandUpdate>,
}

/// `command/subscribe`, `notification/subscribe` and their unsubscribe
/// counterparts.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SubscribeRequest {
    pub timestamp: Option<String>,
    pub device_guids: Option<Vec<String>>,
}

/// Notification body of `notification/insert`.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NotificationPayload {
    pub notification: Option<String>,
    pub parameters: Option<Value>,
}

/// `notification/insert`
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NotificationInsertRequest {
    pub notification: Option<NotificationPayload>,
}

/// `command/insert`
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CommandInsertRequest {
    pub device_guid: Option<String>,
    pub command: Option<CommandDraft>,
}

/// Device body of `device/save`.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DevicePayload {
    pub name: Option<String>,
    pub key: Option<String>,
    pub status: Option<String>,
    pub data: Option<Value>,
    pub network: Option<NetworkRef>,
    pub device_class: Option<DeviceClassRef>,
    /// Null entries are dropped before use.
    pub equipment: Option<Vec<Option<Equipment>>>,
}

/// `device/save`
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeviceSaveRequest {
    pub device: Option<DevicePayload>,
}

/// Outcome tag of a response.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ResponseStatus {
    Success,
    Error,
}

/// Synchronous reply to one inbound action.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Response {
    pub action: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub request_id: Option<Value>,
    pub status: ResponseStatus,
    #[serde(flatten)]
    pub payload: Map<String, Value>,
}

impl Response {
    pub fn success(action: impl Into<String>, request_id: Option<Value>) -> Self {
        Self {
            action: action.into(),
            request_id,
            status: ResponseStatus::Success,
            payload: Map::new(),
        }
    }

    /// Error reply carrying `{code, error}`.
    pub fn error(action: impl Into<String>, request_id: Option<Value>, err: &AppError) -> Self {
        let mut payload = Map::new();
        payload.insert("code".into(), Value::from(err.kind.status_code()));
        let message = match err.kind {
            ErrorKind::Storage => "persistence error".to_string(),
            ErrorKind::Internal | ErrorKind::Configuration => "internal error".to_string(),
            _ => err.message.clone(),
        };
        payload.insert("error".into(), Value::from(message));
        Self {
            action: action.into(),
            request_id,
            status: ResponseStatus::Error,
            payload,
        }
    }

    /// Attach a payload element.
    pub fn with(mut self, key: &str, value: impl Serialize) -> Result<Self, AppError> {
        self.payload.insert(key.to_string(), serde_json::to_value(value)?);
        Ok(self)
    }

    pub fn is_success(&self) -> bool {
        self.status == ResponseStatus::Success
    }
}

/// Asynchronous frames pushed to subscribers.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "action")]
pub enum PushMessage {
    #[serde(rename = "command/insert", rename_all = "camelCase")]
    CommandInsert {
        device_guid: String,
        command: CommandView,
    },
    #[serde(rename = "notification/insert", rename_all = "camelCase")]
    NotificationInsert {
        device_guid: String,
        notification: NotificationView,
    },
    #[serde(rename = "command/update")]
    CommandUpdate { command: CommandView },
}

/// Anything written to a device socket.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum OutboundMessage {
    Response(Response),
    Push(PushMessage),
}

impl From<Response> for OutboundMessage {
    fn from(response: Response) -> Self {
        Self::Response(response)
    }
}

impl From<PushMessage> for OutboundMessage {
    fn from(push: PushMessage) -> Self {
        Self::Push(push)
    }
}
