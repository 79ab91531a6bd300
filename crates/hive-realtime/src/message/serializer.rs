//! JSON serialization for WebSocket messages.

use serde_json::Value;

use super::types::{InboundEnvelope, OutboundMessage};

/// Serialize an outbound message to a text frame.
pub fn serialize_outbound(msg: &OutboundMessage) -> Result<String, serde_json::Error> {
    serde_json::to_string(msg)
}

/// Parse an inbound frame into its raw JSON value.
pub fn parse_frame(text: &str) -> Result<Value, serde_json::Error> {
    serde_json::from_str(text)
}

/// `action` and `requestId` read straight off the raw frame, so they can be
/// echoed even when the rest of the envelope is malformed.
pub fn echo_fields(frame: &Value) -> (String, Option<Value>) {
    let action = frame
        .get("action")
        .and_then(Value::as_str)
        .unwrap_or_default()
        .to_string();
    let request_id = frame.get("requestId").filter(|v| !v.is_null()).cloned();
    (action, request_id)
}

impl InboundEnvelope {
    /// Read the common fields from a parsed frame.
    pub fn from_frame(frame: &Value) -> Result<Self, serde_json::Error> {
        serde::Deserialize::deserialize(frame)
    }
}
