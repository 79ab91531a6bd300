//! WebSocket message schema, validation and (de)serialization.

pub mod serializer;
pub mod types;
pub mod validator;
pub mod views;

pub use types::{InboundEnvelope, OutboundMessage, PushMessage, Response, ResponseStatus};
