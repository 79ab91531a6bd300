//! Per-frame action dispatch.
//!
//! The dispatcher is stateless: everything it mutates lives in the
//! [`Session`] handed in or behind the shared [`MessageBus`] and storage.

pub mod action;
mod handlers;

use std::sync::Arc;

use serde::de::DeserializeOwned;
use serde_json::Value;
use tracing::{debug, warn};

use hive_core::AppError;
use hive_core::result::AppResult;
use hive_entity::{Device, Storage};
use hive_service::{DeviceDirectory, DeviceService};

use crate::bus::MessageBus;
use crate::message::serializer::{echo_fields, parse_frame};
use crate::message::validator::validate_inbound;
use crate::message::{InboundEnvelope, Response};
use crate::session::Session;

pub use action::Action;

/// Routes inbound frames to their action handlers.
#[derive(Debug, Clone)]
pub struct Dispatcher {
    directory: DeviceDirectory,
    devices: DeviceService,
    bus: Arc<MessageBus>,
    rest_server_url: Option<String>,
    max_message_size: usize,
}

/// Settings the dispatcher needs from configuration.
#[derive(Debug, Clone)]
pub struct DispatcherSettings {
    pub rest_server_url: Option<String>,
    pub max_message_size: usize,
    pub allow_network_autocreate: bool,
}

impl Dispatcher {
    pub fn new(storage: Storage, bus: Arc<MessageBus>, settings: DispatcherSettings) -> Self {
        Self {
            directory: DeviceDirectory::new(storage.clone()),
            devices: DeviceService::new(storage, settings.allow_network_autocreate),
            bus,
            rest_server_url: settings.rest_server_url,
            max_message_size: settings.max_message_size,
        }
    }

    /// Handle one text frame and produce its response. Failures never
    /// escape: they become error responses echoing `action` and
    /// `requestId`.
    pub async fn dispatch(&self, session: &Arc<Session>, raw: &str) -> Response {
        if let Err(err) = validate_inbound(raw, self.max_message_size) {
            return Response::error("", None, &err);
        }
        let request = match parse_frame(raw) {
            Ok(frame) => frame,
            Err(err) => {
                let err = AppError::validation(format!("Malformed message: {err}"));
                return Response::error("", None, &err);
            }
        };
        let (action_name, request_id) = echo_fields(&request);
        let envelope = match InboundEnvelope::from_frame(&request) {
            Ok(envelope) => envelope,
            Err(err) => {
                let err = AppError::validation(format!("Malformed message: {err}"));
                return Response::error(action_name, request_id, &err);
            }
        };

        match self.route(session, &action_name, &request, &envelope).await {
            Ok(mut response) => {
                response.action = action_name;
                response.request_id = request_id;
                response
            }
            Err(err) => {
                if err.is_client_error() {
                    debug!(session_id = %session.id(), action = %action_name, error = %err, "Action rejected");
                } else {
                    warn!(session_id = %session.id(), action = %action_name, error = %err, "Action failed");
                }
                Response::error(action_name, request_id, &err)
            }
        }
    }

    async fn route(
        &self,
        session: &Arc<Session>,
        action_name: &str,
        request: &Value,
        envelope: &InboundEnvelope,
    ) -> AppResult<Response> {
        if action_name.is_empty() {
            return Err(AppError::validation("Action is required"));
        }
        let action: Action = action_name.parse()?;

        if !action.needs_auth() {
            return match action {
                Action::Authenticate => self.authenticate(session, envelope).await,
                Action::DeviceSave => self.device_save(envelope, request).await,
                _ => Err(AppError::internal(format!("No handler for '{action}'"))),
            };
        }

        let device = self.acting_device(session, envelope).await?;
        match action {
            Action::CommandInsert => self.command_insert(session, &device, request).await,
            Action::CommandUpdate => self.command_update(&device, request).await,
            Action::CommandSubscribe => self.command_subscribe(session, &device, request).await,
            Action::CommandUnsubscribe => self.command_unsubscribe(session, &device).await,
            Action::NotificationInsert => self.notification_insert(&device, request).await,
            Action::NotificationSubscribe => {
                self.notification_subscribe(session, &device, request).await
            }
            Action::NotificationUnsubscribe => {
                self.notification_unsubscribe(session, &device, request).await
            }
            Action::DeviceGet => self.device_get(&device, envelope).await,
            Action::ServerInfo => self.server_info(),
            Action::Authenticate | Action::DeviceSave => {
                Err(AppError::internal(format!("No handler for '{action}'")))
            }
        }
    }

    /// The bound device, or the device named by inline credentials.
    async fn acting_device(
        &self,
        session: &Session,
        envelope: &InboundEnvelope,
    ) -> AppResult<Device> {
        if let Some(device) = session.device() {
            return Ok(device.clone());
        }
        let (Some(guid), Some(key)) = (&envelope.device_id, &envelope.device_key) else {
            return Err(AppError::authorization("Not authorised"));
        };
        self.directory
            .authenticate(guid, key)
            .await
            .map_err(|err| match err.kind {
                hive_core::ErrorKind::Authentication => AppError::authorization("Not authorised"),
                _ => err,
            })
    }
}

/// Read an action's request struct from the frame.
fn parse_request<T: DeserializeOwned>(request: &Value) -> AppResult<T> {
    T::deserialize(request).map_err(|e| AppError::validation(format!("Malformed request: {e}")))
}
