//! Action handlers. Each returns a success response whose `action` and
//! `requestId` are filled in by the dispatcher.

use std::sync::Arc;

use chrono::{SubsecRound, Utc};
use serde_json::Value;
use tracing::info;

use hive_core::AppError;
use hive_core::result::AppResult;
use hive_entity::{Device, Principal};
use hive_service::DeviceRegistration;

use super::{Dispatcher, parse_request};
use crate::bus::Topic;
use crate::message::types::{
    CommandInsertRequest, CommandUpdateRequest, DeviceSaveRequest, NotificationInsertRequest,
    SubscribeRequest,
};
use crate::message::validator::parse_timestamp;
use crate::message::views::{Created, ServerInfo};
use crate::message::{InboundEnvelope, Response};
use crate::session::Session;

fn ok() -> Response {
    Response::success(String::new(), None)
}

impl Dispatcher {
    pub(super) async fn authenticate(
        &self,
        session: &Session,
        envelope: &InboundEnvelope,
    ) -> AppResult<Response> {
        let (Some(guid), Some(key)) = (&envelope.device_id, &envelope.device_key) else {
            return Err(AppError::authentication("Device id and key are required"));
        };
        let device = self.directory.authenticate(guid, key).await?;
        session.bind_device(device)?;
        info!(session_id = %session.id(), guid, "Device authenticated");
        Ok(ok())
    }

    pub(super) async fn device_save(
        &self,
        envelope: &InboundEnvelope,
        request: &Value,
    ) -> AppResult<Response> {
        let guid = envelope
            .device_id
            .as_deref()
            .filter(|g| !g.is_empty())
            .ok_or_else(|| AppError::validation("Device ID is empty"))?;
        let device_key = envelope
            .device_key
            .as_deref()
            .ok_or_else(|| AppError::validation("Device key is empty"))?;
        let DeviceSaveRequest { device } = parse_request(request)?;
        let payload = device.ok_or_else(|| AppError::validation("Device is empty"))?;

        let registration = DeviceRegistration {
            name: payload.name,
            key: payload.key,
            status: payload.status,
            data: payload.data,
            network: payload.network,
            device_class: payload.device_class,
            equipment: payload.equipment.unwrap_or_default().into_iter().flatten().collect(),
        };
        let saved = self.devices.save_device(guid, device_key, registration).await?;
        info!(guid = %saved.guid, id = ?saved.id, "Device saved");
        Ok(ok())
    }

    pub(super) async fn command_insert(
        &self,
        session: &Arc<Session>,
        sender: &Device,
        request: &Value,
    ) -> AppResult<Response> {
        let CommandInsertRequest {
            device_guid,
            command,
        } = parse_request(request)?;
        let guid = device_guid.ok_or_else(|| AppError::validation("Device guid is required"))?;
        let draft = command.ok_or_else(|| AppError::validation("Command is required"))?;
        if draft.command.as_deref().is_none_or(str::is_empty) {
            return Err(AppError::validation("Command name is required"));
        }

        let target = self.visible_device(sender, &guid).await?;
        let command = self.devices.create_command(&target, draft, None).await?;
        self.bus.publish_command(&command).await?;
        if let Some(id) = command.id {
            self.bus.subscribe_command_updates(session, id).await?;
        }
        ok().with("command", Created::from(&command))
    }

    pub(super) async fn command_update(
        &self,
        device: &Device,
        request: &Value,
    ) -> AppResult<Response> {
        let CommandUpdateRequest {
            command_id,
            command,
        } = parse_request(request)?;
        let id =
            command_id.ok_or_else(|| AppError::validation("Device command identifier cannot be null"))?;
        let update = command.ok_or_else(|| AppError::validation("Command update cannot be null"))?;

        let updated = self.devices.update_command(device, id, update).await?;
        self.bus.publish_command_update(&updated).await?;
        Ok(ok())
    }

    pub(super) async fn command_subscribe(
        &self,
        session: &Arc<Session>,
        device: &Device,
        request: &Value,
    ) -> AppResult<Response> {
        let SubscribeRequest { timestamp, .. } = parse_request(request)?;
        let since = match timestamp {
            Some(raw) => parse_timestamp(&raw)?,
            None => Utc::now().trunc_subsecs(6),
        };
        self.bus.subscribe_commands(session, &device.guid, since).await?;
        Ok(ok())
    }

    pub(super) async fn command_unsubscribe(
        &self,
        session: &Arc<Session>,
        device: &Device,
    ) -> AppResult<Response> {
        self.bus
            .unsubscribe(&Topic::DeviceCommands(device.guid.clone()), session)
            .await;
        Ok(ok())
    }

    pub(super) async fn notification_insert(
        &self,
        device: &Device,
        request: &Value,
    ) -> AppResult<Response> {
        let NotificationInsertRequest { notification } = parse_request(request)?;
        let payload =
            notification.ok_or_else(|| AppError::validation("Notification is required"))?;

        let notification = self
            .devices
            .create_notification(device, payload.notification, payload.parameters)
            .await?;
        self.bus.publish_notification(&notification).await?;
        ok().with("notification", Created::from(&notification))
    }

    pub(super) async fn notification_subscribe(
        &self,
        session: &Arc<Session>,
        device: &Device,
        request: &Value,
    ) -> AppResult<Response> {
        let SubscribeRequest {
            timestamp,
            device_guids,
        } = parse_request(request)?;
        let since = match timestamp {
            Some(raw) => parse_timestamp(&raw)?,
            None => Utc::now().trunc_subsecs(6),
        };
        let guids = self.visible_guids(device, device_guids).await?;
        let mut added = Vec::new();
        for guid in &guids {
            match self.bus.subscribe_notifications(session, guid, since).await {
                Ok(true) => added.push(guid.clone()),
                Ok(false) => {}
                Err(err) => {
                    // All or nothing: drop what this request registered.
                    for guid in added {
                        self.bus
                            .unsubscribe(&Topic::DeviceNotifications(guid), session)
                            .await;
                    }
                    return Err(err);
                }
            }
        }
        ok().with("deviceGuids", guids)
    }

    pub(super) async fn notification_unsubscribe(
        &self,
        session: &Arc<Session>,
        device: &Device,
        request: &Value,
    ) -> AppResult<Response> {
        let SubscribeRequest { device_guids, .. } = parse_request(request)?;
        let guids = device_guids.unwrap_or_else(|| vec![device.guid.clone()]);
        for guid in guids {
            self.bus
                .unsubscribe(&Topic::DeviceNotifications(guid), session)
                .await;
        }
        Ok(ok())
    }

    pub(super) async fn device_get(
        &self,
        device: &Device,
        envelope: &InboundEnvelope,
    ) -> AppResult<Response> {
        let guid = envelope
            .device_id
            .clone()
            .unwrap_or_else(|| device.guid.clone());
        let principal = Principal::Device(device.clone());
        let view = self
            .directory
            .list_visible(&[guid.clone()], &principal)
            .await?
            .into_iter()
            .next()
            .ok_or_else(|| AppError::not_found(format!("Device '{guid}' not found")))?;
        ok().with("device", view)
    }

    pub(super) fn server_info(&self) -> AppResult<Response> {
        let info = ServerInfo {
            api_version: env!("CARGO_PKG_VERSION").to_string(),
            server_timestamp: Utc::now(),
            rest_server_url: self.rest_server_url.clone(),
        };
        ok().with("info", info)
    }

    /// Resolve `guid` and check `viewer` may see it. Invisible devices are
    /// reported exactly like missing ones.
    async fn visible_device(&self, viewer: &Device, guid: &str) -> AppResult<Device> {
        let target = self.directory.resolve(guid).await?;
        let principal = Principal::Device(viewer.clone());
        if !self.directory.is_visible(&target, &principal).await? {
            return Err(AppError::not_found(format!("Device '{guid}' not found")));
        }
        Ok(target)
    }

    /// The requested guids, defaulting to the viewer itself. Every one must
    /// be visible.
    async fn visible_guids(
        &self,
        viewer: &Device,
        requested: Option<Vec<String>>,
    ) -> AppResult<Vec<String>> {
        let requested = match requested {
            Some(guids) if !guids.is_empty() => guids,
            _ => return Ok(vec![viewer.guid.clone()]),
        };
        let mut guids = Vec::with_capacity(requested.len());
        for guid in requested {
            if guid != viewer.guid {
                self.visible_device(viewer, &guid).await?;
            }
            if !guids.contains(&guid) {
                guids.push(guid);
            }
        }
        Ok(guids)
    }
}
