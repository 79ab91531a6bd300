//! Fixtures shared by the realtime tests.

#![allow(dead_code)]

use std::sync::Arc;

use tokio::sync::mpsc::UnboundedReceiver;

use hive_core::traits::Repository;
use hive_entity::{Command, Device, Network, Notification, Storage};
use hive_kv::KvStore;
use hive_realtime::dispatcher::{Dispatcher, DispatcherSettings};
use hive_realtime::message::{OutboundMessage, PushMessage, Response};
use hive_realtime::{MessageBus, Session, SessionRegistry};

pub struct Harness {
    pub storage: Storage,
    pub bus: Arc<MessageBus>,
    pub sessions: SessionRegistry,
    pub dispatcher: Dispatcher,
}

impl Harness {
    pub fn new() -> Self {
        Self::with_storage(KvStore::new().storage())
    }

    pub fn with_storage(storage: Storage) -> Self {
        let bus = Arc::new(MessageBus::local(storage.clone()));
        let dispatcher = Dispatcher::new(
            storage.clone(),
            bus.clone(),
            DispatcherSettings {
                rest_server_url: Some("http://localhost:8080/api".into()),
                max_message_size: 4096,
                allow_network_autocreate: true,
            },
        );
        Self {
            storage,
            bus,
            sessions: SessionRegistry::new(),
            dispatcher,
        }
    }

    pub fn session(&self) -> (Arc<Session>, UnboundedReceiver<OutboundMessage>) {
        self.sessions.register()
    }

    /// Dispatch a JSON frame and return the response as JSON.
    pub async fn send(&self, session: &Arc<Session>, frame: serde_json::Value) -> serde_json::Value {
        let response: Response = self.dispatcher.dispatch(session, &frame.to_string()).await;
        serde_json::to_value(response).unwrap()
    }

    pub async fn network(&self, name: &str) -> Network {
        self.storage.networks.persist(Network::named(name)).await.unwrap()
    }

    pub async fn device(&self, guid: &str, network: Option<&Network>) -> Device {
        let mut device = Device::new(guid, format!("{guid}-key"), guid.to_uppercase());
        device.network_id = network.and_then(|n| n.id);
        self.storage.devices.persist(device).await.unwrap()
    }

    /// Persist a command for `guid` without publishing it.
    pub async fn stored_command(&self, guid: &str, name: &str) -> Command {
        self.storage
            .commands
            .persist(Command::new(guid, name))
            .await
            .unwrap()
    }

    pub async fn stored_notification(&self, guid: &str, name: &str) -> Notification {
        self.storage
            .notifications
            .persist(Notification::new(guid, name))
            .await
            .unwrap()
    }

    /// Persist and publish, the way the dispatcher does.
    pub async fn publish_command(&self, guid: &str, name: &str) -> Command {
        let command = self.stored_command(guid, name).await;
        self.bus.publish_command(&command).await.unwrap();
        command
    }
}

/// Everything currently queued for the socket writer.
pub fn drain(rx: &mut UnboundedReceiver<OutboundMessage>) -> Vec<OutboundMessage> {
    let mut out = Vec::new();
    while let Ok(message) = rx.try_recv() {
        out.push(message);
    }
    out
}

/// Ids of `command/insert` pushes currently queued.
pub fn command_ids(rx: &mut UnboundedReceiver<OutboundMessage>) -> Vec<i64> {
    drain(rx)
        .into_iter()
        .filter_map(|message| match message {
            OutboundMessage::Push(PushMessage::CommandInsert { command, .. }) => command.id,
            _ => None,
        })
        .collect()
}

/// Ids of `notification/insert` pushes currently queued.
pub fn notification_ids(rx: &mut UnboundedReceiver<OutboundMessage>) -> Vec<i64> {
    drain(rx)
        .into_iter()
        .filter_map(|message| match message {
            OutboundMessage::Push(PushMessage::NotificationInsert { notification, .. }) => {
                notification.id
            }
            _ => None,
        })
        .collect()
}
