//! The message bus: topic → subscribed sessions.
//!
//! The topic map is a sharded concurrent map shared by every worker.
//! Per-session subscription state is only mutated under that session's own
//! lock, and a shard guard is never held across an `.await` or while a
//! session lock is taken, so no lock ordering between sessions exists.
//!
//! Subscribing registers the session first and then replays history while
//! still holding the session lock. A publish that raced the registration
//! waits on that lock, and the per-subscription delivered-id set drops
//! whatever the replay already enqueued, so replay and live traffic
//! together never produce a gap or a duplicate.

use std::collections::HashMap;
use std::future::Future;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use dashmap::DashMap;
use tracing::{debug, warn};

use hive_core::AppError;
use hive_core::result::AppResult;
use hive_entity::repository::{CommandRepository, NotificationRepository};
use hive_entity::{Command, Notification, Storage};

use super::publisher::{ExternalPublisher, NoopPublisher};
use super::topic::Topic;
use crate::message::PushMessage;
use crate::message::views::{CommandView, NotificationView};
use crate::session::{Session, SessionId};

/// Shared subscription map and delivery logic.
#[derive(Debug)]
pub struct MessageBus {
    topics: DashMap<Topic, HashMap<SessionId, Arc<Session>>>,
    storage: Storage,
    publisher: Arc<dyn ExternalPublisher>,
}

impl MessageBus {
    pub fn new(storage: Storage, publisher: Arc<dyn ExternalPublisher>) -> Self {
        Self {
            topics: DashMap::new(),
            storage,
            publisher,
        }
    }

    /// A bus that never leaves this process.
    pub fn local(storage: Storage) -> Self {
        Self::new(storage, Arc::new(NoopPublisher))
    }

    /// Subscribe `session` to commands for `guid`, replaying those created
    /// strictly after `since`.
    ///
    /// Returns `true` when the topic was newly added to the session.
    pub async fn subscribe_commands(
        &self,
        session: &Arc<Session>,
        guid: &str,
        since: DateTime<Utc>,
    ) -> AppResult<bool> {
        let topic = Topic::DeviceCommands(guid.to_string());
        let commands = self.storage.commands.clone();
        let guid = guid.to_string();
        self.subscribe_replaying(session, topic, || async move {
            let history = commands.newer_than(&guid, since).await?;
            Ok(history
                .iter()
                .filter_map(|command| command.id.map(|id| (id, command_push(command))))
                .collect())
        })
        .await
    }

    /// Subscribe `session` to notifications of `guid`, replaying those
    /// created strictly after `since`.
    pub async fn subscribe_notifications(
        &self,
        session: &Arc<Session>,
        guid: &str,
        since: DateTime<Utc>,
    ) -> AppResult<bool> {
        let topic = Topic::DeviceNotifications(guid.to_string());
        let notifications = self.storage.notifications.clone();
        let guid = guid.to_string();
        self.subscribe_replaying(session, topic, || async move {
            let history = notifications.newer_than(&guid, since).await?;
            Ok(history
                .iter()
                .filter_map(|n| n.id.map(|id| (id, notification_push(n))))
                .collect())
        })
        .await
    }

    /// Subscribe `session` to updates of one command. No history.
    pub async fn subscribe_command_updates(
        &self,
        session: &Arc<Session>,
        command_id: i64,
    ) -> AppResult<bool> {
        self.subscribe_replaying(session, Topic::CommandUpdates(command_id), || async {
            Ok(Vec::new())
        })
        .await
    }

    async fn subscribe_replaying<F, Fut>(
        &self,
        session: &Arc<Session>,
        topic: Topic,
        replay: F,
    ) -> AppResult<bool>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = AppResult<Vec<(i64, PushMessage)>>>,
    {
        let mut subscriptions = session.lock_subscriptions().await;
        if session.is_closed() {
            return Err(AppError::validation("Session is closed"));
        }

        let added = subscriptions.insert(topic.clone());
        self.attach(&topic, session);

        let history = match replay().await {
            Ok(history) => history,
            Err(err) => {
                if added {
                    subscriptions.remove(&topic);
                    self.detach(&topic, &session.id());
                }
                warn!(session_id = %session.id(), %topic, "Subscription rolled back");
                return Err(err);
            }
        };

        let mut replayed = 0;
        for (id, message) in history {
            if subscriptions.mark_replayed(&topic, id) && session.enqueue(message) {
                replayed += 1;
            }
        }
        drop(subscriptions);

        debug!(session_id = %session.id(), %topic, replayed, "Subscribed");
        session.drain_and_notify();
        Ok(added)
    }

    /// Remove one subscription. Returns `false` if it did not exist.
    pub async fn unsubscribe(&self, topic: &Topic, session: &Arc<Session>) -> bool {
        let mut subscriptions = session.lock_subscriptions().await;
        let removed = subscriptions.remove(topic);
        self.detach(topic, &session.id());
        drop(subscriptions);

        if removed {
            debug!(session_id = %session.id(), %topic, "Unsubscribed");
        }
        removed
    }

    /// Drop every subscription of a session, typically after close.
    pub async fn release(&self, session: &Arc<Session>) {
        let mut subscriptions = session.lock_subscriptions().await;
        let topics = subscriptions.drain();
        for topic in &topics {
            self.detach(topic, &session.id());
        }
        drop(subscriptions);
        debug!(session_id = %session.id(), released = topics.len(), "Subscriptions released");
    }

    /// Deliver a persisted command to its device's subscribers.
    pub async fn publish_command(&self, command: &Command) -> AppResult<usize> {
        let id = persisted_id(command.id, "command")?;
        let topic = Topic::DeviceCommands(command.device_guid.clone());
        Ok(self.publish(topic, id, command_push(command)).await)
    }

    /// Deliver a persisted notification to its device's subscribers.
    pub async fn publish_notification(&self, notification: &Notification) -> AppResult<usize> {
        let id = persisted_id(notification.id, "notification")?;
        let topic = Topic::DeviceNotifications(notification.device_guid.clone());
        Ok(self.publish(topic, id, notification_push(notification)).await)
    }

    /// Deliver a command's new status/result to its update subscribers.
    pub async fn publish_command_update(&self, command: &Command) -> AppResult<usize> {
        let id = persisted_id(command.id, "command")?;
        let message = PushMessage::CommandUpdate {
            command: CommandView::from(command),
        };
        Ok(self.publish(Topic::CommandUpdates(id), id, message).await)
    }

    async fn publish(&self, topic: Topic, id: i64, message: PushMessage) -> usize {
        let subscribers = self.subscribers(&topic);
        let mut delivered = 0;
        for session in &subscribers {
            if self.deliver(session, &topic, id, message.clone()).await {
                delivered += 1;
            }
        }
        debug!(%topic, id, subscribers = subscribers.len(), delivered, "Published");

        match serde_json::to_value(&message) {
            Ok(payload) => {
                if let Err(err) = self.publisher.publish(&topic, &payload).await {
                    warn!(%topic, error = %err, "External publish failed");
                }
            }
            Err(err) => warn!(%topic, error = %err, "External payload serialization failed"),
        }
        delivered
    }

    async fn deliver(&self, session: &Arc<Session>, topic: &Topic, id: i64, message: PushMessage) -> bool {
        let mut subscriptions = session.lock_subscriptions().await;
        if !subscriptions.contains(topic) {
            return false;
        }
        if topic.dedupes() && !subscriptions.mark_delivered(topic, id) {
            return false;
        }
        let queued = session.enqueue(message);
        drop(subscriptions);

        session.drain_and_notify();
        queued
    }

    fn attach(&self, topic: &Topic, session: &Arc<Session>) {
        self.topics
            .entry(topic.clone())
            .or_default()
            .insert(session.id(), session.clone());
    }

    fn detach(&self, topic: &Topic, session_id: &SessionId) {
        self.topics.remove_if_mut(topic, |_, sessions| {
            sessions.remove(session_id);
            sessions.is_empty()
        });
    }

    /// Snapshot of a topic's subscribers.
    pub fn subscribers(&self, topic: &Topic) -> Vec<Arc<Session>> {
        self.topics
            .get(topic)
            .map(|sessions| sessions.values().cloned().collect())
            .unwrap_or_default()
    }

    pub fn subscriber_count(&self, topic: &Topic) -> usize {
        self.topics.get(topic).map(|s| s.len()).unwrap_or(0)
    }

    /// Number of topics with at least one subscriber.
    pub fn topic_count(&self) -> usize {
        self.topics.len()
    }
}

fn persisted_id(id: Option<i64>, entity: &str) -> AppResult<i64> {
    id.ok_or_else(|| AppError::internal(format!("Cannot publish an unsaved {entity}")))
}

fn command_push(command: &Command) -> PushMessage {
    PushMessage::CommandInsert {
        device_guid: command.device_guid.clone(),
        command: CommandView::from(command),
    }
}

fn notification_push(notification: &Notification) -> PushMessage {
    PushMessage::NotificationInsert {
        device_guid: notification.device_guid.clone(),
        notification: NotificationView::from(notification),
    }
}
