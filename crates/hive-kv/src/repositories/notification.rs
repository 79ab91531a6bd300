//! Notification repository.

use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use hive_core::result::AppResult;
use hive_core::traits::Repository;
use hive_entity::Notification;
use hive_entity::repository::NotificationRepository;

use crate::counters;
use crate::keyspace::Keyspace;

#[derive(Debug, Clone)]
pub struct KvNotificationRepository {
    ks: Arc<Keyspace>,
}

impl KvNotificationRepository {
    pub fn new(ks: Arc<Keyspace>) -> Self {
        Self { ks }
    }
}

#[async_trait]
impl Repository<Notification, i64> for KvNotificationRepository {
    async fn find(&self, id: i64) -> AppResult<Option<Notification>> {
        Ok(self.ks.notifications.get(&id).map(|c| c.value().clone()))
    }

    async fn persist(&self, mut entity: Notification) -> AppResult<Notification> {
        let id = self.ks.assign_id(counters::NOTIFICATION, entity.id);
        entity.id = Some(id);
        self.ks.notifications.insert(id, entity.clone());
        Ok(entity)
    }

    async fn delete(&self, id: i64) -> AppResult<bool> {
        Ok(self.ks.notifications.remove(&id).is_some())
    }
}

#[async_trait]
impl NotificationRepository for KvNotificationRepository {
    async fn newer_than(&self, device_guid: &str, since: DateTime<Utc>) -> AppResult<Vec<Notification>> {
        let mut found: Vec<Notification> = self
            .ks
            .notifications
            .iter()
            .filter(|e| e.value().device_guid == device_guid && e.value().timestamp > since)
            .map(|e| e.value().clone())
            .collect();
        found.sort_by(|a, b| a.timestamp.cmp(&b.timestamp).then(a.id.cmp(&b.id)));
        Ok(found)
    }
}
