//! Command repository.

use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use hive_core::result::AppResult;
use hive_core::traits::Repository;
use hive_entity::Command;
use hive_entity::repository::CommandRepository;

use crate::counters;
use crate::keyspace::Keyspace;

#[derive(Debug, Clone)]
pub struct KvCommandRepository {
    ks: Arc<Keyspace>,
}

impl KvCommandRepository {
    pub fn new(ks: Arc<Keyspace>) -> Self {
        Self { ks }
    }
}

#[async_trait]
impl Repository<Command, i64> for KvCommandRepository {
    async fn find(&self, id: i64) -> AppResult<Option<Command>> {
        Ok(self.ks.commands.get(&id).map(|c| c.value().clone()))
    }

    async fn persist(&self, mut entity: Command) -> AppResult<Command> {
        let id = self.ks.assign_id(counters::COMMAND, entity.id);
        entity.id = Some(id);
        self.ks.commands.insert(id, entity.clone());
        Ok(entity)
    }

    async fn delete(&self, id: i64) -> AppResult<bool> {
        Ok(self.ks.commands.remove(&id).is_some())
    }
}

#[async_trait]
impl CommandRepository for KvCommandRepository {
    async fn newer_than(&self, device_guid: &str, since: DateTime<Utc>) -> AppResult<Vec<Command>> {
        let mut found: Vec<Command> = self
            .ks
            .commands
            .iter()
            .filter(|e| e.value().device_guid == device_guid && e.value().timestamp > since)
            .map(|e| e.value().clone())
            .collect();
        found.sort_by(|a, b| a.timestamp.cmp(&b.timestamp).then(a.id.cmp(&b.id)));
        Ok(found)
    }
}
