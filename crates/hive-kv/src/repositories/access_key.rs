//! Access key repository.

use std::sync::Arc;

use async_trait::async_trait;

use hive_core::result::AppResult;
use hive_core::traits::Repository;
use hive_entity::AccessKey;
use hive_entity::repository::AccessKeyRepository;

use crate::counters;
use crate::keyspace::Keyspace;

#[derive(Debug, Clone)]
pub struct KvAccessKeyRepository {
    ks: Arc<Keyspace>,
}

impl KvAccessKeyRepository {
    pub fn new(ks: Arc<Keyspace>) -> Self {
        Self { ks }
    }
}

#[async_trait]
impl Repository<AccessKey, i64> for KvAccessKeyRepository {
    async fn find(&self, id: i64) -> AppResult<Option<AccessKey>> {
        Ok(self.ks.access_keys.get(&id).map(|k| k.value().clone()))
    }

    async fn persist(&self, mut key: AccessKey) -> AppResult<AccessKey> {
        let id = self.ks.assign_id(counters::ACCESS_KEY, key.id);
        key.id = Some(id);
        self.ks.access_keys.insert(id, key.clone());
        Ok(key)
    }

    async fn delete(&self, id: i64) -> AppResult<bool> {
        Ok(self.ks.access_keys.remove(&id).is_some())
    }
}

#[async_trait]
impl AccessKeyRepository for KvAccessKeyRepository {
    async fn find_by_key(&self, key: &str) -> AppResult<Option<AccessKey>> {
        Ok(self
            .ks
            .access_keys
            .iter()
            .find(|k| k.value().key == key)
            .map(|k| k.value().clone()))
    }
}
