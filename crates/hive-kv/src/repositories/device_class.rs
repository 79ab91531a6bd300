//! Device class repository.

use std::sync::Arc;

use async_trait::async_trait;

use hive_core::result::AppResult;
use hive_core::traits::Repository;
use hive_entity::DeviceClass;
use hive_entity::repository::DeviceClassRepository;

use crate::counters;
use crate::keyspace::Keyspace;

#[derive(Debug, Clone)]
pub struct KvDeviceClassRepository {
    ks: Arc<Keyspace>,
}

impl KvDeviceClassRepository {
    pub fn new(ks: Arc<Keyspace>) -> Self {
        Self { ks }
    }
}

#[async_trait]
impl Repository<DeviceClass, i64> for KvDeviceClassRepository {
    async fn find(&self, id: i64) -> AppResult<Option<DeviceClass>> {
        Ok(self.ks.device_classes.get(&id).map(|c| c.value().clone()))
    }

    async fn persist(&self, mut class: DeviceClass) -> AppResult<DeviceClass> {
        let id = self.ks.assign_id(counters::DEVICE_CLASS, class.id);
        class.id = Some(id);
        self.ks.device_classes.insert(id, class.clone());
        Ok(class)
    }

    async fn delete(&self, id: i64) -> AppResult<bool> {
        Ok(self.ks.device_classes.remove(&id).is_some())
    }
}

#[async_trait]
impl DeviceClassRepository for KvDeviceClassRepository {
    async fn find_by_name_and_version(
        &self,
        name: &str,
        version: &str,
    ) -> AppResult<Option<DeviceClass>> {
        Ok(self
            .ks
            .device_classes
            .iter()
            .find(|c| c.value().name == name && c.value().version == version)
            .map(|c| c.value().clone()))
    }
}
