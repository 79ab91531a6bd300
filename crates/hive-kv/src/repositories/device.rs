//! Device repository: primary bucket plus guid secondary index.

use std::sync::Arc;

use async_trait::async_trait;
use dashmap::mapref::entry::Entry;
use tracing::debug;

use hive_core::result::AppResult;
use hive_core::traits::Repository;
use hive_core::types::{Page, Sort};
use hive_core::AppError;
use hive_entity::repository::DeviceRepository;
use hive_entity::{Device, DeviceFilter, DeviceSortField};

use super::ordered;
use crate::counters;
use crate::keyspace::Keyspace;

#[derive(Debug, Clone)]
pub struct KvDeviceRepository {
    ks: Arc<Keyspace>,
}

impl KvDeviceRepository {
    pub fn new(ks: Arc<Keyspace>) -> Self {
        Self { ks }
    }

    fn matches(&self, filter: &DeviceFilter, device: &Device) -> bool {
        if let Some(name) = &filter.name {
            if &device.name != name {
                return false;
            }
        } else if let Some(pattern) = &filter.name_pattern {
            if !pattern.is_match(&device.name) {
                return false;
            }
        }
        if filter.status.is_some() && device.status != filter.status {
            return false;
        }
        if filter.network_id.is_some() && device.network_id != filter.network_id {
            return false;
        }
        if let Some(network_name) = &filter.network_name {
            let wanted = self.ks.network_id_by_name(network_name);
            if wanted.is_none() || device.network_id != wanted {
                return false;
            }
        }
        if filter.device_class_id.is_some() && device.device_class_id != filter.device_class_id {
            return false;
        }
        if let Some(class_name) = &filter.device_class_name {
            let ids = self.ks.device_class_ids_by_name(class_name);
            if !device.device_class_id.is_some_and(|id| ids.contains(&id)) {
                return false;
            }
        }
        true
    }
}

#[async_trait]
impl Repository<Device, i64> for KvDeviceRepository {
    async fn find(&self, id: i64) -> AppResult<Option<Device>> {
        Ok(self.ks.devices.get(&id).map(|d| d.value().clone()))
    }

    async fn persist(&self, mut device: Device) -> AppResult<Device> {
        let previous_guid = device
            .id
            .and_then(|id| self.ks.devices.get(&id).map(|d| d.value().guid.clone()));

        if previous_guid.as_deref() != Some(device.guid.as_str()) {
            match self.ks.device_guids.entry(device.guid.clone()) {
                Entry::Occupied(taken) if Some(*taken.get()) != device.id => {
                    return Err(AppError::conflict(format!(
                        "Device with guid '{}' already exists",
                        device.guid
                    )));
                }
                Entry::Occupied(_) => {}
                Entry::Vacant(slot) => {
                    let id = self.ks.assign_id(counters::DEVICE, device.id);
                    device.id = Some(id);
                    slot.insert(id);
                }
            }
            if let Some(old) = previous_guid {
                self.ks.device_guids.remove(&old);
            }
        }

        let id = self.ks.assign_id(counters::DEVICE, device.id);
        device.id = Some(id);
        self.ks.devices.insert(id, device.clone());
        debug!(device_id = id, guid = %device.guid, "Device persisted");
        Ok(device)
    }

    async fn delete(&self, id: i64) -> AppResult<bool> {
        match self.ks.devices.remove(&id) {
            Some((_, device)) => {
                self.ks.device_guids.remove(&device.guid);
                Ok(true)
            }
            None => Ok(false),
        }
    }
}

#[async_trait]
impl DeviceRepository for KvDeviceRepository {
    async fn find_by_guid(&self, guid: &str) -> AppResult<Option<Device>> {
        let Some(id) = self.ks.device_guids.get(guid).map(|id| *id.value()) else {
            return Ok(None);
        };
        self.find(id).await
    }

    async fn find_by_guid_and_key(&self, guid: &str, key: &str) -> AppResult<Option<Device>> {
        Ok(self
            .find_by_guid(guid)
            .await?
            .filter(|device| device.key_matches(key)))
    }

    async fn list(
        &self,
        filter: &DeviceFilter,
        sort: Sort<DeviceSortField>,
        page: Page,
    ) -> AppResult<Vec<Device>> {
        let mut devices: Vec<Device> = Keyspace::scan(&self.ks.devices)
            .into_iter()
            .filter(|d| self.matches(filter, d))
            .collect();

        devices.sort_by(|a, b| match sort.field {
            DeviceSortField::Id => ordered((a.id, b.id), (a.id, b.id), sort.direction),
            DeviceSortField::Name => ordered((&a.name, &b.name), (a.id, b.id), sort.direction),
            DeviceSortField::Status => {
                ordered((&a.status, &b.status), (a.id, b.id), sort.direction)
            }
        });

        Ok(page.apply(devices))
    }

    async fn delete_by_guid(&self, guid: &str) -> AppResult<bool> {
        match self.ks.device_guids.remove(guid) {
            Some((_, id)) => Ok(self.ks.devices.remove(&id).is_some()),
            None => Ok(false),
        }
    }
}
