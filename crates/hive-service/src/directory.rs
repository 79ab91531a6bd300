//! Device identity resolution and principal-scoped visibility.

use std::collections::HashMap;

use tracing::{debug, info};

use hive_core::result::AppResult;
use hive_core::traits::Repository;
use hive_core::AppError;
use hive_entity::repository::{DeviceRepository, UserRepository};
use hive_entity::{Device, Principal, Storage};

use crate::view::DeviceView;

/// Resolves device identity and credentials, and filters devices down to
/// what a principal may see.
#[derive(Debug, Clone)]
pub struct DeviceDirectory {
    storage: Storage,
}

impl DeviceDirectory {
    pub fn new(storage: Storage) -> Self {
        Self { storage }
    }

    /// Exact credential match by natural key.
    pub async fn authenticate(&self, guid: &str, key: &str) -> AppResult<Device> {
        self.storage
            .devices
            .find_by_guid_and_key(guid, key)
            .await?
            .ok_or_else(|| AppError::authentication("Invalid device credentials"))
    }

    pub async fn resolve(&self, guid: &str) -> AppResult<Device> {
        self.storage
            .devices
            .find_by_guid(guid)
            .await?
            .ok_or_else(|| AppError::not_found(format!("Device '{guid}' not found")))
    }

    /// Fetch each guid and keep what `principal` may see, as views.
    ///
    /// Guids that do not resolve are skipped.
    pub async fn list_visible(
        &self,
        guids: &[String],
        principal: &Principal,
    ) -> AppResult<Vec<DeviceView>> {
        let mut devices = Vec::with_capacity(guids.len());
        for guid in guids {
            if let Some(device) = self.storage.devices.find_by_guid(guid).await? {
                devices.push(device);
            }
        }

        let visible = self.filter_visible(devices, principal).await?;
        let mut views = Vec::with_capacity(visible.len());
        for device in visible {
            views.push(self.view(device).await?);
        }
        Ok(views)
    }

    /// Apply the visibility chain to already fetched devices.
    ///
    /// Order: user network grants (non-admin users and the owner of an
    /// access key), then access key permissions, then same-network
    /// restriction for device principals.
    pub async fn filter_visible(
        &self,
        mut devices: Vec<Device>,
        principal: &Principal,
    ) -> AppResult<Vec<Device>> {
        if let Some(user) = principal.user()
            && !user.is_admin()
        {
            let granted = match user.id {
                Some(id) => self.storage.users.networks_for_user(id).await?,
                None => Default::default(),
            };
            devices.retain(|d| d.network_id.is_some_and(|n| granted.contains(&n)));
        }

        if let Some(key) = principal.access_key() {
            for permission in &key.permissions {
                devices.retain(|d| permission.allows_device(&d.guid));
                devices.retain(|d| permission.allows_network(d.network_id));
            }
        }

        if let Some(me) = principal.device() {
            devices.retain(|d| d.guid == me.guid || me.shares_network_with(d));
        }

        debug!(principal = %principal.describe(), visible = devices.len(), "Visibility filter applied");
        Ok(devices)
    }

    /// Whether `principal` may see `device`.
    pub async fn is_visible(&self, device: &Device, principal: &Principal) -> AppResult<bool> {
        Ok(!self
            .filter_visible(vec![device.clone()], principal)
            .await?
            .is_empty())
    }

    /// Build a view with network and class re-resolved from storage.
    pub async fn view(&self, device: Device) -> AppResult<DeviceView> {
        let network = match device.network_id {
            Some(id) => self.storage.networks.find(id).await?,
            None => None,
        };
        let device_class = match device.device_class_id {
            Some(id) => self.storage.device_classes.find(id).await?,
            None => None,
        };
        Ok(DeviceView::new(device, network, device_class))
    }

    /// Set `status` on every existing device among `guids`. Returns how many
    /// were updated.
    pub async fn change_status(&self, status: &str, guids: &[String]) -> AppResult<usize> {
        let mut updated = 0;
        for guid in guids {
            if let Some(mut device) = self.storage.devices.find_by_guid(guid).await? {
                device.status = Some(status.to_string());
                self.storage.devices.persist(device).await?;
                updated += 1;
            }
        }
        info!(status, updated, "Device status changed");
        Ok(updated)
    }

    /// Offline timeout of each device's class, for devices that have one.
    pub async fn offline_timeouts(&self, guids: &[String]) -> AppResult<HashMap<String, i32>> {
        let mut timeouts = HashMap::new();
        for guid in guids {
            let Some(device) = self.storage.devices.find_by_guid(guid).await? else {
                continue;
            };
            let Some(class_id) = device.device_class_id else {
                continue;
            };
            if let Some(timeout) = self
                .storage
                .device_classes
                .find(class_id)
                .await?
                .and_then(|c| c.offline_timeout)
            {
                timeouts.insert(device.guid, timeout);
            }
        }
        Ok(timeouts)
    }
}
