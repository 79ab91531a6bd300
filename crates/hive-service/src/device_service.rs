//! Device registration, command and notification persistence.

use serde::Deserialize;
use tracing::{info, warn};

use hive_core::result::AppResult;
use hive_core::traits::Repository;
use hive_core::AppError;
use hive_entity::repository::{DeviceClassRepository, DeviceRepository, NetworkRepository};
use hive_entity::{
    Command, CommandUpdate, Device, DeviceClass, Equipment, Network, Notification, Storage,
};

/// Network reference inside a device registration: by id, or by name.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NetworkRef {
    pub id: Option<i64>,
    pub name: Option<String>,
    pub key: Option<String>,
    pub description: Option<String>,
}

/// Version assigned to a device class registered without one.
pub const DEFAULT_CLASS_VERSION: &str = "1.0";

/// Device class reference inside a device registration.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeviceClassRef {
    pub name: Option<String>,
    pub version: Option<String>,
    pub is_permanent: Option<bool>,
    pub offline_timeout: Option<i32>,
    pub data: Option<serde_json::Value>,
}

/// A device as submitted for registration.
#[derive(Debug, Clone, Default)]
pub struct DeviceRegistration {
    pub name: Option<String>,
    pub key: Option<String>,
    pub status: Option<String>,
    pub data: Option<serde_json::Value>,
    pub network: Option<NetworkRef>,
    pub device_class: Option<DeviceClassRef>,
    pub equipment: Vec<Equipment>,
}

impl DeviceRegistration {
    /// Check required fields. Runs before any storage access.
    ///
    /// Only presence is checked; the class may omit its name and version.
    pub fn validate(&self) -> AppResult<()> {
        if self.name.is_none() {
            return Err(AppError::validation("Device name is empty"));
        }
        if self.key.is_none() {
            return Err(AppError::validation("Device key is empty"));
        }
        if self.device_class.is_none() {
            return Err(AppError::validation("Device class is empty"));
        }
        Ok(())
    }
}

/// A new command before persistence.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CommandDraft {
    pub command: Option<String>,
    pub parameters: Option<serde_json::Value>,
    pub lifetime: Option<i32>,
    pub status: Option<String>,
    pub result: Option<serde_json::Value>,
}

/// Device-side domain operations.
#[derive(Debug, Clone)]
pub struct DeviceService {
    storage: Storage,
    allow_network_autocreate: bool,
}

impl DeviceService {
    pub fn new(storage: Storage, allow_network_autocreate: bool) -> Self {
        Self {
            storage,
            allow_network_autocreate,
        }
    }

    /// Register or update the device `guid`.
    ///
    /// An existing device is only updated when `device_key` matches its
    /// stored key.
    pub async fn save_device(
        &self,
        guid: &str,
        device_key: &str,
        registration: DeviceRegistration,
    ) -> AppResult<Device> {
        registration.validate()?;

        let existing = self.storage.devices.find_by_guid(guid).await?;
        if let Some(device) = &existing
            && !device.key_matches(device_key)
        {
            warn!(guid, "Device save rejected: key mismatch");
            return Err(AppError::authentication("Invalid device credentials"));
        }

        // A network reference with neither id nor name leaves the network as is.
        let network_id = match &registration.network {
            Some(reference) if reference.id.is_some() || reference.name.is_some() => {
                self.resolve_network(reference).await?.id
            }
            _ => existing.as_ref().and_then(|d| d.network_id),
        };
        let device_name = registration.name.clone().unwrap_or_default();
        let current_class = existing.as_ref().and_then(|d| d.device_class_id);
        let class = match &registration.device_class {
            Some(reference) => {
                self.resolve_class(reference, current_class, &device_name, registration.equipment)
                    .await?
            }
            None => return Err(AppError::validation("Device class is empty")),
        };

        let mut device = existing.unwrap_or_else(|| Device::new(guid, "", ""));
        device.name = registration.name.unwrap_or_default();
        device.key = registration.key.unwrap_or_default();
        if registration.status.is_some() {
            device.status = registration.status;
        }
        if registration.data.is_some() {
            device.data = registration.data;
        }
        device.network_id = network_id;
        device.device_class_id = class.id;

        let saved = self.storage.devices.persist(device).await?;
        info!(guid, device_id = ?saved.id, "Device saved");
        Ok(saved)
    }

    async fn resolve_network(&self, reference: &NetworkRef) -> AppResult<Network> {
        let found = match (reference.id, &reference.name) {
            (Some(id), _) => self.storage.networks.find(id).await?,
            (None, Some(name)) => self.storage.networks.find_by_name(name).await?,
            (None, None) => return Err(AppError::validation("Network id or name is required")),
        };

        match found {
            Some(network) => {
                if let Some(stored_key) = &network.key
                    && reference.key.as_ref() != Some(stored_key)
                {
                    return Err(AppError::authorization("Invalid network key"));
                }
                Ok(network)
            }
            None => match &reference.name {
                Some(name) if reference.id.is_none() && self.allow_network_autocreate => {
                    let network = Network {
                        id: None,
                        name: name.clone(),
                        key: reference.key.clone(),
                        description: reference.description.clone(),
                    };
                    let created = self.storage.networks.persist(network).await?;
                    info!(network_id = ?created.id, name = %created.name, "Network created on device registration");
                    Ok(created)
                }
                _ => Err(AppError::not_found("Network not found")),
            },
        }
    }

    /// Find or create the class named by `reference`. A reference without
    /// a name keeps the device's current class, or names a new class after
    /// the device.
    async fn resolve_class(
        &self,
        reference: &DeviceClassRef,
        current_class: Option<i64>,
        device_name: &str,
        equipment: Vec<Equipment>,
    ) -> AppResult<DeviceClass> {
        let version = reference
            .version
            .clone()
            .unwrap_or_else(|| DEFAULT_CLASS_VERSION.to_string());

        let (name, found) = match (&reference.name, current_class) {
            (Some(name), _) => (
                name.clone(),
                self.storage
                    .device_classes
                    .find_by_name_and_version(name, &version)
                    .await?,
            ),
            (None, Some(id)) => match self.storage.device_classes.find(id).await? {
                Some(class) => (class.name.clone(), Some(class)),
                None => (device_name.to_string(), None),
            },
            (None, None) => {
                let found = self
                    .storage
                    .device_classes
                    .find_by_name_and_version(device_name, &version)
                    .await?;
                (device_name.to_string(), found)
            }
        };

        match found {
            Some(class) if class.is_permanent => Ok(class),
            Some(mut class) => {
                if let Some(permanent) = reference.is_permanent {
                    class.is_permanent = permanent;
                }
                if reference.offline_timeout.is_some() {
                    class.offline_timeout = reference.offline_timeout;
                }
                if reference.data.is_some() {
                    class.data = reference.data.clone();
                }
                if !equipment.is_empty() {
                    class.equipment = equipment;
                }
                self.storage.device_classes.persist(class).await
            }
            None => {
                let class = DeviceClass {
                    id: None,
                    name,
                    version,
                    is_permanent: reference.is_permanent.unwrap_or(false),
                    offline_timeout: reference.offline_timeout,
                    data: reference.data.clone(),
                    equipment,
                };
                self.storage.device_classes.persist(class).await
            }
        }
    }

    /// Create a command for `device`.
    pub async fn create_command(
        &self,
        device: &Device,
        draft: CommandDraft,
        user_id: Option<i64>,
    ) -> AppResult<Command> {
        let name = draft
            .command
            .filter(|c| !c.is_empty())
            .ok_or_else(|| AppError::validation("Command name is required"))?;

        let mut command = Command::new(device.guid.clone(), name);
        command.parameters = draft.parameters;
        command.lifetime = draft.lifetime;
        command.user_id = user_id;
        command.status = draft.status;
        command.result = draft.result;
        self.storage.commands.persist(command).await
    }

    /// Apply a status/result update to a command of `device`.
    ///
    /// Commands addressed to another device are reported as not found.
    pub async fn update_command(
        &self,
        device: &Device,
        command_id: i64,
        update: CommandUpdate,
    ) -> AppResult<Command> {
        let mut command = self
            .storage
            .commands
            .find(command_id)
            .await?
            .filter(|c| c.device_guid == device.guid)
            .ok_or_else(|| AppError::not_found(format!("Command {command_id} not found")))?;

        command.apply(update);
        self.storage.commands.persist(command).await
    }

    /// Persist a notification emitted by `device`, stamped by the server.
    pub async fn create_notification(
        &self,
        device: &Device,
        name: Option<String>,
        parameters: Option<serde_json::Value>,
    ) -> AppResult<Notification> {
        let name = name
            .filter(|n| !n.is_empty())
            .ok_or_else(|| AppError::validation("Notification name is required"))?;

        let mut notification = Notification::new(device.guid.clone(), name);
        notification.parameters = parameters;
        self.storage.notifications.persist(notification).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn registration() -> DeviceRegistration {
        DeviceRegistration {
            name: Some("Lamp".into()),
            key: Some("key".into()),
            device_class: Some(DeviceClassRef {
                name: Some("Light".into()),
                version: Some("1".into()),
                ..Default::default()
            }),
            ..Default::default()
        }
    }

    #[test]
    fn test_validate_requires_name_key_and_class() {
        assert!(registration().validate().is_ok());

        let mut missing = registration();
        missing.name = None;
        assert!(missing.validate().is_err());

        let mut missing = registration();
        missing.key = None;
        assert!(missing.validate().is_err());

        let mut missing = registration();
        missing.device_class = None;
        assert!(missing.validate().is_err());
    }

    #[test]
    fn test_class_without_name_or_version_is_accepted() {
        let mut reg = registration();
        reg.device_class = Some(DeviceClassRef::default());
        reg.name = Some(String::new());
        assert!(reg.validate().is_ok());
    }
}
