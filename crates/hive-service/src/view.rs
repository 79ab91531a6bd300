//! Read models returned to clients.

use serde::Serialize;

use hive_entity::{Device, DeviceClass, Network};

/// A network as embedded in device views and REST responses.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NetworkView {
    pub id: Option<i64>,
    pub name: String,
    pub description: Option<String>,
}

impl From<Network> for NetworkView {
    fn from(network: Network) -> Self {
        Self {
            id: network.id,
            name: network.name,
            description: network.description,
        }
    }
}

/// A device with its network and class resolved to full records.
///
/// The device's guid is exposed as `id`; the storage id and the key never
/// leave the server.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DeviceView {
    #[serde(rename = "id")]
    pub guid: String,
    pub name: String,
    pub status: Option<String>,
    pub data: Option<serde_json::Value>,
    pub network: Option<NetworkView>,
    pub device_class: Option<DeviceClass>,
}

impl DeviceView {
    pub fn new(device: Device, network: Option<Network>, device_class: Option<DeviceClass>) -> Self {
        Self {
            guid: device.guid,
            name: device.name,
            status: device.status,
            data: device.data,
            network: network.map(NetworkView::from),
            device_class,
        }
    }
}
