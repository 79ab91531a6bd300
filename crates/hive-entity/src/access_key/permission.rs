//! Access key permission scopes.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};

/// Action names checked against access key permissions.
pub mod actions {
    pub const GET_NETWORK: &str = "GetNetwork";
    pub const MANAGE_NETWORK: &str = "ManageNetwork";
    pub const GET_DEVICE: &str = "GetDevice";
    pub const REGISTER_DEVICE: &str = "RegisterDevice";
    pub const GET_DEVICE_COMMAND: &str = "GetDeviceCommand";
    pub const CREATE_DEVICE_COMMAND: &str = "CreateDeviceCommand";
    pub const UPDATE_DEVICE_COMMAND: &str = "UpdateDeviceCommand";
    pub const GET_DEVICE_NOTIFICATION: &str = "GetDeviceNotification";
    pub const CREATE_DEVICE_NOTIFICATION: &str = "CreateDeviceNotification";
}

/// One permission entry of an access key.
///
/// Each scope is optional; an absent or empty set places no restriction on
/// that dimension.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AccessKeyPermission {
    pub actions: Option<HashSet<String>>,
    pub network_ids: Option<HashSet<i64>>,
    pub device_guids: Option<HashSet<String>>,
}

fn unrestricted<T>(set: &Option<HashSet<T>>) -> bool {
    set.as_ref().is_none_or(|s| s.is_empty())
}

impl AccessKeyPermission {
    pub fn allows_action(&self, action: &str) -> bool {
        unrestricted(&self.actions) || self.actions.as_ref().is_some_and(|a| a.contains(action))
    }

    pub fn allows_network(&self, network_id: Option<i64>) -> bool {
        if unrestricted(&self.network_ids) {
            return true;
        }
        match (network_id, &self.network_ids) {
            (Some(id), Some(ids)) => ids.contains(&id),
            _ => false,
        }
    }

    pub fn allows_device(&self, guid: &str) -> bool {
        unrestricted(&self.device_guids)
            || self.device_guids.as_ref().is_some_and(|g| g.contains(guid))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_sets_are_unrestricted() {
        let permission = AccessKeyPermission {
            actions: Some(HashSet::new()),
            network_ids: Some(HashSet::new()),
            device_guids: None,
        };
        assert!(permission.allows_action(actions::MANAGE_NETWORK));
        assert!(permission.allows_network(None));
        assert!(permission.allows_device("anything"));
    }

    #[test]
    fn test_network_scope_excludes_network_less_devices() {
        let permission = AccessKeyPermission {
            network_ids: Some(HashSet::from([1, 2])),
            ..Default::default()
        };
        assert!(permission.allows_network(Some(2)));
        assert!(!permission.allows_network(Some(3)));
        assert!(!permission.allows_network(None));
    }
}
