//! The authenticated identity behind a request or session.

use std::fmt;

use crate::access_key::{AccessKey, actions};
use crate::device::Device;
use crate::user::User;

/// Coarse role of a principal, used by endpoint role checks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PrincipalRole {
    Admin,
    Client,
    Key,
    Device,
}

impl fmt::Display for PrincipalRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Admin => "ADMIN",
            Self::Client => "CLIENT",
            Self::Key => "KEY",
            Self::Device => "DEVICE",
        };
        f.write_str(name)
    }
}

/// Who is acting.
#[derive(Debug, Clone)]
pub enum Principal {
    User(User),
    AccessKey { key: AccessKey, user: User },
    Device(Device),
}

impl Principal {
    pub fn role(&self) -> PrincipalRole {
        match self {
            Self::User(user) if user.is_admin() => PrincipalRole::Admin,
            Self::User(_) => PrincipalRole::Client,
            Self::AccessKey { .. } => PrincipalRole::Key,
            Self::Device(_) => PrincipalRole::Device,
        }
    }

    /// The user whose network grants bound visibility: the user itself, or
    /// the owner of an access key.
    pub fn user(&self) -> Option<&User> {
        match self {
            Self::User(user) | Self::AccessKey { user, .. } => Some(user),
            Self::Device(_) => None,
        }
    }

    pub fn access_key(&self) -> Option<&AccessKey> {
        match self {
            Self::AccessKey { key, .. } => Some(key),
            _ => None,
        }
    }

    pub fn device(&self) -> Option<&Device> {
        match self {
            Self::Device(device) => Some(device),
            _ => None,
        }
    }

    /// Whether network visibility is unrestricted by user grants.
    pub fn is_admin(&self) -> bool {
        self.user().is_some_and(User::is_admin)
    }

    /// Whether the principal may perform `action`.
    ///
    /// Admins may do anything, clients anything but network management,
    /// keys whatever one of their permissions allows. Devices carry no
    /// REST actions.
    pub fn has_action(&self, action: &str) -> bool {
        match self {
            Self::User(user) if user.is_admin() => true,
            Self::User(_) => action != actions::MANAGE_NETWORK,
            Self::AccessKey { key, .. } => !key.is_expired() && key.allows_action(action),
            Self::Device(_) => false,
        }
    }

    /// Short label for logs.
    pub fn describe(&self) -> String {
        match self {
            Self::User(user) => format!("user:{}", user.login),
            Self::AccessKey { key, .. } => format!("key:{}", key.label),
            Self::Device(device) => format!("device:{}", device.guid),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::access_key::AccessKeyPermission;
    use crate::user::UserRole;
    use std::collections::HashSet;

    fn client() -> User {
        let mut user = User::new("alice", UserRole::Client);
        user.id = Some(2);
        user
    }

    #[test]
    fn test_roles() {
        assert_eq!(Principal::User(User::new("root", UserRole::Admin)).role(), PrincipalRole::Admin);
        assert_eq!(Principal::User(client()).role(), PrincipalRole::Client);
        assert_eq!(
            Principal::Device(Device::new("g", "k", "n")).role(),
            PrincipalRole::Device
        );
    }

    #[test]
    fn test_client_cannot_manage_networks() {
        let principal = Principal::User(client());
        assert!(principal.has_action(actions::GET_NETWORK));
        assert!(!principal.has_action(actions::MANAGE_NETWORK));
    }

    #[test]
    fn test_key_actions_come_from_permissions() {
        let key = AccessKey {
            id: Some(1),
            key: "secret".into(),
            label: "reader".into(),
            user_id: 2,
            expiration: None,
            permissions: vec![AccessKeyPermission {
                actions: Some(HashSet::from([actions::GET_NETWORK.to_string()])),
                ..Default::default()
            }],
        };
        let principal = Principal::AccessKey { key, user: client() };
        assert_eq!(principal.role(), PrincipalRole::Key);
        assert!(principal.has_action(actions::GET_NETWORK));
        assert!(!principal.has_action(actions::MANAGE_NETWORK));
        assert_eq!(principal.user().map(|u| u.login.as_str()), Some("alice"));
    }
}
