//! Inbound action names.

use std::fmt;
use std::str::FromStr;

use hive_core::AppError;

/// Every action a device session may send.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Action {
    Authenticate,
    CommandInsert,
    CommandUpdate,
    CommandSubscribe,
    CommandUnsubscribe,
    NotificationInsert,
    NotificationSubscribe,
    NotificationUnsubscribe,
    DeviceGet,
    DeviceSave,
    ServerInfo,
}

impl Action {
    pub const ALL: [Action; 11] = [
        Self::Authenticate,
        Self::CommandInsert,
        Self::CommandUpdate,
        Self::CommandSubscribe,
        Self::CommandUnsubscribe,
        Self::NotificationInsert,
        Self::NotificationSubscribe,
        Self::NotificationUnsubscribe,
        Self::DeviceGet,
        Self::DeviceSave,
        Self::ServerInfo,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Authenticate => "authenticate",
            Self::CommandInsert => "command/insert",
            Self::CommandUpdate => "command/update",
            Self::CommandSubscribe => "command/subscribe",
            Self::CommandUnsubscribe => "command/unsubscribe",
            Self::NotificationInsert => "notification/insert",
            Self::NotificationSubscribe => "notification/subscribe",
            Self::NotificationUnsubscribe => "notification/unsubscribe",
            Self::DeviceGet => "device/get",
            Self::DeviceSave => "device/save",
            Self::ServerInfo => "server/info",
        }
    }

    /// Whether the session must be authenticated, or the frame carry valid
    /// device credentials, before the action runs.
    pub fn needs_auth(&self) -> bool {
        !matches!(self, Self::Authenticate | Self::DeviceSave)
    }
}

impl FromStr for Action {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|action| action.as_str() == s)
            .ok_or_else(|| AppError::validation(format!("Unknown action '{s}'")))
    }
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
