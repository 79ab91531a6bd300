//! Topic identifiers.

use std::fmt;

/// What a session can subscribe to.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Topic {
    /// Commands addressed to a device.
    DeviceCommands(String),
    /// Notifications emitted by a device.
    DeviceNotifications(String),
    /// Status/result updates of one command.
    CommandUpdates(i64),
}

impl Topic {
    /// Parses a channel string such as `commands:<guid>`.
    pub fn parse(channel: &str) -> Option<Self> {
        match channel.split_once(':')? {
            ("commands", guid) if !guid.is_empty() => Some(Self::DeviceCommands(guid.to_string())),
            ("notifications", guid) if !guid.is_empty() => {
                Some(Self::DeviceNotifications(guid.to_string()))
            }
            ("command-updates", id) => id.parse().ok().map(Self::CommandUpdates),
            _ => None,
        }
    }

    /// Converts back to a channel string.
    pub fn to_channel_string(&self) -> String {
        match self {
            Self::DeviceCommands(guid) => format!("commands:{guid}"),
            Self::DeviceNotifications(guid) => format!("notifications:{guid}"),
            Self::CommandUpdates(id) => format!("command-updates:{id}"),
        }
    }

    /// Whether each id is delivered at most once per subscription. Updates
    /// of the same command are delivered every time.
    pub fn dedupes(&self) -> bool {
        !matches!(self, Self::CommandUpdates(_))
    }
}

impl fmt::Display for Topic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_channel_string())
    }
}
