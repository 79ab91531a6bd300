//! Real-time WebSocket engine configuration.

use serde::{Deserialize, Serialize};

/// Real-time (WebSocket) engine configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RealtimeConfig {
    /// Number of inbound messages processed concurrently across all sessions.
    #[serde(default = "default_worker_pool_size")]
    pub worker_pool_size: usize,
    /// Maximum inbound frame size in bytes.
    #[serde(default = "default_max_message_size")]
    pub max_message_size: usize,
    /// Whether `device/save` may create a network it cannot resolve.
    #[serde(default = "default_true")]
    pub allow_network_autocreate: bool,
    /// Redis URL for cross-node publishing; local-only when absent.
    #[serde(default)]
    pub redis_url: Option<String>,
}

impl Default for RealtimeConfig {
    fn default() -> Self {
        Self {
            worker_pool_size: default_worker_pool_size(),
            max_message_size: default_max_message_size(),
            allow_network_autocreate: true,
            redis_url: None,
        }
    }
}

fn default_worker_pool_size() -> usize {
    64
}

fn default_max_message_size() -> usize {
    65_536
}

fn default_true() -> bool {
    true
}
