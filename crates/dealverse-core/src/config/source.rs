//! Push-event source (WebSocket) configuration.

use serde::{Deserialize, Serialize};

/// Settings for the WebSocket notification source.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SourceConfig {
    /// WebSocket URL of the notification push channel.
    #[serde(default = "default_url")]
    pub url: String,
    /// Initial reconnect delay in milliseconds.
    #[serde(default = "default_reconnect_initial")]
    pub reconnect_initial_ms: u64,
    /// Maximum reconnect delay in milliseconds (backoff cap).
    #[serde(default = "default_reconnect_max")]
    pub reconnect_max_ms: u64,
    /// Maximum consecutive reconnect attempts before giving up.
    /// `0` retries forever.
    #[serde(default)]
    pub max_reconnect_attempts: u32,
    /// Internal buffer size for the source event channel.
    #[serde(default = "default_event_buffer")]
    pub event_buffer: usize,
}

impl Default for SourceConfig {
    fn default() -> Self {
        Self {
            url: default_url(),
            reconnect_initial_ms: default_reconnect_initial(),
            reconnect_max_ms: default_reconnect_max(),
            max_reconnect_attempts: 0,
            event_buffer: default_event_buffer(),
        }
    }
}

fn default_url() -> String {
    "ws://localhost:8000/ws/notifications".to_string()
}

fn default_reconnect_initial() -> u64 {
    1000
}

fn default_reconnect_max() -> u64 {
    60_000
}

fn default_event_buffer() -> usize {
    256
}
