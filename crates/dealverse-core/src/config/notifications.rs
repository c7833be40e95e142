//! Notification store and maintenance configuration.

use serde::{Deserialize, Serialize};

/// Settings for the in-memory notification store.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NotificationsConfig {
    /// Maximum notifications kept in the store before the oldest
    /// inactive records are pruned.
    #[serde(default = "default_max_stored")]
    pub max_stored: usize,
    /// Number of days after which dismissed notifications are pruned.
    #[serde(default = "default_retention_days")]
    pub retention_days: u32,
    /// Deduplication window in milliseconds for rapid duplicate events.
    #[serde(default = "default_dedup_window")]
    pub dedup_window_ms: u64,
    /// Interval in seconds between maintenance passes (prune, dedup
    /// cleanup, digest flush check).
    #[serde(default = "default_maintenance_interval")]
    pub maintenance_interval_seconds: u64,
    /// Maximum activity feed entries kept in memory.
    #[serde(default = "default_feed_capacity")]
    pub feed_capacity: usize,
}

impl Default for NotificationsConfig {
    fn default() -> Self {
        Self {
            max_stored: default_max_stored(),
            retention_days: default_retention_days(),
            dedup_window_ms: default_dedup_window(),
            maintenance_interval_seconds: default_maintenance_interval(),
            feed_capacity: default_feed_capacity(),
        }
    }
}

fn default_max_stored() -> usize {
    1000
}

fn default_retention_days() -> u32 {
    30
}

fn default_dedup_window() -> u64 {
    500
}

fn default_maintenance_interval() -> u64 {
    60
}

fn default_feed_capacity() -> usize {
    200
}
