//! Deduplication of rapid duplicate events within a time window.

use std::collections::HashMap;
use std::sync::Mutex;
use std::time::Duration;

use tokio::time::Instant;

use dealverse_core::types::NotificationId;

/// Suppresses re-delivery of the same notification within a window.
///
/// The push source may replay a notification after a reconnect; anything
/// seen again inside the window is treated as the same event.
#[derive(Debug)]
pub struct EventDeduplicator {
    /// Window duration
    window: Duration,
    /// Last seen time per notification
    last_seen: Mutex<HashMap<NotificationId, Instant>>,
}

impl EventDeduplicator {
    /// Create a new deduplicator with the given window.
    pub fn new(window_ms: u64) -> Self {
        Self {
            window: Duration::from_millis(window_ms),
            last_seen: Mutex::new(HashMap::new()),
        }
    }

    /// Check if an event should be dispatched or deduplicated.
    ///
    /// Returns `true` if the event should proceed, `false` if it's a duplicate.
    pub fn should_dispatch(&self, id: NotificationId) -> bool {
        let mut map = self.last_seen.lock().unwrap_or_else(|e| e.into_inner());
        let now = Instant::now();

        if let Some(last) = map.get(&id) {
            if now.duration_since(*last) < self.window {
                return false; // Too recent, suppress
            }
        }

        map.insert(id, now);
        true
    }

    /// Clean up entries too old to suppress anything.
    pub fn cleanup(&self) {
        let mut map = self.last_seen.lock().unwrap_or_else(|e| e.into_inner());
        let now = Instant::now();
        let cutoff = self.window * 10; // Keep entries for 10x the window
        map.retain(|_, v| now.duration_since(*v) < cutoff);
    }

    #[cfg(test)]
    fn tracked(&self) -> usize {
        self.last_seen
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .len()
    }
}
