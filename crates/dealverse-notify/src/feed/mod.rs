//! Bounded activity timeline, kept separate from actionable notifications.

mod format;

pub use format::{ActivityFormatter, ActivityPresentation};

use std::collections::VecDeque;
use std::sync::{Mutex, MutexGuard};

use dealverse_entity::activity::ActivityEntry;

/// In-memory ring of recent workspace activity, newest first.
///
/// Entries are informational and immutable once recorded; there is no
/// read or dismiss state to track.
#[derive(Debug)]
pub struct ActivityFeed {
    capacity: usize,
    entries: Mutex<VecDeque<ActivityEntry>>,
}

impl ActivityFeed {
    /// Create a feed holding at most `capacity` entries.
    pub fn new(capacity: usize) -> Self {
        Self {
            capacity,
            entries: Mutex::new(VecDeque::with_capacity(capacity.min(64))),
        }
    }

    fn lock_entries(&self) -> MutexGuard<'_, VecDeque<ActivityEntry>> {
        self.entries.lock().unwrap_or_else(|e| e.into_inner())
    }

    /// Record an entry, evicting the oldest once the feed is full.
    pub fn push(&self, entry: ActivityEntry) {
        let mut entries = self.lock_entries();
        entries.push_front(entry);
        entries.truncate(self.capacity);
    }

    /// Most recent entries, newest first, up to `limit`.
    pub fn recent(&self, limit: usize) -> Vec<ActivityEntry> {
        self.lock_entries().iter().take(limit).cloned().collect()
    }

    /// All retained entries, newest first.
    pub fn entries(&self) -> Vec<ActivityEntry> {
        self.lock_entries().iter().cloned().collect()
    }

    pub fn len(&self) -> usize {
        self.lock_entries().len()
    }

    pub fn is_empty(&self) -> bool {
        self.lock_entries().is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use dealverse_entity::activity::ActivityType;

    fn entry(subject: &str) -> ActivityEntry {
        ActivityEntry::new(ActivityType::DocumentCreated, "Ana Ruiz", subject)
    }

    #[test]
    fn test_feed_keeps_newest_first() {
        let feed = ActivityFeed::new(10);
        feed.push(entry("first"));
        feed.push(entry("second"));
        feed.push(entry("third"));

        let recent = feed.recent(2);
        assert_eq!(recent.len(), 2);
        assert_eq!(recent[0].subject, "third");
        assert_eq!(recent[1].subject, "second");
    }

    #[test]
    fn test_feed_evicts_oldest_at_capacity() {
        let feed = ActivityFeed::new(3);
        for i in 0..5 {
            feed.push(entry(&format!("doc-{}", i)));
        }

        assert_eq!(feed.len(), 3);
        let entries = feed.entries();
        assert_eq!(entries[0].subject, "doc-4");
        assert_eq!(entries[2].subject, "doc-2");
    }

    #[test]
    fn test_recent_limit_larger_than_feed() {
        let feed = ActivityFeed::new(10);
        feed.push(entry("only"));
        assert_eq!(feed.recent(50).len(), 1);
    }
}
