//! Collection of notifications deferred during quiet hours.

use std::collections::BTreeMap;
use std::sync::{Mutex, MutexGuard};

use serde::Serialize;

use dealverse_core::types::NotificationId;
use dealverse_entity::notification::{
    LiveNotification, NotificationCategory, NotificationPriority,
};

/// One deferred notification, reduced to what the summary needs.
#[derive(Debug, Clone, Serialize)]
pub struct DigestItem {
    /// The deferred notification.
    pub id: NotificationId,
    /// Its category.
    pub category: NotificationCategory,
    /// Its priority.
    pub priority: NotificationPriority,
    /// Its title.
    pub title: String,
}

/// What arrived while toasts were suppressed.
#[derive(Debug, Clone, Serialize)]
pub struct DigestSummary {
    /// Total deferred notifications.
    pub count: usize,
    /// Deferred notifications per category.
    pub by_category: BTreeMap<NotificationCategory, usize>,
    /// The most urgent priority seen.
    pub highest_priority: NotificationPriority,
    /// The deferred items, oldest first.
    pub items: Vec<DigestItem>,
}

/// Accumulates quiet-hours arrivals until the window ends.
#[derive(Debug, Default)]
pub struct DigestQueue {
    items: Mutex<Vec<DigestItem>>,
}

impl DigestQueue {
    /// Create an empty queue.
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, Vec<DigestItem>> {
        self.items.lock().unwrap_or_else(|e| e.into_inner())
    }

    /// Queue a deferred notification. Re-queuing the same id is a no-op.
    pub fn push(&self, notification: &LiveNotification) {
        let mut items = self.lock();
        if items.iter().any(|item| item.id == notification.id) {
            return;
        }
        items.push(DigestItem {
            id: notification.id,
            category: notification.category,
            priority: notification.priority,
            title: notification.title.clone(),
        });
    }

    /// Number of queued items.
    pub fn len(&self) -> usize {
        self.lock().len()
    }

    /// Whether nothing has been deferred.
    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }

    /// Drain everything into a summary. Returns `None` when empty.
    pub fn flush(&self) -> Option<DigestSummary> {
        let items: Vec<DigestItem> = std::mem::take(&mut *self.lock());
        if items.is_empty() {
            return None;
        }
        let mut by_category = BTreeMap::new();
        let mut highest_priority = NotificationPriority::Low;
        for item in &items {
            *by_category.entry(item.category).or_insert(0) += 1;
            highest_priority = highest_priority.max(item.priority);
        }
        Some(DigestSummary {
            count: items.len(),
            by_category,
            highest_priority,
            items,
        })
    }
}
