//! In-memory notification store with derived counts and view filters.

use std::sync::{Mutex, MutexGuard};

use chrono::{DateTime, Duration, Utc};
use tracing::debug;

use dealverse_core::config::NotificationsConfig;
use dealverse_core::types::NotificationId;
use dealverse_entity::notification::{LiveNotification, NotificationCategory, NotificationPriority};

/// What happened when a record was offered to the store.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InsertOutcome {
    /// The record was new.
    Inserted,
    /// A record with the same id already existed and was replaced.
    Updated,
}

/// Derived record counts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StoreCounts {
    /// Active records: unread, not dismissed, not expired.
    pub unread: usize,
    /// Non-dismissed records.
    pub total: usize,
}

/// Composable list-view filters.
///
/// Filters narrow what [`NotificationStore::visible`] returns; they never
/// mutate records. Category and priority compose as a logical AND.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ListFilter {
    /// Only show this category.
    pub category: Option<NotificationCategory>,
    /// Only show this priority.
    pub priority: Option<NotificationPriority>,
}

impl ListFilter {
    fn matches(&self, notification: &LiveNotification) -> bool {
        if let Some(category) = self.category {
            if notification.category != category {
                return false;
            }
        }
        if let Some(priority) = self.priority {
            if notification.priority != priority {
                return false;
            }
        }
        true
    }
}

#[derive(Debug, Default)]
struct StoreState {
    /// Newest first.
    notifications: Vec<LiveNotification>,
    filter: ListFilter,
}

/// Single source of truth for every notification the client knows about.
///
/// The store is passive: it mutates records and reports what changed, and
/// the engine decides what to broadcast or write through to the backend.
#[derive(Debug)]
pub struct NotificationStore {
    config: NotificationsConfig,
    state: Mutex<StoreState>,
}

impl NotificationStore {
    /// Create an empty store.
    pub fn new(config: NotificationsConfig) -> Self {
        Self {
            config,
            state: Mutex::new(StoreState::default()),
        }
    }

    fn lock(&self) -> MutexGuard<'_, StoreState> {
        self.state.lock().unwrap_or_else(|e| e.into_inner())
    }

    /// Replace the full list, e.g. from a startup sync page.
    pub fn replace(&self, mut notifications: Vec<LiveNotification>) {
        notifications.truncate(self.config.max_stored);
        let mut state = self.lock();
        state.notifications = notifications;
    }

    /// Upsert a record at the front of the list and enforce the cap.
    ///
    /// A record whose id is already present is replaced in place so a
    /// replayed event cannot jump back to the top of the list.
    pub fn insert(&self, notification: LiveNotification) -> InsertOutcome {
        let now = Utc::now();
        let mut state = self.lock();
        if let Some(existing) = state
            .notifications
            .iter_mut()
            .find(|n| n.id == notification.id)
        {
            *existing = notification;
            return InsertOutcome::Updated;
        }
        state.notifications.insert(0, notification);
        Self::enforce_cap(&mut state, self.config.max_stored, now);
        InsertOutcome::Inserted
    }

    /// Evict from the back, preferring records that are no longer active.
    fn enforce_cap(state: &mut StoreState, max_stored: usize, now: DateTime<Utc>) {
        while state.notifications.len() > max_stored {
            let victim = state
                .notifications
                .iter()
                .rposition(|n| !n.is_active_at(now))
                .unwrap_or(state.notifications.len() - 1);
            let removed = state.notifications.remove(victim);
            debug!(id = %removed.id, "Store cap reached, evicting oldest record");
        }
    }

    /// Clone of a record by id.
    pub fn get(&self, id: NotificationId) -> Option<LiveNotification> {
        self.lock().notifications.iter().find(|n| n.id == id).cloned()
    }

    /// Mark one record read. Returns the updated record, or `None` when
    /// nothing changed (unknown id, already read, or dismissed).
    pub fn mark_read(&self, id: NotificationId, at: DateTime<Utc>) -> Option<LiveNotification> {
        let mut state = self.lock();
        let notification = state.notifications.iter_mut().find(|n| n.id == id)?;
        if notification.mark_read(at) {
            Some(notification.clone())
        } else {
            None
        }
    }

    /// Mark every unread, non-dismissed record read. Returns how many changed.
    pub fn mark_all_read(&self, at: DateTime<Utc>) -> usize {
        let mut state = self.lock();
        state
            .notifications
            .iter_mut()
            .map(|n| n.mark_read(at))
            .filter(|&changed| changed)
            .count()
    }

    /// Dismiss one record. Returns the updated record, or `None` when the
    /// id is unknown or already dismissed.
    pub fn dismiss(&self, id: NotificationId, at: DateTime<Utc>) -> Option<LiveNotification> {
        let mut state = self.lock();
        let notification = state.notifications.iter_mut().find(|n| n.id == id)?;
        if notification.dismiss(at) {
            Some(notification.clone())
        } else {
            None
        }
    }

    /// Dismiss every active record. Returns the ids that changed.
    pub fn dismiss_all(&self, at: DateTime<Utc>) -> Vec<NotificationId> {
        let mut state = self.lock();
        let mut dismissed = Vec::new();
        for notification in state.notifications.iter_mut() {
            if notification.is_active_at(at) && notification.dismiss(at) {
                dismissed.push(notification.id);
            }
        }
        dismissed
    }

    /// Restrict the visible list to one category, or show all with `None`.
    pub fn set_category_filter(&self, category: Option<NotificationCategory>) {
        self.lock().filter.category = category;
    }

    /// Restrict the visible list to one priority, or show all with `None`.
    pub fn set_priority_filter(&self, priority: Option<NotificationPriority>) {
        self.lock().filter.priority = priority;
    }

    /// Reset both view filters.
    pub fn clear_filters(&self) {
        self.lock().filter = ListFilter::default();
    }

    /// Current view filters.
    pub fn filter(&self) -> ListFilter {
        self.lock().filter
    }

    /// Non-dismissed records passing the view filters, newest first.
    pub fn visible(&self) -> Vec<LiveNotification> {
        let state = self.lock();
        state
            .notifications
            .iter()
            .filter(|n| !n.is_dismissed() && state.filter.matches(n))
            .cloned()
            .collect()
    }

    /// Counts at a given instant. Filters do not affect counts.
    pub fn counts_at(&self, now: DateTime<Utc>) -> StoreCounts {
        let state = self.lock();
        let unread = state
            .notifications
            .iter()
            .filter(|n| n.is_active_at(now))
            .count();
        let total = state
            .notifications
            .iter()
            .filter(|n| !n.is_dismissed())
            .count();
        StoreCounts { unread, total }
    }

    /// Counts right now.
    pub fn counts(&self) -> StoreCounts {
        self.counts_at(Utc::now())
    }

    /// Drop dismissed or expired records older than the retention window
    /// and re-enforce the cap. Returns how many records were removed.
    pub fn prune(&self, now: DateTime<Utc>) -> usize {
        let cutoff = now - Duration::days(i64::from(self.config.retention_days));
        let mut state = self.lock();
        let before = state.notifications.len();
        state.notifications.retain(|n| {
            let dismissed_old = n.dismissed_at.map(|at| at < cutoff).unwrap_or(false);
            let expired_old = n.expires_at.map(|at| at < cutoff).unwrap_or(false);
            !(dismissed_old || expired_old)
        });
        Self::enforce_cap(&mut state, self.config.max_stored, now);
        before - state.notifications.len()
    }

    /// Number of records currently held, dismissed included.
    pub fn len(&self) -> usize {
        self.lock().notifications.len()
    }

    /// Whether the store holds no records at all.
    pub fn is_empty(&self) -> bool {
        self.lock().notifications.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use dealverse_entity::notification::NotificationKind;

    fn config() -> NotificationsConfig {
        NotificationsConfig::default()
    }

    fn notification(
        category: NotificationCategory,
        priority: NotificationPriority,
    ) -> LiveNotification {
        LiveNotification::new(
            NotificationKind::Info,
            category,
            priority,
            "Deal update",
            "Meridian acquisition moved to diligence",
        )
    }

    fn sample() -> LiveNotification {
        notification(NotificationCategory::Document, NotificationPriority::Medium)
    }

    #[test]
    fn test_insert_is_newest_first_and_upsert_keeps_position() {
        let store = NotificationStore::new(config());
        let first = sample();
        let second = sample();
        let first_id = first.id;
        store.insert(first.clone());
        store.insert(second);

        let mut replayed = first;
        replayed.title = "Deal update (edited)".to_string();
        assert_eq!(store.insert(replayed), InsertOutcome::Updated);

        let visible = store.visible();
        assert_eq!(visible.len(), 2);
        // The replayed record stays in its old slot.
        assert_eq!(visible[1].id, first_id);
        assert_eq!(visible[1].title, "Deal update (edited)");
    }

    #[test]
    fn test_cap_evicts_inactive_before_active() {
        let mut cfg = config();
        cfg.max_stored = 2;
        let store = NotificationStore::new(cfg);

        let mut read = sample();
        read.mark_read(Utc::now());
        let read_id = read.id;
        let active = sample();
        let active_id = active.id;

        store.insert(active);
        store.insert(read);
        store.insert(sample());

        assert_eq!(store.len(), 2);
        assert!(store.get(read_id).is_none());
        assert!(store.get(active_id).is_some());
    }

    #[test]
    fn test_mark_read_is_noop_for_unknown_and_dismissed() {
        let store = NotificationStore::new(config());
        let now = Utc::now();
        assert!(store.mark_read(NotificationId::new(), now).is_none());

        let n = sample();
        let id = n.id;
        store.insert(n);
        assert!(store.dismiss(id, now).is_some());
        assert!(store.mark_read(id, now).is_none());
        assert!(store.get(id).is_some_and(|n| n.read_at.is_none()));
    }

    #[test]
    fn test_dismiss_all_skips_read_records() {
        let store = NotificationStore::new(config());
        let now = Utc::now();
        let mut read = sample();
        read.mark_read(now);
        let read_id = read.id;
        let active = sample();
        let active_id = active.id;
        store.insert(read);
        store.insert(active);

        let dismissed = store.dismiss_all(now);
        assert_eq!(dismissed, vec![active_id]);
        assert!(store.get(read_id).is_some_and(|n| !n.is_dismissed()));
    }

    #[test]
    fn test_filters_compose_and_clear() {
        let store = NotificationStore::new(config());
        store.insert(notification(
            NotificationCategory::Document,
            NotificationPriority::High,
        ));
        store.insert(notification(
            NotificationCategory::Document,
            NotificationPriority::Low,
        ));
        store.insert(notification(
            NotificationCategory::Security,
            NotificationPriority::High,
        ));

        store.set_category_filter(Some(NotificationCategory::Document));
        assert_eq!(store.visible().len(), 2);

        store.set_priority_filter(Some(NotificationPriority::High));
        assert_eq!(store.visible().len(), 1);

        store.clear_filters();
        assert_eq!(store.visible().len(), 3);
    }

    #[test]
    fn test_counts_ignore_filters() {
        let store = NotificationStore::new(config());
        let now = Utc::now();
        let mut read = sample();
        read.mark_read(now);
        store.insert(read);
        store.insert(sample());
        store.set_category_filter(Some(NotificationCategory::Workflow));

        let counts = store.counts_at(now);
        assert_eq!(counts.unread, 1);
        assert_eq!(counts.total, 2);
        assert!(store.visible().is_empty());
    }

    #[test]
    fn test_prune_respects_retention() {
        let store = NotificationStore::new(config());
        let now = Utc::now();

        let mut old = sample();
        old.dismiss(now - Duration::days(31));
        let old_id = old.id;
        let mut recent = sample();
        recent.dismiss(now - Duration::days(1));
        let recent_id = recent.id;
        store.insert(old);
        store.insert(recent);

        assert_eq!(store.prune(now), 1);
        assert!(store.get(old_id).is_none());
        assert!(store.get(recent_id).is_some());
    }
}
