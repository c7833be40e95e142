//! Pipeline controller: owns the store, gate, toast queue, digest, and
//! feed, consumes source events, and broadcasts UI events.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, MutexGuard};
use std::time::Duration;

use chrono::{DateTime, Utc};
use serde::Serialize;
use tokio::sync::{broadcast, mpsc, watch};
use tokio::time::{self, MissedTickBehavior};
use tracing::{debug, error, info, warn};

use dealverse_client::NotificationBackend;
use dealverse_core::config::AppConfig;
use dealverse_core::error::AppError;
use dealverse_core::result::AppResult;
use dealverse_core::types::NotificationId;
use dealverse_entity::activity::ActivityEntry;
use dealverse_entity::notification::{
    LiveNotification, NotificationCategory, NotificationKind, NotificationPreferences,
    NotificationPriority,
};

use crate::dedup::EventDeduplicator;
use crate::digest::{DigestQueue, DigestSummary};
use crate::events::{ToastCloseReason, UiEvent};
use crate::feed::ActivityFeed;
use crate::gate::{quiet_hours, DeferReason, GateDecision, PreferenceGate};
use crate::source::{ConnectionStatus, SourceEvent};
use crate::store::{InsertOutcome, NotificationStore};
use crate::toast::{Toast, ToastScheduler};

/// Point-in-time view of everything a frontend needs for a full render.
#[derive(Debug, Clone, Serialize)]
pub struct EngineSnapshot {
    /// Non-dismissed notifications passing the view filters, newest first.
    pub notifications: Vec<LiveNotification>,
    /// The toast overlay, newest first.
    pub toasts: Vec<Toast>,
    /// Active (unread, undismissed, unexpired) records.
    pub unread: usize,
    /// Non-dismissed records.
    pub total: usize,
    /// Push channel state.
    pub connection: ConnectionStatus,
}

/// Lifecycle-scoped notification pipeline.
///
/// Created on startup, shut down with the process; never a global. All
/// user-facing mutations go through this type: local state is updated
/// first, then written through to the backend, and write-through failures
/// are reported rather than rolled back so the UI stays responsive.
#[derive(Debug)]
pub struct NotificationEngine {
    config: AppConfig,
    backend: Arc<dyn NotificationBackend>,
    store: NotificationStore,
    toasts: Arc<ToastScheduler>,
    gate: PreferenceGate,
    dedup: EventDeduplicator,
    digest: DigestQueue,
    feed: ActivityFeed,
    preferences: Mutex<NotificationPreferences>,
    events_tx: broadcast::Sender<UiEvent>,
    status_tx: watch::Sender<ConnectionStatus>,
    /// Whether the previous maintenance pass fell inside quiet hours.
    was_quiet: AtomicBool,
}

impl NotificationEngine {
    /// Build an engine from configuration and a backend.
    ///
    /// Fails only on invalid static configuration, e.g. an unknown toast
    /// anchor position.
    pub fn new(config: AppConfig, backend: Arc<dyn NotificationBackend>) -> AppResult<Self> {
        let (events_tx, _) = broadcast::channel(config.toast.event_buffer.max(1));
        let toasts = Arc::new(ToastScheduler::new(config.toast.clone(), events_tx.clone())?);
        let (status_tx, _) = watch::channel(ConnectionStatus::Disconnected);
        Ok(Self {
            store: NotificationStore::new(config.notifications.clone()),
            dedup: EventDeduplicator::new(config.notifications.dedup_window_ms),
            digest: DigestQueue::new(),
            feed: ActivityFeed::new(config.notifications.feed_capacity),
            gate: PreferenceGate::new(),
            preferences: Mutex::new(NotificationPreferences::default()),
            backend,
            toasts,
            events_tx,
            status_tx,
            was_quiet: AtomicBool::new(false),
            config,
        })
    }

    fn lock_preferences(&self) -> MutexGuard<'_, NotificationPreferences> {
        self.preferences.lock().unwrap_or_else(|e| e.into_inner())
    }

    fn emit(&self, event: UiEvent) {
        let _ = self.events_tx.send(event);
    }

    fn emit_counts(&self) {
        let counts = self.store.counts();
        self.emit(UiEvent::UnreadCount {
            unread: counts.unread,
            total: counts.total,
        });
    }

    /// Log a failed write-through and tell subscribers. Local state stays
    /// as the user saw it.
    fn report_backend_failure(&self, context: &str, error: &AppError) {
        warn!(context, error = %error, "Backend write-through failed");
        self.emit(UiEvent::BackendError {
            context: context.to_string(),
            message: error.to_string(),
        });
    }

    /// Subscribe to the UI event stream.
    ///
    /// A lagging subscriber loses oldest events; it can recover with
    /// [`NotificationEngine::snapshot`].
    pub fn subscribe(&self) -> broadcast::Receiver<UiEvent> {
        self.events_tx.subscribe()
    }

    /// Watch the push channel connection status.
    pub fn connection_status(&self) -> watch::Receiver<ConnectionStatus> {
        self.status_tx.subscribe()
    }

    /// Current preference record.
    pub fn preferences(&self) -> NotificationPreferences {
        self.lock_preferences().clone()
    }

    /// Point-in-time view for an initial render or catch-up after lag.
    pub fn snapshot(&self) -> EngineSnapshot {
        let counts = self.store.counts();
        EngineSnapshot {
            notifications: self.store.visible(),
            toasts: self.toasts.snapshot(),
            unread: counts.unread,
            total: counts.total,
            connection: self.status_tx.borrow().clone(),
        }
    }

    /// Most recent activity feed entries, newest first.
    pub fn recent_activity(&self, limit: usize) -> Vec<ActivityEntry> {
        self.feed.recent(limit)
    }

    /// Fetch preferences and the recent notification page from the backend.
    ///
    /// Both calls fail soft: the engine starts with defaults and an empty
    /// store rather than refusing to run.
    pub async fn sync(&self) {
        match self.backend.fetch_preferences().await {
            Ok(preferences) => {
                *self.lock_preferences() = preferences;
                debug!("Loaded notification preferences");
            }
            Err(e) => {
                warn!(error = %e, "Falling back to default notification preferences");
            }
        }
        match self
            .backend
            .fetch_notifications(self.config.backend.sync_limit)
            .await
        {
            Ok(notifications) => {
                let count = notifications.len();
                self.store.replace(notifications);
                info!(count, "Loaded recent notifications");
                self.emit_counts();
            }
            Err(e) => {
                warn!(error = %e, "Starting with an empty notification store");
            }
        }
    }

    /// Drive the pipeline until `shutdown` flips to `true`.
    ///
    /// Consumes source events and runs periodic maintenance: store prune,
    /// dedup cleanup, and the quiet-hours digest flush.
    pub async fn run(
        &self,
        mut events: mpsc::Receiver<SourceEvent>,
        mut shutdown: watch::Receiver<bool>,
    ) -> AppResult<()> {
        let mut maintenance = time::interval(Duration::from_secs(
            self.config.notifications.maintenance_interval_seconds.max(1),
        ));
        maintenance.set_missed_tick_behavior(MissedTickBehavior::Skip);
        maintenance.tick().await;

        info!("Notification engine running");
        loop {
            tokio::select! {
                changed = shutdown.changed() => {
                    if changed.is_err() || *shutdown.borrow() {
                        break;
                    }
                }
                event = events.recv() => {
                    match event {
                        Some(event) => self.handle_source_event(event),
                        None => {
                            warn!("Source event channel closed");
                            break;
                        }
                    }
                }
                _ = maintenance.tick() => {
                    self.maintain();
                }
            }
        }
        info!("Notification engine stopped");
        self.toasts.shutdown();
        Ok(())
    }

    fn handle_source_event(&self, event: SourceEvent) {
        match event {
            SourceEvent::Notification(notification) => self.ingest(notification),
            SourceEvent::Activity(entry) => {
                self.feed.push(entry.clone());
                self.emit(UiEvent::ActivityAdded { entry });
            }
            SourceEvent::Status(status) => {
                debug!(?status, "Push channel status changed");
                self.status_tx.send_replace(status.clone());
                self.emit(UiEvent::Connection { status });
            }
        }
    }

    /// Run one pushed notification through dedup and the preference gate.
    fn ingest(&self, notification: LiveNotification) {
        if !self.dedup.should_dispatch(notification.id) {
            debug!(id = %notification.id, "Duplicate push suppressed");
            return;
        }
        let now = Utc::now();
        let decision = {
            let preferences = self.lock_preferences();
            self.gate.evaluate(&preferences, &notification, now)
        };
        match decision {
            GateDecision::Drop(reason) => {
                debug!(id = %notification.id, ?reason, "Notification dropped by preferences");
            }
            GateDecision::DeferToast(reason) => {
                debug!(id = %notification.id, ?reason, "Toast withheld");
                if reason == DeferReason::QuietHours && self.digest_enabled() {
                    self.digest.push(&notification);
                }
                self.admit(notification, false);
            }
            GateDecision::Deliver => {
                self.admit(notification, true);
            }
        }
    }

    fn digest_enabled(&self) -> bool {
        self.lock_preferences().digest_enabled
    }

    /// Put a record in the store and optionally toast it.
    fn admit(&self, notification: LiveNotification, toast: bool) {
        let outcome = self.store.insert(notification.clone());
        match outcome {
            InsertOutcome::Inserted => self.emit(UiEvent::NotificationAdded {
                notification: notification.clone(),
            }),
            // A replayed id updates in place and never re-toasts.
            InsertOutcome::Updated => self.emit(UiEvent::NotificationUpdated {
                notification: notification.clone(),
            }),
        }
        self.emit_counts();
        if toast
            && outcome == InsertOutcome::Inserted
            && notification.is_active()
            && self.toasts.push(notification)
        {
            let preferences = self.lock_preferences();
            self.gate.record_toast(&preferences, Utc::now());
        }
    }

    /// Surface a locally generated notification, e.g. the result of an
    /// operation the user just ran. Local pushes skip the preference gate.
    pub fn push_local(&self, notification: LiveNotification) {
        if !self.dedup.should_dispatch(notification.id) {
            return;
        }
        self.admit(notification, true);
    }

    /// Mark one notification read. No-op for unknown, read, or dismissed
    /// ids. Local state first, then backend write-through.
    pub async fn mark_read(&self, id: NotificationId) {
        let Some(updated) = self.store.mark_read(id, Utc::now()) else {
            return;
        };
        self.emit(UiEvent::NotificationUpdated {
            notification: updated,
        });
        self.emit_counts();
        if let Err(e) = self.backend.mark_read(id).await {
            self.report_backend_failure("mark_read", &e);
        }
    }

    /// Mark every unread, non-dismissed notification read.
    pub async fn mark_all_read(&self) {
        let changed = self.store.mark_all_read(Utc::now());
        if changed == 0 {
            return;
        }
        debug!(changed, "Marked all notifications read");
        self.emit_counts();
        if let Err(e) = self.backend.mark_all_read().await {
            self.report_backend_failure("mark_all_read", &e);
        }
    }

    /// Dismiss one notification. Its toast, if visible, leaves immediately.
    pub async fn dismiss(&self, id: NotificationId) {
        let Some(updated) = self.store.dismiss(id, Utc::now()) else {
            return;
        };
        self.toasts.remove(id, ToastCloseReason::Dismissed);
        self.emit(UiEvent::NotificationUpdated {
            notification: updated,
        });
        self.emit_counts();
        if let Err(e) = self.backend.dismiss(id).await {
            self.report_backend_failure("dismiss", &e);
        }
    }

    /// Dismiss every active notification and clear their toasts.
    pub async fn dismiss_all(&self) {
        let dismissed = self.store.dismiss_all(Utc::now());
        if dismissed.is_empty() {
            return;
        }
        for id in &dismissed {
            self.toasts.remove(*id, ToastCloseReason::Dismissed);
        }
        debug!(count = dismissed.len(), "Dismissed all active notifications");
        self.emit_counts();
        if let Err(e) = self.backend.dismiss_all().await {
            self.report_backend_failure("dismiss_all", &e);
        }
    }

    /// Run a notification action's backend side effect.
    ///
    /// On success the toast is removed but the record's read and dismissed
    /// state is left untouched. A backend failure is converted into a
    /// low-priority error toast and not propagated; `Err` is returned only
    /// for an unknown notification or action id.
    pub async fn execute_action(&self, id: NotificationId, action_id: &str) -> AppResult<()> {
        let Some(notification) = self.store.get(id) else {
            return Err(AppError::not_found(format!("notification {id} not found")));
        };
        let Some(action) = notification.find_action(action_id) else {
            return Err(AppError::not_found(format!(
                "action '{action_id}' not found on notification {id}"
            )));
        };
        let label = action.label.clone();
        match self.backend.execute_action(id, action_id).await {
            Ok(()) => {
                self.toasts.remove(id, ToastCloseReason::Action);
                debug!(id = %id, action_id, "Notification action completed");
                Ok(())
            }
            Err(e) => {
                error!(id = %id, action_id, error = %e, "Notification action failed");
                self.emit(UiEvent::BackendError {
                    context: format!("execute_action:{action_id}"),
                    message: e.to_string(),
                });
                self.push_local(LiveNotification::new(
                    NotificationKind::Error,
                    NotificationCategory::System,
                    NotificationPriority::Low,
                    "Action failed",
                    format!("'{label}' could not be completed: {e}"),
                ));
                Ok(())
            }
        }
    }

    /// Freeze a toast countdown (hover enter).
    pub fn pause_toast(&self, id: NotificationId) -> bool {
        self.toasts.pause(id)
    }

    /// Resume a paused toast countdown (hover leave).
    pub fn resume_toast(&self, id: NotificationId) -> bool {
        self.toasts.resume(id)
    }

    /// Restrict the visible list to one category, or show all with `None`.
    pub fn set_category_filter(&self, category: Option<NotificationCategory>) {
        self.store.set_category_filter(category);
    }

    /// Restrict the visible list to one priority, or show all with `None`.
    pub fn set_priority_filter(&self, priority: Option<NotificationPriority>) {
        self.store.set_priority_filter(priority);
    }

    /// Reset both view filters.
    pub fn clear_filters(&self) {
        self.store.clear_filters();
    }

    /// Persist a new preference record and apply it to the gate.
    ///
    /// The record is applied only once the backend accepts it. On failure
    /// the engine keeps its current settings and the caller keeps the
    /// draft; the failure also surfaces as an error toast.
    pub async fn save_preferences(&self, draft: NotificationPreferences) -> AppResult<()> {
        let mut draft = draft;
        draft.updated_at = Some(Utc::now());
        match self.backend.save_preferences(&draft).await {
            Ok(()) => {
                *self.lock_preferences() = draft;
                info!("Notification preferences saved");
                Ok(())
            }
            Err(e) => {
                error!(error = %e, "Failed to save notification preferences");
                self.emit(UiEvent::BackendError {
                    context: "save_preferences".to_string(),
                    message: e.to_string(),
                });
                self.push_local(LiveNotification::new(
                    NotificationKind::Error,
                    NotificationCategory::System,
                    NotificationPriority::Low,
                    "Preferences not saved",
                    format!("Your changes were not applied: {e}"),
                ));
                Err(e)
            }
        }
    }

    /// One maintenance pass: prune the store, expire dedup entries, and
    /// flush the digest when a quiet window has just ended.
    fn maintain(&self) {
        let now = Utc::now();
        let pruned = self.store.prune(now);
        if pruned > 0 {
            debug!(pruned, "Pruned old notification records");
            self.emit_counts();
        }
        self.dedup.cleanup();
        self.flush_digest_if_due(now);
    }

    /// Edge-detect the end of the quiet window and flush the digest.
    fn flush_digest_if_due(&self, now: DateTime<Utc>) {
        let (quiet, digest_enabled) = {
            let preferences = self.lock_preferences();
            (
                quiet_hours::is_quiet(&preferences.quiet_hours, now),
                preferences.digest_enabled,
            )
        };
        let was_quiet = self.was_quiet.swap(quiet, Ordering::Relaxed);
        if was_quiet && !quiet && digest_enabled {
            if let Some(summary) = self.digest.flush() {
                info!(count = summary.count, "Flushing quiet-hours digest");
                self.emit(UiEvent::DigestReady {
                    summary: summary.clone(),
                });
                self.push_local(digest_notification(&summary));
            }
        }
    }
}

/// Build the single summary notification for a flushed digest.
fn digest_notification(summary: &DigestSummary) -> LiveNotification {
    let title = if summary.count == 1 {
        "1 notification while you were away".to_string()
    } else {
        format!("{} notifications while you were away", summary.count)
    };
    let breakdown: Vec<String> = summary
        .by_category
        .iter()
        .map(|(category, count)| format!("{category}: {count}"))
        .collect();
    LiveNotification::new(
        NotificationKind::Info,
        NotificationCategory::System,
        summary.highest_priority,
        title,
        breakdown.join(", "),
    )
}
