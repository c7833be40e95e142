//! In-memory implementation of the backend API.
//!
//! Backs tests and offline development. Mutating calls are recorded so
//! tests can assert the write-through order, and the next call can be
//! forced to fail to exercise degraded paths.

use std::collections::VecDeque;
use std::sync::Mutex;

use async_trait::async_trait;
use chrono::Utc;

use dealverse_core::error::AppError;
use dealverse_core::result::AppResult;
use dealverse_core::types::NotificationId;
use dealverse_entity::notification::{LiveNotification, NotificationPreferences};

use crate::api::NotificationBackend;

#[derive(Debug, Default)]
struct MemoryState {
    notifications: Vec<LiveNotification>,
    preferences: NotificationPreferences,
    fail_queue: VecDeque<String>,
    calls: Vec<String>,
}

/// A backend that lives entirely in process memory.
#[derive(Debug, Default)]
pub struct InMemoryBackend {
    state: Mutex<MemoryState>,
}

impl InMemoryBackend {
    /// Create an empty backend.
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed the stored notification list, newest first.
    pub fn seed_notifications(&self, notifications: Vec<LiveNotification>) {
        let mut state = self.lock_state();
        state.notifications = notifications;
    }

    /// Replace the stored preference record.
    pub fn set_preferences(&self, preferences: NotificationPreferences) {
        let mut state = self.lock_state();
        state.preferences = preferences;
    }

    /// Make the next API call fail with the given message. Repeated calls
    /// queue up: each pending failure consumes exactly one API call.
    pub fn fail_next_call(&self, message: impl Into<String>) {
        let mut state = self.lock_state();
        state.fail_queue.push_back(message.into());
    }

    /// Names of every call made so far, in order.
    pub fn recorded_calls(&self) -> Vec<String> {
        self.lock_state().calls.clone()
    }

    /// Current snapshot of the stored notifications.
    pub fn stored_notifications(&self) -> Vec<LiveNotification> {
        self.lock_state().notifications.clone()
    }

    fn lock_state(&self) -> std::sync::MutexGuard<'_, MemoryState> {
        self.state.lock().unwrap_or_else(|e| e.into_inner())
    }

    fn begin_call(&self, name: impl Into<String>) -> AppResult<()> {
        let mut state = self.lock_state();
        state.calls.push(name.into());
        match state.fail_queue.pop_front() {
            Some(message) => Err(AppError::backend(message)),
            None => Ok(()),
        }
    }
}

#[async_trait]
impl NotificationBackend for InMemoryBackend {
    fn backend_type(&self) -> &str {
        "memory"
    }

    async fn fetch_notifications(&self, limit: usize) -> AppResult<Vec<LiveNotification>> {
        self.begin_call("fetch_notifications")?;
        let state = self.lock_state();
        Ok(state.notifications.iter().take(limit).cloned().collect())
    }

    async fn fetch_preferences(&self) -> AppResult<NotificationPreferences> {
        self.begin_call("fetch_preferences")?;
        Ok(self.lock_state().preferences.clone())
    }

    async fn save_preferences(&self, preferences: &NotificationPreferences) -> AppResult<()> {
        self.begin_call("save_preferences")?;
        let mut state = self.lock_state();
        state.preferences = preferences.clone();
        state.preferences.updated_at = Some(Utc::now());
        Ok(())
    }

    async fn mark_read(&self, id: NotificationId) -> AppResult<()> {
        self.begin_call(format!("mark_read:{id}"))?;
        let now = Utc::now();
        let mut state = self.lock_state();
        if let Some(notification) = state.notifications.iter_mut().find(|n| n.id == id) {
            notification.mark_read(now);
        }
        Ok(())
    }

    async fn mark_all_read(&self) -> AppResult<()> {
        self.begin_call("mark_all_read")?;
        let now = Utc::now();
        let mut state = self.lock_state();
        for notification in state.notifications.iter_mut() {
            notification.mark_read(now);
        }
        Ok(())
    }

    async fn dismiss(&self, id: NotificationId) -> AppResult<()> {
        self.begin_call(format!("dismiss:{id}"))?;
        let now = Utc::now();
        let mut state = self.lock_state();
        if let Some(notification) = state.notifications.iter_mut().find(|n| n.id == id) {
            notification.dismiss(now);
        }
        Ok(())
    }

    async fn dismiss_all(&self) -> AppResult<()> {
        self.begin_call("dismiss_all")?;
        let now = Utc::now();
        let mut state = self.lock_state();
        for notification in state.notifications.iter_mut() {
            notification.dismiss(now);
        }
        Ok(())
    }

    async fn execute_action(&self, id: NotificationId, action_id: &str) -> AppResult<()> {
        self.begin_call(format!("execute_action:{id}:{action_id}"))?;
        let state = self.lock_state();
        let notification = state
            .notifications
            .iter()
            .find(|n| n.id == id)
            .ok_or_else(|| AppError::not_found(format!("Notification {id} not found")))?;
        if notification.find_action(action_id).is_none() {
            return Err(AppError::not_found(format!(
                "Action {action_id} not found on notification {id}"
            )));
        }
        Ok(())
    }
}
