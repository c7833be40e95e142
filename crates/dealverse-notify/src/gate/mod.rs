//! Preference gate: decides whether an incoming notification is surfaced.

pub mod quiet_hours;

use std::sync::{Mutex, MutexGuard};

use chrono::{DateTime, NaiveDate, Utc};

use dealverse_entity::notification::{DeliveryChannel, LiveNotification, NotificationPreferences};

/// Why a notification is stored but withheld from the toast layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeferReason {
    /// The quiet-hours window is active.
    QuietHours,
    /// The per-day toast cap has been reached.
    DailyCapReached,
}

/// Why a notification is dropped outright.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DropReason {
    /// The user disabled this category.
    CategoryDisabled,
    /// The in-app channel is disabled.
    ChannelDisabled,
    /// Priority is below the user's minimum threshold.
    BelowMinimumPriority,
}

/// The gate's verdict for one incoming notification.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GateDecision {
    /// Store it and show a toast.
    Deliver,
    /// Store it, but do not toast now.
    DeferToast(DeferReason),
    /// Drop it entirely: not stored, not counted.
    Drop(DropReason),
}

#[derive(Debug, Clone, Copy)]
struct DailyCount {
    date: NaiveDate,
    count: u32,
}

/// Evaluates preference rules against incoming notifications.
///
/// Rules run in a fixed order: category toggle, in-app channel toggle,
/// priority threshold, quiet hours, daily toast cap. The first three
/// drop the event entirely; the last two keep the record and only
/// withhold the toast.
#[derive(Debug, Default)]
pub struct PreferenceGate {
    /// Toasts shown on the current local date.
    daily: Mutex<Option<DailyCount>>,
}

impl PreferenceGate {
    /// Create a gate with a fresh daily counter.
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, Option<DailyCount>> {
        self.daily.lock().unwrap_or_else(|e| e.into_inner())
    }

    /// Decide what to do with an incoming notification.
    pub fn evaluate(
        &self,
        preferences: &NotificationPreferences,
        notification: &LiveNotification,
        now: DateTime<Utc>,
    ) -> GateDecision {
        if !preferences.categories.enabled(notification.category) {
            return GateDecision::Drop(DropReason::CategoryDisabled);
        }
        if !preferences.channels.enabled(DeliveryChannel::InApp) {
            return GateDecision::Drop(DropReason::ChannelDisabled);
        }
        if !notification.priority.meets(preferences.minimum_priority) {
            return GateDecision::Drop(DropReason::BelowMinimumPriority);
        }
        if quiet_hours::is_quiet(&preferences.quiet_hours, now) {
            return GateDecision::DeferToast(DeferReason::QuietHours);
        }
        if self.cap_reached(preferences, now) {
            return GateDecision::DeferToast(DeferReason::DailyCapReached);
        }
        GateDecision::Deliver
    }

    fn cap_reached(&self, preferences: &NotificationPreferences, now: DateTime<Utc>) -> bool {
        if preferences.max_toasts_per_day == 0 {
            return false;
        }
        let today = quiet_hours::local_date(&preferences.quiet_hours.timezone, now);
        match *self.lock() {
            Some(daily) if daily.date == today => daily.count >= preferences.max_toasts_per_day,
            _ => false,
        }
    }

    /// Record that a toast was actually shown. The counter rolls over on
    /// local-date change in the preference timezone.
    pub fn record_toast(&self, preferences: &NotificationPreferences, now: DateTime<Utc>) {
        let today = quiet_hours::local_date(&preferences.quiet_hours.timezone, now);
        let mut daily = self.lock();
        match daily.as_mut() {
            Some(d) if d.date == today => d.count += 1,
            _ => {
                *daily = Some(DailyCount {
                    date: today,
                    count: 1,
                });
            }
        }
    }

    /// Toasts shown so far on the given instant's local date.
    pub fn toasts_today(&self, preferences: &NotificationPreferences, now: DateTime<Utc>) -> u32 {
        let today = quiet_hours::local_date(&preferences.quiet_hours.timezone, now);
        match *self.lock() {
            Some(daily) if daily.date == today => daily.count,
            _ => 0,
        }
    }
}
