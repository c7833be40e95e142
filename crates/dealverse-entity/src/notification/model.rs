//! The live notification record.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use dealverse_core::types::NotificationId;

use super::action::NotificationAction;
use super::category::NotificationCategory;
use super::delivery::{DeliveryChannel, DeliveryState};
use super::kind::NotificationKind;
use super::priority::NotificationPriority;

/// A notification delivered to the current user.
///
/// State transitions are timestamps: `read_at`, `dismissed_at`, and
/// `expires_at` mark the transition by their presence. `dismissed_at` is
/// terminal; there is no un-dismiss.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LiveNotification {
    /// Unique notification identifier.
    pub id: NotificationId,
    /// Visual kind (`type` on the wire).
    #[serde(rename = "type")]
    pub kind: NotificationKind,
    /// Category for filtering and preference matching.
    pub category: NotificationCategory,
    /// Priority level.
    pub priority: NotificationPriority,
    /// Notification title.
    pub title: String,
    /// Notification body text.
    pub message: String,
    /// When the notification was created.
    pub created_at: DateTime<Utc>,
    /// When the user read this notification.
    #[serde(default)]
    pub read_at: Option<DateTime<Utc>>,
    /// When the user dismissed this notification.
    #[serde(default)]
    pub dismissed_at: Option<DateTime<Utc>>,
    /// When the notification expires.
    #[serde(default)]
    pub expires_at: Option<DateTime<Utc>>,
    /// Inline actions, in display order.
    #[serde(default)]
    pub actions: Vec<NotificationAction>,
    /// Optional primary external link.
    #[serde(default)]
    pub action_url: Option<String>,
    /// Label for the primary external link.
    #[serde(default)]
    pub action_label: Option<String>,
    /// Per-channel delivery markers (e.g. `in_app: delivered`).
    #[serde(default)]
    pub delivery_status: BTreeMap<DeliveryChannel, DeliveryState>,
}

impl LiveNotification {
    /// Create a new notification with a fresh id and creation timestamp.
    pub fn new(
        kind: NotificationKind,
        category: NotificationCategory,
        priority: NotificationPriority,
        title: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        Self {
            id: NotificationId::new(),
            kind,
            category,
            priority,
            title: title.into(),
            message: message.into(),
            created_at: Utc::now(),
            read_at: None,
            dismissed_at: None,
            expires_at: None,
            actions: Vec::new(),
            action_url: None,
            action_label: None,
            delivery_status: BTreeMap::new(),
        }
    }

    /// Check if the notification has not been read.
    pub fn is_unread(&self) -> bool {
        self.read_at.is_none()
    }

    /// Check if the notification has been dismissed.
    pub fn is_dismissed(&self) -> bool {
        self.dismissed_at.is_some()
    }

    /// Check if the notification has expired at the given instant.
    pub fn is_expired_at(&self, now: DateTime<Utc>) -> bool {
        self.expires_at.map(|exp| exp <= now).unwrap_or(false)
    }

    /// Check if the notification has expired.
    pub fn is_expired(&self) -> bool {
        self.is_expired_at(Utc::now())
    }

    /// Check if the notification is active at the given instant:
    /// unread, not dismissed, and not expired.
    pub fn is_active_at(&self, now: DateTime<Utc>) -> bool {
        self.is_unread() && !self.is_dismissed() && !self.is_expired_at(now)
    }

    /// Check if the notification is active now.
    pub fn is_active(&self) -> bool {
        self.is_active_at(Utc::now())
    }

    /// Set `read_at` if the notification is unread and not dismissed.
    ///
    /// Returns whether the record changed. Dismissed records never change:
    /// dismissal is terminal.
    pub fn mark_read(&mut self, at: DateTime<Utc>) -> bool {
        if self.is_dismissed() || self.read_at.is_some() {
            return false;
        }
        self.read_at = Some(at);
        true
    }

    /// Set `dismissed_at` if unset. Returns whether the record changed.
    pub fn dismiss(&mut self, at: DateTime<Utc>) -> bool {
        if self.is_dismissed() {
            return false;
        }
        self.dismissed_at = Some(at);
        true
    }

    /// Look up an inline action by its id.
    pub fn find_action(&self, action_id: &str) -> Option<&NotificationAction> {
        self.actions.iter().find(|a| a.id == action_id)
    }

    /// Record a delivery marker for a channel.
    pub fn set_delivery_state(&mut self, channel: DeliveryChannel, state: DeliveryState) {
        self.delivery_status.insert(channel, state);
    }
}
