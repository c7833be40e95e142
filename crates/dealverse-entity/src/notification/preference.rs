//! Per-user notification preferences.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use dealverse_core::types::UserId;

use super::category::NotificationCategory;
use super::delivery::DeliveryChannel;
use super::priority::NotificationPriority;

/// Per-channel delivery toggles.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ChannelToggles {
    pub in_app: bool,
    pub email: bool,
    pub push: bool,
    pub sms: bool,
}

impl Default for ChannelToggles {
    fn default() -> Self {
        Self {
            in_app: true,
            email: false,
            push: false,
            sms: false,
        }
    }
}

impl ChannelToggles {
    /// Check whether a delivery channel is enabled.
    pub fn enabled(&self, channel: DeliveryChannel) -> bool {
        match channel {
            DeliveryChannel::InApp => self.in_app,
            DeliveryChannel::Email => self.email,
            DeliveryChannel::Push => self.push,
            DeliveryChannel::Sms => self.sms,
        }
    }
}

/// Per-category opt-in toggles. Every category defaults to enabled.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CategoryToggles {
    pub document: bool,
    pub collaboration: bool,
    pub system: bool,
    pub security: bool,
    pub workflow: bool,
    pub ai_analysis: bool,
}

impl Default for CategoryToggles {
    fn default() -> Self {
        Self {
            document: true,
            collaboration: true,
            system: true,
            security: true,
            workflow: true,
            ai_analysis: true,
        }
    }
}

impl CategoryToggles {
    /// Check whether a category is enabled.
    pub fn enabled(&self, category: NotificationCategory) -> bool {
        match category {
            NotificationCategory::Document => self.document,
            NotificationCategory::Collaboration => self.collaboration,
            NotificationCategory::System => self.system,
            NotificationCategory::Security => self.security,
            NotificationCategory::Workflow => self.workflow,
            NotificationCategory::AiAnalysis => self.ai_analysis,
        }
    }
}

/// A daily window during which toast pop-ups are suppressed.
///
/// `start` and `end` are wall-clock times as `"HH:MM"` strings in the
/// given IANA timezone. A window where `end` is earlier than `start`
/// wraps past midnight.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct QuietHours {
    pub enabled: bool,
    pub start: String,
    pub end: String,
    pub timezone: String,
}

impl Default for QuietHours {
    fn default() -> Self {
        Self {
            enabled: false,
            start: "22:00".to_string(),
            end: "08:00".to_string(),
            timezone: "UTC".to_string(),
        }
    }
}

/// The full preference record for a user.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct NotificationPreferences {
    /// Owning user, when known.
    pub user_id: Option<UserId>,
    /// Delivery channel toggles.
    pub channels: ChannelToggles,
    /// Category opt-ins.
    pub categories: CategoryToggles,
    /// Notifications below this priority are filtered out.
    pub minimum_priority: NotificationPriority,
    /// Daily toast suppression window.
    pub quiet_hours: QuietHours,
    /// Collect quiet-hours arrivals into a digest.
    pub digest_enabled: bool,
    /// Daily toast cap. Zero means unlimited.
    pub max_toasts_per_day: u32,
    /// Last server-side update.
    pub updated_at: Option<DateTime<Utc>>,
}

impl NotificationPreferences {
    /// Preferences for a specific user, everything else defaulted.
    pub fn for_user(user_id: UserId) -> Self {
        Self {
            user_id: Some(user_id),
            ..Self::default()
        }
    }
}
