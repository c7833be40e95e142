//! Per-channel delivery markers.

use serde::{Deserialize, Serialize};

/// A delivery channel for notifications.
///
/// Only `in_app` affects the toast pipeline; the other channels are
/// carried for preference round-trips with the backend.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DeliveryChannel {
    /// In-app toasts and the notification list.
    InApp,
    /// Email delivery.
    Email,
    /// Mobile push delivery.
    Push,
    /// SMS delivery.
    Sms,
}

impl DeliveryChannel {
    /// Return the channel as a string.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::InApp => "in_app",
            Self::Email => "email",
            Self::Push => "push",
            Self::Sms => "sms",
        }
    }
}

impl std::fmt::Display for DeliveryChannel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Delivery state of a notification on one channel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DeliveryState {
    /// Queued but not yet handed to the channel.
    Pending,
    /// Handed to the channel.
    Delivered,
    /// The channel rejected or dropped the notification.
    Failed,
}

impl DeliveryState {
    /// Return the state as a string.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Delivered => "delivered",
            Self::Failed => "failed",
        }
    }
}
