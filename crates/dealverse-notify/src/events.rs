//! Events published to the presentation layer.

use serde::{Deserialize, Serialize};

use dealverse_core::types::NotificationId;
use dealverse_entity::activity::ActivityEntry;
use dealverse_entity::notification::LiveNotification;

use crate::digest::DigestSummary;
use crate::source::ConnectionStatus;
use crate::toast::Toast;

/// Why a toast left the overlay.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ToastCloseReason {
    /// The countdown reached zero.
    Expired,
    /// The user dismissed the toast or its notification.
    Dismissed,
    /// An inline action completed.
    Action,
    /// Pushed out by newer toasts past the queue limit.
    Evicted,
}

/// Messages the engine broadcasts to UI subscribers.
///
/// Consumers render these; the engine never draws anything itself.
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum UiEvent {
    /// A notification entered the store.
    NotificationAdded {
        /// The new record.
        notification: LiveNotification,
    },
    /// A stored notification changed state.
    NotificationUpdated {
        /// The updated record.
        notification: LiveNotification,
    },
    /// Unread/total counts changed.
    UnreadCount {
        /// Active (unread, undismissed, unexpired) records.
        unread: usize,
        /// Non-dismissed records.
        total: usize,
    },
    /// A toast entered the overlay.
    ToastPushed {
        /// The toast as it should first render.
        toast: Toast,
    },
    /// A toast countdown advanced, paused, or resumed.
    ToastProgress {
        /// Notification backing the toast.
        id: NotificationId,
        /// Remaining progress, 100.0 down to 0.0.
        progress: f32,
        /// Whether the countdown is currently paused.
        paused: bool,
    },
    /// A toast left the overlay.
    ToastRemoved {
        /// Notification backing the toast.
        id: NotificationId,
        /// Why it was removed.
        reason: ToastCloseReason,
    },
    /// A new activity feed entry arrived.
    ActivityAdded {
        /// The immutable entry.
        entry: ActivityEntry,
    },
    /// The push source connection changed state.
    Connection {
        /// Current status.
        status: ConnectionStatus,
    },
    /// A backend write failed after local state was already updated.
    BackendError {
        /// What the engine was doing.
        context: String,
        /// Error description.
        message: String,
    },
    /// Quiet hours ended with deferred notifications collected.
    DigestReady {
        /// Summary of what arrived during the window.
        summary: DigestSummary,
    },
}
