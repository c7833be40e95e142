//! Notification kind enumeration.

use serde::{Deserialize, Serialize};

/// Visual kind of a notification, controlling icon and accent styling.
///
/// Serialized as `type` on the wire (see [`super::model::LiveNotification`]).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NotificationKind {
    /// Neutral informational notice.
    Info,
    /// A completed operation.
    Success,
    /// Something needs attention soon.
    Warning,
    /// A failed operation.
    Error,
    /// Team activity (comments, mentions, shared work).
    Collaboration,
    /// Platform-level notices.
    System,
}

impl NotificationKind {
    /// Return the kind as a string.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Info => "info",
            Self::Success => "success",
            Self::Warning => "warning",
            Self::Error => "error",
            Self::Collaboration => "collaboration",
            Self::System => "system",
        }
    }
}

impl std::fmt::Display for NotificationKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
