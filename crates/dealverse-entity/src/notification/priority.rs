//! Notification priority levels.

use serde::{Deserialize, Serialize};

/// Notification priority levels.
///
/// The derived ordering follows declaration order:
/// `Low < Medium < High < Urgent`. The preference gate compares against
/// the user's minimum threshold with this ordering.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(rename_all = "snake_case")]
pub enum NotificationPriority {
    /// Background events.
    #[default]
    Low,
    /// Standard events.
    Medium,
    /// Important events.
    High,
    /// Requires immediate attention.
    Urgent,
}

impl NotificationPriority {
    /// Return the priority as a string.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Low => "low",
            Self::Medium => "medium",
            Self::High => "high",
            Self::Urgent => "urgent",
        }
    }

    /// Whether this priority meets a minimum threshold.
    pub fn meets(&self, minimum: NotificationPriority) -> bool {
        *self >= minimum
    }
}

impl std::fmt::Display for NotificationPriority {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
