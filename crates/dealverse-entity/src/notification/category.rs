//! Notification category enumeration.

use serde::{Deserialize, Serialize};

/// Category of a notification for filtering and preference matching.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NotificationCategory {
    /// Document and data-room notifications (upload, version, share).
    Document,
    /// Collaboration notifications (comments, mentions, team activity).
    Collaboration,
    /// Platform-level notifications.
    System,
    /// Security alerts (sign-ins, permission changes).
    Security,
    /// Deal workflow notifications (stage changes, approvals, deadlines).
    Workflow,
    /// AI analysis results (model runs, anomaly detection).
    AiAnalysis,
}

impl NotificationCategory {
    /// All categories, in display order.
    pub const ALL: [NotificationCategory; 6] = [
        Self::Document,
        Self::Collaboration,
        Self::System,
        Self::Security,
        Self::Workflow,
        Self::AiAnalysis,
    ];

    /// Return the category as a string.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Document => "document",
            Self::Collaboration => "collaboration",
            Self::System => "system",
            Self::Security => "security",
            Self::Workflow => "workflow",
            Self::AiAnalysis => "ai_analysis",
        }
    }
}

impl std::fmt::Display for NotificationCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
