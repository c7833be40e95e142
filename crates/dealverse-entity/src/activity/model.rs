//! Activity timeline entries.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use dealverse_core::types::ActivityId;

/// The kind of action an activity entry records.
///
/// Closed set: an unrecognized wire value fails deserialization and the
/// event is dropped upstream.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ActivityType {
    DocumentCreated,
    DocumentUpdated,
    CommentAdded,
    DealStageChanged,
    ClientAdded,
    ModelUpdated,
    ComplianceFlagged,
    MemberJoined,
}

impl ActivityType {
    /// All activity types.
    pub const ALL: [ActivityType; 8] = [
        Self::DocumentCreated,
        Self::DocumentUpdated,
        Self::CommentAdded,
        Self::DealStageChanged,
        Self::ClientAdded,
        Self::ModelUpdated,
        Self::ComplianceFlagged,
        Self::MemberJoined,
    ];

    /// Return the activity type as a string.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::DocumentCreated => "document_created",
            Self::DocumentUpdated => "document_updated",
            Self::CommentAdded => "comment_added",
            Self::DealStageChanged => "deal_stage_changed",
            Self::ClientAdded => "client_added",
            Self::ModelUpdated => "model_updated",
            Self::ComplianceFlagged => "compliance_flagged",
            Self::MemberJoined => "member_joined",
        }
    }
}

impl std::fmt::Display for ActivityType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// One row in the activity timeline. Immutable once received.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ActivityEntry {
    /// Unique entry identifier.
    pub id: ActivityId,
    /// What happened.
    pub activity_type: ActivityType,
    /// Display name of the user who acted.
    pub actor: String,
    /// What was acted on (document title, deal name, ...).
    pub subject: String,
    /// Optional extra context line.
    #[serde(default)]
    pub detail: Option<String>,
    /// When the action happened.
    pub timestamp: DateTime<Utc>,
}

impl ActivityEntry {
    /// Create a new entry stamped with the current time.
    pub fn new(
        activity_type: ActivityType,
        actor: impl Into<String>,
        subject: impl Into<String>,
    ) -> Self {
        Self {
            id: ActivityId::new(),
            activity_type,
            actor: actor.into(),
            subject: subject.into(),
            detail: None,
            timestamp: Utc::now(),
        }
    }
}
