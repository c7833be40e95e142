//! Inline notification action descriptors.

use serde::{Deserialize, Serialize};

/// Visual style of an inline action button.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ActionStyle {
    /// The emphasized default action.
    Primary,
    /// A de-emphasized alternative.
    Secondary,
    /// An action with irreversible consequences.
    Destructive,
}

impl ActionStyle {
    /// Return the style as a string.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Primary => "primary",
            Self::Secondary => "secondary",
            Self::Destructive => "destructive",
        }
    }
}

/// An inline action attached to a notification.
///
/// Actions are ordered, actionable once each, and not guaranteed
/// idempotent by the backend.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NotificationAction {
    /// Backend identifier for the action (e.g. `"approve"`).
    pub id: String,
    /// Button label.
    pub label: String,
    /// Visual style.
    pub style: ActionStyle,
    /// Optional icon name.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub icon: Option<String>,
}

impl NotificationAction {
    /// Create a new action descriptor.
    pub fn new(id: impl Into<String>, label: impl Into<String>, style: ActionStyle) -> Self {
        Self {
            id: id.into(),
            label: label.into(),
            style,
            icon: None,
        }
    }
}
