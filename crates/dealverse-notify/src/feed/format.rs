//! Presentation helpers for activity feed entries.

use chrono::{DateTime, Duration, Utc};
use serde::Serialize;

use dealverse_entity::activity::{ActivityEntry, ActivityType};

/// Render-ready view of a feed entry.
#[derive(Debug, Clone, Serialize)]
pub struct ActivityPresentation {
    pub headline: String,
    pub detail: Option<String>,
    pub icon: &'static str,
    pub color: &'static str,
    pub relative_time: String,
}

/// Formats activity entries for display.
pub struct ActivityFormatter;

impl ActivityFormatter {
    /// Build the full presentation for an entry, timestamped relative to `now`.
    pub fn present(entry: &ActivityEntry, now: DateTime<Utc>) -> ActivityPresentation {
        ActivityPresentation {
            headline: Self::headline(entry),
            detail: entry.detail.clone(),
            icon: Self::icon(entry.activity_type),
            color: Self::color(entry.activity_type),
            relative_time: Self::relative_time(entry.timestamp, now),
        }
    }

    /// One-line summary of who did what.
    pub fn headline(entry: &ActivityEntry) -> String {
        let actor = &entry.actor;
        let subject = &entry.subject;
        match entry.activity_type {
            ActivityType::DocumentCreated => format!("{} added '{}'", actor, subject),
            ActivityType::DocumentUpdated => format!("{} updated '{}'", actor, subject),
            ActivityType::CommentAdded => format!("{} commented on '{}'", actor, subject),
            ActivityType::DealStageChanged => {
                format!("{} moved '{}' to a new stage", actor, subject)
            }
            ActivityType::ClientAdded => format!("{} added client '{}'", actor, subject),
            ActivityType::ModelUpdated => {
                format!("{} updated the model for '{}'", actor, subject)
            }
            ActivityType::ComplianceFlagged => {
                format!("{} flagged '{}' for compliance review", actor, subject)
            }
            ActivityType::MemberJoined => format!("{} joined {}", actor, subject),
        }
    }

    /// Icon name for the entry's activity type.
    pub fn icon(activity_type: ActivityType) -> &'static str {
        match activity_type {
            ActivityType::DocumentCreated => "file-plus",
            ActivityType::DocumentUpdated => "file-pen",
            ActivityType::CommentAdded => "message-square",
            ActivityType::DealStageChanged => "trending-up",
            ActivityType::ClientAdded => "user-plus",
            ActivityType::ModelUpdated => "calculator",
            ActivityType::ComplianceFlagged => "shield-alert",
            ActivityType::MemberJoined => "users",
        }
    }

    /// Accent color for the entry's activity type.
    pub fn color(activity_type: ActivityType) -> &'static str {
        match activity_type {
            ActivityType::DocumentCreated => "blue",
            ActivityType::DocumentUpdated => "sky",
            ActivityType::CommentAdded => "violet",
            ActivityType::DealStageChanged => "emerald",
            ActivityType::ClientAdded => "teal",
            ActivityType::ModelUpdated => "indigo",
            ActivityType::ComplianceFlagged => "red",
            ActivityType::MemberJoined => "green",
        }
    }

    /// Human-readable age of a timestamp.
    ///
    /// Entries older than a week fall back to an absolute date.
    pub fn relative_time(at: DateTime<Utc>, now: DateTime<Utc>) -> String {
        let elapsed = now.signed_duration_since(at);
        if elapsed < Duration::zero() {
            // Clock skew between server and client; treat as fresh.
            return "just now".to_string();
        }
        if elapsed.num_seconds() < 60 {
            "just now".to_string()
        } else if elapsed.num_minutes() < 60 {
            format!("{}m ago", elapsed.num_minutes())
        } else if elapsed.num_hours() < 24 {
            format!("{}h ago", elapsed.num_hours())
        } else if elapsed.num_days() < 7 {
            format!("{}d ago", elapsed.num_days())
        } else {
            at.format("%b %-d, %Y").to_string()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn at(secs_before: i64, now: DateTime<Utc>) -> DateTime<Utc> {
        now - Duration::seconds(secs_before)
    }

    #[test]
    fn test_relative_time_buckets() {
        let now = Utc.with_ymd_and_hms(2025, 6, 15, 12, 0, 0).unwrap();

        assert_eq!(ActivityFormatter::relative_time(at(0, now), now), "just now");
        assert_eq!(ActivityFormatter::relative_time(at(59, now), now), "just now");
        assert_eq!(ActivityFormatter::relative_time(at(60, now), now), "1m ago");
        assert_eq!(ActivityFormatter::relative_time(at(59 * 60, now), now), "59m ago");
        assert_eq!(ActivityFormatter::relative_time(at(60 * 60, now), now), "1h ago");
        assert_eq!(ActivityFormatter::relative_time(at(23 * 3600, now), now), "23h ago");
        assert_eq!(ActivityFormatter::relative_time(at(24 * 3600, now), now), "1d ago");
        assert_eq!(ActivityFormatter::relative_time(at(6 * 86400, now), now), "6d ago");
        assert_eq!(
            ActivityFormatter::relative_time(at(7 * 86400, now), now),
            "Jun 8, 2025"
        );
    }

    #[test]
    fn test_relative_time_future_timestamp_is_just_now() {
        let now = Utc.with_ymd_and_hms(2025, 6, 15, 12, 0, 0).unwrap();
        let ahead = now + Duration::seconds(30);
        assert_eq!(ActivityFormatter::relative_time(ahead, now), "just now");
    }

    #[test]
    fn test_headline_phrasing() {
        let entry = ActivityEntry::new(
            ActivityType::CommentAdded,
            "Sarah Chen",
            "Project Apollo CIM",
        );
        assert_eq!(
            ActivityFormatter::headline(&entry),
            "Sarah Chen commented on 'Project Apollo CIM'"
        );
    }

    #[test]
    fn test_every_activity_type_has_icon_and_color() {
        for activity_type in ActivityType::ALL {
            assert!(!ActivityFormatter::icon(activity_type).is_empty());
            assert!(!ActivityFormatter::color(activity_type).is_empty());
        }
    }

    #[test]
    fn test_present_carries_detail() {
        let now = Utc::now();
        let mut entry = ActivityEntry::new(
            ActivityType::DealStageChanged,
            "Marcus Webb",
            "Meridian Acquisition",
        );
        entry.detail = Some("Due Diligence -> Negotiation".to_string());
        let view = ActivityFormatter::present(&entry, now);
        assert_eq!(view.detail.as_deref(), Some("Due Diligence -> Negotiation"));
        assert_eq!(view.icon, "trending-up");
        assert_eq!(view.relative_time, "just now");
    }
}
