//! Quiet-hours window evaluation in the user's timezone.

use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use chrono_tz::Tz;
use tracing::warn;

use dealverse_entity::notification::QuietHours;

fn parse_hhmm(value: &str) -> Option<NaiveTime> {
    NaiveTime::parse_from_str(value, "%H:%M").ok()
}

/// Resolve an IANA timezone name, falling back to UTC.
pub fn resolve_timezone(name: &str) -> Tz {
    match name.parse::<Tz>() {
        Ok(tz) => tz,
        Err(_) => {
            warn!(timezone = %name, "Unknown timezone in preferences, falling back to UTC");
            Tz::UTC
        }
    }
}

/// The calendar date at `now` in the given timezone.
pub fn local_date(timezone: &str, now: DateTime<Utc>) -> NaiveDate {
    now.with_timezone(&resolve_timezone(timezone)).date_naive()
}

/// Whether `now` falls inside the quiet-hours window.
///
/// The window is `[start, end)` wall-clock time in the configured
/// timezone and may wrap past midnight. `start == end` denotes an empty
/// window. An unparseable start or end disables the window.
pub fn is_quiet(quiet: &QuietHours, now: DateTime<Utc>) -> bool {
    if !quiet.enabled {
        return false;
    }
    let (Some(start), Some(end)) = (parse_hhmm(&quiet.start), parse_hhmm(&quiet.end)) else {
        warn!(
            start = %quiet.start,
            end = %quiet.end,
            "Unparseable quiet hours window, ignoring"
        );
        return false;
    };
    if start == end {
        return false;
    }

    let tz = resolve_timezone(&quiet.timezone);
    let local = now.with_timezone(&tz).time();
    if start < end {
        start <= local && local < end
    } else {
        // Wraps past midnight, e.g. 22:00 to 08:00.
        local >= start || local < end
    }
}
