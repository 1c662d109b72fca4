//! Shared formatting helpers.

use chrono::{DateTime, Utc};
use std::time::Duration;

/// Formats a timestamp the way account creation dates are displayed.
pub fn format_timestamp(timestamp: DateTime<Utc>) -> String {
    timestamp.format("%a %b %d %Y at %I:%M %p UTC").to_string()
}

/// Formats an uptime as `{days}d {hours}h {minutes}m {seconds}s`.
pub fn format_uptime(uptime: Duration) -> String {
    let total = uptime.as_secs();
    let (hours, remainder) = (total / 3600, total % 3600);
    let (minutes, seconds) = (remainder / 60, remainder % 60);
    let (days, hours) = (hours / 24, hours % 24);

    format!("{days}d {hours}h {minutes}m {seconds}s")
}

/// Truncates a string to at most `max_chars` characters, ending with an ellipsis.
///
/// Counts characters rather than bytes so multi-byte names never split.
pub fn truncate_string(input: &str, max_chars: usize) -> String {
    if input.chars().count() <= max_chars {
        return input.to_string();
    }

    let kept: String = input.chars().take(max_chars.saturating_sub(3)).collect();
    format!("{kept}...")
}
