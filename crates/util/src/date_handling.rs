//! # Date Handling Utilities
//!
//! Formatting helpers for execution timestamps shown in tables and detail panes.

use chrono::{DateTime, Local, Utc};

/// Formats a UTC timestamp in the local timezone as `YYYY-MM-DD HH:MM:SS`.
pub fn format_timestamp(timestamp: &DateTime<Utc>) -> String {
    timestamp.with_timezone(&Local).format("%Y-%m-%d %H:%M:%S").to_string()
}

/// Formats the age of `timestamp` relative to `now` (`just now`, `5m ago`,
/// `3h ago`, `2d ago`). Timestamps in the future are reported as `just now`.
pub fn format_relative_age(timestamp: &DateTime<Utc>, now: DateTime<Utc>) -> String {
    let elapsed = now.signed_duration_since(*timestamp);
    let seconds = elapsed.num_seconds();
    if seconds < 60 {
        return "just now".to_string();
    }
    let minutes = elapsed.num_minutes();
    if minutes < 60 {
        return format!("{minutes}m ago");
    }
    let hours = elapsed.num_hours();
    if hours < 48 {
        return format!("{hours}h ago");
    }
    format!("{}d ago", elapsed.num_days())
}
