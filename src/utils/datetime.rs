//! Date and time utility functions
//!
//! This module holds the date formats written into notes and the parsing of
//! timestamps reported by remote task services.

use chrono::{DateTime, Local, NaiveDate, NaiveDateTime, NaiveTime};
use std::fmt::Write;
use std::time::SystemTime;

/// Date format used for completion markers and note templates
pub const NOTE_DATE_FORMAT: &str = "%Y-%m-%d";

/// Wall-clock format used when sending dates to the remote service
pub const REMOTE_DATETIME_FORMAT: &str = "%Y-%m-%dT%H:%M:%S";

/// Parse a date string in YYYY-MM-DD format to NaiveDate
///
/// # Arguments
/// * `date_str` - Date string in YYYY-MM-DD format
///
/// # Returns
/// * `Result<NaiveDate, chrono::ParseError>` - Parsed date or parse error
pub fn parse_date(date_str: &str) -> Result<NaiveDate, chrono::ParseError> {
    NaiveDate::parse_from_str(date_str, NOTE_DATE_FORMAT)
}

/// Format a NaiveDate to YYYY-MM-DD string
pub fn format_ymd(d: NaiveDate) -> String {
    d.format(NOTE_DATE_FORMAT).to_string()
}

/// Format `d` with a user-supplied chrono format.
///
/// Returns `None` when the format contains an item a date cannot render, where
/// `to_string()` would panic.
pub fn render_date(d: NaiveDate, format: &str) -> Option<String> {
    let mut rendered = String::new();
    write!(rendered, "{}", d.format(format)).ok()?;
    Some(rendered)
}

/// Current local date
pub fn today() -> NaiveDate {
    Local::now().date_naive()
}

/// Parse a remote timestamp into the wall-clock time it names.
///
/// Accepts, in order:
/// - RFC3339 with an offset (e.g., "2024-01-01T10:00:00Z"); the offset is dropped
///   and the time is kept as written
/// - ISO 8601 without an offset, with or without fractional seconds
///   (e.g., "2024-01-01T10:00:00.0000000")
/// - a bare date (e.g., "2024-01-01"), read as midnight
///
/// # Returns
/// * `Option<NaiveDateTime>` - Parsed timestamp, `None` if no format matched
pub fn parse_remote_timestamp(value: &str) -> Option<NaiveDateTime> {
    let value = value.trim();
    if let Ok(dt) = DateTime::parse_from_rfc3339(value) {
        Some(dt.naive_local())
    } else if let Ok(dt) = NaiveDateTime::parse_from_str(value, "%Y-%m-%dT%H:%M:%S%.f") {
        Some(dt)
    } else if let Ok(d) = parse_date(value) {
        Some(d.and_time(NaiveTime::MIN))
    } else {
        None
    }
}

/// Truncate a timestamp to its calendar date.
///
/// No timezone conversion happens: `2024-01-01T23:30:00Z` is `2024-01-01` even
/// for a reader east of UTC.
pub fn truncate_to_date(timestamp: NaiveDateTime) -> NaiveDate {
    timestamp.date()
}

/// Format a date as a midnight wall-clock timestamp for the remote service
pub fn format_remote_date(d: NaiveDate) -> String {
    d.and_time(NaiveTime::MIN).format(REMOTE_DATETIME_FORMAT).to_string()
}

/// Local calendar date of a filesystem timestamp
pub fn local_date_of(time: SystemTime) -> NaiveDate {
    DateTime::<Local>::from(time).date_naive()
}
