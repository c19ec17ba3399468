//! Parsing of server-provided failure dates and countdown computation.
//!
//! The prediction service sends `predicted_failure_date` as a free-form
//! string. The dashboard shows it verbatim; this module only derives the
//! "days until failure" countdown when the string is a recognised date.

use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};

use crate::types::Timestamp;

/// Format emitted by the prediction service.
const SERVICE_DATETIME_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

const DATE_ONLY_FORMAT: &str = "%Y-%m-%d";

/// Parse a failure date string.
///
/// Accepts `YYYY-MM-DD HH:MM:SS` (assumed UTC), RFC 3339, or a bare
/// `YYYY-MM-DD` (midnight UTC). Returns `None` for anything else.
pub fn parse_failure_date(raw: &str) -> Option<Timestamp> {
    let raw = raw.trim();

    if let Ok(naive) = NaiveDateTime::parse_from_str(raw, SERVICE_DATETIME_FORMAT) {
        return Some(naive.and_utc());
    }
    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Some(dt.with_timezone(&Utc));
    }
    if let Ok(date) = NaiveDate::parse_from_str(raw, DATE_ONLY_FORMAT) {
        return date.and_hms_opt(0, 0, 0).map(|naive| naive.and_utc());
    }

    tracing::debug!(raw, "Unrecognised failure date format");
    None
}

/// Whole days from `now` until the failure date, truncated toward zero.
///
/// Negative when the date is already in the past. `None` if the date cannot
/// be parsed.
pub fn days_until_failure(raw: &str, now: Timestamp) -> Option<i64> {
    parse_failure_date(raw).map(|date| date.signed_duration_since(now).num_days())
}
