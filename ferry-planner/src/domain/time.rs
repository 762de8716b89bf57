//! Date/time and duration handling for trip data.
//!
//! Datasets are collected by hand from operator websites, so times arrive
//! as text in a couple of common shapes. This module turns them into
//! `chrono` values and back.

use chrono::{Duration, NaiveDateTime};

use super::DataError;

/// Accepted date/time layouts, tried in order.
const DATETIME_FORMATS: &[&str] = &["%Y-%m-%d %H:%M", "%Y-%m-%dT%H:%M", "%Y-%m-%dT%H:%M:%S"];

/// Parse a date/time such as `2024-07-01 08:30`.
///
/// # Examples
///
/// ```
/// use ferry_planner::domain::parse_datetime;
///
/// let dt = parse_datetime("2024-07-01 08:30").unwrap();
/// assert_eq!(dt.to_string(), "2024-07-01 08:30:00");
///
/// assert!(parse_datetime("2024-07-01T08:30").is_ok());
/// assert!(parse_datetime("01/07/2024 08:30").is_err());
/// ```
pub fn parse_datetime(s: &str) -> Result<NaiveDateTime, DataError> {
    let s = s.trim();
    DATETIME_FORMATS
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(s, fmt).ok())
        .ok_or_else(|| DataError::InvalidDateTime(s.to_string()))
}

/// Format a date/time as `YYYY-MM-DD HH:MM`.
pub fn format_datetime(dt: &NaiveDateTime) -> String {
    dt.format("%Y-%m-%d %H:%M").to_string()
}

/// Parse a duration given as `H:MM`.
///
/// The sign is kept so that the caller can reject negative durations with
/// a message naming the offending record.
///
/// # Examples
///
/// ```
/// use ferry_planner::domain::parse_hmm;
/// use chrono::Duration;
///
/// assert_eq!(parse_hmm("1:30").unwrap(), Duration::minutes(90));
/// assert_eq!(parse_hmm("-0:45").unwrap(), Duration::minutes(-45));
/// assert!(parse_hmm("1:75").is_err());
/// assert!(parse_hmm("90").is_err());
/// ```
pub fn parse_hmm(s: &str) -> Result<Duration, DataError> {
    let invalid = || DataError::InvalidDuration(s.to_string());
    let trimmed = s.trim();
    let (negative, body) = match trimmed.strip_prefix('-') {
        Some(rest) => (true, rest),
        None => (false, trimmed),
    };

    let (hours, minutes) = body.split_once(':').ok_or_else(invalid)?;
    if minutes.len() != 2 {
        return Err(invalid());
    }
    let hours: i64 = hours.parse().map_err(|_| invalid())?;
    let minutes: i64 = minutes.parse().map_err(|_| invalid())?;
    if hours < 0 || !(0..60).contains(&minutes) {
        return Err(invalid());
    }

    let total = hours
        .checked_mul(60)
        .and_then(|h| h.checked_add(minutes))
        .ok_or_else(invalid)?;
    Duration::try_minutes(if negative { -total } else { total }).ok_or_else(invalid)
}

/// A whole number of minutes as a duration.
///
/// # Errors
///
/// Returns `InvalidDuration` for counts too large to represent.
///
/// # Examples
///
/// ```
/// use ferry_planner::domain::minutes;
/// use chrono::Duration;
///
/// assert_eq!(minutes(90).unwrap(), Duration::minutes(90));
/// assert!(minutes(i64::MAX).is_err());
/// ```
pub fn minutes(count: i64) -> Result<Duration, DataError> {
    Duration::try_minutes(count).ok_or_else(|| DataError::InvalidDuration(format!("{count} minutes")))
}

/// Format a duration as `H:MM`.
///
/// # Examples
///
/// ```
/// use ferry_planner::domain::format_hmm;
/// use chrono::Duration;
///
/// assert_eq!(format_hmm(Duration::minutes(95)), "1:35");
/// assert_eq!(format_hmm(Duration::minutes(-5)), "-0:05");
/// ```
pub fn format_hmm(d: Duration) -> String {
    let mins = d.num_minutes();
    let sign = if mins < 0 { "-" } else { "" };
    let abs = mins.unsigned_abs();
    format!("{sign}{}:{:02}", abs / 60, abs % 60)
}
