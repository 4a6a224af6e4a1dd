//! Birth date normalization.
//!
//! A birth date is a calendar date, but it is stored as an instant. To keep the
//! stored day stable for readers in any timezone the instant is always pinned
//! to 06:30:00 UTC of the submitted date.

use super::errors::ValidationError;
use chrono::{DateTime, NaiveDate, NaiveDateTime, NaiveTime, TimeZone, Utc};

/// Time of day every stored birth date is pinned to.
pub const BIRTH_DATE_TIME: (u32, u32, u32) = (6, 30, 0);

/// Parse a submitted birth date and pin it to 06:30:00 UTC.
///
/// Accepted forms:
/// - `YYYY-MM-DD`
/// - an RFC 3339 timestamp; the calendar date is taken in the timestamp's own offset
/// - `YYYY-MM-DDTHH:MM:SS` without an offset
///
/// # Errors
///
/// Returns `ValidationError::InvalidBirthDate` if none of the forms match.
pub fn normalize_birth_date(input: &str) -> Result<DateTime<Utc>, ValidationError> {
    let trimmed = input.trim();
    let date = parse_calendar_date(trimmed)
        .ok_or_else(|| ValidationError::InvalidBirthDate(trimmed.to_string()))?;

    let (h, m, s) = BIRTH_DATE_TIME;
    let time = NaiveTime::from_hms_opt(h, m, s)
        .ok_or_else(|| ValidationError::InvalidBirthDate(trimmed.to_string()))?;

    Ok(Utc.from_utc_datetime(&date.and_time(time)))
}

fn parse_calendar_date(input: &str) -> Option<NaiveDate> {
    if let Ok(date) = NaiveDate::parse_from_str(input, "%Y-%m-%d") {
        return Some(date);
    }
    if let Ok(ts) = DateTime::parse_from_rfc3339(input) {
        return Some(ts.date_naive());
    }
    NaiveDateTime::parse_from_str(input, "%Y-%m-%dT%H:%M:%S")
        .ok()
        .map(|dt| dt.date())
}
