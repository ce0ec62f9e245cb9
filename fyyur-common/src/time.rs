//! Timestamp utilities
//!
//! Show times are stored as naive UTC wall-clock timestamps. Parsing accepts
//! the formats browsers and HTML forms commonly submit; display formatting
//! offers the `full` and `medium` styles used by the listing pages.

use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};

use crate::{Error, Result};

/// Naive datetime layouts accepted by [`parse_datetime`], tried in order
const NAIVE_FORMATS: &[&str] = &[
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M",
    "%Y-%m-%dT%H:%M",
];

/// Get current UTC timestamp
pub fn now() -> DateTime<Utc> {
    Utc::now()
}

/// Current instant as a naive UTC timestamp, comparable with stored show times
pub fn now_naive() -> NaiveDateTime {
    now().naive_utc()
}

/// Display style for [`format_naive`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DateFormat {
    /// `Tuesday May, 21, 2019 at 9:30PM`
    Full,
    /// `Tue 05, 21, 2019 9:30PM`
    Medium,
}

impl DateFormat {
    fn pattern(self) -> &'static str {
        match self {
            DateFormat::Full => "%A %B, %-d, %Y at %-I:%M%p",
            DateFormat::Medium => "%a %m, %d, %Y %-I:%M%p",
        }
    }
}

/// Parse a timestamp string into a naive UTC timestamp
///
/// RFC 3339 values with an offset are converted to UTC. Naive values are
/// taken as UTC already. A bare date means midnight.
pub fn parse_datetime(value: &str) -> Result<NaiveDateTime> {
    let value = value.trim();

    if let Ok(dt) = DateTime::parse_from_rfc3339(value) {
        return Ok(dt.naive_utc());
    }

    for format in NAIVE_FORMATS {
        if let Ok(dt) = NaiveDateTime::parse_from_str(value, format) {
            return Ok(dt);
        }
    }

    NaiveDate::parse_from_str(value, "%Y-%m-%d")
        .ok()
        .and_then(|date| date.and_hms_opt(0, 0, 0))
        .ok_or_else(|| Error::InvalidInput(format!("Unrecognised date/time: {}", value)))
}

/// Render a timestamp in the requested display style (the `datetime` filter)
pub fn format_naive(value: &NaiveDateTime, format: DateFormat) -> String {
    value.format(format.pattern()).to_string()
}
