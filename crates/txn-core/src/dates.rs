//! Date parsing for transaction records and query boundaries.
//!
//! All dates are treated as local-naive wall-clock values. Strings carrying an
//! explicit UTC offset are normalised to UTC before the offset is dropped.

use chrono::{DateTime, NaiveDate, NaiveDateTime};
use tracing::debug;

use crate::error::{AnalyzerError, Result};

/// Date-time layouts tried after RFC 3339, in order.
const DATETIME_FORMATS: &[&str] = &[
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%dT%H:%M:%S",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%d %H:%M",
];

/// Date-only layouts; these resolve to midnight.
const DATE_FORMATS: &[&str] = &["%Y-%m-%d", "%Y/%m/%d", "%m/%d/%Y"];

/// Parse a date or date-time string into a [`NaiveDateTime`].
///
/// Accepts RFC 3339 (with `Z` or a numeric offset), ISO-like date-times with
/// either `T` or a space separator, and plain dates. Surrounding whitespace is
/// ignored.
pub fn parse_date(s: &str) -> Result<NaiveDateTime> {
    let trimmed = s.trim();
    if trimmed.is_empty() {
        return Err(AnalyzerError::UnparseableDate(s.to_string()));
    }

    if let Ok(dt) = DateTime::parse_from_rfc3339(trimmed) {
        return Ok(dt.naive_utc());
    }

    for fmt in DATETIME_FORMATS {
        if let Ok(naive) = NaiveDateTime::parse_from_str(trimmed, fmt) {
            return Ok(naive);
        }
    }

    for fmt in DATE_FORMATS {
        if let Ok(date) = NaiveDate::parse_from_str(trimmed, fmt) {
            return Ok(date.and_time(chrono::NaiveTime::MIN));
        }
    }

    debug!("could not parse date \"{}\"", s);
    Err(AnalyzerError::UnparseableDate(s.to_string()))
}

/// The `"YYYY-MM"` grouping key of a date literal.
///
/// Taken from the first seven characters of the raw string, without parsing.
/// Shorter literals are returned whole.
pub fn month_key(date: &str) -> String {
    date.chars().take(7).collect()
}
