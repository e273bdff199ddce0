//! Best-effort coercion of cells to timestamps and numbers.
//!
//! Every function here returns `None` on failure. A cell that cannot be
//! coerced is a missing value to the caller, never an error.

use chrono::{DateTime, NaiveDate, NaiveDateTime, NaiveTime};
use once_cell::sync::Lazy;
use regex::Regex;

use crate::input::Cell;

// Ordinal day suffixes ("5th", "1st") are dropped before format matching.
static ORDINAL_SUFFIX: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)\b(\d{1,2})(st|nd|rd|th)\b").expect("valid ordinal regex"));

// Anything that could be a date has at least one digit and one separator or letter.
static DATE_SHAPE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\d.*[-/.\sA-Za-z,]|[A-Za-z].*\d").expect("valid date shape regex"));

const DATETIME_FORMATS: &[&str] = &[
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M",
    "%Y-%m-%dT%H:%M",
    "%Y/%m/%d %H:%M:%S",
    "%Y/%m/%d %H:%M",
    "%m/%d/%Y %H:%M:%S",
    "%m/%d/%Y %H:%M",
];

const DATE_FORMATS: &[&str] = &[
    "%Y-%m-%d",
    "%Y/%m/%d",
    "%m/%d/%Y",
    "%d.%m.%Y",
    "%b %d, %Y",
    "%B %d, %Y",
    "%b %d %Y",
    "%B %d %Y",
    "%d %b %Y",
    "%d %B %Y",
];

/// Coerce a cell to a timestamp.
///
/// Numbers are never treated as dates.
pub fn to_timestamp(cell: &Cell) -> Option<NaiveDateTime> {
    match cell {
        Cell::Date(dt) => Some(*dt),
        Cell::Text(text) => parse_datetime(text),
        Cell::Number(_) | Cell::Missing => None,
    }
}

/// Coerce a cell to a number. `NaN` counts as missing.
pub fn to_number(cell: &Cell) -> Option<f64> {
    match cell {
        Cell::Number(n) if !n.is_nan() => Some(*n),
        Cell::Text(text) => parse_number(text),
        _ => None,
    }
}

/// Check whether a cell converts to a number without losing information.
///
/// Missing cells pass (they stay missing); dates and non-numeric text fail.
pub fn is_numeric_convertible(cell: &Cell) -> bool {
    match cell {
        Cell::Number(_) | Cell::Missing => true,
        Cell::Text(text) => text.trim().parse::<f64>().is_ok(),
        Cell::Date(_) => false,
    }
}

/// Parse numeric text.
pub fn parse_number(text: &str) -> Option<f64> {
    text.trim().parse::<f64>().ok().filter(|n| !n.is_nan())
}

/// Parse a calendar date or date/time from text.
pub fn parse_datetime(text: &str) -> Option<NaiveDateTime> {
    let trimmed = text.trim();
    if trimmed.is_empty() || !DATE_SHAPE.is_match(trimmed) {
        return None;
    }
    // Bare numbers ("2024", "1.5e3") are values, not dates.
    if trimmed.parse::<f64>().is_ok() {
        return None;
    }

    if let Ok(dt) = DateTime::parse_from_rfc3339(trimmed) {
        return Some(dt.naive_utc());
    }

    let cleaned = ORDINAL_SUFFIX.replace_all(trimmed, "$1");
    let cleaned = cleaned.as_ref();

    for format in DATETIME_FORMATS {
        if let Ok(dt) = NaiveDateTime::parse_from_str(cleaned, format) {
            return Some(dt);
        }
    }

    for format in DATE_FORMATS {
        if let Ok(date) = NaiveDate::parse_from_str(cleaned, format) {
            return Some(date.and_time(NaiveTime::MIN));
        }
    }

    // Year-month ("2024-03") means the first of the month.
    NaiveDate::parse_from_str(&format!("{}-01", cleaned), "%Y-%m-%d")
        .ok()
        .map(|date| date.and_time(NaiveTime::MIN))
}
