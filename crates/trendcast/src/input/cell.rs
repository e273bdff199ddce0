//! Typed cell values and column storage classification.

use std::fmt;

use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};

/// A single value read from a spreadsheet or delimited file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "value", rename_all = "snake_case")]
pub enum Cell {
    /// A calendar date/time the reader already recognised.
    Date(NaiveDateTime),
    /// A numeric value.
    Number(f64),
    /// Free text, possibly a date or number in disguise.
    Text(String),
    /// Empty, error or null-token cell.
    Missing,
}

impl Cell {
    /// Build a cell from raw delimited text.
    ///
    /// Null tokens become [`Cell::Missing`], anything `f64` accepts becomes
    /// [`Cell::Number`], and the rest stays [`Cell::Text`]. Dates are left as
    /// text; recognising them is the prober's job.
    pub fn from_text(raw: &str) -> Self {
        if is_null_token(raw) {
            return Cell::Missing;
        }
        match raw.trim().parse::<f64>() {
            Ok(n) if !n.is_nan() => Cell::Number(n),
            _ => Cell::Text(raw.to_string()),
        }
    }

    /// Returns true for [`Cell::Missing`].
    pub fn is_missing(&self) -> bool {
        matches!(self, Cell::Missing)
    }

    /// Short tag used in logs and metadata.
    pub fn kind_name(&self) -> &'static str {
        match self {
            Cell::Date(_) => "date",
            Cell::Number(_) => "number",
            Cell::Text(_) => "text",
            Cell::Missing => "missing",
        }
    }
}

impl fmt::Display for Cell {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Cell::Date(dt) => write!(f, "{}", dt.format("%Y-%m-%d %H:%M:%S")),
            Cell::Number(n) => write!(f, "{}", n),
            Cell::Text(s) => write!(f, "{}", s),
            Cell::Missing => Ok(()),
        }
    }
}

impl From<f64> for Cell {
    fn from(value: f64) -> Self {
        Cell::Number(value)
    }
}

impl From<i64> for Cell {
    fn from(value: i64) -> Self {
        Cell::Number(value as f64)
    }
}

impl From<&str> for Cell {
    fn from(value: &str) -> Self {
        Cell::Text(value.to_string())
    }
}

impl From<String> for Cell {
    fn from(value: String) -> Self {
        Cell::Text(value)
    }
}

impl From<NaiveDateTime> for Cell {
    fn from(value: NaiveDateTime) -> Self {
        Cell::Date(value)
    }
}

impl From<NaiveDate> for Cell {
    fn from(value: NaiveDate) -> Self {
        Cell::Date(value.and_time(chrono::NaiveTime::MIN))
    }
}

impl<T: Into<Cell>> From<Option<T>> for Cell {
    fn from(value: Option<T>) -> Self {
        value.map(Into::into).unwrap_or(Cell::Missing)
    }
}

/// Physical representation of a whole column, analogous to a dataframe dtype.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StorageKind {
    /// Only numbers and missing values (an all-missing column counts here).
    Numeric,
    /// Only dates and missing values, with at least one date.
    Temporal,
    /// Text, or a mix of kinds.
    Mixed,
}

impl StorageKind {
    /// Classify a column from its cells.
    pub fn of(cells: &[Cell]) -> Self {
        let mut has_date = false;
        let mut has_number = false;

        for cell in cells {
            match cell {
                Cell::Text(_) => return StorageKind::Mixed,
                Cell::Date(_) => has_date = true,
                Cell::Number(_) => has_number = true,
                Cell::Missing => {}
            }
            if has_date && has_number {
                return StorageKind::Mixed;
            }
        }

        if has_date {
            StorageKind::Temporal
        } else {
            StorageKind::Numeric
        }
    }
}

impl fmt::Display for StorageKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StorageKind::Numeric => write!(f, "numeric"),
            StorageKind::Temporal => write!(f, "temporal"),
            StorageKind::Mixed => write!(f, "mixed"),
        }
    }
}

/// Check if a raw text value represents a missing/null value.
pub fn is_null_token(value: &str) -> bool {
    let trimmed = value.trim();
    trimmed.is_empty()
        || trimmed.eq_ignore_ascii_case("na")
        || trimmed.eq_ignore_ascii_case("n/a")
        || trimmed.eq_ignore_ascii_case("nan")
        || trimmed.eq_ignore_ascii_case("null")
        || trimmed.eq_ignore_ascii_case("none")
        || trimmed.eq_ignore_ascii_case("nil")
        || trimmed.eq_ignore_ascii_case("#n/a")
        || trimmed == "."
        || trimmed == "-"
}
