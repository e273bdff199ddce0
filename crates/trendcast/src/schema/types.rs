//! Core type definitions for column classification.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Apparent type of a column, as far as forecasting cares.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ColumnKind {
    /// Calendar dates or date/times.
    Date,
    /// Numbers, or text that converts to numbers.
    Numeric,
    /// Anything else.
    Other,
}

impl ColumnKind {
    pub fn is_date(&self) -> bool {
        matches!(self, ColumnKind::Date)
    }

    pub fn is_numeric(&self) -> bool {
        matches!(self, ColumnKind::Numeric)
    }
}

impl Default for ColumnKind {
    fn default() -> Self {
        ColumnKind::Other
    }
}

impl fmt::Display for ColumnKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ColumnKind::Date => write!(f, "date"),
            ColumnKind::Numeric => write!(f, "numeric"),
            ColumnKind::Other => write!(f, "other"),
        }
    }
}
