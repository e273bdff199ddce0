//! Per-column profiles and column suggestions.

use serde::{Deserialize, Serialize};

use crate::input::{Cell, StorageKind};

use super::types::ColumnKind;

/// Read-only description of one table column.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ColumnProfile {
    /// Column name.
    pub name: String,
    /// Zero-based position in the table.
    pub position: usize,
    /// Physical representation of the column.
    pub storage: StorageKind,
    /// Inferred kind.
    pub kind: ColumnKind,
    /// Fraction of cells coercible to `kind` (0.0-1.0).
    ///
    /// For [`ColumnKind::Other`] this is the better of the date and numeric
    /// fractions, i.e. how close the column came to qualifying.
    pub coercible_fraction: f64,
    /// First non-missing value, for display.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sample: Option<Cell>,
}

impl ColumnProfile {
    /// Coercible fraction as a percentage.
    pub fn coercible_percentage(&self) -> f64 {
        self.coercible_fraction * 100.0
    }
}

/// Columns the prober proposes for a forecast.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ColumnSuggestion {
    /// First column that passed date detection.
    pub date_column: Option<String>,
    /// Numeric columns in table order, excluding the date column.
    pub numeric_columns: Vec<String>,
}

impl ColumnSuggestion {
    /// The suggested value column: the first numeric column.
    pub fn value_column(&self) -> Option<&str> {
        self.numeric_columns.first().map(String::as_str)
    }

    /// True when both a date and a value column were found.
    pub fn is_complete(&self) -> bool {
        self.date_column.is_some() && !self.numeric_columns.is_empty()
    }
}
