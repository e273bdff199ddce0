//! Heuristic detection of date and numeric columns.
//!
//! Date detection is tolerant: a column qualifies once the share of cells
//! that parse as dates reaches a threshold (0.8 by default). Numeric
//! detection is strict: a single cell that does not convert excludes the
//! whole column. Both rules are intentional and tested as such.

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::coerce;
use crate::input::{Cell, RawTable, StorageKind};

use super::profile::{ColumnProfile, ColumnSuggestion};
use super::types::ColumnKind;

/// Minimum share of parseable dates for a column to count as a date column.
pub const DEFAULT_DATE_THRESHOLD: f64 = 0.8;

/// Schema prober configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProberConfig {
    /// Minimum date-parse success ratio (inclusive).
    pub date_threshold: f64,
}

impl Default for ProberConfig {
    fn default() -> Self {
        Self {
            date_threshold: DEFAULT_DATE_THRESHOLD,
        }
    }
}

/// Classifies table columns to help pick the date and value columns.
///
/// Detection never fails: a column that cannot be classified is simply left
/// out of the results.
#[derive(Debug, Clone, Default)]
pub struct SchemaProber {
    config: ProberConfig,
}

impl SchemaProber {
    /// Create a prober with the default 0.8 date threshold.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a prober with custom configuration.
    pub fn with_config(config: ProberConfig) -> Self {
        Self { config }
    }

    /// Create a prober with a specific date threshold.
    pub fn with_threshold(date_threshold: f64) -> Self {
        Self::with_config(ProberConfig { date_threshold })
    }

    pub fn config(&self) -> &ProberConfig {
        &self.config
    }

    /// Return the first column (in table order) whose date-parse ratio is at
    /// least the threshold.
    ///
    /// Columns already stored as plain numbers are skipped without parsing.
    /// Missing and unparseable cells count as failures.
    pub fn detect_date_column(&self, table: &RawTable) -> Option<String> {
        for (name, cells) in table.columns() {
            let Some(ratio) = date_ratio(cells) else {
                continue;
            };
            debug!(column = name, ratio, threshold = self.config.date_threshold, "date ratio");
            if ratio >= self.config.date_threshold {
                return Some(name.to_string());
            }
        }
        None
    }

    /// Return every column not in `exclude` whose cells all convert to
    /// numbers, in table order.
    pub fn detect_numeric_columns(&self, table: &RawTable, exclude: &[&str]) -> Vec<String> {
        table
            .columns()
            .filter(|(name, _)| !exclude.contains(name))
            .filter(|(name, cells)| {
                let numeric = is_numeric_column(cells);
                debug!(column = *name, numeric, "numeric check");
                numeric
            })
            .map(|(name, _)| name.to_string())
            .collect()
    }

    /// Profile every column in table order.
    pub fn profile(&self, table: &RawTable) -> Vec<ColumnProfile> {
        table
            .columns()
            .enumerate()
            .map(|(position, (name, cells))| self.profile_column(name, position, cells))
            .collect()
    }

    /// Detect the date column, then the numeric columns other than it.
    pub fn suggest_columns(&self, table: &RawTable) -> ColumnSuggestion {
        let date_column = self.detect_date_column(table);
        let exclude: Vec<&str> = date_column.iter().map(String::as_str).collect();
        let numeric_columns = self.detect_numeric_columns(table, &exclude);

        debug!(
            date_column = ?date_column,
            numeric_columns = ?numeric_columns,
            "column suggestion"
        );

        ColumnSuggestion {
            date_column,
            numeric_columns,
        }
    }

    fn profile_column(&self, name: &str, position: usize, cells: &[Cell]) -> ColumnProfile {
        let storage = StorageKind::of(cells);
        let date_fraction = date_ratio(cells).unwrap_or(0.0);
        let numeric_fraction = fraction(cells, |c| coerce::to_number(c).is_some());

        let (kind, coercible_fraction) =
            if storage != StorageKind::Numeric && !cells.is_empty() && date_fraction >= self.config.date_threshold {
                (ColumnKind::Date, date_fraction)
            } else if is_numeric_column(cells) {
                (ColumnKind::Numeric, numeric_fraction)
            } else {
                (ColumnKind::Other, date_fraction.max(numeric_fraction))
            };

        ColumnProfile {
            name: name.to_string(),
            position,
            storage,
            kind,
            coercible_fraction,
            sample: cells.iter().find(|c| !c.is_missing()).cloned(),
        }
    }
}

/// Share of cells that parse as dates, or `None` when the column is skipped
/// (numeric storage) or has no rows.
fn date_ratio(cells: &[Cell]) -> Option<f64> {
    if cells.is_empty() || StorageKind::of(cells) == StorageKind::Numeric {
        return None;
    }
    Some(fraction(cells, |c| coerce::to_timestamp(c).is_some()))
}

/// All-or-nothing numeric check.
fn is_numeric_column(cells: &[Cell]) -> bool {
    StorageKind::of(cells) == StorageKind::Numeric || cells.iter().all(coerce::is_numeric_convertible)
}

fn fraction(cells: &[Cell], predicate: impl Fn(&Cell) -> bool) -> f64 {
    if cells.is_empty() {
        return 0.0;
    }
    cells.iter().filter(|&c| predicate(c)).count() as f64 / cells.len() as f64
}
