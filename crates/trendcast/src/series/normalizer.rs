//! Coerce, filter, sort and project a table into a [`CleanSeries`].

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::coerce;
use crate::error::{Result, TrendcastError};
use crate::input::RawTable;

use super::clean::{CleanSeries, SeriesPoint};

/// Row accounting for one [`prepare_with_report`] call.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PrepareReport {
    /// Rows in the input table.
    pub input_rows: usize,
    /// Rows whose date did not parse.
    pub invalid_dates: usize,
    /// Rows whose value did not convert (with a valid date).
    pub invalid_values: usize,
    /// Rows in the clean series.
    pub output_rows: usize,
}

impl PrepareReport {
    /// Total rows dropped.
    pub fn dropped(&self) -> usize {
        self.input_rows - self.output_rows
    }
}

/// Build a clean series from `date_col` and `value_col` of `table`.
///
/// Cells that fail to coerce make their row drop out; they are never an
/// error. Surviving rows are stably sorted by timestamp. If every row drops,
/// the result is an empty series.
///
/// # Errors
///
/// [`TrendcastError::Schema`] naming each requested column that is absent.
pub fn prepare(table: &RawTable, date_col: &str, value_col: &str) -> Result<CleanSeries> {
    prepare_with_report(table, date_col, value_col).map(|(series, _)| series)
}

/// Like [`prepare`], also reporting how many rows were dropped and why.
pub fn prepare_with_report(
    table: &RawTable,
    date_col: &str,
    value_col: &str,
) -> Result<(CleanSeries, PrepareReport)> {
    let (dates, values) = match (table.column(date_col), table.column(value_col)) {
        (Some(dates), Some(values)) => (dates, values),
        (dates, values) => {
            let mut missing: Vec<&str> = Vec::with_capacity(2);
            if dates.is_none() {
                missing.push(date_col);
            }
            if values.is_none() && !missing.contains(&value_col) {
                missing.push(value_col);
            }
            return Err(TrendcastError::missing_columns(missing, &table.column_names()));
        }
    };

    let mut report = PrepareReport {
        input_rows: table.row_count(),
        ..PrepareReport::default()
    };

    let mut points: Vec<SeriesPoint> = Vec::with_capacity(report.input_rows);
    for (date_cell, value_cell) in dates.iter().zip(values) {
        let Some(timestamp) = coerce::to_timestamp(date_cell) else {
            report.invalid_dates += 1;
            continue;
        };
        let Some(value) = coerce::to_number(value_cell) else {
            report.invalid_values += 1;
            continue;
        };
        points.push(SeriesPoint { timestamp, value });
    }

    // sort_by_key is stable, so equal timestamps keep their row order
    points.sort_by_key(|p| p.timestamp);
    report.output_rows = points.len();

    if report.dropped() > 0 {
        warn!(
            date_col,
            value_col,
            invalid_dates = report.invalid_dates,
            invalid_values = report.invalid_values,
            "dropped rows while preparing series"
        );
    }
    debug!(?report, "prepared series");

    Ok((CleanSeries::from_sorted(points), report))
}
