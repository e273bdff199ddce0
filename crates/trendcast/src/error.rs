//! Error types for the Trendcast library.

use std::path::PathBuf;
use thiserror::Error;

/// Main error type for Trendcast operations.
#[derive(Debug, Error)]
pub enum TrendcastError {
    /// Error reading or accessing a file.
    #[error("IO error for '{path}': {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// One or more requested columns are not in the table.
    #[error("Column(s) not found: {}. Available columns: {}", .missing.join(", "), .available.join(", "))]
    Schema {
        missing: Vec<String>,
        available: Vec<String>,
    },

    /// No usable rows remain to forecast from.
    #[error("Empty series: {0}")]
    EmptySeries(String),

    /// The forecasting collaborator failed.
    #[error("Forecast adapter failed: {0}")]
    Adapter(String),

    /// Error parsing a value in a structured file.
    #[error("Parse error at row {row}, column '{column}': {message}")]
    Parse {
        row: usize,
        column: String,
        message: String,
    },

    /// A table violates its shape invariants.
    #[error("Invalid table: {0}")]
    Table(String),

    /// Error from the CSV library.
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// Error from the spreadsheet reader.
    #[error("Spreadsheet error: {0}")]
    Spreadsheet(#[from] calamine::Error),

    /// File format not supported.
    #[error("Unsupported format: {0}")]
    UnsupportedFormat(String),

    /// Empty file or no data to analyze.
    #[error("Empty data: {0}")]
    EmptyData(String),

    /// Configuration error.
    #[error("Configuration error: {0}")]
    Config(String),

    /// JSON serialization/deserialization error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl TrendcastError {
    /// Build a schema error for the given missing columns.
    pub fn missing_columns<I, S>(missing: I, available: &[String]) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        TrendcastError::Schema {
            missing: missing.into_iter().map(Into::into).collect(),
            available: available.to_vec(),
        }
    }
}

/// Result type alias for Trendcast operations.
pub type Result<T> = std::result::Result<T, TrendcastError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_schema_error_names_missing_columns() {
        let err = TrendcastError::missing_columns(
            ["DoesNotExist"],
            &["Week".to_string(), "Revenue".to_string()],
        );
        let message = err.to_string();
        assert!(message.contains("DoesNotExist"));
        assert!(message.contains("Week, Revenue"));
    }
}
