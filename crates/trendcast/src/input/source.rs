//! Data source abstraction and metadata.

use std::path::PathBuf;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::cell::{Cell, StorageKind};
use super::table::RawTable;

/// Basic description of one column as read from the source.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ColumnInfo {
    pub name: String,
    /// Physical representation of the column.
    pub storage: StorageKind,
    /// First value, if the table has any rows.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sample: Option<Cell>,
}

/// Metadata about the source data file.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SourceMetadata {
    /// File name without path.
    pub file: String,
    /// Full path to the file.
    pub path: PathBuf,
    /// SHA-256 hash of the file contents.
    pub hash: String,
    /// File size in bytes.
    pub size_bytes: u64,
    /// Detected format (xlsx, csv, tsv, etc.).
    pub format: String,
    /// All sheets in the workbook (empty for delimited text).
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub sheet_names: Vec<String>,
    /// Sheet the table was read from.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sheet: Option<String>,
    /// Number of data rows (excluding header).
    pub row_count: usize,
    /// Number of columns.
    pub column_count: usize,
    /// Per-column description in table order.
    pub columns: Vec<ColumnInfo>,
    /// Columns the reader already stored as dates.
    #[serde(default)]
    pub date_columns: Vec<String>,
    /// When the file was read.
    pub analyzed_at: DateTime<Utc>,
}

impl SourceMetadata {
    /// Create metadata for a table read from `path`.
    pub fn new(path: PathBuf, hash: String, size_bytes: u64, format: String, table: &RawTable) -> Self {
        let file = path
            .file_name()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_default();

        let columns: Vec<ColumnInfo> = table
            .columns()
            .map(|(name, cells)| ColumnInfo {
                name: name.to_string(),
                storage: StorageKind::of(cells),
                sample: cells.first().cloned(),
            })
            .collect();

        let date_columns = columns
            .iter()
            .filter(|c| c.storage == StorageKind::Temporal)
            .map(|c| c.name.clone())
            .collect();

        Self {
            file,
            path,
            hash,
            size_bytes,
            format,
            sheet_names: Vec::new(),
            sheet: None,
            row_count: table.row_count(),
            column_count: table.column_count(),
            columns,
            date_columns,
            analyzed_at: Utc::now(),
        }
    }

    /// Record the workbook sheets and the one that was read.
    pub fn with_sheets(mut self, sheet_names: Vec<String>, sheet: impl Into<String>) -> Self {
        self.sheet_names = sheet_names;
        self.sheet = Some(sheet.into());
        self
    }
}
