//! Column-major table of typed cells.

use indexmap::IndexMap;
use serde::Serialize;

use crate::error::{Result, TrendcastError};

use super::cell::{Cell, StorageKind};

/// Parsed tabular data: ordered, uniquely named columns of equal length.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct RawTable {
    columns: IndexMap<String, Vec<Cell>>,
}

impl RawTable {
    /// Create an empty table.
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a table from `(name, cells)` pairs, checking the shape invariants.
    pub fn from_columns<I, S>(columns: I) -> Result<Self>
    where
        I: IntoIterator<Item = (S, Vec<Cell>)>,
        S: Into<String>,
    {
        let mut table = Self::new();
        for (name, cells) in columns {
            table.push_column(name, cells)?;
        }
        Ok(table)
    }

    /// Build a table from a header row and row-major data.
    ///
    /// Every row must be exactly as wide as the header.
    pub fn from_rows(headers: Vec<String>, rows: Vec<Vec<Cell>>) -> Result<Self> {
        let width = headers.len();
        let mut columns: Vec<Vec<Cell>> = (0..width).map(|_| Vec::with_capacity(rows.len())).collect();

        for (row_idx, row) in rows.into_iter().enumerate() {
            if row.len() != width {
                return Err(TrendcastError::Table(format!(
                    "row {} has {} cells, expected {}",
                    row_idx,
                    row.len(),
                    width
                )));
            }
            for (column, cell) in columns.iter_mut().zip(row) {
                column.push(cell);
            }
        }

        Self::from_columns(headers.into_iter().zip(columns))
    }

    /// Append a column.
    pub fn push_column(&mut self, name: impl Into<String>, cells: Vec<Cell>) -> Result<()> {
        let name = name.into();
        if self.columns.contains_key(&name) {
            return Err(TrendcastError::Table(format!("duplicate column name '{}'", name)));
        }
        if let Some(expected) = self.columns.values().next().map(Vec::len) {
            if cells.len() != expected {
                return Err(TrendcastError::Table(format!(
                    "column '{}' has {} rows, expected {}",
                    name,
                    cells.len(),
                    expected
                )));
            }
        }
        self.columns.insert(name, cells);
        Ok(())
    }

    /// Get the number of columns.
    pub fn column_count(&self) -> usize {
        self.columns.len()
    }

    /// Get the number of rows.
    pub fn row_count(&self) -> usize {
        self.columns.values().next().map_or(0, Vec::len)
    }

    /// Column names in table order.
    pub fn column_names(&self) -> Vec<String> {
        self.columns.keys().cloned().collect()
    }

    pub fn has_column(&self, name: &str) -> bool {
        self.columns.contains_key(name)
    }

    /// Get a column by name.
    pub fn column(&self, name: &str) -> Option<&[Cell]> {
        self.columns.get(name).map(Vec::as_slice)
    }

    /// Iterate over `(name, cells)` in table order.
    pub fn columns(&self) -> impl Iterator<Item = (&str, &[Cell])> {
        self.columns
            .iter()
            .map(|(name, cells)| (name.as_str(), cells.as_slice()))
    }

    /// Get a specific cell value.
    pub fn get(&self, row: usize, col: usize) -> Option<&Cell> {
        self.columns.get_index(col).and_then(|(_, cells)| cells.get(row))
    }

    /// Storage classification of a column.
    pub fn storage_kind(&self, name: &str) -> Option<StorageKind> {
        self.column(name).map(StorageKind::of)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_rows() {
        let table = RawTable::from_rows(
            vec!["a".into(), "b".into()],
            vec![
                vec![Cell::Number(1.0), Cell::Text("x".into())],
                vec![Cell::Number(2.0), Cell::Missing],
            ],
        )
        .unwrap();

        assert_eq!(table.column_count(), 2);
        assert_eq!(table.row_count(), 2);
        assert_eq!(table.column_names(), vec!["a", "b"]);
        assert_eq!(table.get(1, 0), Some(&Cell::Number(2.0)));
        assert_eq!(table.get(1, 1), Some(&Cell::Missing));
        assert_eq!(table.get(2, 0), None);
    }

    #[test]
    fn test_rejects_duplicate_names() {
        let result = RawTable::from_columns(vec![
            ("a", vec![Cell::Missing]),
            ("a", vec![Cell::Missing]),
        ]);
        assert!(matches!(result, Err(TrendcastError::Table(_))));
    }

    #[test]
    fn test_rejects_unequal_lengths() {
        let result = RawTable::from_columns(vec![
            ("a", vec![Cell::Missing]),
            ("b", vec![Cell::Missing, Cell::Missing]),
        ]);
        assert!(matches!(result, Err(TrendcastError::Table(_))));
    }

    #[test]
    fn test_rejects_ragged_rows() {
        let result = RawTable::from_rows(
            vec!["a".into(), "b".into()],
            vec![vec![Cell::Number(1.0)]],
        );
        assert!(result.is_err());
    }

    #[test]
    fn test_empty_table() {
        let table = RawTable::new();
        assert_eq!(table.row_count(), 0);
        assert_eq!(table.column_count(), 0);
        assert!(!table.has_column("a"));
    }
}
