//! Spreadsheet and delimited-text reader with delimiter detection.

use std::collections::HashSet;
use std::fs::File;
use std::io::{BufRead, BufReader, Cursor, Read};
use std::path::Path;

use calamine::{Data, Reader, open_workbook_auto_from_rs};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use tracing::{debug, info};

use crate::coerce;
use crate::error::{Result, TrendcastError};

use super::cell::{Cell, is_null_token};
use super::source::SourceMetadata;
use super::table::RawTable;

/// Delimiters to try when auto-detecting.
const DELIMITERS: &[u8] = &[b'\t', b',', b';', b'|'];

/// Extensions read through the spreadsheet reader.
const SPREADSHEET_EXTENSIONS: &[&str] = &["xlsx", "xlsm", "xlsb", "xls", "ods"];

/// Parser configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ParserConfig {
    /// Delimiter to use for text files (None = auto-detect).
    pub delimiter: Option<u8>,
    /// Whether the file has a header row.
    pub has_header: bool,
    /// Maximum rows to read (None = all).
    pub max_rows: Option<usize>,
    /// Quote character.
    pub quote: u8,
    /// Worksheet to read (None = first sheet).
    pub sheet: Option<String>,
}

impl Default for ParserConfig {
    fn default() -> Self {
        Self {
            delimiter: None,
            has_header: true,
            max_rows: None,
            quote: b'"',
            sheet: None,
        }
    }
}

impl ParserConfig {
    /// Read a specific worksheet instead of the first one.
    pub fn with_sheet(mut self, sheet: impl Into<String>) -> Self {
        self.sheet = Some(sheet.into());
        self
    }

    /// Use a fixed delimiter for text files.
    pub fn with_delimiter(mut self, delimiter: u8) -> Self {
        self.delimiter = Some(delimiter);
        self
    }
}

/// A table read from one worksheet of a workbook.
#[derive(Debug, Clone)]
pub struct SheetTable {
    pub table: RawTable,
    /// Every sheet in the workbook, in workbook order.
    pub sheet_names: Vec<String>,
    /// The sheet that was read.
    pub sheet: String,
}

/// Parses tabular data files.
pub struct Parser {
    config: ParserConfig,
}

impl Parser {
    /// Create a new parser with default configuration.
    pub fn new() -> Self {
        Self {
            config: ParserConfig::default(),
        }
    }

    /// Create a parser with custom configuration.
    pub fn with_config(config: ParserConfig) -> Self {
        Self { config }
    }

    /// Parse a file and return the table and metadata.
    pub fn parse_file(&self, path: impl AsRef<Path>) -> Result<(RawTable, SourceMetadata)> {
        let path = path.as_ref();

        let mut file = File::open(path).map_err(|e| TrendcastError::Io {
            path: path.to_path_buf(),
            source: e,
        })?;

        let mut contents = Vec::new();
        file.read_to_end(&mut contents).map_err(|e| TrendcastError::Io {
            path: path.to_path_buf(),
            source: e,
        })?;
        let size_bytes = contents.len() as u64;

        let mut hasher = Sha256::new();
        hasher.update(&contents);
        let hash = format!("sha256:{:x}", hasher.finalize());

        let extension = path
            .extension()
            .map(|e| e.to_string_lossy().to_lowercase())
            .unwrap_or_default();

        if SPREADSHEET_EXTENSIONS.contains(&extension.as_str()) || looks_like_workbook(&contents) {
            let sheet = self.parse_spreadsheet(&contents)?;
            let format = if extension.is_empty() {
                "spreadsheet".to_string()
            } else {
                extension
            };
            info!(
                path = %path.display(),
                sheet = %sheet.sheet,
                rows = sheet.table.row_count(),
                columns = sheet.table.column_count(),
                "read worksheet"
            );
            let metadata = SourceMetadata::new(path.to_path_buf(), hash, size_bytes, format, &sheet.table)
                .with_sheets(sheet.sheet_names, sheet.sheet);
            return Ok((sheet.table, metadata));
        }

        let delimiter = match self.config.delimiter {
            Some(d) => d,
            None => detect_delimiter(&contents, self.config.quote)?,
        };
        let table = self.parse_delimited(&contents, delimiter)?;

        let format = match delimiter {
            b'\t' => "tsv",
            b',' => "csv",
            b';' => "csv-semicolon",
            b'|' => "psv",
            _ => "delimited",
        }
        .to_string();

        info!(
            path = %path.display(),
            format = %format,
            rows = table.row_count(),
            columns = table.column_count(),
            "read delimited file"
        );
        let metadata = SourceMetadata::new(path.to_path_buf(), hash, size_bytes, format, &table);
        Ok((table, metadata))
    }

    /// Parse a workbook held in memory, reading the configured or first sheet.
    pub fn parse_spreadsheet(&self, bytes: &[u8]) -> Result<SheetTable> {
        let mut workbook = open_workbook_auto_from_rs(Cursor::new(bytes.to_vec()))?;

        let sheet_names = workbook.sheet_names();
        let sheet = match &self.config.sheet {
            Some(name) if sheet_names.contains(name) => name.clone(),
            Some(name) => {
                return Err(TrendcastError::Config(format!(
                    "Sheet '{}' not found. Available sheets: {}",
                    name,
                    sheet_names.join(", ")
                )));
            }
            None => sheet_names
                .first()
                .cloned()
                .ok_or_else(|| TrendcastError::EmptyData("Workbook has no sheets".to_string()))?,
        };

        let range = workbook.worksheet_range(&sheet)?;
        let mut rows = range.rows();

        let headers: Vec<String> = if self.config.has_header {
            match rows.next() {
                Some(header_row) => header_row.iter().map(|c| c.to_string()).collect(),
                None => return Err(TrendcastError::EmptyData(format!("Sheet '{}' is empty", sheet))),
            }
        } else {
            (0..range.width()).map(|i| format!("column_{}", i + 1)).collect()
        };

        if headers.is_empty() {
            return Err(TrendcastError::EmptyData("No columns found".to_string()));
        }

        let limit = self.config.max_rows.unwrap_or(usize::MAX);
        let body: Vec<Vec<Cell>> = rows
            .take(limit)
            .map(|row| row.iter().map(cell_from_spreadsheet).collect())
            .collect();

        let table = RawTable::from_rows(dedupe_headers(headers), body)?;
        Ok(SheetTable {
            table,
            sheet_names,
            sheet,
        })
    }

    /// Parse delimited text held in memory.
    pub fn parse_delimited(&self, bytes: &[u8], delimiter: u8) -> Result<RawTable> {
        let mut reader = csv::ReaderBuilder::new()
            .delimiter(delimiter)
            .has_headers(false)
            .quote(self.config.quote)
            .flexible(true)
            .from_reader(bytes);

        let mut records = reader.records();

        let first = match records.next() {
            Some(record) => record?,
            None => return Err(TrendcastError::EmptyData("No data rows found".to_string())),
        };

        let (headers, mut rows): (Vec<String>, Vec<Vec<Cell>>) = if self.config.has_header {
            (first.iter().map(|s| s.trim().to_string()).collect(), Vec::new())
        } else {
            (
                (0..first.len()).map(|i| format!("column_{}", i + 1)).collect(),
                vec![first.iter().map(Cell::from_text).collect()],
            )
        };

        if headers.is_empty() {
            return Err(TrendcastError::EmptyData("No columns found".to_string()));
        }

        let expected_cols = headers.len();
        let limit = self.config.max_rows.unwrap_or(usize::MAX);

        for result in records {
            if rows.len() >= limit {
                break;
            }
            let record = result?;
            let mut row: Vec<Cell> = record.iter().map(Cell::from_text).collect();

            // Pad short rows, truncate long ones
            row.resize(expected_cols, Cell::Missing);
            rows.push(row);
        }
        rows.truncate(limit);

        RawTable::from_rows(dedupe_headers(headers), rows)
    }
}

impl Default for Parser {
    fn default() -> Self {
        Self::new()
    }
}

/// Convert a spreadsheet cell to a typed cell.
fn cell_from_spreadsheet(data: &Data) -> Cell {
    match data {
        Data::Int(i) => Cell::Number(*i as f64),
        Data::Float(f) => Cell::Number(*f),
        Data::Bool(b) => Cell::Number(if *b { 1.0 } else { 0.0 }),
        Data::String(s) if is_null_token(s) => Cell::Missing,
        Data::String(s) => Cell::Text(s.clone()),
        Data::DateTime(dt) if dt.is_duration() => Cell::Number(dt.as_f64()),
        Data::DateTime(dt) => dt.as_datetime().map(Cell::Date).unwrap_or(Cell::Missing),
        Data::DateTimeIso(s) => coerce::parse_datetime(s)
            .map(Cell::Date)
            .unwrap_or_else(|| Cell::Text(s.clone())),
        Data::DurationIso(s) => Cell::Text(s.clone()),
        // Error and empty cells
        _ => Cell::Missing,
    }
}

/// Name blank headers `Unnamed: i` and suffix repeats as `name.1`, `name.2`.
fn dedupe_headers(headers: Vec<String>) -> Vec<String> {
    let mut seen: HashSet<String> = HashSet::new();
    let mut result = Vec::with_capacity(headers.len());

    for (i, header) in headers.into_iter().enumerate() {
        let base = if header.trim().is_empty() {
            format!("Unnamed: {}", i)
        } else {
            header
        };

        let mut name = base.clone();
        let mut suffix = 1;
        while seen.contains(&name) {
            name = format!("{}.{}", base, suffix);
            suffix += 1;
        }
        if name != base {
            debug!(original = %base, renamed = %name, "renamed duplicate header");
        }
        seen.insert(name.clone());
        result.push(name);
    }

    result
}

/// Zip (xlsx/ods) or OLE2 (xls) magic bytes.
fn looks_like_workbook(bytes: &[u8]) -> bool {
    bytes.starts_with(b"PK\x03\x04") || bytes.starts_with(&[0xD0, 0xCF, 0x11, 0xE0])
}

/// Pick the delimiter that splits the first lines most evenly.
fn detect_delimiter(bytes: &[u8], quote: u8) -> Result<u8> {
    let lines: Vec<String> = BufReader::new(bytes)
        .lines()
        .take(10)
        .map_while(|l| l.ok())
        .filter(|l| !l.trim().is_empty())
        .collect();

    if lines.is_empty() {
        return Err(TrendcastError::EmptyData("No lines to analyze".to_string()));
    }

    let (delimiter, score) = DELIMITERS
        .iter()
        .map(|&delim| {
            let counts: Vec<usize> = lines
                .iter()
                .map(|line| count_unquoted(line, delim, quote))
                .collect();
            (delim, delimiter_score(&counts, delim))
        })
        .fold((b',', 0), |best, candidate| if candidate.1 > best.1 { candidate } else { best });

    debug!(delimiter = %(delimiter as char).escape_default(), score, "detected delimiter");
    Ok(delimiter)
}

/// Field count on the header line, weighted by how steady it stays below it.
fn delimiter_score(counts: &[usize], delimiter: u8) -> usize {
    let header = counts.first().copied().unwrap_or(0);
    if header == 0 {
        return 0;
    }

    let n = counts.len() as f64;
    let mean = counts.iter().sum::<usize>() as f64 / n;
    let spread = counts.iter().map(|&c| (c as f64 - mean).powi(2)).sum::<f64>() / n;

    if counts.iter().all(|&c| c == header) {
        header * 1000 + if delimiter == b'\t' { 100 } else { 0 }
    } else if spread < 1.0 {
        header * 100
    } else {
        header
    }
}

/// Occurrences of `delimiter` outside `quote`-delimited spans.
fn count_unquoted(line: &str, delimiter: u8, quote: u8) -> usize {
    let mut quoted = false;
    line.bytes()
        .filter(|&b| {
            if b == quote {
                quoted = !quoted;
                false
            } else {
                b == delimiter && !quoted
            }
        })
        .count()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_detect_delimiter_csv() {
        let data = b"a,b,c\n1,2,3\n4,5,6";
        assert_eq!(detect_delimiter(data, b'"').unwrap(), b',');
    }

    #[test]
    fn test_detect_delimiter_tsv() {
        let data = b"a\tb\tc\n1\t2\t3\n4\t5\t6";
        assert_eq!(detect_delimiter(data, b'"').unwrap(), b'\t');
    }

    #[test]
    fn test_detect_delimiter_semicolon_with_decimal_commas() {
        let data = b"Date;Sales\n2024-01-07;\"1,5\"\n2024-01-14;\"2,5\"";
        assert_eq!(detect_delimiter(data, b'"').unwrap(), b';');
    }

    #[test]
    fn test_detect_delimiter_uses_quote_char() {
        let data = b"name,note\n'Smith, J',ok\n'Lee, K',late";
        assert_eq!(count_unquoted("'Smith, J',ok", b',', b'\''), 1);
        assert_eq!(count_unquoted("'Smith, J',ok", b',', b'"'), 2);
        assert_eq!(detect_delimiter(data, b'\'').unwrap(), b',');
    }

    #[test]
    fn test_parse_csv_types_cells() {
        let parser = Parser::new();
        let data = b"Date,Sales,Region\n2024-01-07,100,North\n2024-01-14,NA,South";
        let table = parser.parse_delimited(data, b',').unwrap();

        assert_eq!(table.column_names(), vec!["Date", "Sales", "Region"]);
        assert_eq!(table.row_count(), 2);
        assert_eq!(table.get(0, 0), Some(&Cell::Text("2024-01-07".into())));
        assert_eq!(table.get(0, 1), Some(&Cell::Number(100.0)));
        assert_eq!(table.get(1, 1), Some(&Cell::Missing));
    }

    #[test]
    fn test_parse_pads_short_rows() {
        let parser = Parser::new();
        let data = b"a,b,c\n1,2\n4,5,6,7";
        let table = parser.parse_delimited(data, b',').unwrap();

        assert_eq!(table.get(0, 2), Some(&Cell::Missing));
        assert_eq!(table.get(1, 2), Some(&Cell::Number(6.0)));
        assert_eq!(table.column_count(), 3);
    }

    #[test]
    fn test_parse_header_only() {
        let parser = Parser::new();
        let table = parser.parse_delimited(b"Week,Revenue\n", b',').unwrap();
        assert_eq!(table.column_count(), 2);
        assert_eq!(table.row_count(), 0);
    }

    #[test]
    fn test_parse_without_header() {
        let parser = Parser::with_config(ParserConfig {
            has_header: false,
            ..ParserConfig::default()
        });
        let table = parser.parse_delimited(b"1,2\n3,4", b',').unwrap();
        assert_eq!(table.column_names(), vec!["column_1", "column_2"]);
        assert_eq!(table.row_count(), 2);
    }

    #[test]
    fn test_max_rows() {
        let parser = Parser::with_config(ParserConfig {
            max_rows: Some(2),
            ..ParserConfig::default()
        });
        let table = parser.parse_delimited(b"a\n1\n2\n3\n4", b',').unwrap();
        assert_eq!(table.row_count(), 2);
    }

    #[test]
    fn test_dedupe_headers() {
        let headers = vec!["a".into(), "".into(), "a".into(), "a".into()];
        assert_eq!(dedupe_headers(headers), vec!["a", "Unnamed: 1", "a.1", "a.2"]);
    }

    #[test]
    fn test_empty_input() {
        let parser = Parser::new();
        assert!(matches!(
            parser.parse_delimited(b"", b','),
            Err(TrendcastError::EmptyData(_))
        ));
    }

    #[test]
    fn test_invalid_workbook_bytes() {
        let parser = Parser::new();
        assert!(parser.parse_spreadsheet(b"PK\x03\x04 not really a zip").is_err());
    }

    #[test]
    fn test_spreadsheet_null_tokens_keep_column_numeric() {
        let cells: Vec<Cell> = [
            Data::Float(1.0),
            Data::String("NA".into()),
            Data::Float(3.0),
            Data::String("N/A".into()),
            Data::String("#N/A".into()),
        ]
        .iter()
        .map(cell_from_spreadsheet)
        .collect();
        assert_eq!(cells[1], Cell::Missing);
        assert_eq!(cells[4], Cell::Missing);

        let table = RawTable::from_columns(vec![("Sales", cells)]).unwrap();
        let numeric = crate::schema::SchemaProber::new().detect_numeric_columns(&table, &[]);
        assert_eq!(numeric, vec!["Sales"]);
    }

    #[test]
    fn test_spreadsheet_cell_conversion() {
        assert_eq!(cell_from_spreadsheet(&Data::Int(3)), Cell::Number(3.0));
        assert_eq!(cell_from_spreadsheet(&Data::Bool(true)), Cell::Number(1.0));
        assert_eq!(cell_from_spreadsheet(&Data::Empty), Cell::Missing);
        assert_eq!(cell_from_spreadsheet(&Data::String("  ".into())), Cell::Missing);
        assert_eq!(cell_from_spreadsheet(&Data::String("Q1".into())), Cell::Text("Q1".into()));
        assert_eq!(
            cell_from_spreadsheet(&Data::DateTimeIso("2024-01-07".into())),
            Cell::from(chrono::NaiveDate::from_ymd_opt(2024, 1, 7).unwrap())
        );
    }
}
