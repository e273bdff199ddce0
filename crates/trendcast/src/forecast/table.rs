//! Forecast output and its CSV representation.

use std::io::{Read, Write};

use chrono::NaiveDateTime;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::coerce;
use crate::error::{Result, TrendcastError};
use crate::series::TIMESTAMP_FORMAT;

const TIMESTAMP: &str = "timestamp";
const YHAT: &str = "yhat";
const YHAT_LOWER: &str = "yhat_lower";
const YHAT_UPPER: &str = "yhat_upper";

/// One forecast period.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ForecastRow {
    pub timestamp: NaiveDateTime,
    /// Point estimate.
    pub yhat: f64,
    /// Lower uncertainty bound.
    pub yhat_lower: f64,
    /// Upper uncertainty bound.
    pub yhat_upper: f64,
    /// Named effect contributions (trend, yearly, weekly, ...).
    #[serde(default, skip_serializing_if = "IndexMap::is_empty")]
    pub components: IndexMap<String, f64>,
}

/// Forecast rows as produced by an adapter, in timestamp order.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ForecastTable {
    pub rows: Vec<ForecastRow>,
}

impl ForecastTable {
    pub fn new(rows: Vec<ForecastRow>) -> Self {
        Self { rows }
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Component names in first-seen order across all rows.
    pub fn component_names(&self) -> Vec<String> {
        let mut names: Vec<String> = Vec::new();
        for row in &self.rows {
            for name in row.components.keys() {
                if !names.contains(name) {
                    names.push(name.clone());
                }
            }
        }
        names
    }

    /// Point estimates in row order.
    pub fn point_estimates(&self) -> impl Iterator<Item = f64> + '_ {
        self.rows.iter().map(|r| r.yhat)
    }

    /// Rows strictly after `after`, typically the last observed timestamp.
    pub fn future(&self, after: NaiveDateTime) -> ForecastTable {
        ForecastTable {
            rows: self
                .rows
                .iter()
                .filter(|r| r.timestamp > after)
                .cloned()
                .collect(),
        }
    }

    /// Check that rows are in timestamp order and bounds bracket the estimate.
    pub fn validate(&self) -> Result<()> {
        for (i, pair) in self.rows.windows(2).enumerate() {
            if pair[1].timestamp < pair[0].timestamp {
                return Err(TrendcastError::Adapter(format!(
                    "forecast row {} is earlier than row {}",
                    i + 1,
                    i
                )));
            }
        }
        for (i, row) in self.rows.iter().enumerate() {
            if row.yhat_lower > row.yhat_upper {
                return Err(TrendcastError::Adapter(format!(
                    "forecast row {} has lower bound {} above upper bound {}",
                    i, row.yhat_lower, row.yhat_upper
                )));
            }
        }
        Ok(())
    }

    /// Write one CSV row per period.
    ///
    /// Header: `timestamp,yhat,yhat_lower,yhat_upper` followed by the
    /// component names. Floats use the shortest representation that parses
    /// back to the same value; a component a row lacks is left empty.
    pub fn write_csv<W: Write>(&self, writer: W) -> Result<()> {
        let components = self.component_names();
        let mut csv_writer = csv::Writer::from_writer(writer);

        let mut header = vec![TIMESTAMP.to_string(), YHAT.to_string(), YHAT_LOWER.to_string(), YHAT_UPPER.to_string()];
        header.extend(components.iter().cloned());
        csv_writer.write_record(&header)?;

        for row in &self.rows {
            let mut record = vec![
                row.timestamp.format(TIMESTAMP_FORMAT).to_string(),
                row.yhat.to_string(),
                row.yhat_lower.to_string(),
                row.yhat_upper.to_string(),
            ];
            record.extend(
                components
                    .iter()
                    .map(|name| row.components.get(name).map(f64::to_string).unwrap_or_default()),
            );
            csv_writer.write_record(&record)?;
        }

        csv_writer.flush().map_err(csv::Error::from)?;
        Ok(())
    }

    /// Render the table as a CSV string.
    pub fn to_csv_string(&self) -> Result<String> {
        let mut buffer = Vec::new();
        self.write_csv(&mut buffer)?;
        String::from_utf8(buffer).map_err(|e| TrendcastError::Config(format!("CSV output is not UTF-8: {}", e)))
    }

    /// Parse a table written by [`ForecastTable::write_csv`].
    ///
    /// Columns are matched by name; any column beyond the four fixed ones is
    /// a component.
    pub fn from_csv<R: Read>(reader: R) -> Result<Self> {
        let mut csv_reader = csv::Reader::from_reader(reader);
        let headers: Vec<String> = csv_reader.headers()?.iter().map(|h| h.trim().to_string()).collect();

        let position = |name: &str| headers.iter().position(|h| h == name);
        let required = [TIMESTAMP, YHAT, YHAT_LOWER, YHAT_UPPER];
        let missing: Vec<&str> = required.iter().copied().filter(|n| position(*n).is_none()).collect();
        if !missing.is_empty() {
            return Err(TrendcastError::missing_columns(missing, &headers));
        }
        let [ts_idx, yhat_idx, lower_idx, upper_idx] = required.map(|n| position(n).unwrap_or_default());

        let component_columns: Vec<(usize, &String)> = headers
            .iter()
            .enumerate()
            .filter(|(_, h)| !required.contains(&h.as_str()))
            .collect();

        let mut rows = Vec::new();
        for (row_idx, record) in csv_reader.records().enumerate() {
            let record = record?;
            let field = |idx: usize| record.get(idx).unwrap_or("");

            let timestamp = parse_timestamp(field(ts_idx)).ok_or_else(|| TrendcastError::Parse {
                row: row_idx,
                column: TIMESTAMP.to_string(),
                message: format!("invalid timestamp '{}'", field(ts_idx)),
            })?;

            let number = |idx: usize| -> Result<f64> {
                field(idx).trim().parse::<f64>().map_err(|e| TrendcastError::Parse {
                    row: row_idx,
                    column: headers[idx].clone(),
                    message: format!("invalid number '{}': {}", field(idx), e),
                })
            };

            let mut components = IndexMap::new();
            for &(idx, name) in &component_columns {
                if field(idx).trim().is_empty() {
                    continue;
                }
                components.insert(name.clone(), number(idx)?);
            }

            rows.push(ForecastRow {
                timestamp,
                yhat: number(yhat_idx)?,
                yhat_lower: number(lower_idx)?,
                yhat_upper: number(upper_idx)?,
                components,
            });
        }

        Ok(Self { rows })
    }
}

fn parse_timestamp(text: &str) -> Option<NaiveDateTime> {
    NaiveDateTime::parse_from_str(text.trim(), TIMESTAMP_FORMAT)
        .ok()
        .or_else(|| coerce::parse_datetime(text))
}
