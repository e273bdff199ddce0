//! Main Trendcast struct and public API.

use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::info;

use crate::error::{Result, TrendcastError};
use crate::forecast::{ForecastAdapter, ForecastOptions, ForecastTable};
use crate::input::{Parser, ParserConfig, RawTable, SourceMetadata};
use crate::schema::{ColumnProfile, ColumnSuggestion, ProberConfig, SchemaProber};
use crate::series::{CleanSeries, PrepareReport, prepare_with_report};

/// Configuration for a Trendcast run.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TrendcastConfig {
    /// How input files are read.
    pub parser: ParserConfig,
    /// Column detection settings.
    pub prober: ProberConfig,
    /// Settings forwarded to the forecast adapter.
    pub forecast: ForecastOptions,
}

impl TrendcastConfig {
    /// Load configuration from a JSON file. Absent keys keep their defaults.
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|e| TrendcastError::Io {
            path: path.to_path_buf(),
            source: e,
        })?;
        Ok(serde_json::from_str(&text)?)
    }
}

/// A table read from disk together with what the prober found in it.
#[derive(Debug, Clone, Serialize)]
pub struct LoadedTable {
    pub table: RawTable,
    /// Metadata about the source file.
    pub source: SourceMetadata,
    /// Per-column classification, in table order.
    pub profiles: Vec<ColumnProfile>,
    /// Auto-detected date and value columns.
    pub suggestion: ColumnSuggestion,
}

/// The date and value columns a series is built from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ColumnChoice {
    pub date_col: String,
    pub value_col: String,
}

/// Everything produced by one forecast.
#[derive(Debug, Clone)]
pub struct ForecastRun<M> {
    pub choice: ColumnChoice,
    /// The series the model was fitted on.
    pub series: CleanSeries,
    /// Rows dropped while building the series.
    pub report: PrepareReport,
    /// Opaque fitted model.
    pub model: M,
    pub forecast: ForecastTable,
}

/// The Trendcast pipeline: load, select, prepare, forecast.
///
/// Every step takes the previous step's output explicitly and either returns
/// a value or an error; nothing is kept between calls.
pub struct Trendcast {
    config: TrendcastConfig,
    parser: Parser,
    prober: SchemaProber,
}

impl Default for Trendcast {
    fn default() -> Self {
        Self::new()
    }
}

impl Trendcast {
    /// Create a pipeline with default configuration.
    pub fn new() -> Self {
        Self::with_config(TrendcastConfig::default())
    }

    /// Create a pipeline with custom configuration.
    pub fn with_config(config: TrendcastConfig) -> Self {
        let parser = Parser::with_config(config.parser.clone());
        let prober = SchemaProber::with_config(config.prober.clone());
        Self { config, parser, prober }
    }

    pub fn config(&self) -> &TrendcastConfig {
        &self.config
    }

    /// Read a file and probe its columns.
    pub fn load(&self, path: impl AsRef<Path>) -> Result<LoadedTable> {
        let (table, source) = self.parser.parse_file(path.as_ref())?;
        Ok(self.probe(table, source))
    }

    /// Probe an already-read table.
    pub fn probe(&self, table: RawTable, source: SourceMetadata) -> LoadedTable {
        let profiles = self.prober.profile(&table);
        let suggestion = self.prober.suggest_columns(&table);
        info!(
            file = %source.file,
            date_column = ?suggestion.date_column,
            numeric_columns = suggestion.numeric_columns.len(),
            "probed columns"
        );
        LoadedTable {
            table,
            source,
            profiles,
            suggestion,
        }
    }

    /// Pick the date and value columns.
    ///
    /// An explicit name always wins over detection. The existence of explicit
    /// names is checked later, when the series is prepared.
    pub fn select(
        &self,
        loaded: &LoadedTable,
        date_col: Option<&str>,
        value_col: Option<&str>,
    ) -> Result<ColumnChoice> {
        let date_col = match date_col {
            Some(name) => name.to_string(),
            None => loaded.suggestion.date_column.clone().ok_or_else(|| {
                TrendcastError::Config(format!(
                    "No date column detected in {}. Pass one explicitly (columns: {})",
                    loaded.source.file,
                    loaded.table.column_names().join(", ")
                ))
            })?,
        };

        let value_col = match value_col {
            Some(name) => name.to_string(),
            None => loaded
                .suggestion
                .numeric_columns
                .iter()
                .find(|name| **name != date_col)
                .cloned()
                .ok_or_else(|| {
                    TrendcastError::Config(format!(
                        "No numeric value column detected in {}. Pass one explicitly (columns: {})",
                        loaded.source.file,
                        loaded.table.column_names().join(", ")
                    ))
                })?,
        };

        info!(date_col = %date_col, value_col = %value_col, "selected columns");
        Ok(ColumnChoice { date_col, value_col })
    }

    /// Build the clean series for `choice`, failing on an empty result.
    pub fn prepare(&self, loaded: &LoadedTable, choice: &ColumnChoice) -> Result<(CleanSeries, PrepareReport)> {
        let (series, report) = prepare_with_report(&loaded.table, &choice.date_col, &choice.value_col)?;
        series.ensure_not_empty()?;
        info!(rows = series.len(), dropped = report.dropped(), "prepared series");
        Ok((series, report))
    }

    /// Prepare the series and run it through `adapter` with the configured options.
    pub fn forecast<A: ForecastAdapter>(
        &self,
        adapter: &A,
        loaded: &LoadedTable,
        choice: ColumnChoice,
    ) -> Result<ForecastRun<A::Model>> {
        let (series, report) = self.prepare(loaded, &choice)?;

        info!(
            adapter = adapter.name(),
            horizon = self.config.forecast.horizon,
            unit = %self.config.forecast.horizon_unit,
            "forecasting"
        );
        let (model, forecast) = adapter.fit_and_forecast(&series, &self.config.forecast)?;
        info!(rows = forecast.len(), "forecast complete");

        Ok(ForecastRun {
            choice,
            series,
            report,
            model,
            forecast,
        })
    }
}
