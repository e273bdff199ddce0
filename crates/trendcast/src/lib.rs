//! Trendcast: turn a spreadsheet into a clean time series and forecast it.
//!
//! A table is read from a spreadsheet or delimited text file, its date and
//! numeric columns are detected, the chosen pair is normalized into a sorted
//! series of `(timestamp, value)` points, and the series is handed to an
//! external forecasting model behind the [`ForecastAdapter`] trait.
//!
//! # Core Principles
//!
//! - **Tolerant input**: cells that do not parse drop their row, never abort
//! - **Explicit state**: each step takes the previous step's output
//! - **Opaque models**: the fitted model is a handle the core never inspects
//!
//! # Example
//!
//! ```no_run
//! use trendcast::{MockAdapter, Trendcast};
//!
//! let trendcast = Trendcast::new();
//! let loaded = trendcast.load("weekly_sales.xlsx").unwrap();
//! let choice = trendcast.select(&loaded, None, None).unwrap();
//! let run = trendcast.forecast(&MockAdapter::new(), &loaded, choice).unwrap();
//!
//! println!("Rows: {}", run.series.len());
//! println!("{}", run.forecast.to_csv_string().unwrap());
//! ```

pub mod coerce;
pub mod error;
pub mod forecast;
pub mod input;
pub mod schema;
pub mod series;

mod trendcast;

pub use crate::trendcast::{ColumnChoice, ForecastRun, LoadedTable, Trendcast, TrendcastConfig};
pub use error::{Result, TrendcastError};
pub use forecast::{
    ForecastAdapter, ForecastOptions, ForecastRow, ForecastTable, HorizonUnit, HttpAdapter, MockAdapter,
    SeasonalityMode,
};
pub use input::{Cell, Parser, ParserConfig, RawTable, SourceMetadata, StorageKind};
pub use schema::{ColumnKind, ColumnProfile, ColumnSuggestion, SchemaProber};
pub use series::{CleanSeries, PrepareReport, SeriesPoint, prepare, prepare_with_report};
