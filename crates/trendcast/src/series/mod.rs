//! Conversion of a raw table into a clean, sorted time series.

mod clean;
mod normalizer;

pub use clean::{CleanSeries, SeriesPoint, TIMESTAMP_FORMAT};
pub use normalizer::{PrepareReport, prepare, prepare_with_report};
