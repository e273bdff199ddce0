//! CLI argument definitions using clap.

use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;
use trendcast::{HorizonUnit, SeasonalityMode};

/// Trendcast: detect, clean and forecast time series in spreadsheets
#[derive(Parser)]
#[command(name = "trendcast")]
#[command(version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Enable verbose output and debug logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// JSON configuration file (parser, prober and forecast settings)
    #[arg(long, global = true, value_name = "JSON")]
    pub config: Option<PathBuf>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Show file metadata, column profiles and suggested columns
    Inspect {
        /// Path to the data file (xlsx/xls/ods/CSV/TSV)
        #[arg(value_name = "FILE")]
        file: PathBuf,

        /// Worksheet to read (default: first sheet)
        #[arg(long)]
        sheet: Option<String>,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Write the cleaned, sorted timestamp/value series as CSV
    Prepare {
        /// Path to the data file
        #[arg(value_name = "FILE")]
        file: PathBuf,

        /// Date column (default: auto-detected)
        #[arg(long)]
        date_col: Option<String>,

        /// Value column (default: first numeric column)
        #[arg(long)]
        value_col: Option<String>,

        /// Worksheet to read (default: first sheet)
        #[arg(long)]
        sheet: Option<String>,

        /// Output path (default: <file>.series.csv)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Fit a model and write the forecast as CSV
    Forecast(ForecastArgs),
}

/// Arguments for the forecast command
#[derive(Args)]
pub struct ForecastArgs {
    /// Path to the data file
    #[arg(value_name = "FILE")]
    pub file: PathBuf,

    /// Date column (default: auto-detected)
    #[arg(long)]
    pub date_col: Option<String>,

    /// Value column (default: first numeric column)
    #[arg(long)]
    pub value_col: Option<String>,

    /// Worksheet to read (default: first sheet)
    #[arg(long)]
    pub sheet: Option<String>,

    /// Number of future periods
    #[arg(long)]
    pub horizon: Option<u32>,

    /// Period length (day, week, month, quarter, year)
    #[arg(long)]
    pub unit: Option<HorizonUnit>,

    /// Seasonality mode (additive, multiplicative)
    #[arg(long)]
    pub mode: Option<SeasonalityMode>,

    /// Disable yearly seasonality
    #[arg(long)]
    pub no_yearly: bool,

    /// Disable weekly seasonality
    #[arg(long)]
    pub no_weekly: bool,

    /// Enable daily seasonality
    #[arg(long)]
    pub daily: bool,

    /// Trend flexibility
    #[arg(long)]
    pub changepoint_prior_scale: Option<f64>,

    /// Seasonal-effect flexibility
    #[arg(long)]
    pub seasonality_prior_scale: Option<f64>,

    /// Random seed for reproducible output
    #[arg(long)]
    pub seed: Option<u64>,

    /// Forecast backend
    #[arg(long, default_value = "http")]
    pub adapter: AdapterChoice,

    /// Forecast service base URL (http adapter only)
    #[arg(long)]
    pub endpoint: Option<String>,

    /// Output path (default: <file>.forecast.csv)
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Write only periods after the last observation
    #[arg(long)]
    pub future_only: bool,
}

/// Forecast backend choice
#[derive(Clone, Debug, Default)]
pub enum AdapterChoice {
    /// External forecasting service over HTTP
    #[default]
    Http,
    /// Offline linear-trend adapter for dry runs
    Mock,
}

impl std::str::FromStr for AdapterChoice {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "http" | "service" => Ok(AdapterChoice::Http),
            "mock" => Ok(AdapterChoice::Mock),
            _ => Err(format!("Unknown adapter: {}. Use http or mock.", s)),
        }
    }
}

impl std::fmt::Display for AdapterChoice {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            AdapterChoice::Http => write!(f, "http"),
            AdapterChoice::Mock => write!(f, "mock"),
        }
    }
}
