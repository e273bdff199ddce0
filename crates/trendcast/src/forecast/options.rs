//! Options passed through to a forecast adapter.

use std::fmt;
use std::str::FromStr;

use chrono::{Duration, Months, NaiveDateTime};
use serde::{Deserialize, Serialize};

use crate::error::{Result, TrendcastError};

/// How seasonal effects combine with the trend.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SeasonalityMode {
    Additive,
    Multiplicative,
}

impl Default for SeasonalityMode {
    fn default() -> Self {
        SeasonalityMode::Multiplicative
    }
}

impl FromStr for SeasonalityMode {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "additive" | "add" => Ok(SeasonalityMode::Additive),
            "multiplicative" | "mult" | "mul" => Ok(SeasonalityMode::Multiplicative),
            _ => Err(format!("Unknown seasonality mode: {}. Use additive or multiplicative.", s)),
        }
    }
}

impl fmt::Display for SeasonalityMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SeasonalityMode::Additive => write!(f, "additive"),
            SeasonalityMode::Multiplicative => write!(f, "multiplicative"),
        }
    }
}

/// Length of one forecast period.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HorizonUnit {
    Day,
    Week,
    Month,
    Quarter,
    Year,
}

impl HorizonUnit {
    /// Move `from` forward by `periods` units.
    ///
    /// Month-based units clamp to the last day of shorter months. Returns
    /// `None` if the result is out of range.
    pub fn advance(&self, from: NaiveDateTime, periods: u32) -> Option<NaiveDateTime> {
        match self {
            HorizonUnit::Day => from.checked_add_signed(Duration::days(periods as i64)),
            HorizonUnit::Week => from.checked_add_signed(Duration::weeks(periods as i64)),
            HorizonUnit::Month => from.checked_add_months(Months::new(periods)),
            HorizonUnit::Quarter => from.checked_add_months(Months::new(periods.checked_mul(3)?)),
            HorizonUnit::Year => from.checked_add_months(Months::new(periods.checked_mul(12)?)),
        }
    }

    /// Pandas-style frequency alias, as forecasting services expect.
    pub fn frequency_alias(&self) -> &'static str {
        match self {
            HorizonUnit::Day => "D",
            HorizonUnit::Week => "W",
            HorizonUnit::Month => "MS",
            HorizonUnit::Quarter => "QS",
            HorizonUnit::Year => "YS",
        }
    }
}

impl Default for HorizonUnit {
    fn default() -> Self {
        HorizonUnit::Week
    }
}

impl FromStr for HorizonUnit {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "day" | "days" | "d" => Ok(HorizonUnit::Day),
            "week" | "weeks" | "w" => Ok(HorizonUnit::Week),
            "month" | "months" | "m" => Ok(HorizonUnit::Month),
            "quarter" | "quarters" | "q" => Ok(HorizonUnit::Quarter),
            "year" | "years" | "y" => Ok(HorizonUnit::Year),
            _ => Err(format!(
                "Unknown horizon unit: {}. Use day, week, month, quarter, or year.",
                s
            )),
        }
    }
}

impl fmt::Display for HorizonUnit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            HorizonUnit::Day => write!(f, "day"),
            HorizonUnit::Week => write!(f, "week"),
            HorizonUnit::Month => write!(f, "month"),
            HorizonUnit::Quarter => write!(f, "quarter"),
            HorizonUnit::Year => write!(f, "year"),
        }
    }
}

/// Model settings forwarded verbatim to the adapter.
///
/// Defaults match a weekly cash-flow forecast one year ahead.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ForecastOptions {
    pub yearly_seasonality: bool,
    pub weekly_seasonality: bool,
    pub daily_seasonality: bool,
    pub seasonality_mode: SeasonalityMode,
    /// Trend flexibility.
    pub changepoint_prior_scale: f64,
    /// Seasonal-effect flexibility.
    pub seasonality_prior_scale: f64,
    /// Number of future periods.
    pub horizon: u32,
    pub horizon_unit: HorizonUnit,
    /// Random seed for adapters that sample.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub seed: Option<u64>,
}

impl Default for ForecastOptions {
    fn default() -> Self {
        Self {
            yearly_seasonality: true,
            weekly_seasonality: true,
            daily_seasonality: false,
            seasonality_mode: SeasonalityMode::Multiplicative,
            changepoint_prior_scale: 0.05,
            seasonality_prior_scale: 10.0,
            horizon: 52,
            horizon_unit: HorizonUnit::Week,
            seed: None,
        }
    }
}

impl ForecastOptions {
    /// Set the forecast horizon.
    pub fn with_horizon(mut self, horizon: u32, unit: HorizonUnit) -> Self {
        self.horizon = horizon;
        self.horizon_unit = unit;
        self
    }

    pub fn with_seasonality_mode(mut self, mode: SeasonalityMode) -> Self {
        self.seasonality_mode = mode;
        self
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Names of the enabled seasonal components.
    pub fn seasonalities(&self) -> Vec<&'static str> {
        [
            ("yearly", self.yearly_seasonality),
            ("weekly", self.weekly_seasonality),
            ("daily", self.daily_seasonality),
        ]
        .into_iter()
        .filter(|(_, enabled)| *enabled)
        .map(|(name, _)| name)
        .collect()
    }

    /// Check that the prior scales are usable.
    pub fn validate(&self) -> Result<()> {
        for (name, value) in [
            ("changepoint_prior_scale", self.changepoint_prior_scale),
            ("seasonality_prior_scale", self.seasonality_prior_scale),
        ] {
            if !value.is_finite() || value <= 0.0 {
                return Err(TrendcastError::Config(format!(
                    "{} must be a positive number, got {}",
                    name, value
                )));
            }
        }
        Ok(())
    }
}
