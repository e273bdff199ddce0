//! Mock forecast adapter for testing and offline dry runs.

use chrono::NaiveDateTime;
use indexmap::IndexMap;
use tracing::debug;

use crate::error::{Result, TrendcastError};
use crate::series::CleanSeries;

use super::adapter::ForecastAdapter;
use super::options::{ForecastOptions, SeasonalityMode};
use super::table::{ForecastRow, ForecastTable};

/// z-score of an 80% central interval.
const INTERVAL_Z: f64 = 1.2816;

const SECONDS_PER_DAY: f64 = 86_400.0;

/// Straight-line adapter with predictable output.
///
/// Fits a least-squares line through the series, reports it as the `trend`
/// component, reports every enabled seasonality as a zero contribution, and
/// brackets the estimate with the residual spread. With `jitter` above zero
/// the point estimates get uniform noise of that relative size, drawn from
/// `options.seed` when set and from an unseeded generator otherwise.
#[derive(Debug, Clone, Default)]
pub struct MockAdapter {
    jitter: f64,
}

/// Fitted line; opaque outside this module.
#[derive(Debug, Clone)]
pub struct MockModel {
    origin: NaiveDateTime,
    intercept: f64,
    slope_per_day: f64,
    residual_std: f64,
    history: Vec<NaiveDateTime>,
}

impl MockAdapter {
    /// Create a new mock adapter without noise.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add relative noise to point estimates.
    pub fn with_jitter(jitter: f64) -> Self {
        Self { jitter }
    }
}

impl ForecastAdapter for MockAdapter {
    type Model = MockModel;

    fn name(&self) -> &str {
        "mock"
    }

    fn fit(&self, series: &CleanSeries, _options: &ForecastOptions) -> Result<MockModel> {
        let origin = match series.first() {
            Some(first) if series.len() >= 2 => first.timestamp,
            _ => {
                return Err(TrendcastError::Adapter(format!(
                    "mock model needs at least two observations, got {}",
                    series.len()
                )));
            }
        };

        let xs: Vec<f64> = series.timestamps().map(|t| days_since(origin, t)).collect();
        let ys: Vec<f64> = series.values().collect();
        let n = xs.len() as f64;

        let mean_x = xs.iter().sum::<f64>() / n;
        let mean_y = ys.iter().sum::<f64>() / n;
        let sxx: f64 = xs.iter().map(|x| (x - mean_x).powi(2)).sum();
        let sxy: f64 = xs.iter().zip(&ys).map(|(x, y)| (x - mean_x) * (y - mean_y)).sum();

        // All observations on one timestamp: flat line through the mean
        let slope_per_day = if sxx > 0.0 { sxy / sxx } else { 0.0 };
        let intercept = mean_y - slope_per_day * mean_x;

        let sse: f64 = xs
            .iter()
            .zip(&ys)
            .map(|(x, y)| (y - (intercept + slope_per_day * x)).powi(2))
            .sum();
        let dof = (xs.len() as f64 - 2.0).max(1.0);
        let residual_std = (sse / dof).sqrt();

        debug!(intercept, slope_per_day, residual_std, "mock model fitted");

        Ok(MockModel {
            origin,
            intercept,
            slope_per_day,
            residual_std,
            history: series.timestamps().collect(),
        })
    }

    fn predict(&self, model: &MockModel, options: &ForecastOptions) -> Result<ForecastTable> {
        let last = model
            .history
            .last()
            .copied()
            .ok_or_else(|| TrendcastError::Adapter("mock model has no history".to_string()))?;

        let mut timestamps = model.history.clone();
        for period in 1..=options.horizon {
            let next = options.horizon_unit.advance(last, period).ok_or_else(|| {
                TrendcastError::Adapter(format!("forecast period {} is out of the calendar range", period))
            })?;
            timestamps.push(next);
        }

        let mut rng = match options.seed {
            Some(seed) => fastrand::Rng::with_seed(seed),
            None => fastrand::Rng::new(),
        };
        let seasonalities = options.seasonalities();
        let half_width = INTERVAL_Z * model.residual_std;

        let rows = timestamps
            .into_iter()
            .map(|timestamp| {
                let trend = model.intercept + model.slope_per_day * days_since(model.origin, timestamp);
                let noise = if self.jitter > 0.0 {
                    (rng.f64() - 0.5) * 2.0 * self.jitter * trend.abs()
                } else {
                    0.0
                };
                let yhat = trend + noise;

                let mut components = IndexMap::new();
                components.insert("trend".to_string(), trend);
                for name in &seasonalities {
                    components.insert(name.to_string(), 0.0);
                }
                let seasonal_total = match options.seasonality_mode {
                    SeasonalityMode::Additive => "additive_terms",
                    SeasonalityMode::Multiplicative => "multiplicative_terms",
                };
                components.insert(seasonal_total.to_string(), 0.0);

                ForecastRow {
                    timestamp,
                    yhat,
                    yhat_lower: yhat - half_width,
                    yhat_upper: yhat + half_width,
                    components,
                }
            })
            .collect();

        Ok(ForecastTable::new(rows))
    }
}

fn days_since(origin: NaiveDateTime, t: NaiveDateTime) -> f64 {
    (t - origin).num_seconds() as f64 / SECONDS_PER_DAY
}
