//! Boundary to the external forecasting model.

use crate::error::Result;
use crate::series::CleanSeries;

use super::options::ForecastOptions;
use super::table::ForecastTable;

/// A trend/seasonality estimator living outside this crate.
///
/// The fitted model is an opaque handle: callers keep it and hand it back to
/// the same adapter's [`predict`](ForecastAdapter::predict), never inspect it.
/// Failures are reported as [`TrendcastError::Adapter`](crate::TrendcastError::Adapter)
/// and are not retried.
pub trait ForecastAdapter {
    /// Fitted model handle.
    type Model;

    /// Short name for logs.
    fn name(&self) -> &str;

    /// Fit a model to the series.
    fn fit(&self, series: &CleanSeries, options: &ForecastOptions) -> Result<Self::Model>;

    /// Forecast the fitted history plus `options.horizon` future periods.
    fn predict(&self, model: &Self::Model, options: &ForecastOptions) -> Result<ForecastTable>;

    /// Fit then predict in one call.
    ///
    /// Rejects an empty series before reaching the model.
    fn fit_and_forecast(
        &self,
        series: &CleanSeries,
        options: &ForecastOptions,
    ) -> Result<(Self::Model, ForecastTable)> {
        series.ensure_not_empty()?;
        options.validate()?;
        let model = self.fit(series, options)?;
        let forecast = self.predict(&model, options)?;
        forecast.validate()?;
        Ok((model, forecast))
    }
}
