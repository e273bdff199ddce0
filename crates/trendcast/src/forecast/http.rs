//! Forecast adapter backed by an HTTP forecasting service.
//!
//! The service fits Prophet-style models. Two routes are used:
//! `POST {base}/fit` returns a model id, `POST {base}/predict` returns the
//! forecast rows for that model.

use std::time::Duration;

use chrono::NaiveDateTime;
use reqwest::blocking::Client;
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT, CONTENT_TYPE};
use serde::Deserialize;
use serde::de::DeserializeOwned;
use serde_json::{json, Value};
use tracing::{debug, info};

use crate::error::{Result, TrendcastError};
use crate::series::{CleanSeries, TIMESTAMP_FORMAT};

use super::adapter::ForecastAdapter;
use super::options::ForecastOptions;
use super::table::ForecastTable;

/// Default forecasting service base URL.
pub const DEFAULT_BASE_URL: &str = "http://localhost:8765";

/// Environment variable overriding the base URL.
pub const BASE_URL_ENV: &str = "TRENDCAST_FORECAST_URL";

const DEFAULT_TIMEOUT_SECS: u64 = 120;

/// Adapter that delegates fitting and prediction to a forecasting service.
pub struct HttpAdapter {
    client: Client,
    base_url: String,
}

/// Handle to a model held by the service.
#[derive(Debug, Clone)]
pub struct RemoteModel {
    model_id: String,
    history_end: NaiveDateTime,
    points: usize,
}

impl RemoteModel {
    /// Last observed timestamp the model was fitted on.
    pub fn history_end(&self) -> NaiveDateTime {
        self.history_end
    }
}

impl HttpAdapter {
    /// Create an adapter for the base URL in `TRENDCAST_FORECAST_URL`,
    /// or `http://localhost:8765` when unset.
    pub fn new() -> Result<Self> {
        let base_url = std::env::var(BASE_URL_ENV).unwrap_or_else(|_| DEFAULT_BASE_URL.to_string());
        Self::with_base_url(base_url)
    }

    /// Create an adapter for a specific service.
    pub fn with_base_url(base_url: impl Into<String>) -> Result<Self> {
        Self::build(base_url.into(), Duration::from_secs(DEFAULT_TIMEOUT_SECS))
    }

    /// Replace the request timeout. Fitting large series can be slow.
    pub fn with_timeout(self, timeout: Duration) -> Result<Self> {
        Self::build(self.base_url, timeout)
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn build(base_url: String, timeout: Duration) -> Result<Self> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| TrendcastError::Config(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    fn build_headers(&self) -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        headers.insert(ACCEPT, HeaderValue::from_static("application/json"));
        headers
    }

    fn post<T: DeserializeOwned>(&self, route: &str, body: &Value) -> Result<T> {
        let url = format!("{}/{}", self.base_url, route);
        debug!(url = %url, "posting to forecast service");

        let response = self
            .client
            .post(&url)
            .headers(self.build_headers())
            .json(body)
            .send()
            .map_err(|e| {
                if e.is_connect() {
                    TrendcastError::Adapter(format!(
                        "Failed to connect to forecast service at {}. Is it running?",
                        self.base_url
                    ))
                } else if e.is_timeout() {
                    TrendcastError::Adapter(format!("Forecast service timed out on /{}", route))
                } else {
                    TrendcastError::Adapter(format!("Forecast request failed: {}", e))
                }
            })?;

        if !response.status().is_success() {
            let status = response.status();
            let error_text = response.text().unwrap_or_default();
            return Err(TrendcastError::Adapter(format!(
                "Forecast service error on /{} ({}): {}",
                route,
                status,
                error_text.trim()
            )));
        }

        let text = response
            .text()
            .map_err(|e| TrendcastError::Adapter(format!("Failed to read forecast response: {}", e)))?;
        parse_response(route, &text)
    }
}

impl ForecastAdapter for HttpAdapter {
    type Model = RemoteModel;

    fn name(&self) -> &str {
        "http"
    }

    fn fit(&self, series: &CleanSeries, options: &ForecastOptions) -> Result<RemoteModel> {
        let history_end = series
            .last()
            .map(|p| p.timestamp)
            .ok_or_else(|| TrendcastError::EmptySeries("nothing to fit".to_string()))?;

        let response: FitResponse = self.post("fit", &fit_body(series, options))?;
        info!(model_id = %response.model_id, points = series.len(), "remote model fitted");

        Ok(RemoteModel {
            model_id: response.model_id,
            history_end,
            points: series.len(),
        })
    }

    fn predict(&self, model: &RemoteModel, options: &ForecastOptions) -> Result<ForecastTable> {
        let table: ForecastTable = self.post("predict", &predict_body(model, options))?;
        debug!(
            model_id = %model.model_id,
            rows = table.len(),
            fitted_points = model.points,
            "remote forecast received"
        );
        Ok(table)
    }
}

/// Request body for `/fit`.
fn fit_body(series: &CleanSeries, options: &ForecastOptions) -> Value {
    let history: Vec<Value> = series
        .points()
        .iter()
        .map(|p| {
            json!({
                "ds": p.timestamp.format(TIMESTAMP_FORMAT).to_string(),
                "y": p.value,
            })
        })
        .collect();

    json!({
        "options": options,
        "history": history,
    })
}

/// Request body for `/predict`.
fn predict_body(model: &RemoteModel, options: &ForecastOptions) -> Value {
    json!({
        "model_id": model.model_id,
        "periods": options.horizon,
        "freq": options.horizon_unit.frequency_alias(),
        "include_history": true,
        "options": options,
    })
}

fn parse_response<T: DeserializeOwned>(route: &str, text: &str) -> Result<T> {
    serde_json::from_str(text).map_err(|e| {
        TrendcastError::Adapter(format!("Failed to parse forecast service response from /{}: {}", route, e))
    })
}

#[derive(Debug, Deserialize)]
struct FitResponse {
    model_id: String,
}
