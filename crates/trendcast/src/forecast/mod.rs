//! Forecasting boundary: options, adapters and the forecast table.

mod adapter;
mod http;
mod mock;
mod options;
mod table;

pub use adapter::ForecastAdapter;
pub use http::{BASE_URL_ENV, DEFAULT_BASE_URL, HttpAdapter, RemoteModel};
pub use mock::{MockAdapter, MockModel};
pub use options::{ForecastOptions, HorizonUnit, SeasonalityMode};
pub use table::{ForecastRow, ForecastTable};
