//! Forecast command - fit a model and write the forecast table.

use std::fs::File;
use std::io::BufWriter;
use std::path::PathBuf;

use colored::Colorize;
use trendcast::{ForecastAdapter, ForecastOptions, HttpAdapter, LoadedTable, MockAdapter, Trendcast};

use crate::cli::{AdapterChoice, ForecastArgs};

use super::{ensure_exists, load_config, sibling_path};

pub fn run(
    args: ForecastArgs,
    config: Option<PathBuf>,
    verbose: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    ensure_exists(&args.file)?;

    let mut config = load_config(config.as_deref(), args.sheet.clone())?;
    apply_overrides(&mut config.forecast, &args);

    let trendcast = Trendcast::with_config(config);
    let loaded = trendcast.load(&args.file)?;

    match args.adapter {
        AdapterChoice::Http => {
            let adapter = match args.endpoint {
                Some(ref url) => HttpAdapter::with_base_url(url.clone())?,
                None => HttpAdapter::new()?,
            };
            forecast_with(&trendcast, &adapter, &loaded, &args, verbose)
        }
        AdapterChoice::Mock => forecast_with(&trendcast, &MockAdapter::new(), &loaded, &args, verbose),
    }
}

/// Command-line flags win over the config file.
fn apply_overrides(options: &mut ForecastOptions, args: &ForecastArgs) {
    if let Some(horizon) = args.horizon {
        options.horizon = horizon;
    }
    if let Some(unit) = args.unit {
        options.horizon_unit = unit;
    }
    if let Some(mode) = args.mode {
        options.seasonality_mode = mode;
    }
    if args.no_yearly {
        options.yearly_seasonality = false;
    }
    if args.no_weekly {
        options.weekly_seasonality = false;
    }
    if args.daily {
        options.daily_seasonality = true;
    }
    if let Some(scale) = args.changepoint_prior_scale {
        options.changepoint_prior_scale = scale;
    }
    if let Some(scale) = args.seasonality_prior_scale {
        options.seasonality_prior_scale = scale;
    }
    if args.seed.is_some() {
        options.seed = args.seed;
    }
}

fn forecast_with<A: ForecastAdapter>(
    trendcast: &Trendcast,
    adapter: &A,
    loaded: &LoadedTable,
    args: &ForecastArgs,
    verbose: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    let choice = trendcast.select(loaded, args.date_col.as_deref(), args.value_col.as_deref())?;
    let options = &trendcast.config().forecast;

    println!(
        "{} {} / {} with {} ({} {}s ahead)",
        "Forecasting".cyan().bold(),
        choice.date_col.white(),
        choice.value_col.white(),
        adapter.name().white().bold(),
        options.horizon,
        options.horizon_unit
    );

    let run = trendcast.forecast(adapter, loaded, choice)?;

    if run.report.dropped() > 0 {
        println!(
            "Dropped {} of {} rows ({} invalid dates, {} invalid values)",
            run.report.dropped().to_string().yellow(),
            run.report.input_rows,
            run.report.invalid_dates,
            run.report.invalid_values
        );
    }

    let table = match (args.future_only, run.series.last()) {
        (true, Some(last)) => run.forecast.future(last.timestamp),
        _ => run.forecast,
    };

    if verbose {
        println!();
        println!("{}", "Next periods:".yellow().bold());
        let last_observed = run.series.last().map(|p| p.timestamp);
        for row in table
            .rows
            .iter()
            .filter(|r| last_observed.is_none_or(|t| r.timestamp > t))
            .take(5)
        {
            println!(
                "  {}  {:>12.2}  [{:.2}, {:.2}]",
                row.timestamp.date(),
                row.yhat,
                row.yhat_lower,
                row.yhat_upper
            );
        }
    }

    let output_path = args
        .output
        .clone()
        .unwrap_or_else(|| sibling_path(&args.file, "forecast.csv"));
    table.write_csv(BufWriter::new(File::create(&output_path)?))?;

    println!();
    println!(
        "Wrote {} rows from {} observations",
        table.len().to_string().white().bold(),
        run.series.len()
    );
    println!(
        "{} {}",
        "Saved to".green().bold(),
        output_path.display().to_string().white()
    );

    Ok(())
}
