//! Trendcast CLI - spreadsheet time-series forecasting assistant.

mod cli;
mod commands;

use clap::Parser;
use cli::{Cli, Commands};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

fn main() {
    let cli = Cli::parse();

    // Diagnostics go to stderr; command output stays on stdout
    let default_filter = if cli.verbose { "trendcast=debug" } else { "warn" };
    let filter = if cli.verbose {
        tracing_subscriber::EnvFilter::new(default_filter)
    } else {
        tracing_subscriber::EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(default_filter))
    };
    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .with(filter)
        .init();

    let result = match cli.command {
        Commands::Inspect { file, sheet, json } => {
            commands::inspect::run(file, sheet, json, cli.config, cli.verbose)
        }

        Commands::Prepare {
            file,
            date_col,
            value_col,
            sheet,
            output,
        } => commands::prepare::run(file, date_col, value_col, sheet, output, cli.config, cli.verbose),

        Commands::Forecast(args) => commands::forecast::run(args, cli.config, cli.verbose),
    };

    if let Err(e) = result {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}
