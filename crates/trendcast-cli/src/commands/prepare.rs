//! Prepare command - write the clean series without forecasting.

use std::fs::File;
use std::io::BufWriter;
use std::path::PathBuf;

use colored::Colorize;

use super::{build_pipeline, ensure_exists, sibling_path};

pub fn run(
    file: PathBuf,
    date_col: Option<String>,
    value_col: Option<String>,
    sheet: Option<String>,
    output: Option<PathBuf>,
    config: Option<PathBuf>,
    verbose: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    ensure_exists(&file)?;

    let trendcast = build_pipeline(config.as_deref(), sheet)?;
    let loaded = trendcast.load(&file)?;
    let choice = trendcast.select(&loaded, date_col.as_deref(), value_col.as_deref())?;

    println!(
        "{} {} / {}",
        "Preparing".cyan().bold(),
        choice.date_col.white(),
        choice.value_col.white()
    );

    let (series, report) = trendcast.prepare(&loaded, &choice)?;

    let output_path = output.unwrap_or_else(|| sibling_path(&file, "series.csv"));
    series.write_csv(BufWriter::new(File::create(&output_path)?))?;

    println!(
        "Kept {} of {} rows",
        report.output_rows.to_string().white().bold(),
        report.input_rows
    );
    if report.dropped() > 0 {
        println!(
            "Dropped {} rows ({} invalid dates, {} invalid values)",
            report.dropped().to_string().yellow(),
            report.invalid_dates,
            report.invalid_values
        );
    }
    if verbose {
        if let (Some(first), Some(last)) = (series.first(), series.last()) {
            println!("Range:  {} .. {}", first.timestamp, last.timestamp);
        }
    }

    println!();
    println!(
        "{} {}",
        "Saved to".green().bold(),
        output_path.display().to_string().white()
    );

    Ok(())
}
