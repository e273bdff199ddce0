//! Inspect command - show what was read and which columns were detected.

use std::path::PathBuf;

use colored::Colorize;
use trendcast::ColumnKind;

use super::{build_pipeline, ensure_exists};

pub fn run(
    file: PathBuf,
    sheet: Option<String>,
    json_output: bool,
    config: Option<PathBuf>,
    verbose: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    ensure_exists(&file)?;

    let trendcast = build_pipeline(config.as_deref(), sheet)?;
    let loaded = trendcast.load(&file)?;

    if json_output {
        let report = serde_json::json!({
            "source": loaded.source,
            "columns": loaded.profiles,
            "suggestion": loaded.suggestion,
        });
        println!("{}", serde_json::to_string_pretty(&report)?);
        return Ok(());
    }

    let source = &loaded.source;
    println!("{} {}", "Inspecting".cyan().bold(), source.file.white());
    println!();
    println!("Format:  {}", source.format);
    if let Some(ref sheet) = source.sheet {
        println!(
            "Sheet:   {} (of {})",
            sheet.white().bold(),
            source.sheet_names.join(", ")
        );
    }
    println!(
        "Size:    {} rows x {} columns",
        source.row_count.to_string().white().bold(),
        source.column_count.to_string().white().bold()
    );
    if verbose {
        println!("Hash:    {}", source.hash);
        println!("Bytes:   {}", source.size_bytes);
    }

    println!();
    println!("{}", "Columns:".yellow().bold());
    for profile in &loaded.profiles {
        let kind = format!("{:8}", profile.kind.to_string());
        let kind = match profile.kind {
            ColumnKind::Date => kind.green(),
            ColumnKind::Numeric => kind.blue(),
            ColumnKind::Other => kind.normal(),
        };
        let sample = profile
            .sample
            .as_ref()
            .map(|c| c.to_string())
            .unwrap_or_default();
        println!(
            "  {:20} {} {:9} {:>5.0}%  {}",
            profile.name,
            kind,
            profile.storage.to_string(),
            profile.coercible_percentage(),
            sample.dimmed()
        );
    }

    println!();
    let suggestion = &loaded.suggestion;
    match &suggestion.date_column {
        Some(date) => println!("Date column:   {}", date.green().bold()),
        None => println!("Date column:   {}", "none detected".red()),
    }
    match suggestion.value_column() {
        Some(value) => println!("Value column:  {}", value.green().bold()),
        None => println!("Value column:  {}", "none detected".red()),
    }
    if suggestion.numeric_columns.len() > 1 {
        println!(
            "Other numeric: {}",
            suggestion.numeric_columns[1..].join(", ")
        );
    }

    if suggestion.is_complete() {
        println!();
        println!(
            "Run {} to forecast",
            format!("trendcast forecast {}", file.display()).cyan().bold()
        );
    }

    Ok(())
}
