//! CLI command implementations.

pub mod forecast;
pub mod inspect;
pub mod prepare;

use std::path::{Path, PathBuf};

use trendcast::{Trendcast, TrendcastConfig};

/// Load the config file if given and apply a sheet override.
pub(crate) fn load_config(
    config_path: Option<&Path>,
    sheet: Option<String>,
) -> Result<TrendcastConfig, Box<dyn std::error::Error>> {
    let mut config = match config_path {
        Some(path) => TrendcastConfig::from_json_file(path)?,
        None => TrendcastConfig::default(),
    };
    if let Some(sheet) = sheet {
        config.parser.sheet = Some(sheet);
    }
    Ok(config)
}

pub(crate) fn build_pipeline(
    config_path: Option<&Path>,
    sheet: Option<String>,
) -> Result<Trendcast, Box<dyn std::error::Error>> {
    Ok(Trendcast::with_config(load_config(config_path, sheet)?))
}

/// `<dir>/<stem>.<suffix>` next to the input file.
pub(crate) fn sibling_path(file: &Path, suffix: &str) -> PathBuf {
    let mut p = file.to_path_buf();
    let stem = p.file_stem().unwrap_or_default().to_string_lossy().into_owned();
    p.set_file_name(format!("{}.{}", stem, suffix));
    p
}

pub(crate) fn ensure_exists(file: &Path) -> Result<(), Box<dyn std::error::Error>> {
    if !file.exists() {
        return Err(format!("File not found: {}", file.display()).into());
    }
    Ok(())
}
