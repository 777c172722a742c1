use anyhow::{Context, Result};
use log::info;
use std::path::PathBuf;

use healthkit_extract::pipeline::{ExtractionConfig, ExtractionStrategy, HealthExtractor};
use healthkit_extract::schema::Category;
use healthkit_extract::table::TableConfig;

use super::config::Config;
use super::progress::ConsoleProgress;

/// Extract an Apple Health export to CSV tables
pub fn run(
    input: PathBuf,
    output: Option<PathBuf>,
    types: Vec<Category>,
    strategy: Option<ExtractionStrategy>,
    config: Option<PathBuf>,
) -> Result<()> {
    // Validate input file exists before touching the output directory
    if !input.exists() {
        anyhow::bail!("File not found: {}", input.display());
    }

    let file_config = match config {
        Some(ref path) => Config::from_file(path)?,
        None => Config::default(),
    };
    let (output, extraction_config) = resolve(output, types, strategy, file_config)?;

    info!("healthkit-extract - Apple Health export to CSV");
    info!("Input:    {}", input.display());
    info!("Output:   {}", output.display());
    info!("Strategy: {:?}", extraction_config.strategy);
    if let Some(path) = &config {
        info!("Config:   {}", path.display());
    }

    HealthExtractor::with_config(extraction_config)
        .run_with_progress(&input, &output, &mut ConsoleProgress)
        .context("Extraction failed")?;

    Ok(())
}

/// Merge command-line flags over config file settings
fn resolve(
    output: Option<PathBuf>,
    types: Vec<Category>,
    strategy: Option<ExtractionStrategy>,
    file_config: Config,
) -> Result<(PathBuf, ExtractionConfig)> {
    let Config {
        extraction,
        progress,
    } = file_config;

    let mut config = ExtractionConfig::default();

    config.categories = if types.is_empty() {
        extraction.types.clone().unwrap_or_default()
    } else {
        types
    };
    config.strategy = strategy.or(extraction.strategy).unwrap_or_default();
    if let Some(buffer_size) = extraction.buffer_size {
        config.buffer_size = buffer_size;
    }
    if let Some(delimiter) = extraction.delimiter_byte()? {
        config.table = TableConfig { delimiter };
    }
    if let Some(n) = progress.records {
        config.progress.measurements = n;
    }
    if let Some(n) = progress.workouts {
        config.progress.workouts = n;
    }
    if let Some(n) = progress.activity {
        config.progress.activity_summaries = n;
    }

    let output = output
        .or(extraction.output)
        .unwrap_or_else(|| PathBuf::from("."));

    Ok((output, config))
}
