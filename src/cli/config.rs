//! TOML configuration file support.
//!
//! Settings that would otherwise be repeated on every invocation can live in a
//! config file. Command-line flags take precedence:
//!
//! ```toml
//! # healthkit-extract.toml
//! [extraction]
//! output = "data/"
//! types = ["records", "workouts"]
//! strategy = "per-category"
//! buffer_size = 262144
//! delimiter = ","
//!
//! [progress]
//! records = 50000
//! workouts = 500
//! activity = 500
//! ```

use anyhow::{Context, Result};
use healthkit_extract::pipeline::ExtractionStrategy;
use healthkit_extract::schema::Category;
use serde::Deserialize;
use std::path::{Path, PathBuf};

/// Root configuration structure for healthkit-extract.toml files.
#[derive(Debug, Default, Deserialize)]
pub struct Config {
    /// Extraction settings.
    #[serde(default)]
    pub extraction: ExtractionSection,

    /// Progress reporting cadence.
    #[serde(default)]
    pub progress: ProgressSection,
}

/// Configuration for the extraction run.
#[derive(Debug, Default, Deserialize)]
pub struct ExtractionSection {
    /// Output directory for CSV files.
    pub output: Option<PathBuf>,

    /// Categories to extract.
    pub types: Option<Vec<Category>>,

    /// Traversal strategy.
    pub strategy: Option<ExtractionStrategy>,

    /// Input buffer size in bytes.
    pub buffer_size: Option<usize>,

    /// Single ASCII character separating fields.
    pub delimiter: Option<char>,
}

/// Rows between progress lines, per category.
#[derive(Debug, Default, Deserialize)]
pub struct ProgressSection {
    /// Interval for health records.
    pub records: Option<u64>,

    /// Interval for workouts.
    pub workouts: Option<u64>,

    /// Interval for activity summaries.
    pub activity: Option<u64>,
}

impl Config {
    /// Load configuration from a TOML file.
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        Self::from_str(&content)
    }

    /// Parse configuration from a TOML string.
    pub fn from_str(content: &str) -> Result<Self> {
        toml::from_str(content).context("Failed to parse TOML configuration")
    }
}

impl ExtractionSection {
    /// The configured delimiter as a byte, if one is set.
    pub fn delimiter_byte(&self) -> Result<Option<u8>> {
        match self.delimiter {
            None => Ok(None),
            Some(c) if c.is_ascii() && c != '"' && c != '\n' && c != '\r' => Ok(Some(c as u8)),
            Some(c) => anyhow::bail!(
                "Unsupported delimiter {:?}: must be an ASCII character other than a quote or newline",
                c
            ),
        }
    }
}
