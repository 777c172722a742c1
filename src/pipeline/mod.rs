//! Extraction pipeline
//!
//! This module ties the reader, the extractors and the table writer together:
//! it selects categories, runs the traversals, counts rows and reports
//! progress through a [`ProgressSink`].

use std::fmt;
use std::path::{Path, PathBuf};

use log::{info, warn};
use serde::Deserialize;

use crate::schema::{normalize_categories, Category};
use crate::table::{TableConfig, TableError, TableSummary};
use crate::xml::{ReaderStats, XmlError, DEFAULT_INPUT_BUFFER_SIZE};

pub use progress::{format_count, LogProgress, ProgressSink};

mod per_category;
mod progress;
mod single_pass;


/// Errors that can occur during an extraction run
#[derive(Debug, thiserror::Error)]
pub enum ExtractionError {
    /// The input path does not exist
    #[error("File not found: {}", .0.display())]
    InputNotFound(PathBuf),

    /// Error parsing the input XML
    #[error("XML parsing error: {0}")]
    XmlError(#[from] XmlError),

    /// Error writing an output table
    #[error("Table error: {0}")]
    TableError(#[from] TableError),

    /// I/O error during file operations
    #[error("I/O error: {0}")]
    IoError(#[from] std::io::Error),
}

/// How the input is traversed
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ExtractionStrategy {
    /// One traversal feeding every selected extractor
    #[default]
    SinglePass,
    /// One full traversal per selected category, in canonical order
    PerCategory,
}

/// Rows between progress reports, per category
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ProgressIntervals {
    /// Interval for health records
    pub measurements: u64,
    /// Interval for workouts
    pub workouts: u64,
    /// Interval for activity summaries
    pub activity_summaries: u64,
}

impl Default for ProgressIntervals {
    fn default() -> Self {
        Self {
            measurements: Category::Measurements.schema().progress_interval,
            workouts: Category::Workouts.schema().progress_interval,
            activity_summaries: Category::ActivitySummaries.schema().progress_interval,
        }
    }
}

impl ProgressIntervals {
    /// Interval for one category (never zero)
    pub fn for_category(&self, category: Category) -> u64 {
        let interval = match category {
            Category::Measurements => self.measurements,
            Category::Workouts => self.workouts,
            Category::ActivitySummaries => self.activity_summaries,
        };
        interval.max(1)
    }
}

/// Configuration for an extraction run
#[derive(Debug, Clone)]
pub struct ExtractionConfig {
    /// Selected categories; empty means all
    pub categories: Vec<Category>,

    /// Traversal strategy
    pub strategy: ExtractionStrategy,

    /// Input buffer size in bytes
    pub buffer_size: usize,

    /// Output table settings
    pub table: TableConfig,

    /// Progress reporting cadence
    pub progress: ProgressIntervals,
}

impl Default for ExtractionConfig {
    fn default() -> Self {
        Self {
            categories: Vec::new(),
            strategy: ExtractionStrategy::default(),
            buffer_size: DEFAULT_INPUT_BUFFER_SIZE,
            table: TableConfig::default(),
            progress: ProgressIntervals::default(),
        }
    }
}

impl ExtractionConfig {
    /// Settings that cannot be honoured and fall back to a usable value
    fn ignored_settings(&self) -> Vec<String> {
        let mut ignored = Vec::new();
        if self.buffer_size == 0 {
            ignored.push("buffer_size = 0, using a 1 byte buffer".to_string());
        }
        for category in normalize_categories(&self.categories) {
            let interval = match category {
                Category::Measurements => self.progress.measurements,
                Category::Workouts => self.progress.workouts,
                Category::ActivitySummaries => self.progress.activity_summaries,
            };
            if interval == 0 {
                ignored.push(format!(
                    "progress interval 0 for {}, reporting every row",
                    category
                ));
            }
        }
        ignored
    }
}

/// Outcome for one category
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CategoryStats {
    /// Category extracted
    pub category: Category,
    /// Rows written
    pub records: u64,
    /// Table location, `None` when no element matched
    pub output: Option<PathBuf>,
}

impl CategoryStats {
    fn from_summary(category: Category, summary: Option<TableSummary>) -> Self {
        match summary {
            Some(summary) => Self {
                category,
                records: summary.rows,
                output: Some(summary.path),
            },
            None => Self {
                category,
                records: 0,
                output: None,
            },
        }
    }
}

/// Statistics from an extraction run
#[derive(Debug, Clone, Default)]
pub struct ExtractionStats {
    /// Per-category results in execution order
    pub categories: Vec<CategoryStats>,
    /// Number of full traversals of the input
    pub passes: usize,
    /// Reader statistics of the largest traversal
    pub reader: ReaderStats,
}

impl ExtractionStats {
    /// Total rows across all selected categories
    pub fn total_records(&self) -> u64 {
        self.categories.iter().map(|c| c.records).sum()
    }

    /// Result for one category, if it was selected
    pub fn category(&self, category: Category) -> Option<&CategoryStats> {
        self.categories.iter().find(|c| c.category == category)
    }

    fn absorb_reader(&mut self, stats: ReaderStats) {
        self.passes += 1;
        self.reader.elements_closed = self.reader.elements_closed.max(stats.elements_closed);
        self.reader.max_depth = self.reader.max_depth.max(stats.max_depth);
        self.reader.max_retained_attributes = self
            .reader
            .max_retained_attributes
            .max(stats.max_retained_attributes);
    }
}

impl fmt::Display for ExtractionStats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Extracted {} records in {} categories over {} pass(es)",
            format_count(self.total_records()),
            self.categories.len(),
            self.passes
        )
    }
}

/// Extracts Apple Health exports into per-category tables
#[derive(Debug, Clone, Default)]
pub struct HealthExtractor {
    config: ExtractionConfig,
}

impl HealthExtractor {
    /// Create an extractor with the default configuration
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an extractor with a custom configuration
    pub fn with_config(config: ExtractionConfig) -> Self {
        Self { config }
    }

    /// Restrict the run to the given categories
    pub fn with_categories(mut self, categories: &[Category]) -> Self {
        self.config.categories = categories.to_vec();
        self
    }

    /// Choose the traversal strategy
    pub fn with_strategy(mut self, strategy: ExtractionStrategy) -> Self {
        self.config.strategy = strategy;
        self
    }

    /// Configuration of this extractor
    pub fn config(&self) -> &ExtractionConfig {
        &self.config
    }

    /// Run with progress reported through the `log` facade
    pub fn run<P: AsRef<Path>, Q: AsRef<Path>>(
        &self,
        input_path: P,
        output_dir: Q,
    ) -> Result<ExtractionStats, ExtractionError> {
        self.run_with_progress(input_path, output_dir, &mut LogProgress)
    }

    /// Run, reporting progress to `sink`
    pub fn run_with_progress<P: AsRef<Path>, Q: AsRef<Path>>(
        &self,
        input_path: P,
        output_dir: Q,
        sink: &mut dyn ProgressSink,
    ) -> Result<ExtractionStats, ExtractionError> {
        let input_path = input_path.as_ref();
        let output_dir = output_dir.as_ref();

        // Checked before anything touches the output directory
        if !input_path.exists() {
            return Err(ExtractionError::InputNotFound(input_path.to_path_buf()));
        }
        std::fs::create_dir_all(output_dir)?;

        for setting in self.config.ignored_settings() {
            warn!("Ignoring {}", setting);
        }

        let categories = normalize_categories(&self.config.categories);
        info!(
            "Extracting {:?} from {} into {} ({:?})",
            categories,
            input_path.display(),
            output_dir.display(),
            self.config.strategy
        );

        let stats = match self.config.strategy {
            ExtractionStrategy::SinglePass => {
                self.run_single_pass(input_path, output_dir, &categories, sink)?
            }
            ExtractionStrategy::PerCategory => {
                self.run_per_category(input_path, output_dir, &categories, sink)?
            }
        };

        sink.completed(&stats);
        Ok(stats)
    }
}
