use log::info;

use super::{CategoryStats, ExtractionStats};
use crate::schema::Category;

/// Receives progress notifications during a run
///
/// All methods have empty defaults so sinks implement only what they show.
pub trait ProgressSink {
    /// A category's extraction is starting
    fn started(&mut self, _category: Category) {}

    /// `records` rows of `category` have been extracted so far
    fn progress(&mut self, _category: Category, _records: u64) {}

    /// A category is complete
    fn finished(&mut self, _stats: &CategoryStats) {}

    /// The whole run is complete
    fn completed(&mut self, _stats: &ExtractionStats) {}
}

/// Progress sink writing to the `log` facade
#[derive(Debug, Clone, Copy, Default)]
pub struct LogProgress;

impl ProgressSink for LogProgress {
    fn started(&mut self, category: Category) {
        info!("Extracting {}...", category.schema().label);
    }

    fn progress(&mut self, category: Category, records: u64) {
        info!(
            "Processed {} {}...",
            format_count(records),
            category.schema().label
        );
    }

    fn finished(&mut self, stats: &CategoryStats) {
        let label = stats.category.schema().label;
        match &stats.output {
            Some(path) => info!(
                "Saved {} {} to {}",
                format_count(stats.records),
                label,
                path.display()
            ),
            None => info!("No {} found", label),
        }
    }

    fn completed(&mut self, stats: &ExtractionStats) {
        info!("{}", stats);
    }
}

/// Format a count with thousands separators (`1234567` -> `1,234,567`)
pub fn format_count(n: u64) -> String {
    let digits = n.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    out
}
