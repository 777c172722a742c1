//! Human-readable progress lines on standard output.

#[cfg(feature = "colorized_output")]
use console::style;
use healthkit_extract::pipeline::{format_count, CategoryStats, ExtractionStats, ProgressSink};
use healthkit_extract::schema::Category;

/// Prints progress and the final summary to stdout
#[derive(Debug, Default)]
pub struct ConsoleProgress;

impl ProgressSink for ConsoleProgress {
    fn started(&mut self, category: Category) {
        println!("Extracting {}...", category.schema().label);
    }

    fn progress(&mut self, category: Category, records: u64) {
        println!(
            "  Processed {} {}...",
            format_count(records),
            category.schema().label
        );
    }

    fn finished(&mut self, stats: &CategoryStats) {
        let label = stats.category.schema().label;
        match &stats.output {
            Some(path) => println!(
                "  {} {} {} to {}",
                highlight("Saved"),
                format_count(stats.records),
                label,
                path.display()
            ),
            None => println!("  {} {} found", dim("No"), label),
        }
    }

    fn completed(&mut self, stats: &ExtractionStats) {
        println!(
            "\n{} Extracted {} total records.",
            highlight("Done!"),
            format_count(stats.total_records())
        );
    }
}

#[cfg(feature = "colorized_output")]
fn highlight(text: &str) -> String {
    style(text).green().bold().to_string()
}

#[cfg(not(feature = "colorized_output"))]
fn highlight(text: &str) -> String {
    text.to_string()
}

#[cfg(feature = "colorized_output")]
fn dim(text: &str) -> String {
    style(text).yellow().to_string()
}

#[cfg(not(feature = "colorized_output"))]
fn dim(text: &str) -> String {
    text.to_string()
}
