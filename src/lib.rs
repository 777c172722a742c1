//! # healthkit-extract - Apple Health Export to CSV
//!
//! `healthkit_extract` converts the single large `export.xml` produced by the
//! Apple Health app into flat CSV tables, one per record category:
//!
//! | Category | Element | Output file |
//! |----------|---------|-------------|
//! | records | `Record` | `health_records.csv` |
//! | workouts | `Workout` | `workouts.csv` |
//! | activity | `ActivitySummary` | `activity_summary.csv` |
//!
//! ## Key Features
//!
//! - **Streaming**: The export is pull-parsed with quick-xml. Only the chain of
//!   currently open elements is held in memory, so multi-gigabyte exports are
//!   processed in bounded memory.
//!
//! - **Fixed schemas**: Every table has a fixed column list. Missing
//!   attributes become empty fields and values are copied verbatim.
//!
//! - **No partial tables**: Rows stream into a temp file that is only moved into
//!   place when the category is complete and non-empty.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use healthkit_extract::pipeline::HealthExtractor;
//! use healthkit_extract::schema::Category;
//!
//! let stats = HealthExtractor::new()
//!     .with_categories(&[Category::Measurements, Category::Workouts])
//!     .run("export.xml", "data/")?;
//!
//! println!("{}", stats);
//! # Ok::<(), healthkit_extract::pipeline::ExtractionError>(())
//! ```
//!
//! ## Architecture
//!
//! - [`xml`]: Streaming element reader producing closed elements in document order
//! - [`schema`]: Categories and their fixed column lists
//! - [`extract`]: Projection of matched elements onto category records
//! - [`table`]: CSV table writer
//! - [`pipeline`]: Orchestration, progress reporting and statistics

#![deny(missing_docs)]
#![deny(rustdoc::missing_crate_level_docs)]

pub mod extract;
pub mod pipeline;
pub mod schema;
pub mod table;
pub mod xml;

/// Re-export commonly used types for convenience
pub mod prelude {
    pub use crate::extract::{Dispatcher, ExtractedRecord, Extractor, RecordIterator};
    pub use crate::pipeline::{
        CategoryStats, ExtractionConfig, ExtractionError, ExtractionStats, ExtractionStrategy,
        HealthExtractor, LogProgress, ProgressIntervals, ProgressSink,
    };
    pub use crate::schema::{Category, CategorySchema, CONTAINER_TAGS};
    pub use crate::table::{write_table, TableConfig, TableError, TableSummary, TableWriter};
    pub use crate::xml::{ElementReader, Elements, ReaderStats, SourceElement, XmlError};
}
