use std::path::Path;

use log::debug;

use super::{CategoryStats, ExtractionError, ExtractionStats, HealthExtractor, ProgressSink};
use crate::extract::{Extractor, RecordIterator};
use crate::schema::Category;
use crate::table::TableWriter;
use crate::xml::ElementReader;

impl HealthExtractor {
    /// Extract each category with its own full traversal of the input
    pub(super) fn run_per_category(
        &self,
        input_path: &Path,
        output_dir: &Path,
        categories: &[Category],
        sink: &mut dyn ProgressSink,
    ) -> Result<ExtractionStats, ExtractionError> {
        let mut stats = ExtractionStats::default();

        for &category in categories {
            let schema = category.schema();
            let interval = self.config.progress.for_category(category);
            sink.started(category);

            let reader = ElementReader::open_with_buffer_size(input_path, self.config.buffer_size)?;
            let mut records = RecordIterator::new(reader.elements(), Extractor::new(schema));
            let mut table = TableWriter::create(
                output_dir.join(schema.file_name),
                schema.fields,
                self.config.table,
            )?;

            for record in records.by_ref() {
                table.write_record(&record?)?;
                if table.rows() % interval == 0 {
                    sink.progress(category, table.rows());
                }
            }

            let reader_stats = records.reader_stats();
            debug!("{} pass: {:?}", category, reader_stats);
            stats.absorb_reader(reader_stats);

            let category_stats = CategoryStats::from_summary(category, table.finish()?);
            sink.finished(&category_stats);
            stats.categories.push(category_stats);
        }

        Ok(stats)
    }
}
