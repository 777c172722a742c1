use std::path::Path;

use log::debug;

use super::{CategoryStats, ExtractionError, ExtractionStats, HealthExtractor, ProgressSink};
use crate::extract::Dispatcher;
use crate::schema::Category;
use crate::table::TableWriter;
use crate::xml::ElementReader;

/// Output state of one category during the shared traversal
struct Lane {
    category: Category,
    table: TableWriter,
    interval: u64,
    announced: bool,
}

impl Lane {
    /// Report the category as started just before its first event,
    /// so its progress lines follow its own heading
    fn announce(&mut self, sink: &mut dyn ProgressSink) {
        if !self.announced {
            sink.started(self.category);
            self.announced = true;
        }
    }
}

impl HealthExtractor {
    /// Extract all categories from one traversal of the input
    ///
    /// Every element is offered to each selected extractor, so the output is
    /// identical to running the categories one after another.
    pub(super) fn run_single_pass(
        &self,
        input_path: &Path,
        output_dir: &Path,
        categories: &[Category],
        sink: &mut dyn ProgressSink,
    ) -> Result<ExtractionStats, ExtractionError> {
        let mut stats = ExtractionStats::default();
        let dispatcher = Dispatcher::new(categories);

        let mut lanes = Vec::with_capacity(categories.len());
        for extractor in dispatcher.extractors() {
            let schema = extractor.schema();
            lanes.push(Lane {
                category: schema.category,
                table: TableWriter::create(
                    output_dir.join(schema.file_name),
                    schema.fields,
                    self.config.table,
                )?,
                interval: self.config.progress.for_category(schema.category),
                announced: false,
            });
        }

        let reader = ElementReader::open_with_buffer_size(input_path, self.config.buffer_size)?;
        let mut elements = reader.elements();

        for element in elements.by_ref() {
            let element = element?;
            for (i, record) in dispatcher.dispatch(&element) {
                let Some(lane) = lanes.get_mut(i) else {
                    continue;
                };
                lane.table.write_record(&record)?;
                if lane.table.rows() % lane.interval == 0 {
                    lane.announce(sink);
                    sink.progress(lane.category, lane.table.rows());
                }
            }
        }

        let reader_stats = elements.reader().stats();
        debug!("single pass: {:?}", reader_stats);
        stats.absorb_reader(reader_stats);

        for mut lane in lanes {
            lane.announce(sink);
            let category_stats = CategoryStats::from_summary(lane.category, lane.table.finish()?);
            sink.finished(&category_stats);
            stats.categories.push(category_stats);
        }

        Ok(stats)
    }
}
