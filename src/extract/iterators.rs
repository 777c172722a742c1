use std::io::BufRead;

use super::{ExtractedRecord, Extractor};
use crate::xml::{Elements, ReaderStats, XmlError};

/// Iterator over the records of one category in document order
///
/// Non-matching elements are consumed and dropped as they close.
pub struct RecordIterator<R: BufRead> {
    elements: Elements<R>,
    extractor: Extractor,
}

impl<R: BufRead> RecordIterator<R> {
    /// Drive `extractor` over an element stream
    pub fn new(elements: Elements<R>, extractor: Extractor) -> Self {
        Self {
            elements,
            extractor,
        }
    }

    /// Reader statistics for the traversal so far
    pub fn reader_stats(&self) -> ReaderStats {
        self.elements.reader().stats()
    }
}

impl<R: BufRead> Iterator for RecordIterator<R> {
    type Item = Result<ExtractedRecord, XmlError>;

    fn next(&mut self) -> Option<Self::Item> {
        for element in self.elements.by_ref() {
            match element {
                Ok(element) => {
                    if let Some(record) = self.extractor.project(&element) {
                        return Some(Ok(record));
                    }
                }
                Err(e) => return Some(Err(e)),
            }
        }
        None
    }
}
