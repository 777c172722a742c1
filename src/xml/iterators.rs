use std::io::BufRead;

use super::{ElementReader, SourceElement, XmlError};

/// Iterator over closed elements in document order
///
/// The iterator is fused: after the document ends or a parse error is
/// returned, every further call yields `None`.
pub struct Elements<R: BufRead> {
    pub(super) reader: ElementReader<R>,
    pub(super) done: bool,
}

impl<R: BufRead> Elements<R> {
    /// Access the underlying reader, e.g. for its statistics
    pub fn reader(&self) -> &ElementReader<R> {
        &self.reader
    }
}

impl<R: BufRead> Iterator for Elements<R> {
    type Item = Result<SourceElement, XmlError>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.done {
            return None;
        }
        match self.reader.next_element() {
            Ok(Some(element)) => Some(Ok(element)),
            Ok(None) => {
                self.done = true;
                None
            }
            Err(e) => {
                self.done = true;
                Some(Err(e))
            }
        }
    }
}
