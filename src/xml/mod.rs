//! Streaming element reader using quick-xml
//!
//! This module provides a pull-based reader that turns an XML document into a
//! forward-only sequence of "element closed" notifications, designed to handle
//! exports far larger than available memory.
//!
//! ## Memory model
//!
//! Only the chain of currently open elements is held in memory. Each open
//! frame keeps its own attributes and a *count* of its children, never the
//! children themselves. When an element closes, its frame is moved out into
//! the emitted [`SourceElement`] and nothing of its subtree remains. A
//! container such as `HealthData` with millions of children therefore costs
//! one frame, not one frame per child.
//!
//! ```text
//! HealthData            <- open frame (attributes + child counter)
//! ├── Record            <- emitted on close, then dropped
//! ├── Correlation       <- open frame while its children stream past
//! │   └── Record        <- emitted on close, then dropped
//! └── Workout
//! ```

use std::io::BufRead;

use log::debug;
use quick_xml::events::Event;
use quick_xml::Reader;

use crate::schema::is_container_tag;

pub use error::XmlError;
pub use iterators::Elements;
pub use open::DEFAULT_INPUT_BUFFER_SIZE;

mod error;
mod helpers;
mod iterators;
mod open;


/// One element of the source document, emitted once its closing tag is read
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SourceElement {
    /// Qualified tag name
    pub name: String,
    /// Attributes in document order, values entity-unescaped
    pub attributes: Vec<(String, String)>,
    /// Nesting depth (the root element has depth 0)
    pub depth: usize,
}

impl SourceElement {
    /// Look up an attribute value by name
    pub fn get(&self, key: &str) -> Option<&str> {
        self.attributes
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }
}

/// Statistics gathered while streaming
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ReaderStats {
    /// Elements emitted so far
    pub elements_closed: u64,
    /// Deepest chain of simultaneously open elements
    pub max_depth: usize,
    /// Largest number of attributes held by open frames at any one time
    pub max_retained_attributes: usize,
}

/// An element whose closing tag has not been read yet
struct OpenFrame {
    name: String,
    attributes: Vec<(String, String)>,
    children: u64,
}

enum Step {
    Open(String, Vec<(String, String)>),
    Leaf(String, Vec<(String, String)>),
    Close,
    Eof,
}

/// Streaming reader producing closed elements in document order
pub struct ElementReader<R: BufRead> {
    reader: Reader<R>,
    buf: Vec<u8>,
    stack: Vec<OpenFrame>,
    retained_attributes: usize,
    seen_root: bool,
    stats: ReaderStats,
}

impl<R: BufRead> ElementReader<R> {
    /// Create a new reader from a BufRead source
    pub fn new(reader: R) -> Self {
        let mut xml_reader = Reader::from_reader(reader);
        xml_reader.config_mut().trim_text(true);
        xml_reader.config_mut().check_end_names = true;

        Self {
            reader: xml_reader,
            buf: Vec::new(),
            stack: Vec::new(),
            retained_attributes: 0,
            seen_root: false,
            stats: ReaderStats::default(),
        }
    }

    /// Statistics for the elements read so far
    pub fn stats(&self) -> ReaderStats {
        self.stats
    }

    /// Iterate over all remaining closed elements
    pub fn elements(self) -> Elements<R> {
        Elements {
            reader: self,
            done: false,
        }
    }

    /// Read forward until the next element closes
    ///
    /// Returns `Ok(None)` once the document has been fully read.
    pub fn next_element(&mut self) -> Result<Option<SourceElement>, XmlError> {
        loop {
            self.buf.clear();
            let position = self.reader.buffer_position() as u64;
            let decoder = self.reader.decoder();
            let event = self
                .reader
                .read_event_into(&mut self.buf)
                .map_err(|source| XmlError::XmlError { position, source })?;

            let outside_root = self.stack.is_empty();
            // Decode into owned data first so the event buffer is free again
            let step = match event {
                Event::Start(ref e) | Event::Empty(ref e) if outside_root && self.seen_root => {
                    return Err(XmlError::MultipleRoots(helpers::tag_name(e)?));
                }
                Event::Start(ref e) => Step::Open(
                    helpers::tag_name(e)?,
                    helpers::attributes(e, decoder, position)?,
                ),
                Event::Empty(ref e) => Step::Leaf(
                    helpers::tag_name(e)?,
                    helpers::attributes(e, decoder, position)?,
                ),
                // quick-xml has already verified the end name matches
                Event::End(_) => Step::Close,
                Event::Eof => Step::Eof,
                Event::Text(ref t) if outside_root && !is_blank(t) => {
                    return Err(XmlError::TextOutsideRoot { position });
                }
                Event::CData(_) if outside_root => {
                    return Err(XmlError::TextOutsideRoot { position });
                }
                _ => continue,
            };

            match step {
                Step::Open(name, attributes) => self.push_frame(name, attributes),
                Step::Leaf(name, attributes) => {
                    self.note_child();
                    self.seen_root = true;
                    return Ok(Some(self.emit(name, attributes)));
                }
                Step::Close => {
                    let Some(frame) = self.stack.pop() else {
                        continue;
                    };
                    self.retained_attributes -= frame.attributes.len();
                    if is_container_tag(&frame.name) {
                        debug!(
                            "Released <{}> after {} children",
                            frame.name, frame.children
                        );
                    }
                    return Ok(Some(self.emit(frame.name, frame.attributes)));
                }
                Step::Eof => {
                    if let Some(frame) = self.stack.pop() {
                        return Err(XmlError::UnclosedElement(frame.name));
                    }
                    if !self.seen_root {
                        return Err(XmlError::EmptyDocument);
                    }
                    return Ok(None);
                }
            }
        }
    }

    fn push_frame(&mut self, name: String, attributes: Vec<(String, String)>) {
        self.note_child();
        self.seen_root = true;
        self.retained_attributes += attributes.len();
        self.stack.push(OpenFrame {
            name,
            attributes,
            children: 0,
        });
        self.stats.max_depth = self.stats.max_depth.max(self.stack.len());
        self.stats.max_retained_attributes = self
            .stats
            .max_retained_attributes
            .max(self.retained_attributes);
    }

    fn note_child(&mut self) {
        if let Some(parent) = self.stack.last_mut() {
            parent.children += 1;
        }
    }

    fn emit(&mut self, name: String, attributes: Vec<(String, String)>) -> SourceElement {
        self.stats.elements_closed += 1;
        SourceElement {
            name,
            attributes,
            depth: self.stack.len(),
        }
    }
}

fn is_blank(text: &[u8]) -> bool {
    text.iter().all(u8::is_ascii_whitespace)
}
