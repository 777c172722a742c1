/// Errors that can occur while streaming an XML document
#[derive(Debug, thiserror::Error)]
pub enum XmlError {
    /// Error reported by the XML tokenizer (mismatched tags, bad syntax, bad attributes)
    #[error("XML parsing error at byte {position}: {source}")]
    XmlError {
        /// Byte offset in the input where the error was detected
        position: u64,
        /// Underlying quick-xml error
        #[source]
        source: quick_xml::Error,
    },

    /// I/O error while reading the input
    #[error("I/O error: {0}")]
    IoError(#[from] std::io::Error),

    /// Tag or attribute name is not valid UTF-8
    #[error("UTF-8 encoding error: {0}")]
    Utf8Error(#[from] std::str::Utf8Error),

    /// The input ended while an element was still open
    #[error("Unexpected end of document: <{0}> was never closed")]
    UnclosedElement(String),

    /// The input contained no element at all
    #[error("Document contains no root element")]
    EmptyDocument,

    /// An element appeared after the root element had closed
    #[error("Junk after document element: <{0}>")]
    MultipleRoots(String),

    /// Character data outside the root element
    #[error("Text outside the root element at byte {position}")]
    TextOutsideRoot {
        /// Byte offset where the text starts
        position: u64,
    },
}
