use std::fs::File;
use std::io::BufReader;
use std::path::Path;

use super::{ElementReader, XmlError};

/// Default input buffer size for XML parsing (64KB)
pub const DEFAULT_INPUT_BUFFER_SIZE: usize = 64 * 1024;

impl ElementReader<BufReader<File>> {
    /// Open an XML file for streaming with the default buffer size (64KB)
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self, XmlError> {
        Self::open_with_buffer_size(path, DEFAULT_INPUT_BUFFER_SIZE)
    }

    /// Open an XML file for streaming with a custom buffer size
    ///
    /// # Example
    /// ```rust,no_run
    /// use healthkit_extract::xml::ElementReader;
    ///
    /// // Larger buffers help on slow network mounts
    /// let reader = ElementReader::open_with_buffer_size("export.xml", 256 * 1024)?;
    /// # Ok::<(), healthkit_extract::xml::XmlError>(())
    /// ```
    pub fn open_with_buffer_size<P: AsRef<Path>>(
        path: P,
        buffer_size: usize,
    ) -> Result<Self, XmlError> {
        let file = File::open(path.as_ref())?;
        let reader = BufReader::with_capacity(buffer_size.max(1), file);
        Ok(Self::new(reader))
    }
}
