/// Errors that can occur while writing a table
#[derive(Debug, thiserror::Error)]
pub enum TableError {
    /// I/O error during file operations
    #[error("I/O error: {0}")]
    IoError(#[from] std::io::Error),

    /// Error from the CSV serializer
    #[error("CSV error: {0}")]
    CsvError(#[from] csv::Error),

    /// The finished temp file could not be moved into place
    #[error("Failed to persist table to {path}: {source}")]
    PersistError {
        /// Destination path
        path: std::path::PathBuf,
        /// Underlying I/O error
        #[source]
        source: std::io::Error,
    },

    /// A row did not have one value per column
    #[error("Row has {found} values but the table has {expected} columns")]
    ColumnMismatch {
        /// Number of columns in the header
        expected: usize,
        /// Number of values in the offending row
        found: usize,
    },
}
