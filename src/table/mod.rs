//! Delimited table writer
//!
//! Rows are streamed into a temp file next to the destination. The file only
//! appears under its final name once [`TableWriter::finish`] has seen at least
//! one row, so an empty category leaves no file behind and an aborted run
//! never leaves a truncated table.

use std::fs::File;
use std::io::BufWriter;
use std::path::{Path, PathBuf};

use csv::{QuoteStyle, Terminator, WriterBuilder};
use log::debug;
use tempfile::NamedTempFile;

use crate::extract::ExtractedRecord;

pub use error::TableError;

mod error;


/// Output settings for delimited tables
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TableConfig {
    /// Field delimiter byte
    pub delimiter: u8,
}

impl Default for TableConfig {
    fn default() -> Self {
        Self { delimiter: b',' }
    }
}

/// Summary of a table that was written to disk
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TableSummary {
    /// Final location of the table
    pub path: PathBuf,
    /// Number of data rows (header excluded)
    pub rows: u64,
}

/// Streaming writer for one category table
pub struct TableWriter {
    path: PathBuf,
    columns: usize,
    writer: csv::Writer<BufWriter<File>>,
    temp_file: NamedTempFile,
    rows: u64,
}

impl TableWriter {
    /// Start a table at `path` with the given header
    ///
    /// The parent directory must already exist.
    pub fn create<P: AsRef<Path>>(
        path: P,
        fields: &[&str],
        config: TableConfig,
    ) -> Result<Self, TableError> {
        let path = path.as_ref().to_path_buf();
        let dir = match path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
            _ => PathBuf::from("."),
        };

        let mut builder = tempfile::Builder::new();
        builder.prefix(".healthkit-extract-").suffix(".tmp");
        // Tables get the same umask-governed mode as any newly created file
        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            builder.permissions(std::fs::Permissions::from_mode(0o666));
        }
        let temp_file = builder.tempfile_in(&dir)?;
        let file = temp_file.reopen()?;

        let mut writer = WriterBuilder::new()
            .delimiter(config.delimiter)
            .quote_style(QuoteStyle::Necessary)
            .terminator(Terminator::Any(b'\n'))
            .from_writer(BufWriter::new(file));
        writer.write_record(fields)?;

        Ok(Self {
            path,
            columns: fields.len(),
            writer,
            temp_file,
            rows: 0,
        })
    }

    /// Destination path of this table
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Rows written so far
    pub fn rows(&self) -> u64 {
        self.rows
    }

    /// Append one row; `None` values become empty fields
    pub fn write_row(&mut self, values: &[Option<String>]) -> Result<(), TableError> {
        if values.len() != self.columns {
            return Err(TableError::ColumnMismatch {
                expected: self.columns,
                found: values.len(),
            });
        }
        self.writer
            .write_record(values.iter().map(|v| v.as_deref().unwrap_or("")))?;
        self.rows += 1;
        Ok(())
    }

    /// Append one extracted record
    pub fn write_record(&mut self, record: &ExtractedRecord) -> Result<(), TableError> {
        self.write_row(&record.values)
    }

    /// Flush and move the table into place
    ///
    /// Returns `None` without creating a file if no rows were written.
    pub fn finish(self) -> Result<Option<TableSummary>, TableError> {
        let TableWriter {
            path,
            mut writer,
            temp_file,
            rows,
            ..
        } = self;

        if rows == 0 {
            debug!("No rows for {}, discarding table", path.display());
            return Ok(None);
        }

        writer.flush()?;
        drop(writer);
        temp_file
            .persist(&path)
            .map_err(|e| TableError::PersistError {
                path: path.clone(),
                source: e.error,
            })?;

        Ok(Some(TableSummary { path, rows }))
    }
}

/// Write a complete table in one call
///
/// Returns `None` and writes nothing if `records` is empty.
pub fn write_table<'a, P, I>(
    path: P,
    fields: &[&str],
    records: I,
    config: TableConfig,
) -> Result<Option<TableSummary>, TableError>
where
    P: AsRef<Path>,
    I: IntoIterator<Item = &'a ExtractedRecord>,
{
    let mut records = records.into_iter().peekable();
    if records.peek().is_none() {
        return Ok(None);
    }

    let mut writer = TableWriter::create(path, fields, config)?;
    for record in records {
        writer.write_record(record)?;
    }
    writer.finish()
}
