//! Accepted and rejected partition files.

use std::fs::File;
use std::path::{Path, PathBuf};

use csv::{StringRecord, Writer};
use postcode_model::{ClassifiedCandidate, Outcome};

use crate::error::{OutputError, Result};

/// Default file name for accepted postcodes.
pub const DEFAULT_ACCEPTED_FILE: &str = "succeeded_validation.csv";

/// Default file name for rejected postcodes.
pub const DEFAULT_REJECTED_FILE: &str = "failed_validation.csv";

/// Header of the identifier column.
pub const ID_HEADER: &str = "row_id";
/// Header of the postcode column.
pub const POSTCODE_HEADER: &str = "postcode";
/// Header of the optional reason column.
pub const REASON_HEADER: &str = "reason";

/// Paths of the two output partitions.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutputPaths {
    pub accepted: PathBuf,
    pub rejected: PathBuf,
}

impl OutputPaths {
    /// Default file names inside `output_dir`.
    pub fn in_dir(output_dir: &Path) -> Self {
        Self {
            accepted: output_dir.join(DEFAULT_ACCEPTED_FILE),
            rejected: output_dir.join(DEFAULT_REJECTED_FILE),
        }
    }
}

/// Options for writing a partition.
#[derive(Debug, Clone, Copy, Default)]
pub struct WriteOptions {
    /// Append a `reason` column holding the outcome code.
    pub reason_column: bool,
    /// Write only the matched postcode for accepted rows.
    pub clean: bool,
}

/// Write `records` to `path` in the order given.
///
/// Returns the number of data rows written. Absent identifiers are written
/// as an empty field.
pub fn write_partition(
    path: &Path,
    records: &[ClassifiedCandidate],
    options: &WriteOptions,
) -> Result<usize> {
    let mut header = StringRecord::from(vec![ID_HEADER, POSTCODE_HEADER]);
    if options.reason_column {
        header.push_field(REASON_HEADER);
    }
    let mut writer = PartitionWriter::create(path, &header)?;
    for record in records {
        let identifier = record
            .candidate
            .identifier
            .map(|id| id.to_string())
            .unwrap_or_default();
        let text = if options.clean {
            record.clean_text()
        } else {
            record.candidate.text.as_str()
        };
        if options.reason_column {
            writer.write_fields([identifier.as_str(), text, record.result.outcome.code()])?;
        } else {
            writer.write_fields([identifier.as_str(), text])?;
        }
    }
    writer.finish()
}

/// Incremental CSV writer for one partition.
///
/// Used directly when records are streamed rather than collected, such as
/// when copying rejected source rows with all their original columns.
pub struct PartitionWriter {
    path: PathBuf,
    writer: Writer<File>,
    rows: usize,
}

impl PartitionWriter {
    /// Create `path` (and its parent directory) and write the header row.
    pub fn create(path: &Path, header: &StringRecord) -> Result<Self> {
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent).map_err(|source| OutputError::Create {
                path: parent.to_path_buf(),
                source,
            })?;
        }
        let file = File::create(path).map_err(|source| OutputError::Create {
            path: path.to_path_buf(),
            source,
        })?;
        let mut writer = csv::WriterBuilder::new()
            .flexible(true)
            .from_writer(file);
        writer
            .write_record(header)
            .map_err(|source| write_error(path, source))?;
        tracing::debug!(path = %path.display(), "created partition");
        Ok(Self {
            path: path.to_path_buf(),
            writer,
            rows: 0,
        })
    }

    /// Write one data row.
    pub fn write_fields<I, T>(&mut self, fields: I) -> Result<()>
    where
        I: IntoIterator<Item = T>,
        T: AsRef<[u8]>,
    {
        self.writer
            .write_record(fields)
            .map_err(|source| write_error(&self.path, source))?;
        self.rows += 1;
        Ok(())
    }

    /// Write a source record, optionally followed by its outcome code.
    pub fn write_source(&mut self, fields: &StringRecord, outcome: Option<Outcome>) -> Result<()> {
        match outcome {
            Some(outcome) => self.write_fields(fields.iter().chain([outcome.code()])),
            None => self.write_fields(fields),
        }
    }

    /// Flush buffered output and return the number of data rows written.
    pub fn finish(mut self) -> Result<usize> {
        self.writer.flush().map_err(|source| OutputError::Flush {
            path: self.path.clone(),
            source,
        })?;
        Ok(self.rows)
    }
}

fn write_error(path: &Path, source: csv::Error) -> OutputError {
    OutputError::Write {
        path: path.to_path_buf(),
        source,
    }
}
