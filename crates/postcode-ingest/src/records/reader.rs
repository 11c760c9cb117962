//! Streaming reader for `(row_id, postcode)` records.

use std::fs::File;
use std::io::Read;
use std::path::{Path, PathBuf};

use csv::{ReaderBuilder, StringRecord};
use postcode_model::Candidate;

use crate::error::{IngestError, Result};

use super::header::{ColumnIndices, CsvHeaders};

/// Maximum file size for loading (512 MiB default).
pub const MAX_FILE_SIZE: u64 = 512 * 1024 * 1024;

/// Default identifier column name.
pub const DEFAULT_ID_COLUMN: &str = "row_id";

/// Default postcode column name.
pub const DEFAULT_POSTCODE_COLUMN: &str = "postcode";

/// Options for reading an input file.
#[derive(Debug, Clone)]
pub struct ReadOptions {
    pub id_column: String,
    pub postcode_column: String,
    pub delimiter: u8,
    pub max_file_size: u64,
    /// Fail when the identifier column is absent. When false, a file with only
    /// the postcode column is read with no identifiers.
    pub identifier_required: bool,
}

impl Default for ReadOptions {
    fn default() -> Self {
        Self {
            id_column: DEFAULT_ID_COLUMN.to_string(),
            postcode_column: DEFAULT_POSTCODE_COLUMN.to_string(),
            delimiter: b',',
            max_file_size: MAX_FILE_SIZE,
            identifier_required: true,
        }
    }
}

impl ReadOptions {
    #[must_use]
    pub fn with_columns(mut self, id_column: &str, postcode_column: &str) -> Self {
        self.id_column = id_column.to_string();
        self.postcode_column = postcode_column.to_string();
        self
    }

    #[must_use]
    pub fn with_delimiter(mut self, delimiter: u8) -> Self {
        self.delimiter = delimiter;
        self
    }

    #[must_use]
    pub fn with_max_file_size(mut self, max_file_size: u64) -> Self {
        self.max_file_size = max_file_size;
        self
    }

    #[must_use]
    pub fn with_identifier_required(mut self, required: bool) -> Self {
        self.identifier_required = required;
        self
    }
}

/// Check file size against a limit.
pub fn check_file_size(path: &Path, max_size: u64) -> Result<()> {
    let metadata = std::fs::metadata(path).map_err(|e| IngestError::open(path, e))?;

    if metadata.len() > max_size {
        return Err(IngestError::FileTooLarge {
            path: path.to_path_buf(),
            size: metadata.len(),
            max_size,
        });
    }

    Ok(())
}

/// Detect encoding and validate it's supported (UTF-8 only).
///
/// Checks for UTF-16 BOM markers which are not supported.
pub fn validate_encoding(path: &Path) -> Result<()> {
    let mut file = File::open(path).map_err(|e| IngestError::open(path, e))?;

    let mut buffer = [0u8; 2];
    let bytes_read = file.read(&mut buffer).map_err(|e| IngestError::FileRead {
        path: path.to_path_buf(),
        source: e,
    })?;

    if bytes_read == 2 {
        match buffer {
            [0xFF, 0xFE] => {
                return Err(IngestError::UnsupportedEncoding {
                    path: path.to_path_buf(),
                    encoding: "UTF-16 LE",
                });
            }
            [0xFE, 0xFF] => {
                return Err(IngestError::UnsupportedEncoding {
                    path: path.to_path_buf(),
                    encoding: "UTF-16 BE",
                });
            }
            _ => {}
        }
    }

    // UTF-8 BOM is acceptable (stripped from the header)
    Ok(())
}

/// One data row: its original fields plus the candidate built from it.
#[derive(Debug, Clone)]
pub struct SourceRecord {
    /// 1-based line number of the record in the file.
    pub line: u64,
    pub fields: StringRecord,
    pub candidate: Candidate,
}

/// Streaming reader over the data rows of an input file.
///
/// Rows too short to contain the resolved columns are skipped and counted.
pub struct CandidateReader {
    path: PathBuf,
    reader: csv::Reader<File>,
    headers: CsvHeaders,
    columns: ColumnIndices,
    skipped_rows: usize,
}

impl CandidateReader {
    /// Open `path`, validate it and resolve the identifier and postcode columns.
    pub fn open(path: &Path, options: &ReadOptions) -> Result<Self> {
        check_file_size(path, options.max_file_size)?;
        validate_encoding(path)?;

        let mut reader = ReaderBuilder::new()
            .has_headers(true)
            .flexible(true)
            .delimiter(options.delimiter)
            .from_path(path)
            .map_err(|e| csv_error(path, e))?;

        let headers = CsvHeaders::new(reader.headers().map_err(|e| csv_error(path, e))?.iter());
        if headers.is_empty() {
            return Err(IngestError::EmptyCsv {
                path: path.to_path_buf(),
            });
        }
        let columns = headers.resolve(
            &options.id_column,
            &options.postcode_column,
            options.identifier_required,
            path,
        )?;
        tracing::debug!(
            path = %path.display(),
            columns = headers.len(),
            identifier_column = ?columns.identifier,
            postcode_column = columns.postcode,
            "opened input"
        );

        Ok(Self {
            path: path.to_path_buf(),
            reader,
            headers,
            columns,
            skipped_rows: 0,
        })
    }

    pub fn headers(&self) -> &CsvHeaders {
        &self.headers
    }

    /// The header row as written in the file (UTF-8 BOM removed).
    pub fn header_record(&self) -> StringRecord {
        StringRecord::from(self.headers.raw.clone())
    }

    /// Rows skipped so far because they were too short.
    pub fn skipped_rows(&self) -> usize {
        self.skipped_rows
    }
}

impl Iterator for CandidateReader {
    type Item = Result<SourceRecord>;

    fn next(&mut self) -> Option<Self::Item> {
        let required = self.columns.required_len();
        loop {
            let mut fields = StringRecord::new();
            match self.reader.read_record(&mut fields) {
                Ok(false) => return None,
                Ok(true) => {}
                Err(error) => {
                    let line = error.position().map(csv::Position::line);
                    return Some(Err(IngestError::CsvParse {
                        path: self.path.clone(),
                        line,
                        source: error,
                    }));
                }
            }
            let line = fields.position().map_or(0, csv::Position::line);
            if fields.len() < required {
                self.skipped_rows += 1;
                tracing::warn!(
                    path = %self.path.display(),
                    line,
                    fields = fields.len(),
                    required,
                    "skipping short row"
                );
                continue;
            }
            let candidate = Candidate::new(
                &fields[self.columns.postcode],
                self.columns.identifier.map(|index| &fields[index]),
            );
            return Some(Ok(SourceRecord {
                line,
                fields,
                candidate,
            }));
        }
    }
}

/// All candidates of an input file, in file order.
#[derive(Debug, Clone)]
pub struct CandidateTable {
    pub path: PathBuf,
    pub headers: CsvHeaders,
    pub candidates: Vec<Candidate>,
    /// Rows skipped because they were too short.
    pub skipped_rows: usize,
}

impl CandidateTable {
    pub fn len(&self) -> usize {
        self.candidates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.candidates.is_empty()
    }

    /// Candidates whose identifier could not be parsed as an integer.
    pub fn unidentified_count(&self) -> usize {
        self.candidates
            .iter()
            .filter(|candidate| candidate.identifier.is_none())
            .count()
    }
}

/// Read every candidate from `path` into memory.
pub fn read_candidates(path: &Path, options: &ReadOptions) -> Result<CandidateTable> {
    let mut reader = CandidateReader::open(path, options)?;
    let mut candidates = Vec::new();
    for record in reader.by_ref() {
        candidates.push(record?.candidate);
    }
    tracing::debug!(
        path = %path.display(),
        rows = candidates.len(),
        skipped_rows = reader.skipped_rows(),
        "read candidates"
    );
    Ok(CandidateTable {
        path: path.to_path_buf(),
        headers: reader.headers().clone(),
        candidates,
        skipped_rows: reader.skipped_rows(),
    })
}

fn csv_error(path: &Path, source: csv::Error) -> IngestError {
    if let csv::ErrorKind::Io(io) = source.kind() {
        if io.kind() == std::io::ErrorKind::NotFound {
            return IngestError::FileNotFound {
                path: path.to_path_buf(),
            };
        }
    }
    let line = source.position().map(csv::Position::line);
    IngestError::CsvParse {
        path: path.to_path_buf(),
        line,
        source,
    }
}
