//! Postcode record ingestion.
//!
//! Reads `(row_id, postcode)` records from delimited files. The postcode text
//! is passed through untouched; the row identifier is parsed as an integer
//! where possible.
//!
//! # Example
//!
//! ```ignore
//! use std::path::Path;
//! use postcode_ingest::{ReadOptions, read_candidates};
//!
//! let table = read_candidates(Path::new("import_data.csv"), &ReadOptions::default())?;
//! println!("{} candidates", table.len());
//! ```

mod error;
mod records;

// === Error Types ===
pub use error::{IngestError, Result};

// === Record Reading ===
pub use records::{
    CandidateReader, CandidateTable, ColumnIndices, CsvHeaders, DEFAULT_ID_COLUMN,
    DEFAULT_POSTCODE_COLUMN, MAX_FILE_SIZE, ReadOptions, SourceRecord, check_file_size,
    normalize_header, read_candidates, validate_encoding,
};
