//! Delimited record reading.

mod header;
mod reader;

pub use header::{ColumnIndices, CsvHeaders, normalize_header};
pub use reader::{
    CandidateReader, CandidateTable, DEFAULT_ID_COLUMN, DEFAULT_POSTCODE_COLUMN, MAX_FILE_SIZE,
    ReadOptions, SourceRecord, check_file_size, read_candidates, validate_encoding,
};
