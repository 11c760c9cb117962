//! Output generation for postcode validation runs.
//!
//! Writes the accepted and rejected partitions as CSV files with a
//! `row_id,postcode` header, optionally followed by a `reason` column.

mod error;
mod partition;

pub use error::{OutputError, Result};
pub use partition::{
    DEFAULT_ACCEPTED_FILE, DEFAULT_REJECTED_FILE, ID_HEADER, OutputPaths, POSTCODE_HEADER,
    PartitionWriter, REASON_HEADER, WriteOptions, write_partition,
};
