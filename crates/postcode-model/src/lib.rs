//! Postcode data model: candidates, classification outcomes and batch options.

pub mod candidate;
pub mod options;
pub mod outcome;

pub use candidate::{Candidate, ClassifiedCandidate, parse_identifier, sort_for_output};
pub use options::{BatchOptions, DiagnosisMode};
pub use outcome::{ClassificationResult, Outcome, ParseOutcomeError};
