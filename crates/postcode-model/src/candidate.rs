//! Postcode candidates read from a source file.

use std::cmp::Ordering;

use serde::{Deserialize, Serialize};

use crate::outcome::ClassificationResult;

/// One input row: an optional numeric row identifier and the raw postcode text.
///
/// The text is kept exactly as supplied. Classification decides what to make
/// of whitespace or case.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Candidate {
    pub identifier: Option<i64>,
    pub text: String,
}

impl Candidate {
    /// Build a candidate, parsing the raw identifier as an integer.
    ///
    /// Identifiers that are missing or not numeric become `None` rather than
    /// failing the row.
    pub fn new(text: impl Into<String>, raw_identifier: Option<&str>) -> Self {
        Self {
            identifier: raw_identifier.and_then(parse_identifier),
            text: text.into(),
        }
    }

    pub fn with_identifier(identifier: i64, text: impl Into<String>) -> Self {
        Self {
            identifier: Some(identifier),
            text: text.into(),
        }
    }
}

/// Parse a row identifier, tolerating surrounding whitespace.
pub fn parse_identifier(raw: &str) -> Option<i64> {
    raw.trim().parse().ok()
}

/// Ordering used for output partitions.
///
/// Identified candidates sort by identifier and come before unidentified
/// ones; unidentified candidates sort by raw text. Equal identifiers fall
/// back to text so the order is total.
impl Ord for Candidate {
    fn cmp(&self, other: &Self) -> Ordering {
        match (self.identifier, other.identifier) {
            (Some(left), Some(right)) => left.cmp(&right).then_with(|| self.text.cmp(&other.text)),
            (Some(_), None) => Ordering::Less,
            (None, Some(_)) => Ordering::Greater,
            (None, None) => self.text.cmp(&other.text),
        }
    }
}

impl PartialOrd for Candidate {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

/// A candidate together with its classification.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClassifiedCandidate {
    pub candidate: Candidate,
    pub result: ClassificationResult,
}

impl ClassifiedCandidate {
    pub fn new(candidate: Candidate, result: ClassificationResult) -> Self {
        Self { candidate, result }
    }

    pub fn is_valid(&self) -> bool {
        self.result.is_valid()
    }

    /// The candidate text with any trailing text after the match removed.
    pub fn clean_text(&self) -> &str {
        self.result
            .clean(&self.candidate.text)
            .unwrap_or(&self.candidate.text)
    }

    pub fn has_trailing(&self) -> bool {
        self.result.has_trailing(&self.candidate.text)
    }
}

/// Sort classified candidates in output order.
///
/// The sort is stable, so rows that compare equal keep their input order.
pub fn sort_for_output(records: &mut [ClassifiedCandidate]) {
    records.sort_by(|left, right| left.candidate.cmp(&right.candidate));
}
