//! Classification outcomes.
//!
//! The outcome set is closed: a postcode is either [`Outcome::Valid`] or one
//! of the specific failure reasons below. [`Outcome::Unknown`] is reserved for
//! inputs that failed the grammar when no diagnosis was requested.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Result of classifying one postcode string.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Outcome {
    /// Matched the postcode grammar.
    Valid,
    /// Not recognisable as a postcode at all.
    Junk,
    /// Wrong number of whitespace-separated parts, or no separating space.
    IncorrectGrouping,
    /// The inward part (sector digit and unit letters) is malformed.
    InwardMalformed,
    /// The outward part has no recognised shape.
    OutwardMalformed,
    /// Outward part shaped like `AA9A` with an illegal letter.
    #[serde(rename = "OUTWARD_AA9A_MALFORMED")]
    OutwardAa9aMalformed,
    /// Outward part shaped like `AA9` / `AA99` with an illegal letter.
    #[serde(rename = "OUTWARD_AA9_MALFORMED")]
    OutwardAa9Malformed,
    /// Outward part shaped like `A9` / `A99` with an illegal area letter.
    #[serde(rename = "OUTWARD_A9_MALFORMED")]
    OutwardA9Malformed,
    /// Two-digit district in an area that only has single-digit districts.
    SingleDigitDistrict,
    /// One-digit district in an area that only has double-digit districts.
    DoubleDigitDistrict,
    /// Did not match the grammar; no diagnosis was requested.
    Unknown,
}

impl Outcome {
    /// Every outcome, in declaration order.
    pub const ALL: [Outcome; 11] = [
        Outcome::Valid,
        Outcome::Junk,
        Outcome::IncorrectGrouping,
        Outcome::InwardMalformed,
        Outcome::OutwardMalformed,
        Outcome::OutwardAa9aMalformed,
        Outcome::OutwardAa9Malformed,
        Outcome::OutwardA9Malformed,
        Outcome::SingleDigitDistrict,
        Outcome::DoubleDigitDistrict,
        Outcome::Unknown,
    ];

    /// Stable machine-readable code, as written to reason columns.
    pub fn code(self) -> &'static str {
        match self {
            Outcome::Valid => "VALID",
            Outcome::Junk => "JUNK",
            Outcome::IncorrectGrouping => "INCORRECT_GROUPING",
            Outcome::InwardMalformed => "INWARD_MALFORMED",
            Outcome::OutwardMalformed => "OUTWARD_MALFORMED",
            Outcome::OutwardAa9aMalformed => "OUTWARD_AA9A_MALFORMED",
            Outcome::OutwardAa9Malformed => "OUTWARD_AA9_MALFORMED",
            Outcome::OutwardA9Malformed => "OUTWARD_A9_MALFORMED",
            Outcome::SingleDigitDistrict => "SINGLE_DIGIT_DISTRICT",
            Outcome::DoubleDigitDistrict => "DOUBLE_DIGIT_DISTRICT",
            Outcome::Unknown => "UNKNOWN",
        }
    }

    /// Human-readable description of the outcome.
    pub fn description(self) -> &'static str {
        match self {
            Outcome::Valid => "valid postcode",
            Outcome::Junk => "unparseable nonsense",
            Outcome::IncorrectGrouping => {
                "incorrectly grouped (no separating space, or too many parts)"
            }
            Outcome::InwardMalformed => "inward part malformed",
            Outcome::OutwardMalformed => "outward part malformed",
            Outcome::OutwardAa9aMalformed => "outward part of form AA9A malformed",
            Outcome::OutwardAa9Malformed => "outward part of form AA9 or AA99 malformed",
            Outcome::OutwardA9Malformed => "outward part of form A9 or A99 malformed",
            Outcome::SingleDigitDistrict => "area only has single-digit districts",
            Outcome::DoubleDigitDistrict => "area only has double-digit districts",
            Outcome::Unknown => "did not match, reason unknown",
        }
    }

    pub fn is_valid(self) -> bool {
        self == Outcome::Valid
    }
}

impl fmt::Display for Outcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.code())
    }
}

/// Error returned when parsing an unrecognised outcome code.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown outcome code '{value}'")]
pub struct ParseOutcomeError {
    pub value: String,
}

impl FromStr for Outcome {
    type Err = ParseOutcomeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        Outcome::ALL
            .into_iter()
            .find(|outcome| outcome.code().eq_ignore_ascii_case(trimmed))
            .ok_or_else(|| ParseOutcomeError {
                value: trimmed.to_string(),
            })
    }
}

/// The outcome of classification plus the extent of the grammar match.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClassificationResult {
    pub outcome: Outcome,
    /// Byte length of the prefix matched by the grammar. Present only for
    /// valid results; anything after it was not examined.
    pub matched_len: Option<usize>,
}

impl ClassificationResult {
    /// A valid result whose match covered `matched_len` bytes.
    pub fn valid(matched_len: usize) -> Self {
        Self {
            outcome: Outcome::Valid,
            matched_len: Some(matched_len),
        }
    }

    /// A result for input the grammar did not match.
    pub fn unmatched(outcome: Outcome) -> Self {
        Self {
            outcome,
            matched_len: None,
        }
    }

    pub fn is_valid(&self) -> bool {
        self.outcome.is_valid()
    }

    /// The matched postcode without any trailing text.
    ///
    /// `text` must be the string this result was produced from.
    pub fn clean<'a>(&self, text: &'a str) -> Option<&'a str> {
        self.matched_len.and_then(|len| text.get(..len))
    }

    /// Text following the matched postcode, if any.
    pub fn trailing<'a>(&self, text: &'a str) -> Option<&'a str> {
        let rest = text.get(self.matched_len?..)?;
        (!rest.is_empty()).then_some(rest)
    }

    /// True when the grammar accepted a prefix but more text followed it.
    pub fn has_trailing(&self, text: &str) -> bool {
        self.trailing(text).is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn codes_round_trip_through_from_str() {
        for outcome in Outcome::ALL {
            assert_eq!(outcome.code().parse::<Outcome>(), Ok(outcome));
        }
        assert_eq!(" single_digit_district ".parse(), Ok(Outcome::SingleDigitDistrict));
    }

    #[test]
    fn unknown_code_is_an_error() {
        let err = "INVALID".parse::<Outcome>().unwrap_err();
        assert_eq!(err.to_string(), "unknown outcome code 'INVALID'");
        assert_eq!(err.value, "INVALID");

        let boxed: Box<dyn std::error::Error + Send + Sync> = Box::new(err);
        assert!(boxed.source().is_none());
    }

    #[test]
    fn serde_uses_codes() {
        for outcome in Outcome::ALL {
            let json = serde_json::to_string(&outcome).unwrap();
            assert_eq!(json, format!("\"{}\"", outcome.code()));
        }
    }

    #[test]
    fn only_valid_is_valid() {
        let valid: Vec<_> = Outcome::ALL.into_iter().filter(|o| o.is_valid()).collect();
        assert_eq!(valid, vec![Outcome::Valid]);
    }

    #[test]
    fn trailing_text_is_reported() {
        let text = "M1 7EPTHIS IS JUNK";
        let result = ClassificationResult::valid(6);
        assert_eq!(result.clean(text), Some("M1 7EP"));
        assert_eq!(result.trailing(text), Some("THIS IS JUNK"));
        assert!(result.has_trailing(text));

        let exact = ClassificationResult::valid(6);
        assert!(!exact.has_trailing("M1 7EP"));
    }

    #[test]
    fn rejected_results_have_no_extent() {
        let result = ClassificationResult::unmatched(Outcome::Junk);
        assert!(!result.is_valid());
        assert_eq!(result.clean("anything"), None);
        assert!(!result.has_trailing("anything"));
    }
}
