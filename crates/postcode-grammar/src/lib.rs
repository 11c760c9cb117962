//! UK postcode grammar.
//!
//! Classification is a pure function of the input string. The grammar is
//! compiled once on first use and shared read-only, so [`classify`] can be
//! called from any number of threads.
//!
//! # Known over-permissiveness
//!
//! The grammar is structural. It accepts some codes that do not exist, such
//! as `M0 1AA` (area M has no district 0) and `M1A 9AA` (M only has plain
//! numeric districts), and it ignores anything after a valid postcode. Use
//! [`ClassificationResult::has_trailing`] to detect trailing text.
//!
//! # Example
//!
//! ```
//! use postcode_grammar::classify;
//! use postcode_model::Outcome;
//!
//! assert_eq!(classify("EC1A 1BB", true).outcome, Outcome::Valid);
//! assert_eq!(classify("FY10 4PL", true).outcome, Outcome::SingleDigitDistrict);
//! assert_eq!(classify("FY10 4PL", false).outcome, Outcome::Unknown);
//! ```

mod diagnose;
mod fast;
pub mod tables;

use postcode_model::{ClassificationResult, Outcome};

pub use diagnose::diagnose;
pub use fast::{is_valid, match_prefix};

/// Classify `text` against the postcode grammar.
///
/// The fast path is always evaluated first. When it fails, the ordered
/// diagnostic checks run only if `diagnose` is set; otherwise the result is
/// [`Outcome::Unknown`].
pub fn classify(text: &str, diagnose: bool) -> ClassificationResult {
    if let Some(len) = match_prefix(text) {
        return ClassificationResult::valid(len);
    }
    if !diagnose {
        return ClassificationResult::unmatched(Outcome::Unknown);
    }
    ClassificationResult::unmatched(diagnose::diagnose(text))
}
