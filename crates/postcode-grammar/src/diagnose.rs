//! Diagnostic path: name the rule a rejected postcode broke.
//!
//! Checks run in a fixed order and stop at the first failure:
//!
//! 1. grouping (exactly two whitespace-separated parts)
//! 2. junk (one word, one whitespace character, one word)
//! 3. inward part
//! 4. outward part, dispatched on its shape
//!
//! The order decides the reason when several rules are broken at once; for
//! example `XX XXX` is reported as an inward failure.

use std::sync::LazyLock;

use postcode_model::Outcome;
use regex::Regex;

use crate::tables::{
    AreaRule, area_rule, is_aa9a_letter, is_area_first, is_area_second, is_unit_letter,
};

static WORD_SPACE_WORD: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\w+\s\w+$").expect("Invalid junk regex"));

/// Run the ordered diagnostic checks against `text`.
///
/// Returns [`Outcome::Valid`] only if every check passes. Any text that
/// passes is also accepted by the fast path.
pub fn diagnose(text: &str) -> Outcome {
    let (outward, inward) = match split_parts(text) {
        Ok(parts) => parts,
        Err(outcome) => return outcome,
    };
    if !WORD_SPACE_WORD.is_match(text) {
        return Outcome::Junk;
    }
    if !is_inward(inward) {
        return Outcome::InwardMalformed;
    }
    check_outward(outward)
}

/// Split trimmed text into exactly two parts.
fn split_parts(text: &str) -> Result<(&str, &str), Outcome> {
    let mut parts = text.split_whitespace();
    match (parts.next(), parts.next(), parts.next()) {
        (None, _, _) => Err(Outcome::Junk),
        (Some(_), None, _) => Err(Outcome::IncorrectGrouping),
        (Some(outward), Some(inward), None) => Ok((outward, inward)),
        (Some(_), Some(_), Some(_)) => Err(Outcome::IncorrectGrouping),
    }
}

fn is_inward(inward: &str) -> bool {
    matches!(
        inward.as_bytes(),
        [sector, first, second]
            if sector.is_ascii_digit() && is_unit_letter(*first) && is_unit_letter(*second)
    )
}

/// Shape of an outward part: `L` an uppercase ASCII letter, `9` an ASCII digit.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum OutwardShape {
    /// `LL9L`
    Aa9a,
    /// `LL9` or `LL99`
    Aa9 { digits: usize },
    /// `L9` or `L99`
    A9,
    Other,
}

fn outward_shape(outward: &str) -> OutwardShape {
    let upper = u8::is_ascii_uppercase;
    let digit = u8::is_ascii_digit;
    match outward.as_bytes() {
        [a, b, d, l] if upper(a) && upper(b) && digit(d) && upper(l) => OutwardShape::Aa9a,
        [a, b, d] if upper(a) && upper(b) && digit(d) => OutwardShape::Aa9 { digits: 1 },
        [a, b, d, e] if upper(a) && upper(b) && digit(d) && digit(e) => {
            OutwardShape::Aa9 { digits: 2 }
        }
        [a, d] if upper(a) && digit(d) => OutwardShape::A9,
        [a, d, e] if upper(a) && digit(d) && digit(e) => OutwardShape::A9,
        _ => OutwardShape::Other,
    }
}

fn check_outward(outward: &str) -> Outcome {
    let bytes = outward.as_bytes();
    match outward_shape(outward) {
        OutwardShape::Aa9a => {
            let area = &outward[..2];
            let letter_ok = area_rule(area) == Some(AreaRule::LetteredDistricts)
                || is_aa9a_letter(bytes[3]);
            if is_area_first(bytes[0]) && is_area_second(bytes[1]) && letter_ok {
                Outcome::Valid
            } else {
                Outcome::OutwardAa9aMalformed
            }
        }
        OutwardShape::Aa9 { digits } => {
            let rule = area_rule(&outward[..2]);
            match (rule, digits) {
                (Some(AreaRule::SingleDigitDistricts | AreaRule::LetteredDistricts), 2) => {
                    Outcome::SingleDigitDistrict
                }
                (Some(AreaRule::DoubleDigitDistricts), 1) => Outcome::DoubleDigitDistrict,
                (Some(AreaRule::LetteredDistricts), 1) => Outcome::OutwardAa9Malformed,
                _ if !(is_area_first(bytes[0]) && is_area_second(bytes[1])) => {
                    Outcome::OutwardAa9Malformed
                }
                _ => Outcome::Valid,
            }
        }
        OutwardShape::A9 => {
            if is_area_first(bytes[0]) {
                Outcome::Valid
            } else {
                Outcome::OutwardA9Malformed
            }
        }
        OutwardShape::Other => Outcome::OutwardMalformed,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn grouping_is_checked_first() {
        assert_eq!(diagnose("LS44PL"), Outcome::IncorrectGrouping);
        assert_eq!(diagnose("M1 1AE X"), Outcome::IncorrectGrouping);
        assert_eq!(diagnose("A B C D"), Outcome::IncorrectGrouping);
        assert_eq!(diagnose("$%±()()"), Outcome::IncorrectGrouping);
    }

    #[test]
    fn empty_input_is_junk() {
        assert_eq!(diagnose(""), Outcome::Junk);
        assert_eq!(diagnose("   \t "), Outcome::Junk);
    }

    #[test]
    fn junk_checks_the_unstripped_text() {
        assert_eq!(diagnose("$%± ()()"), Outcome::Junk);
        assert_eq!(diagnose(" M1 1AE"), Outcome::Junk);
        assert_eq!(diagnose("M1  1AE"), Outcome::Junk);
        assert_eq!(diagnose("M1 1AE\n"), Outcome::Junk);
    }

    #[test]
    fn inward_before_outward() {
        assert_eq!(diagnose("XX XXX"), Outcome::InwardMalformed);
        assert_eq!(diagnose("A1 9A"), Outcome::InwardMalformed);
        assert_eq!(diagnose("Q1 9CC"), Outcome::InwardMalformed);
        assert_eq!(diagnose("M1 1ae"), Outcome::InwardMalformed);
    }

    #[test]
    fn outward_shapes_are_dispatched() {
        assert_eq!(diagnose("Q1A 9AA"), Outcome::OutwardMalformed);
        assert_eq!(diagnose("A9Q 9AA"), Outcome::OutwardMalformed);
        assert_eq!(diagnose("ABCDE 9AA"), Outcome::OutwardMalformed);
        assert_eq!(diagnose("AA9C 9AA"), Outcome::OutwardAa9aMalformed);
        assert_eq!(diagnose("QA9A 9AA"), Outcome::OutwardAa9aMalformed);
        assert_eq!(diagnose("LI10 3QP"), Outcome::OutwardAa9Malformed);
        assert_eq!(diagnose("LZ1 3QP"), Outcome::OutwardAa9Malformed);
        assert_eq!(diagnose("Q1 9AA"), Outcome::OutwardA9Malformed);
        assert_eq!(diagnose("X12 9AA"), Outcome::OutwardA9Malformed);
    }

    #[test]
    fn district_tables_take_precedence_in_aa9_shapes() {
        assert_eq!(diagnose("FY10 4PL"), Outcome::SingleDigitDistrict);
        assert_eq!(diagnose("WC12 4PL"), Outcome::SingleDigitDistrict);
        assert_eq!(diagnose("SO1 4QQ"), Outcome::DoubleDigitDistrict);
        assert_eq!(diagnose("AB1 4QQ"), Outcome::DoubleDigitDistrict);
        assert_eq!(diagnose("WC1 4QQ"), Outcome::OutwardAa9Malformed);
    }

    #[test]
    fn passes_only_for_grammar_matches() {
        for postcode in ["EC1A 1BB", "M1 1AE", "B33 8TH", "DN55 1PT", "WC1A 9AA", "SO1A 1AA"] {
            assert_eq!(diagnose(postcode), Outcome::Valid, "{postcode}");
        }
    }

    #[test]
    fn non_ascii_input_does_not_panic() {
        assert_eq!(diagnose("É1 1AA"), Outcome::OutwardMalformed);
        assert_eq!(diagnose("ÉÉÉÉ 1AA"), Outcome::OutwardMalformed);
        assert_eq!(diagnose("M1 1AÉ"), Outcome::InwardMalformed);
        assert_eq!(diagnose("日本 語"), Outcome::InwardMalformed);
    }
}
