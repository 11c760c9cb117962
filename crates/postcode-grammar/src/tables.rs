//! Letter classes and per-area district rules.
//!
//! The grammar's area exceptions are kept here as lookup tables rather than
//! as lookbehind assertions, so both the fast path and the diagnostic path
//! consult the same data.

/// Character class for the first letter of the area (excludes Q, V, X).
pub const AREA_FIRST_CLASS: &str = "[A-PR-UWYZ]";
/// Character class for the second letter of the area (excludes I, J, Z).
pub const AREA_SECOND_CLASS: &str = "[A-HK-Y]";
/// Character class for unit letters (excludes C, I, K, M, O, V).
pub const UNIT_CLASS: &str = "[ABD-HJLNP-UW-Z]";

/// District restriction attached to a two-letter area.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AreaRule {
    /// Districts are `0`-`9` only; `AA99` is illegal.
    SingleDigitDistricts,
    /// Districts are `10`-`99` only; bare `AA9` is illegal.
    DoubleDigitDistricts,
    /// Single-digit districts that always carry a district letter (`WC1A`).
    LetteredDistricts,
}

// Sorted by area for binary search.
const AREA_RULES: &[(&str, AreaRule)] = &[
    ("AB", AreaRule::DoubleDigitDistricts),
    ("BR", AreaRule::SingleDigitDistricts),
    ("FY", AreaRule::SingleDigitDistricts),
    ("HA", AreaRule::SingleDigitDistricts),
    ("HD", AreaRule::SingleDigitDistricts),
    ("HG", AreaRule::SingleDigitDistricts),
    ("HR", AreaRule::SingleDigitDistricts),
    ("HS", AreaRule::SingleDigitDistricts),
    ("HX", AreaRule::SingleDigitDistricts),
    ("JE", AreaRule::SingleDigitDistricts),
    ("LD", AreaRule::SingleDigitDistricts),
    ("LL", AreaRule::DoubleDigitDistricts),
    ("SM", AreaRule::SingleDigitDistricts),
    ("SO", AreaRule::DoubleDigitDistricts),
    ("SR", AreaRule::SingleDigitDistricts),
    ("WC", AreaRule::LetteredDistricts),
    ("WN", AreaRule::SingleDigitDistricts),
    ("ZE", AreaRule::SingleDigitDistricts),
];

/// Look up the district rule for a two-letter area, if it has one.
pub fn area_rule(area: &str) -> Option<AreaRule> {
    AREA_RULES
        .binary_search_by(|(code, _)| (*code).cmp(area))
        .ok()
        .map(|index| AREA_RULES[index].1)
}

impl AreaRule {
    /// Whether a two-digit district (`AA99`) is permitted.
    pub fn permits_two_digits(self) -> bool {
        matches!(self, AreaRule::DoubleDigitDistricts)
    }

    /// Whether a one-digit district without a letter (`AA9`) is permitted.
    pub fn permits_bare_single_digit(self) -> bool {
        matches!(self, AreaRule::SingleDigitDistricts)
    }
}

pub fn is_area_first(c: u8) -> bool {
    matches!(c, b'A'..=b'P' | b'R'..=b'U' | b'W' | b'Y' | b'Z')
}

pub fn is_area_second(c: u8) -> bool {
    matches!(c, b'A'..=b'H' | b'K'..=b'Y')
}

/// District letter allowed after `A9`.
pub fn is_a9a_letter(c: u8) -> bool {
    matches!(
        c,
        b'A'..=b'H' | b'J' | b'K' | b'P' | b'S' | b'T' | b'U' | b'W'
    )
}

/// District letter allowed after `AA9`.
pub fn is_aa9a_letter(c: u8) -> bool {
    matches!(
        c,
        b'A' | b'B' | b'E' | b'H' | b'M' | b'N' | b'P' | b'R' | b'V' | b'W' | b'X' | b'Y'
    )
}

pub fn is_unit_letter(c: u8) -> bool {
    matches!(
        c,
        b'A' | b'B' | b'D'..=b'H' | b'J' | b'L' | b'N' | b'P'..=b'U' | b'W'..=b'Z'
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn area_rules_are_sorted() {
        assert!(AREA_RULES.windows(2).all(|pair| pair[0].0 < pair[1].0));
    }

    #[test]
    fn lookup_finds_every_area() {
        for (area, rule) in AREA_RULES {
            assert_eq!(area_rule(area), Some(*rule));
        }
        assert_eq!(area_rule("EC"), None);
        assert_eq!(area_rule("M"), None);
        assert_eq!(area_rule(""), None);
    }

    #[test]
    fn lettered_area_permits_neither_bare_form() {
        assert!(!AreaRule::LetteredDistricts.permits_two_digits());
        assert!(!AreaRule::LetteredDistricts.permits_bare_single_digit());
        assert!(AreaRule::DoubleDigitDistricts.permits_two_digits());
        assert!(AreaRule::SingleDigitDistricts.permits_bare_single_digit());
    }

    #[test]
    fn letter_classes_exclude_documented_letters() {
        for c in [b'Q', b'V', b'X'] {
            assert!(!is_area_first(c));
        }
        for c in [b'I', b'J', b'Z'] {
            assert!(!is_area_second(c));
        }
        for c in [b'C', b'I', b'K', b'M', b'O', b'V'] {
            assert!(!is_unit_letter(c));
        }
        assert_eq!((b'A'..=b'Z').filter(|c| is_area_first(*c)).count(), 23);
        assert_eq!((b'A'..=b'Z').filter(|c| is_area_second(*c)).count(), 23);
        assert_eq!((b'A'..=b'Z').filter(|c| is_unit_letter(*c)).count(), 20);
        assert_eq!((b'A'..=b'Z').filter(|c| is_a9a_letter(*c)).count(), 15);
        assert_eq!((b'A'..=b'Z').filter(|c| is_aa9a_letter(*c)).count(), 12);
    }

    #[test]
    fn predicates_reject_lowercase_and_digits() {
        for c in [b'a', b'z', b'0', b' ', 0xC3] {
            assert!(!is_area_first(c));
            assert!(!is_area_second(c));
            assert!(!is_unit_letter(c));
        }
    }
}
