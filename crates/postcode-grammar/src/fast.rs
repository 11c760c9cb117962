//! Fast path: a single anchored match of the whole grammar.
//!
//! The structural pattern recognises `GIR 0AA` and every
//! `area district [letter] SPACE sector unit unit` shape; area exceptions are
//! then checked against [`crate::tables`]. Only the start of the input is
//! anchored, so text after a valid postcode is not examined.

use std::sync::LazyLock;

use regex::Regex;

use crate::tables::{
    AREA_FIRST_CLASS, AREA_SECOND_CLASS, AreaRule, UNIT_CLASS, area_rule, is_a9a_letter,
    is_aa9a_letter,
};

static POSTCODE_PREFIX: LazyLock<Regex> = LazyLock::new(|| {
    let pattern = format!(
        r"^(?:GIR\s0AA|(?P<area>{AREA_FIRST_CLASS}{AREA_SECOND_CLASS}?)(?P<district>[0-9]{{1,2}})(?P<letter>[A-Z])?\s[0-9]{UNIT_CLASS}{{2}})"
    );
    Regex::new(&pattern).expect("Invalid postcode regex")
});

/// Byte length of the postcode matched at the start of `text`, if any.
pub fn match_prefix(text: &str) -> Option<usize> {
    let captures = POSTCODE_PREFIX.captures(text)?;
    let end = captures.get(0)?.end();
    let Some(area) = captures.name("area") else {
        // GIR 0AA
        return Some(end);
    };
    let district_len = captures.name("district")?.len();
    let letter = captures.name("letter").map(|m| m.as_str().as_bytes()[0]);
    outward_permitted(area.as_str(), district_len, letter).then_some(end)
}

/// True if `text` starts with a postcode the grammar accepts.
pub fn is_valid(text: &str) -> bool {
    match_prefix(text).is_some()
}

/// Apply district-letter restrictions and the per-area digit rules to a
/// structurally matched outward part.
fn outward_permitted(area: &str, district_len: usize, letter: Option<u8>) -> bool {
    let rule = if area.len() == 2 { area_rule(area) } else { None };
    match (area.len(), district_len, letter) {
        (1, 1, None) | (1, 2, None) => true,
        (1, 1, Some(letter)) => is_a9a_letter(letter),
        (2, 1, None) => rule.is_none_or(AreaRule::permits_bare_single_digit),
        (2, 1, Some(letter)) => {
            rule == Some(AreaRule::LetteredDistricts) || is_aa9a_letter(letter)
        }
        (2, 2, None) => rule.is_none_or(AreaRule::permits_two_digits),
        _ => false,
    }
}
