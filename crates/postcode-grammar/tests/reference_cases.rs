//! Reference postcodes with their expected classification in both modes.

use postcode_grammar::classify;
use postcode_model::Outcome;

const GOOD: &[&str] = &[
    "EC1A 1BB", "W1A 0AX", "M1 1AE", "B33 8TH", "CR2 6XH", "DN55 1PT", "GIR 0AA", "SO10 9AA",
    "FY9 9AA", "WC1A 9AA",
];

const BAD: &[(&str, Outcome)] = &[
    ("$%± ()()", Outcome::Junk),
    ("XX XXX", Outcome::InwardMalformed),
    ("A1 9A", Outcome::InwardMalformed),
    ("LS44PL", Outcome::IncorrectGrouping),
    ("Q1A 9AA", Outcome::OutwardMalformed),
    ("V1A 9AA", Outcome::OutwardMalformed),
    ("X1A 9BB", Outcome::OutwardMalformed),
    ("LI10 3QP", Outcome::OutwardAa9Malformed),
    ("LJ10 3QP", Outcome::OutwardAa9Malformed),
    ("LZ10 3QP", Outcome::OutwardAa9Malformed),
    ("A9Q 9AA", Outcome::OutwardMalformed),
    ("AA9C 9AA", Outcome::OutwardAa9aMalformed),
    ("FY10 4PL", Outcome::SingleDigitDistrict),
    ("SO1 4QQ", Outcome::DoubleDigitDistrict),
];

#[test]
fn good_postcodes_are_valid_in_both_modes() {
    for postcode in GOOD {
        for diagnose in [true, false] {
            let result = classify(postcode, diagnose);
            assert_eq!(result.outcome, Outcome::Valid, "{postcode} diagnose={diagnose}");
            assert_eq!(result.matched_len, Some(postcode.len()));
        }
    }
}

#[test]
fn bad_postcodes_are_unknown_without_diagnosis() {
    for (postcode, _) in BAD {
        assert_eq!(classify(postcode, false).outcome, Outcome::Unknown, "{postcode}");
    }
}

#[test]
fn bad_postcodes_are_diagnosed() {
    for (postcode, expected) in BAD {
        assert_eq!(classify(postcode, true).outcome, *expected, "{postcode}");
    }
}

#[test]
fn over_permissive_codes_are_documented_as_valid() {
    assert_eq!(classify("M0 1AA", true).outcome, Outcome::Valid);
    assert_eq!(classify("M1A 9AA", true).outcome, Outcome::Valid);
}

#[test]
fn diagnosis_report_snapshot() {
    let report = BAD
        .iter()
        .map(|(postcode, _)| format!("{:<22} {postcode}", classify(postcode, true).outcome))
        .collect::<Vec<_>>()
        .join("\n");
    insta::assert_snapshot!(report, @r"
    JUNK                   $%± ()()
    INWARD_MALFORMED       XX XXX
    INWARD_MALFORMED       A1 9A
    INCORRECT_GROUPING     LS44PL
    OUTWARD_MALFORMED      Q1A 9AA
    OUTWARD_MALFORMED      V1A 9AA
    OUTWARD_MALFORMED      X1A 9BB
    OUTWARD_AA9_MALFORMED  LI10 3QP
    OUTWARD_AA9_MALFORMED  LJ10 3QP
    OUTWARD_AA9_MALFORMED  LZ10 3QP
    OUTWARD_MALFORMED      A9Q 9AA
    OUTWARD_AA9A_MALFORMED AA9C 9AA
    SINGLE_DIGIT_DISTRICT  FY10 4PL
    DOUBLE_DIGIT_DISTRICT  SO1 4QQ
    ");
}
