use std::collections::BTreeMap;

use comfy_table::modifiers::{UTF8_ROUND_CORNERS, UTF8_SOLID_INNER_BORDERS};
use comfy_table::presets::{UTF8_FULL, UTF8_FULL_CONDENSED};
use comfy_table::{Attribute, Cell, CellAlignment, Color, ContentArrangement, Table};

use postcode_cli::pipeline::{CheckEntry, ScanResult, ValidateResult};
use postcode_model::Outcome;

pub fn print_validate_summary(result: &ValidateResult) {
    println!("Input: {}", result.input.display());
    match &result.outputs {
        Some(paths) => {
            println!("Accepted: {}", paths.accepted.display());
            println!("Rejected: {}", paths.rejected.display());
        }
        None => println!("Dry run: no files written"),
    }
    let mut table = Table::new();
    table.set_header(vec![header_cell("Measure"), header_cell("Count")]);
    apply_summary_table_style(&mut table);
    align_column(&mut table, 1, CellAlignment::Right);
    table.add_row(vec![label_cell("Rows read"), Cell::new(result.rows)]);
    table.add_row(vec![
        label_cell("Accepted"),
        count_cell(result.accepted, Color::Green),
    ]);
    table.add_row(vec![
        label_cell("Rejected"),
        count_cell(result.rejected, Color::Red),
    ]);
    table.add_row(vec![
        label_cell("Rejected %"),
        Cell::new(format!("{:.2}", result.rejected_percentage())),
    ]);
    table.add_row(vec![
        label_cell("Accepted with trailing text"),
        count_cell(result.trailing_accepts, Color::Yellow),
    ]);
    table.add_row(vec![
        label_cell("Without row id"),
        count_cell(result.unidentified, Color::Yellow),
    ]);
    table.add_row(vec![
        label_cell("Skipped short rows"),
        count_cell(result.skipped_rows, Color::Yellow),
    ]);
    table.add_row(vec![
        label_cell("Duration"),
        dim_cell(format!("{} ms", result.duration.as_millis())),
    ]);
    println!("{table}");
    print_outcome_counts(&result.outcome_counts);
}

pub fn print_scan_summary(result: &ScanResult) {
    println!("Input: {}", result.input.display());
    match &result.error_path {
        Some(path) => println!("Errors: {}", path.display()),
        None => println!("Dry run: no files written"),
    }
    let mut table = Table::new();
    table.set_header(vec![header_cell("Measure"), header_cell("Count")]);
    apply_summary_table_style(&mut table);
    align_column(&mut table, 1, CellAlignment::Right);
    table.add_row(vec![label_cell("Rows read"), Cell::new(result.rows)]);
    table.add_row(vec![
        label_cell("Errors"),
        count_cell(result.errors, Color::Red),
    ]);
    table.add_row(vec![
        label_cell("Error %"),
        Cell::new(format!("{:.2}", result.error_percentage())),
    ]);
    table.add_row(vec![
        label_cell("Skipped short rows"),
        count_cell(result.skipped_rows, Color::Yellow),
    ]);
    table.add_row(vec![
        label_cell("Duration"),
        dim_cell(format!("{} ms", result.duration.as_millis())),
    ]);
    println!("{table}");
    print_outcome_counts(&result.outcome_counts);
}

fn print_outcome_counts(counts: &BTreeMap<Outcome, usize>) {
    if counts.is_empty() {
        return;
    }
    let mut table = Table::new();
    table.set_header(vec![
        header_cell("Outcome"),
        header_cell("Description"),
        header_cell("Rows"),
    ]);
    apply_table_style(&mut table);
    align_column(&mut table, 2, CellAlignment::Right);
    for (&outcome, &count) in counts {
        table.add_row(vec![
            outcome_cell(outcome),
            Cell::new(outcome.description()),
            Cell::new(count),
        ]);
    }
    println!();
    println!("Outcomes:");
    println!("{table}");
}

pub fn print_check_table(entries: &[CheckEntry]) {
    let mut table = Table::new();
    table.set_header(vec![
        header_cell("Input"),
        header_cell("Outcome"),
        header_cell("Description"),
        header_cell("Matched"),
        header_cell("Trailing"),
    ]);
    apply_table_style(&mut table);
    for entry in entries {
        table.add_row(vec![
            Cell::new(format!("{:?}", entry.input)),
            outcome_cell(entry.outcome),
            Cell::new(entry.description),
            optional_cell(entry.matched.as_deref()),
            optional_cell(entry.trailing.as_deref()),
        ]);
    }
    println!("{table}");
}

pub fn print_outcomes_table() {
    let mut table = Table::new();
    table.set_header(vec![header_cell("Code"), header_cell("Description")]);
    apply_table_style(&mut table);
    for outcome in Outcome::ALL {
        table.add_row(vec![outcome_cell(outcome), Cell::new(outcome.description())]);
    }
    println!("{table}");
}

/// Plain `CODE  description` lines for every outcome.
pub fn outcome_listing() -> String {
    Outcome::ALL
        .iter()
        .map(|outcome| format!("{outcome:<22} {}", outcome.description()))
        .collect::<Vec<_>>()
        .join("\n")
}

fn apply_table_style(table: &mut Table) {
    table
        .load_preset(UTF8_FULL_CONDENSED)
        .apply_modifier(UTF8_ROUND_CORNERS)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_width(120);
}

fn apply_summary_table_style(table: &mut Table) {
    table
        .load_preset(UTF8_FULL)
        .apply_modifier(UTF8_ROUND_CORNERS)
        .apply_modifier(UTF8_SOLID_INNER_BORDERS)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_width(80);
}

fn align_column(table: &mut Table, index: usize, alignment: CellAlignment) {
    if let Some(column) = table.column_mut(index) {
        column.set_cell_alignment(alignment);
    }
}

fn header_cell(label: &str) -> Cell {
    Cell::new(label)
        .fg(Color::Cyan)
        .add_attribute(Attribute::Bold)
}

fn label_cell(label: &str) -> Cell {
    Cell::new(label).fg(Color::Blue)
}

fn outcome_cell(outcome: Outcome) -> Cell {
    match outcome {
        Outcome::Valid => Cell::new(outcome.code())
            .fg(Color::Green)
            .add_attribute(Attribute::Bold),
        Outcome::Unknown => Cell::new(outcome.code()).fg(Color::Yellow),
        _ => Cell::new(outcome.code()).fg(Color::Red),
    }
}

fn count_cell(count: usize, color: Color) -> Cell {
    if count > 0 {
        Cell::new(count).fg(color).add_attribute(Attribute::Bold)
    } else {
        dim_cell(count)
    }
}

fn optional_cell(value: Option<&str>) -> Cell {
    match value {
        Some(value) => Cell::new(value),
        None => dim_cell("-"),
    }
}

fn dim_cell<T: ToString>(value: T) -> Cell {
    Cell::new(value).fg(Color::DarkGrey)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn outcome_listing_snapshot() {
        insta::assert_snapshot!(outcome_listing(), @r"
        VALID                  valid postcode
        JUNK                   unparseable nonsense
        INCORRECT_GROUPING     incorrectly grouped (no separating space, or too many parts)
        INWARD_MALFORMED       inward part malformed
        OUTWARD_MALFORMED      outward part malformed
        OUTWARD_AA9A_MALFORMED outward part of form AA9A malformed
        OUTWARD_AA9_MALFORMED  outward part of form AA9 or AA99 malformed
        OUTWARD_A9_MALFORMED   outward part of form A9 or A99 malformed
        SINGLE_DIGIT_DISTRICT  area only has single-digit districts
        DOUBLE_DIGIT_DISTRICT  area only has double-digit districts
        UNKNOWN                did not match, reason unknown
        ");
    }

    #[test]
    fn optional_cell_marks_missing_values() {
        assert_eq!(optional_cell(None).content(), "-");
        assert_eq!(optional_cell(Some("M1 1AE")).content(), "M1 1AE");
    }
}
