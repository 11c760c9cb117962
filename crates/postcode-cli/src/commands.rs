use std::path::{Path, PathBuf};

use anyhow::{Context, Result, bail};

use postcode_cli::pipeline::{
    CheckEntry, ScanConfig, ScanResult, ValidateConfig, ValidateResult, all_accepted,
    check_postcodes, scan, validate,
};
use postcode_ingest::ReadOptions;
use postcode_model::{BatchOptions, DiagnosisMode};
use postcode_output::{DEFAULT_REJECTED_FILE, OutputPaths};

use crate::cli::{CheckArgs, InputArgs, OutcomesArgs, ScanArgs, ValidateArgs};
use crate::summary::{outcome_listing, print_check_table, print_outcomes_table};

/// Classify the given postcodes and print them. Returns true if all were accepted.
pub fn run_check(args: &CheckArgs) -> Result<bool> {
    let entries = check_postcodes(&args.postcodes);
    if args.json {
        println!("{}", check_json(&entries)?);
    } else {
        print_check_table(&entries);
    }
    Ok(all_accepted(&entries))
}

fn check_json(entries: &[CheckEntry]) -> Result<String> {
    serde_json::to_string_pretty(entries).context("serialize results")
}

pub fn run_validate(args: &ValidateArgs, log_data: bool) -> Result<ValidateResult> {
    let read = read_options(&args.input)?;
    let batch = BatchOptions::new()
        .with_diagnosis(DiagnosisMode::from(args.diagnose))
        .with_workers(args.jobs)
        .with_clean_output(args.clean)
        .with_reason_column(args.reason_column);
    let outputs = output_paths(
        args.output_dir.as_deref(),
        args.matched.clone(),
        args.error.clone(),
    );
    validate(&ValidateConfig {
        input: &args.input.input,
        read: &read,
        batch: &batch,
        outputs: &outputs,
        dry_run: args.dry_run,
        log_data,
    })
}

pub fn run_scan(args: &ScanArgs, log_data: bool) -> Result<ScanResult> {
    let read = read_options(&args.input)?.with_identifier_required(false);
    let error_path = args
        .error
        .clone()
        .unwrap_or_else(|| PathBuf::from(DEFAULT_REJECTED_FILE));
    scan(&ScanConfig {
        input: &args.input.input,
        read: &read,
        error_path: &error_path,
        diagnose: args.diagnose,
        reason_column: args.reason_column,
        dry_run: args.dry_run,
        log_data,
    })
}

pub fn run_outcomes(args: &OutcomesArgs) {
    if args.plain {
        println!("{}", outcome_listing());
    } else {
        print_outcomes_table();
    }
}

fn read_options(args: &InputArgs) -> Result<ReadOptions> {
    if !args.delimiter.is_ascii() {
        bail!("delimiter must be a single ASCII character, got '{}'", args.delimiter);
    }
    Ok(ReadOptions::default()
        .with_columns(&args.id_column, &args.postcode_column)
        .with_delimiter(args.delimiter as u8))
}

/// Resolve output paths. Explicit file paths win over the output directory.
fn output_paths(
    output_dir: Option<&Path>,
    matched: Option<PathBuf>,
    error: Option<PathBuf>,
) -> OutputPaths {
    let defaults = OutputPaths::in_dir(output_dir.unwrap_or_else(|| Path::new(".")));
    OutputPaths {
        accepted: matched.unwrap_or(defaults.accepted),
        rejected: error.unwrap_or(defaults.rejected),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_output_paths_defaults() {
        let paths = output_paths(None, None, None);
        assert_eq!(paths.accepted, Path::new("./succeeded_validation.csv"));
        assert_eq!(paths.rejected, Path::new("./failed_validation.csv"));
    }

    #[test]
    fn test_output_paths_overrides() {
        let paths = output_paths(
            Some(Path::new("out")),
            Some(PathBuf::from("good.csv")),
            None,
        );
        assert_eq!(paths.accepted, Path::new("good.csv"));
        assert_eq!(paths.rejected, Path::new("out/failed_validation.csv"));
    }

    #[test]
    fn test_check_json_fields() {
        let entries = check_postcodes(&["M1 7EPJUNK", "FY10 4PL"]);

        let json: serde_json::Value = serde_json::from_str(&check_json(&entries).unwrap()).unwrap();

        assert_eq!(
            json,
            serde_json::json!([
                {
                    "input": "M1 7EPJUNK",
                    "outcome": "VALID",
                    "description": "valid postcode",
                    "matched": "M1 7EP",
                    "trailing": "JUNK"
                },
                {
                    "input": "FY10 4PL",
                    "outcome": "SINGLE_DIGIT_DISTRICT",
                    "description": "area only has single-digit districts",
                    "matched": null,
                    "trailing": null
                }
            ])
        );
    }

    #[test]
    fn test_read_options_rejects_non_ascii_delimiter() {
        let args = InputArgs {
            input: PathBuf::from("in.csv"),
            id_column: "row_id".to_string(),
            postcode_column: "postcode".to_string(),
            delimiter: '§',
        };
        assert!(read_options(&args).is_err());

        let args = InputArgs {
            delimiter: ';',
            ..args
        };
        assert_eq!(read_options(&args).unwrap().delimiter, b';');
    }
}
