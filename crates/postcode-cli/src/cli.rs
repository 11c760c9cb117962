//! CLI argument definitions for the postcode validator.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};
use clap_verbosity_flag::{Verbosity, WarnLevel};
use colorchoice_clap::Color;

#[derive(Parser)]
#[command(
    name = "postcode",
    version,
    about = "UK postcode checker and batch validator",
    long_about = "Check UK postcodes against the postcode grammar.\n\n\
                  Classifies single postcodes, splits CSV files into accepted and\n\
                  rejected rows, and can explain why each rejected postcode failed."
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// Adjust log verbosity (-v for info, -vv for debug, -q for errors only).
    #[command(flatten)]
    pub verbosity: Verbosity<WarnLevel>,

    /// Control ANSI color output (auto, always, never).
    #[command(flatten)]
    pub color: Color,

    /// Explicit log level (overrides -v/-q flags).
    #[arg(long = "log-level", value_enum, global = true)]
    pub log_level: Option<LogLevelArg>,

    /// Log output format (pretty for human, json for machine parsing).
    #[arg(
        long = "log-format",
        value_enum,
        default_value = "pretty",
        global = true
    )]
    pub log_format: LogFormatArg,

    /// Append logs to a file instead of stderr.
    #[arg(long = "log-file", value_name = "PATH", global = true)]
    pub log_file: Option<PathBuf>,

    /// Allow postcode values in trace-level logs.
    #[arg(long = "log-data", global = true)]
    pub log_data: bool,
}

#[derive(Subcommand)]
pub enum Command {
    /// Classify postcodes given on the command line.
    Check(CheckArgs),

    /// Split a CSV file into accepted and rejected postcodes, sorted by row id.
    Validate(ValidateArgs),

    /// Stream a CSV file and copy rejected rows, in input order, to an error file.
    Scan(ScanArgs),

    /// List every outcome code with its description.
    Outcomes(OutcomesArgs),
}

#[derive(Args)]
pub struct CheckArgs {
    /// Postcodes to classify.
    #[arg(value_name = "POSTCODE", required = true)]
    pub postcodes: Vec<String>,

    /// Print results as JSON instead of a table.
    #[arg(long = "json")]
    pub json: bool,
}

#[derive(Args)]
pub struct OutcomesArgs {
    /// Print plain aligned text instead of a table.
    #[arg(long = "plain")]
    pub plain: bool,
}

/// Column selection shared by the file commands.
#[derive(Args)]
pub struct InputArgs {
    /// Input CSV file.
    #[arg(value_name = "INPUT")]
    pub input: PathBuf,

    /// Header of the row identifier column.
    #[arg(long = "id-column", value_name = "NAME", default_value = "row_id")]
    pub id_column: String,

    /// Header of the postcode column.
    #[arg(long = "postcode-column", value_name = "NAME", default_value = "postcode")]
    pub postcode_column: String,

    /// Field delimiter.
    #[arg(long = "delimiter", value_name = "CHAR", default_value = ",")]
    pub delimiter: char,
}

#[derive(Args)]
pub struct ValidateArgs {
    #[command(flatten)]
    pub input: InputArgs,

    /// Output directory for the partition files (default: current directory).
    #[arg(long = "output-dir", value_name = "DIR")]
    pub output_dir: Option<PathBuf>,

    /// Path of the accepted partition (default: <DIR>/succeeded_validation.csv).
    #[arg(long = "matched", value_name = "PATH")]
    pub matched: Option<PathBuf>,

    /// Path of the rejected partition (default: <DIR>/failed_validation.csv).
    #[arg(long = "error", value_name = "PATH")]
    pub error: Option<PathBuf>,

    /// Worker threads for classification (0 = one per CPU).
    #[arg(long = "jobs", short = 'j', value_name = "N", default_value_t = 1)]
    pub jobs: usize,

    /// Diagnose rejected postcodes instead of reporting UNKNOWN.
    #[arg(long = "diagnose")]
    pub diagnose: bool,

    /// Add a reason column with the outcome code to the rejected partition.
    #[arg(long = "reason-column")]
    pub reason_column: bool,

    /// Write accepted postcodes without trailing text after the match.
    #[arg(long = "clean")]
    pub clean: bool,

    /// Classify and report without writing output files.
    #[arg(long = "dry-run")]
    pub dry_run: bool,
}

#[derive(Args)]
pub struct ScanArgs {
    #[command(flatten)]
    pub input: InputArgs,

    /// Path of the error file (default: failed_validation.csv).
    #[arg(long = "error", value_name = "PATH")]
    pub error: Option<PathBuf>,

    /// Append the outcome code to each rejected row.
    #[arg(long = "reason-column")]
    pub reason_column: bool,

    /// Diagnose rejected postcodes instead of reporting UNKNOWN.
    #[arg(long = "diagnose")]
    pub diagnose: bool,

    /// Count rejected rows without writing the error file.
    #[arg(long = "dry-run")]
    pub dry_run: bool,
}

/// CLI log level choices.
#[derive(Clone, Copy, ValueEnum)]
pub enum LogLevelArg {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

/// CLI log format choices.
#[derive(Clone, Copy, ValueEnum)]
pub enum LogFormatArg {
    Pretty,
    Compact,
    Json,
}
