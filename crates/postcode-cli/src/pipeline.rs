//! Batch validation stages: ingest, classify, partition, output.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};

use anyhow::{Context, Result};
use serde::Serialize;
use tracing::{debug, info, info_span, trace};

use postcode_grammar::classify;
use postcode_ingest::{CandidateReader, ReadOptions, read_candidates};
use postcode_model::{
    BatchOptions, Candidate, ClassificationResult, ClassifiedCandidate, Outcome, sort_for_output,
};
use postcode_output::{OutputPaths, PartitionWriter, REASON_HEADER, WriteOptions, write_partition};

use crate::logging::redact_value;

// ============================================================================
// Classification
// ============================================================================

/// Classify every candidate, keeping input order.
///
/// Work is split into contiguous chunks, one per worker thread.
pub fn classify_all(candidates: Vec<Candidate>, options: &BatchOptions) -> Vec<ClassifiedCandidate> {
    let diagnose = options.diagnosis.enabled();
    let workers = options.effective_workers().clamp(1, candidates.len().max(1));
    let results = if workers == 1 {
        classify_chunk(&candidates, diagnose)
    } else {
        let chunk_size = candidates.len().div_ceil(workers);
        std::thread::scope(|scope| {
            let handles: Vec<_> = candidates
                .chunks(chunk_size)
                .map(|chunk| scope.spawn(move || classify_chunk(chunk, diagnose)))
                .collect();
            handles
                .into_iter()
                .flat_map(|handle| match handle.join() {
                    Ok(results) => results,
                    Err(panic) => std::panic::resume_unwind(panic),
                })
                .collect::<Vec<_>>()
        })
    };
    debug!(rows = candidates.len(), workers, diagnose, "classified candidates");

    candidates
        .into_iter()
        .zip(results)
        .map(|(candidate, result)| ClassifiedCandidate::new(candidate, result))
        .collect()
}

fn classify_chunk(candidates: &[Candidate], diagnose: bool) -> Vec<ClassificationResult> {
    candidates
        .iter()
        .map(|candidate| classify(&candidate.text, diagnose))
        .collect()
}

/// Accepted and rejected rows, each in output order.
#[derive(Debug, Default)]
pub struct Partitioned {
    pub accepted: Vec<ClassifiedCandidate>,
    pub rejected: Vec<ClassifiedCandidate>,
}

/// Split classified rows by validity and sort each side for output.
pub fn partition(records: Vec<ClassifiedCandidate>) -> Partitioned {
    let (mut accepted, mut rejected): (Vec<_>, Vec<_>) =
        records.into_iter().partition(ClassifiedCandidate::is_valid);
    sort_for_output(&mut accepted);
    sort_for_output(&mut rejected);
    Partitioned { accepted, rejected }
}

/// Number of rows per outcome. Outcomes with no rows are absent.
pub fn count_outcomes(records: &[ClassifiedCandidate]) -> BTreeMap<Outcome, usize> {
    let mut counts = BTreeMap::new();
    for record in records {
        *counts.entry(record.result.outcome).or_insert(0) += 1;
    }
    counts
}

// ============================================================================
// Check
// ============================================================================

/// Classification of one postcode given on the command line.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CheckEntry {
    pub input: String,
    pub outcome: Outcome,
    pub description: &'static str,
    pub matched: Option<String>,
    pub trailing: Option<String>,
}

/// Classify each input with diagnosis.
pub fn check_postcodes<S: AsRef<str>>(inputs: &[S]) -> Vec<CheckEntry> {
    inputs
        .iter()
        .map(|input| {
            let text = input.as_ref();
            let result = classify(text, true);
            CheckEntry {
                input: text.to_string(),
                outcome: result.outcome,
                description: result.outcome.description(),
                matched: result.clean(text).map(str::to_string),
                trailing: result.trailing(text).map(str::to_string),
            }
        })
        .collect()
}

/// True if every entry was accepted. `check` exits non-zero otherwise.
pub fn all_accepted(entries: &[CheckEntry]) -> bool {
    entries.iter().all(|entry| entry.outcome.is_valid())
}

// ============================================================================
// Validate
// ============================================================================

/// Inputs to a batch validation run.
pub struct ValidateConfig<'a> {
    pub input: &'a Path,
    pub read: &'a ReadOptions,
    pub batch: &'a BatchOptions,
    pub outputs: &'a OutputPaths,
    pub dry_run: bool,
    /// Allow postcode values in trace events.
    pub log_data: bool,
}

/// Result of a batch validation run.
#[derive(Debug)]
pub struct ValidateResult {
    pub input: PathBuf,
    /// Paths written, or `None` for a dry run.
    pub outputs: Option<OutputPaths>,
    pub rows: usize,
    pub accepted: usize,
    pub rejected: usize,
    /// Accepted rows with text after the matched postcode.
    pub trailing_accepts: usize,
    /// Rows whose identifier was missing or not an integer.
    pub unidentified: usize,
    /// Rows skipped because they had too few columns.
    pub skipped_rows: usize,
    pub outcome_counts: BTreeMap<Outcome, usize>,
    pub duration: Duration,
}

impl ValidateResult {
    /// Rejected rows as a percentage of rows read.
    pub fn rejected_percentage(&self) -> f64 {
        percentage(self.rejected, self.rows)
    }
}

/// Read, classify, partition and write one input file.
pub fn validate(config: &ValidateConfig<'_>) -> Result<ValidateResult> {
    let span = info_span!("validate", input = %config.input.display());
    let _guard = span.enter();
    let start = Instant::now();

    // Stage 1: ingest
    let ingest_start = Instant::now();
    let table = read_candidates(config.input, config.read)
        .with_context(|| format!("read {}", config.input.display()))?;
    let unidentified = table.unidentified_count();
    let skipped_rows = table.skipped_rows;
    info!(
        rows = table.len(),
        unidentified,
        skipped_rows,
        duration_ms = ingest_start.elapsed().as_millis(),
        "ingest complete"
    );

    // Stage 2: classify
    let classify_start = Instant::now();
    let classified = classify_all(table.candidates, config.batch);
    let rows = classified.len();
    let outcome_counts = count_outcomes(&classified);
    let trailing_accepts = classified
        .iter()
        .filter(|record| record.has_trailing())
        .count();
    for record in classified.iter().filter(|record| !record.is_valid()) {
        trace!(
            row_id = ?record.candidate.identifier,
            postcode = %redact_value(&record.candidate.text, config.log_data),
            outcome = %record.result.outcome,
            "rejected postcode"
        );
    }
    let Partitioned { accepted, rejected } = partition(classified);
    info!(
        rows,
        accepted = accepted.len(),
        rejected = rejected.len(),
        trailing_accepts,
        duration_ms = classify_start.elapsed().as_millis(),
        "classification complete"
    );

    // Stage 3: output
    let outputs = if config.dry_run {
        info!("output skipped (dry run)");
        None
    } else {
        write_outputs(&accepted, &rejected, config)?;
        Some(config.outputs.clone())
    };

    Ok(ValidateResult {
        input: config.input.to_path_buf(),
        outputs,
        rows,
        accepted: accepted.len(),
        rejected: rejected.len(),
        trailing_accepts,
        unidentified,
        skipped_rows,
        outcome_counts,
        duration: start.elapsed(),
    })
}

fn write_outputs(
    accepted: &[ClassifiedCandidate],
    rejected: &[ClassifiedCandidate],
    config: &ValidateConfig<'_>,
) -> Result<()> {
    let output_start = Instant::now();
    let accepted_options = WriteOptions {
        reason_column: false,
        clean: config.batch.clean_output,
    };
    let rejected_options = WriteOptions {
        reason_column: config.batch.reason_column,
        clean: false,
    };
    write_partition(&config.outputs.accepted, accepted, &accepted_options)
        .context("write accepted partition")?;
    write_partition(&config.outputs.rejected, rejected, &rejected_options)
        .context("write rejected partition")?;
    info!(
        accepted_path = %config.outputs.accepted.display(),
        rejected_path = %config.outputs.rejected.display(),
        duration_ms = output_start.elapsed().as_millis(),
        "output complete"
    );
    Ok(())
}

// ============================================================================
// Scan
// ============================================================================

/// Inputs to a streaming scan for rejected rows.
pub struct ScanConfig<'a> {
    pub input: &'a Path,
    pub read: &'a ReadOptions,
    pub error_path: &'a Path,
    pub diagnose: bool,
    pub reason_column: bool,
    pub dry_run: bool,
    /// Allow postcode values in trace events.
    pub log_data: bool,
}

/// Result of a streaming scan.
#[derive(Debug)]
pub struct ScanResult {
    pub input: PathBuf,
    /// Error file written, or `None` for a dry run.
    pub error_path: Option<PathBuf>,
    pub rows: usize,
    pub errors: usize,
    pub skipped_rows: usize,
    pub outcome_counts: BTreeMap<Outcome, usize>,
    pub duration: Duration,
}

impl ScanResult {
    /// Rejected rows as a percentage of rows read.
    pub fn error_percentage(&self) -> f64 {
        percentage(self.errors, self.rows)
    }
}

/// Stream `input` and copy every rejected row, with all its columns, to the error file.
///
/// Rows are written in input order; nothing is held in memory beyond the
/// current record.
pub fn scan(config: &ScanConfig<'_>) -> Result<ScanResult> {
    let span = info_span!("scan", input = %config.input.display());
    let _guard = span.enter();
    let start = Instant::now();

    let mut reader = CandidateReader::open(config.input, config.read)
        .with_context(|| format!("open {}", config.input.display()))?;
    let mut writer = if config.dry_run {
        None
    } else {
        let mut header = reader.header_record();
        if config.reason_column {
            header.push_field(REASON_HEADER);
        }
        Some(PartitionWriter::create(config.error_path, &header).context("create error file")?)
    };

    let mut rows = 0usize;
    let mut outcome_counts = BTreeMap::new();
    for record in reader.by_ref() {
        let record = record.with_context(|| format!("read {}", config.input.display()))?;
        rows += 1;
        let result = classify(&record.candidate.text, config.diagnose);
        if result.is_valid() {
            continue;
        }
        *outcome_counts.entry(result.outcome).or_insert(0) += 1;
        trace!(
            line = record.line,
            postcode = %redact_value(&record.candidate.text, config.log_data),
            outcome = %result.outcome,
            "rejected postcode"
        );
        if let Some(writer) = writer.as_mut() {
            let reason = config.reason_column.then_some(result.outcome);
            writer
                .write_source(&record.fields, reason)
                .context("write error file")?;
        }
    }

    let errors = outcome_counts.values().sum();
    let error_path = match writer {
        Some(writer) => {
            writer.finish().context("write error file")?;
            Some(config.error_path.to_path_buf())
        }
        None => None,
    };
    let result = ScanResult {
        input: config.input.to_path_buf(),
        error_path,
        rows,
        errors,
        skipped_rows: reader.skipped_rows(),
        outcome_counts,
        duration: start.elapsed(),
    };
    info!(
        rows = result.rows,
        errors = result.errors,
        error_percentage = result.error_percentage(),
        duration_ms = result.duration.as_millis(),
        "scan complete"
    );
    Ok(result)
}

fn percentage(part: usize, total: usize) -> f64 {
    if total == 0 {
        0.0
    } else {
        part as f64 * 100.0 / total as f64
    }
}
