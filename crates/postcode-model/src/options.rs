//! Configuration options for batch validation.

use serde::{Deserialize, Serialize};

/// Whether failed postcodes are diagnosed with a specific reason.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum DiagnosisMode {
    /// Report failures as `UNKNOWN`; only the grammar is evaluated.
    #[default]
    Skip,
    /// Walk the diagnostic checks to name the failing rule.
    Diagnose,
}

impl DiagnosisMode {
    pub fn enabled(self) -> bool {
        matches!(self, DiagnosisMode::Diagnose)
    }
}

impl From<bool> for DiagnosisMode {
    fn from(diagnose: bool) -> Self {
        if diagnose {
            DiagnosisMode::Diagnose
        } else {
            DiagnosisMode::Skip
        }
    }
}

/// Options controlling a batch validation run.
///
/// Passed explicitly from the command line down to the pipeline; nothing
/// here is process-global.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BatchOptions {
    pub diagnosis: DiagnosisMode,

    /// Worker threads used for classification. `0` means one per available CPU.
    pub workers: usize,

    /// Write accepted postcodes without any trailing text after the match.
    pub clean_output: bool,

    /// Add a `reason` column to the rejected partition.
    pub reason_column: bool,
}

impl Default for BatchOptions {
    fn default() -> Self {
        Self {
            diagnosis: DiagnosisMode::Skip,
            workers: 1,
            clean_output: false,
            reason_column: false,
        }
    }
}

impl BatchOptions {
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_diagnosis(mut self, diagnosis: DiagnosisMode) -> Self {
        self.diagnosis = diagnosis;
        self
    }

    #[must_use]
    pub fn with_workers(mut self, workers: usize) -> Self {
        self.workers = workers;
        self
    }

    #[must_use]
    pub fn with_clean_output(mut self, enable: bool) -> Self {
        self.clean_output = enable;
        self
    }

    #[must_use]
    pub fn with_reason_column(mut self, enable: bool) -> Self {
        self.reason_column = enable;
        self
    }

    /// Worker count with `0` resolved against the available parallelism.
    pub fn effective_workers(&self) -> usize {
        if self.workers > 0 {
            return self.workers;
        }
        std::thread::available_parallelism().map_or(1, std::num::NonZeroUsize::get)
    }
}
