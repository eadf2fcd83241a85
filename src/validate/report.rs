//! Aggregated results of a validation run.

use super::check::{CheckResult, CheckStatus};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Ordered check results of one run, with timing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ValidationReport {
    /// Connector reference the run was executed against
    pub connector: String,
    pub started_at: DateTime<Utc>,
    pub finished_at: DateTime<Utc>,
    pub results: Vec<CheckResult>,
}

/// Result counts by status.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReportSummary {
    pub passed: usize,
    pub failed: usize,
    pub skipped: usize,
    pub warnings: usize,
}

impl ValidationReport {
    /// Whether any check recorded an error. Warnings and skips never fail a run.
    pub fn has_failures(&self) -> bool {
        self.results.iter().any(CheckResult::has_errors)
    }

    pub fn summary(&self) -> ReportSummary {
        self.results
            .iter()
            .fold(ReportSummary::default(), |mut summary, result| {
                match result.status() {
                    CheckStatus::Passed => summary.passed += 1,
                    CheckStatus::Failed => summary.failed += 1,
                    CheckStatus::Skipped => summary.skipped += 1,
                }
                summary.warnings += result.warnings.len();
                summary
            })
    }

    /// Wall-clock duration of the run.
    pub fn elapsed(&self) -> chrono::Duration {
        self.finished_at - self.started_at
    }
}
