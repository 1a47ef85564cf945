//! Run summary types.

use super::result::ProcessingResult;
use crate::workflow::UpdateStatus;
use serde::Serialize;

/// Summary of a complete run.
#[derive(Debug, Clone, Default, Serialize)]
pub struct RunSummary {
    /// Organization that was scanned.
    pub organization: String,

    /// Whether this was a dry run.
    pub dry_run: bool,

    /// Number of repository listing requests.
    pub pages_fetched: u32,

    /// Number of repositories probed for the configuration file.
    pub repositories_scanned: usize,

    /// Number of repositories holding the configuration file.
    pub repositories_matched: usize,

    /// Number of pull requests opened.
    pub prs_created: usize,

    /// Number of configurations that did not need a change.
    pub unchanged: usize,

    /// Number of configurations a dry run would have changed.
    pub would_update: usize,

    /// Number of repositories skipped during probing.
    pub skipped: usize,

    /// Number of repositories whose update failed.
    pub failed: usize,

    /// Per-repository results, in processing order.
    pub results: Vec<ProcessingResult>,
}

impl RunSummary {
    /// Creates a new empty summary.
    #[must_use]
    pub fn new(organization: impl Into<String>, dry_run: bool) -> Self {
        Self {
            organization: organization.into(),
            dry_run,
            ..Default::default()
        }
    }

    /// Updates the summary with a processing result.
    pub fn record_result(&mut self, result: ProcessingResult) {
        match &result {
            ProcessingResult::Processed(outcome) => match &outcome.status {
                UpdateStatus::NoMatch => self.unchanged += 1,
                UpdateStatus::DryRun { .. } => self.would_update += 1,
                UpdateStatus::PullRequestOpened { .. } => self.prs_created += 1,
                UpdateStatus::Failed { .. } => self.failed += 1,
            },
            ProcessingResult::Skipped { .. } => self.skipped += 1,
        }
        self.results.push(result);
    }

    /// Returns true if any failures occurred.
    #[must_use]
    pub fn has_failures(&self) -> bool {
        self.failed > 0 || self.skipped > 0
    }

    /// Returns true if all operations were successful.
    #[must_use]
    pub fn all_success(&self) -> bool {
        !self.has_failures()
    }
}
