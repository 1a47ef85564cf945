//! Per-repository workflow outcome.

use super::WorkflowState;
use serde::Serialize;

/// How the update of a repository ended.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum UpdateStatus {
    /// The configuration does not reference the old organization.
    NoMatch,

    /// The configuration would be rewritten, but this is a dry run.
    DryRun {
        /// Number of references that would be replaced.
        occurrences: usize,
    },

    /// The change was pushed and a pull request opened.
    PullRequestOpened {
        /// GitHub PR number.
        number: u64,
        /// GitHub PR URL.
        url: String,
    },

    /// The workflow aborted.
    Failed {
        /// State in which the error occurred.
        state: WorkflowState,
        /// Error message.
        error: String,
    },
}

impl UpdateStatus {
    /// Returns the status as a string.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::NoMatch => "no_match",
            Self::DryRun { .. } => "dry_run",
            Self::PullRequestOpened { .. } => "pull_request_opened",
            Self::Failed { .. } => "failed",
        }
    }
}

/// Result of running the update workflow on one repository.
#[derive(Debug, Clone, Serialize)]
pub struct UpdateOutcome {
    /// Full repository name in "owner/name" format.
    pub repository: String,

    /// Path of the configuration file.
    pub config_path: String,

    /// States visited, in order.
    pub states: Vec<WorkflowState>,

    /// Final status.
    pub status: UpdateStatus,
}

impl UpdateOutcome {
    /// Last state visited.
    #[must_use]
    pub fn final_state(&self) -> Option<WorkflowState> {
        self.states.last().copied()
    }
}
