//! Workflow states.

use serde::Serialize;
use std::fmt;

/// States of the per-repository update workflow.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum WorkflowState {
    /// Retrieving the configuration file.
    Fetching,
    /// Decoding the stored payload into text.
    Decoding,
    /// Checking for the marker.
    Deciding,
    /// Marker absent.
    NoOp,
    /// Marker present, dry run.
    DryRunNoOp,
    /// Committing and pushing the rewritten file.
    Publishing,
    /// Looking up the current default branch.
    ResolvingDefaultBranch,
    /// Opening the pull request.
    OpeningPullRequest,
    /// Pull request opened.
    Done,
    /// Stopped on an error.
    Aborted,
}

impl WorkflowState {
    /// Returns the state as a string.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Fetching => "fetching",
            Self::Decoding => "decoding",
            Self::Deciding => "deciding",
            Self::NoOp => "no_op",
            Self::DryRunNoOp => "dry_run_no_op",
            Self::Publishing => "publishing",
            Self::ResolvingDefaultBranch => "resolving_default_branch",
            Self::OpeningPullRequest => "opening_pull_request",
            Self::Done => "done",
            Self::Aborted => "aborted",
        }
    }
}

impl fmt::Display for WorkflowState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
