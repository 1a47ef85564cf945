//! Commit publishing error types.

use serde::Serialize;
use std::fmt;
use thiserror::Error;

/// Steps of publishing a commit, in execution order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum PublishStep {
    /// Creating the temporary workspace.
    CreateWorkspace,
    /// `git clone`.
    Clone,
    /// `git checkout -b`.
    CreateBranch,
    /// Overwriting the file in the working tree.
    WriteFile,
    /// `git add`.
    Stage,
    /// `git config user.signingkey`.
    ConfigureSigning,
    /// `git commit`.
    Commit,
    /// `git push`.
    Push,
}

impl PublishStep {
    /// Returns the step as a string.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::CreateWorkspace => "create workspace",
            Self::Clone => "clone",
            Self::CreateBranch => "create branch",
            Self::WriteFile => "write file",
            Self::Stage => "stage",
            Self::ConfigureSigning => "configure signing",
            Self::Commit => "commit",
            Self::Push => "push",
        }
    }
}

impl fmt::Display for PublishStep {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Errors that can occur while publishing a commit.
#[derive(Debug, Error)]
pub enum PublishError {
    /// Local I/O failed (workspace creation, file write, process spawn).
    #[error("Failed to {step}: {source}")]
    Io {
        step: PublishStep,
        #[source]
        source: std::io::Error,
    },

    /// A git command exited unsuccessfully.
    #[error("Failed to {step}: git exited with {code}, output: {output}")]
    Command {
        step: PublishStep,
        code: String,
        output: String,
    },
}

impl PublishError {
    /// The step that failed.
    #[must_use]
    pub fn step(&self) -> PublishStep {
        match self {
            Self::Io { step, .. } | Self::Command { step, .. } => *step,
        }
    }
}
