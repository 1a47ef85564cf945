//! Probe result types.

use crate::github::FileContent;

/// Where, if anywhere, the configuration file was found.
#[derive(Debug, Clone)]
pub enum ProbeResult {
    /// File exists at `path`.
    Found {
        /// Candidate path that matched.
        path: String,
        /// Content returned by the existence check.
        content: FileContent,
    },

    /// No candidate path holds the file.
    NotFound,

    /// The repository could not be checked even after waiting out the rate
    /// limit; it is skipped for this run.
    TransientError {
        /// Path that was being retried.
        path: String,
        /// Error message.
        reason: String,
    },

    /// Every candidate path failed with a non-404 error.
    PermanentError {
        /// Error messages, one per path.
        reason: String,
    },
}

impl ProbeResult {
    /// Path the file was found at.
    #[must_use]
    pub fn path(&self) -> Option<&str> {
        match self {
            Self::Found { path, .. } => Some(path),
            _ => None,
        }
    }

    /// Reason the repository is skipped, for the error variants.
    #[must_use]
    pub fn skip_reason(&self) -> Option<String> {
        match self {
            Self::TransientError { path, reason } => {
                Some(format!("transient error at {path}: {reason}"))
            }
            Self::PermanentError { reason } => Some(reason.clone()),
            _ => None,
        }
    }
}
