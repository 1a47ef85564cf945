//! Runner error types.

use crate::github::ApiError;
use crate::workflow::WorkflowState;

/// Errors that can occur while running the updater.
#[derive(Debug, thiserror::Error)]
pub enum RunnerError {
    /// Configuration errors.
    #[error(transparent)]
    Config(#[from] crate::config::ConfigError),

    /// GitHub API client initialization errors.
    #[error(transparent)]
    Api(#[from] ApiError),

    /// The organization could not be listed.
    #[error(transparent)]
    Discovery(#[from] crate::discovery::DiscoveryError),

    /// The single repository could not be fetched.
    #[error("Error getting repository {repository}: {source}")]
    Repository {
        repository: String,
        #[source]
        source: ApiError,
    },

    /// The single repository holds no configuration file.
    #[error("No renovate.json found in {repository}")]
    ConfigNotFound { repository: String },

    /// The single repository could not be probed.
    #[error("Error checking {repository} for renovate.json: {reason}")]
    Probe { repository: String, reason: String },

    /// The single repository's update failed.
    #[error("Error processing repository {repository} while {state}: {error}")]
    Update {
        repository: String,
        state: WorkflowState,
        error: String,
    },
}
