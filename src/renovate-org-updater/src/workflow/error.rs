//! Update workflow error types.

use super::WorkflowState;
use crate::github::{ApiError, ContentDecodeError};
use crate::publish::PublishError;
use crate::templates::TemplateError;
use thiserror::Error;

/// Errors that abort the update of a single repository.
#[derive(Debug, Error)]
pub enum WorkflowError {
    /// Fetching the configuration file failed.
    #[error("Error getting {path} content: {source}")]
    Fetch {
        path: String,
        #[source]
        source: ApiError,
    },

    /// The stored payload could not be decoded.
    #[error("Error decoding content: {0}")]
    Decode(#[from] ContentDecodeError),

    /// Rendering the commit or PR text failed.
    #[error("Error rendering templates: {0}")]
    Template(#[from] TemplateError),

    /// Creating or pushing the commit failed.
    #[error("Error creating commit: {0}")]
    Publish(#[from] PublishError),

    /// Fetching repository metadata failed.
    #[error("Error getting repository info: {0}")]
    RepositoryInfo(#[source] ApiError),

    /// The repository reports no default branch.
    #[error("Repository {repository} has no default branch")]
    MissingDefaultBranch { repository: String },

    /// Opening the pull request failed.
    #[error("Error creating PR: {0}")]
    PullRequest(#[source] ApiError),
}

impl WorkflowError {
    /// State the workflow was in when the error occurred.
    #[must_use]
    pub fn state(&self) -> WorkflowState {
        match self {
            Self::Fetch { .. } => WorkflowState::Fetching,
            Self::Decode(_) => WorkflowState::Decoding,
            Self::Template(_) | Self::Publish(_) => WorkflowState::Publishing,
            Self::RepositoryInfo(_) | Self::MissingDefaultBranch { .. } => {
                WorkflowState::ResolvingDefaultBranch
            }
            Self::PullRequest(_) => WorkflowState::OpeningPullRequest,
        }
    }
}
