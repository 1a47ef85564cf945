//! GitHub API error types.

use crate::rate_limit::RateLimitSnapshot;
use thiserror::Error;

/// Errors returned by [`GitHubApi`](super::GitHubApi) operations.
#[derive(Debug, Error)]
pub enum ApiError {
    /// The requested resource does not exist.
    #[error("Resource not found: {resource}")]
    NotFound {
        resource: String,
        rate: Option<RateLimitSnapshot>,
    },

    /// The request was rejected because the rate limit is exhausted.
    #[error("Rate limit exhausted, resets at {}", .rate.reset)]
    RateLimited { rate: RateLimitSnapshot },

    /// Any other non-success HTTP status.
    #[error("GitHub returned status {status} for {resource}: {message}")]
    Status {
        status: u16,
        resource: String,
        message: String,
    },

    /// The response body could not be interpreted.
    #[error("Unexpected response for {resource}: {message}")]
    InvalidResponse { resource: String, message: String },

    /// GitHub API client error.
    #[error("GitHub API error: {0}")]
    GitHubError(#[from] octocrab::Error),
}

impl ApiError {
    /// Returns true for a 404-equivalent response.
    #[must_use]
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }
}

/// Errors that can occur while decoding file content.
#[derive(Debug, Error)]
pub enum ContentDecodeError {
    /// The API did not inline the file content (e.g. file too large).
    #[error("Content of '{path}' was not included in the response")]
    MissingContent { path: String },

    /// Encoding other than base64 or plain text.
    #[error("Unsupported content encoding '{encoding}' for '{path}'")]
    UnsupportedEncoding { path: String, encoding: String },

    /// Invalid base64 payload.
    #[error("Invalid base64 content in '{path}': {source}")]
    Base64 {
        path: String,
        #[source]
        source: base64::DecodeError,
    },

    /// Decoded bytes are not UTF-8.
    #[error("Content of '{path}' is not valid UTF-8: {source}")]
    Utf8 {
        path: String,
        #[source]
        source: std::string::FromUtf8Error,
    },
}
