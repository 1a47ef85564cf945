//! Repository discovery error types.

use crate::github::ApiError;
use thiserror::Error;

/// Errors that can occur during repository discovery.
#[derive(Debug, Error)]
pub enum DiscoveryError {
    /// Listing a page of repositories failed.
    #[error("Failed to list repositories of '{org}' (page {page}): {source}")]
    ListFailed {
        org: String,
        page: u32,
        #[source]
        source: ApiError,
    },
}
