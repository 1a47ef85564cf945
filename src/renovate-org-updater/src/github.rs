//! GitHub API capability used by the crawler and the update workflow.
//!
//! The core only needs four operations. They are modelled as the
//! [`GitHubApi`] trait so tests can substitute deterministic fixtures;
//! [`OctocrabApi`] is the production implementation.

mod client;
mod error;
mod response;
mod types;

pub use client::OctocrabApi;
pub use error::{ApiError, ContentDecodeError};
pub use response::{classify_failure, parse_next_page, parse_rate_limit};
pub use types::{
    ContentResponse, CreatedPullRequest, FileContent, PullRequestRequest, Repository,
    RepositoryPage, RepositoryResponse,
};

use async_trait::async_trait;

/// Operations the updater performs against the hosting platform.
#[async_trait]
pub trait GitHubApi: Send + Sync {
    /// Lists one page of an organization's repositories (type `all`, 100 per page).
    async fn list_org_repositories(&self, org: &str, page: u32)
        -> Result<RepositoryPage, ApiError>;

    /// Fetches the content of a file at `path` on the default branch.
    async fn get_content(
        &self,
        owner: &str,
        repo: &str,
        path: &str,
    ) -> Result<ContentResponse, ApiError>;

    /// Fetches repository metadata.
    async fn get_repository(&self, owner: &str, repo: &str)
        -> Result<RepositoryResponse, ApiError>;

    /// Opens a pull request.
    async fn create_pull_request(
        &self,
        request: &PullRequestRequest,
    ) -> Result<CreatedPullRequest, ApiError>;
}
