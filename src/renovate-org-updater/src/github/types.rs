//! Domain types exchanged with the GitHub API.

use super::ContentDecodeError;
use crate::rate_limit::RateLimitSnapshot;
use base64::Engine;
use serde::{Deserialize, Serialize};

/// A repository as returned by the API.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Repository {
    /// Repository owner (user or organization login).
    pub owner: String,

    /// Repository name.
    pub name: String,

    /// Full repository name in "owner/name" format.
    pub full_name: String,

    /// Default branch as reported when the repository was listed.
    pub default_branch: Option<String>,
}

impl Repository {
    /// Builds a repository identifier, deriving the full name.
    pub fn new(owner: impl Into<String>, name: impl Into<String>) -> Self {
        let owner = owner.into();
        let name = name.into();
        let full_name = format!("{owner}/{name}");
        Self {
            owner,
            name,
            full_name,
            default_branch: None,
        }
    }

    /// Sets the default branch.
    #[must_use]
    pub fn with_default_branch(mut self, branch: impl Into<String>) -> Self {
        self.default_branch = Some(branch.into());
        self
    }
}

/// One page of an organization's repository listing.
#[derive(Debug, Clone)]
pub struct RepositoryPage {
    /// Repositories on this page.
    pub repositories: Vec<Repository>,

    /// Page number of the next page, if the server advertised one.
    pub next_page: Option<u32>,

    /// Rate limit state reported with this page.
    pub rate: Option<RateLimitSnapshot>,
}

/// A file stored in a repository, still in its transport encoding.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct FileContent {
    /// Path of the file inside the repository.
    pub path: String,

    /// Blob SHA of the stored file.
    pub sha: String,

    /// Transport encoding (GitHub uses `base64`).
    #[serde(default)]
    pub encoding: Option<String>,

    /// Encoded payload.
    #[serde(default)]
    pub content: Option<String>,
}

impl FileContent {
    /// Builds a base64-encoded file, as the contents API returns it.
    pub fn from_text(path: impl Into<String>, sha: impl Into<String>, text: &str) -> Self {
        Self {
            path: path.into(),
            sha: sha.into(),
            encoding: Some("base64".to_string()),
            content: Some(base64::engine::general_purpose::STANDARD.encode(text)),
        }
    }

    /// Decodes the payload into text.
    ///
    /// # Errors
    ///
    /// Returns [`ContentDecodeError`] if the payload is missing, uses an
    /// unknown encoding, or is not valid UTF-8.
    pub fn decode(&self) -> Result<String, ContentDecodeError> {
        let content = self
            .content
            .as_deref()
            .ok_or_else(|| ContentDecodeError::MissingContent {
                path: self.path.clone(),
            })?;

        match self.encoding.as_deref() {
            Some("base64") => {
                // GitHub wraps base64 payloads at 60 columns.
                let compact: String = content.split_whitespace().collect();
                let bytes = base64::engine::general_purpose::STANDARD
                    .decode(compact)
                    .map_err(|source| ContentDecodeError::Base64 {
                        path: self.path.clone(),
                        source,
                    })?;
                String::from_utf8(bytes).map_err(|source| ContentDecodeError::Utf8 {
                    path: self.path.clone(),
                    source,
                })
            }
            None | Some("utf-8") => Ok(content.to_string()),
            Some("none") | Some("") => Err(ContentDecodeError::MissingContent {
                path: self.path.clone(),
            }),
            Some(other) => Err(ContentDecodeError::UnsupportedEncoding {
                path: self.path.clone(),
                encoding: other.to_string(),
            }),
        }
    }
}

/// Successful content lookup.
#[derive(Debug, Clone)]
pub struct ContentResponse {
    /// The file found at the requested path.
    pub content: FileContent,

    /// Rate limit state reported with the response.
    pub rate: Option<RateLimitSnapshot>,
}

/// Successful repository metadata lookup.
#[derive(Debug, Clone)]
pub struct RepositoryResponse {
    /// The repository.
    pub repository: Repository,

    /// Rate limit state reported with the response.
    pub rate: Option<RateLimitSnapshot>,
}

/// Parameters for opening a pull request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PullRequestRequest {
    /// Repository owner.
    pub owner: String,

    /// Repository name.
    pub repo: String,

    /// Branch holding the change.
    pub head: String,

    /// Branch to merge into.
    pub base: String,

    /// PR title.
    pub title: String,

    /// PR body.
    pub body: String,
}

/// A pull request opened on the platform.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CreatedPullRequest {
    /// GitHub PR number.
    pub number: u64,

    /// GitHub PR URL.
    pub url: String,
}

/// Wire shape of a repository in listing and metadata responses.
#[derive(Debug, Deserialize)]
pub(crate) struct RepositoryPayload {
    pub name: String,
    pub full_name: Option<String>,
    pub owner: Option<OwnerPayload>,
    pub default_branch: Option<String>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct OwnerPayload {
    pub login: String,
}

impl RepositoryPayload {
    /// Converts into a [`Repository`], falling back to `owner` when the
    /// payload carries no owner login.
    pub(crate) fn into_repository(self, owner: &str) -> Repository {
        let owner = self
            .owner
            .map(|o| o.login)
            .unwrap_or_else(|| owner.to_string());
        let full_name = self
            .full_name
            .unwrap_or_else(|| format!("{}/{}", owner, self.name));
        Repository {
            owner,
            name: self.name,
            full_name,
            default_branch: self.default_branch,
        }
    }
}
