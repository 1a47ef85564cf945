//! Locates the Renovate configuration file inside a repository.
//!
//! Candidate paths are probed in order; a 404 means "not here" and moves on
//! to the next candidate. A rate limit rejection is waited out and the same
//! path retried exactly once.

mod result;

pub use result::ProbeResult;

use crate::github::{ApiError, GitHubApi, Repository};
use crate::rate_limit::RateLimiter;
use tracing::{debug, info, warn};

/// Name of the configuration file being looked for.
pub const CONFIG_FILE_NAME: &str = "renovate.json";

/// Paths probed for the configuration file, in order.
pub const CANDIDATE_PATHS: [&str; 2] = ["renovate.json", ".github/renovate.json"];

/// Outcome of probing a single candidate path.
enum PathProbe {
    Found(crate::github::FileContent),
    Absent,
    Failed(String),
    Transient(String),
}

/// Determines whether and where the configuration file exists.
pub struct ConfigProbe<'a, A: ?Sized> {
    api: &'a A,
    limiter: &'a RateLimiter,
    candidates: &'a [&'a str],
}

impl<'a, A: GitHubApi + ?Sized> ConfigProbe<'a, A> {
    /// Creates a probe over the default [`CANDIDATE_PATHS`].
    pub fn new(api: &'a A, limiter: &'a RateLimiter) -> Self {
        Self {
            api,
            limiter,
            candidates: &CANDIDATE_PATHS,
        }
    }

    /// Overrides the candidate paths.
    #[must_use]
    pub fn with_candidates(mut self, candidates: &'a [&'a str]) -> Self {
        self.candidates = candidates;
        self
    }

    /// Returns the first candidate path at which the file exists.
    pub async fn probe(&self, repository: &Repository) -> ProbeResult {
        let mut failures = Vec::new();
        let mut absent = 0usize;

        for path in self.candidates {
            match self.probe_path(repository, path).await {
                PathProbe::Found(content) => {
                    info!(
                        repo = %repository.full_name,
                        path,
                        "Found renovate.json"
                    );
                    return ProbeResult::Found {
                        path: (*path).to_string(),
                        content,
                    };
                }
                PathProbe::Absent => {
                    debug!(repo = %repository.full_name, path, "Not present");
                    absent += 1;
                }
                PathProbe::Failed(reason) => {
                    warn!(
                        repo = %repository.full_name,
                        path,
                        error = %reason,
                        "Error checking path"
                    );
                    failures.push(format!("{path}: {reason}"));
                }
                PathProbe::Transient(reason) => {
                    warn!(
                        repo = %repository.full_name,
                        path,
                        error = %reason,
                        "Giving up on repository after rate limit retry"
                    );
                    return ProbeResult::TransientError {
                        path: (*path).to_string(),
                        reason,
                    };
                }
            }
        }

        if absent == 0 && !failures.is_empty() {
            return ProbeResult::PermanentError {
                reason: failures.join("; "),
            };
        }

        ProbeResult::NotFound
    }

    async fn probe_path(&self, repository: &Repository, path: &str) -> PathProbe {
        let first = self
            .api
            .get_content(&repository.owner, &repository.name, path)
            .await;

        match first {
            Ok(response) => {
                self.limiter.observe(response.rate.as_ref()).await;
                PathProbe::Found(response.content)
            }
            Err(ApiError::NotFound { rate, .. }) => {
                self.limiter.observe(rate.as_ref()).await;
                PathProbe::Absent
            }
            Err(ApiError::RateLimited { rate }) => {
                info!(
                    repo = %repository.full_name,
                    path,
                    "Rate limit reached while checking files"
                );
                self.limiter.wait_for_reset(&rate).await;
                self.retry_path(repository, path).await
            }
            Err(e) => PathProbe::Failed(e.to_string()),
        }
    }

    /// Single retry after waiting out a rate limit rejection.
    async fn retry_path(&self, repository: &Repository, path: &str) -> PathProbe {
        match self
            .api
            .get_content(&repository.owner, &repository.name, path)
            .await
        {
            Ok(response) => {
                self.limiter.observe(response.rate.as_ref()).await;
                PathProbe::Found(response.content)
            }
            Err(ApiError::NotFound { rate, .. }) => {
                self.limiter.observe(rate.as_ref()).await;
                PathProbe::Absent
            }
            Err(e) => PathProbe::Transient(e.to_string()),
        }
    }
}
