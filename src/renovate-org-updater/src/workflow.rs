//! Per-repository update workflow.
//!
//! ```text
//! Fetching → Decoding → Deciding → NoOp
//!                                → DryRunNoOp
//!                                → Publishing → ResolvingDefaultBranch
//!                                  → OpeningPullRequest → Done
//! ```
//!
//! Any step may end in `Aborted`. A failed workflow is reported in its
//! [`UpdateOutcome`]; it never affects other repositories.

mod error;
mod outcome;
mod rewrite;
mod state;

pub use error::WorkflowError;
pub use outcome::{UpdateOutcome, UpdateStatus};
pub use rewrite::{RewriteRule, UpdateDecision, NEW_ORG, OLD_ORG};
pub use state::WorkflowState;

use crate::github::{ApiError, GitHubApi, PullRequestRequest, Repository};
use crate::publish::{CommitPublisher, CommitRequest, GitExecutor, UPDATE_BRANCH};
use crate::rate_limit::RateLimiter;
use crate::templates::TemplateRenderer;
use std::future::Future;
use tracing::{error, info, info_span, Instrument};

/// Per-run options of the update workflow.
#[derive(Debug, Clone, Default)]
pub struct WorkflowOptions {
    /// Report matches without committing or opening pull requests.
    pub dry_run: bool,

    /// GPG key used to sign commits.
    pub signing_key: Option<String>,

    /// Rewrite applied to the configuration.
    pub rule: RewriteRule,
}

/// Runs the update workflow for one repository at a time.
pub struct UpdateWorkflow<'a, A: ?Sized, E> {
    api: &'a A,
    publisher: &'a CommitPublisher<E>,
    limiter: &'a RateLimiter,
    renderer: &'a TemplateRenderer,
    options: &'a WorkflowOptions,
}

impl<'a, A, E> UpdateWorkflow<'a, A, E>
where
    A: GitHubApi + ?Sized,
    E: GitExecutor,
{
    /// Creates a workflow.
    pub fn new(
        api: &'a A,
        publisher: &'a CommitPublisher<E>,
        limiter: &'a RateLimiter,
        renderer: &'a TemplateRenderer,
        options: &'a WorkflowOptions,
    ) -> Self {
        Self {
            api,
            publisher,
            limiter,
            renderer,
            options,
        }
    }

    /// Checks and updates the configuration at `config_path`.
    pub async fn run(&self, repository: &Repository, config_path: &str) -> UpdateOutcome {
        let span = info_span!(
            "update",
            repo = %repository.full_name,
            path = %config_path
        );

        async {
            info!("Starting to check and update renovate config");

            let mut states = Vec::new();
            let status = match self.drive(repository, config_path, &mut states).await {
                Ok(status) => status,
                Err(e) => {
                    let state = e.state();
                    error!(state = %state, error = %e, "Update aborted");
                    states.push(WorkflowState::Aborted);
                    UpdateStatus::Failed {
                        state,
                        error: e.to_string(),
                    }
                }
            };

            UpdateOutcome {
                repository: repository.full_name.clone(),
                config_path: config_path.to_string(),
                states,
                status,
            }
        }
        .instrument(span)
        .await
    }

    async fn drive(
        &self,
        repository: &Repository,
        config_path: &str,
        states: &mut Vec<WorkflowState>,
    ) -> Result<UpdateStatus, WorkflowError> {
        let rule = &self.options.rule;

        states.push(WorkflowState::Fetching);
        let response = self
            .retry_rate_limited("fetch content", || {
                self.api
                    .get_content(&repository.owner, &repository.name, config_path)
            })
            .await
            .map_err(|source| WorkflowError::Fetch {
                path: config_path.to_string(),
                source,
            })?;
        self.limiter.observe(response.rate.as_ref()).await;
        info!(sha = %response.content.sha, "Retrieved renovate.json content");

        states.push(WorkflowState::Decoding);
        let text = response.content.decode()?;

        states.push(WorkflowState::Deciding);
        match UpdateDecision::decide(rule, &text, self.options.dry_run) {
            UpdateDecision::NoMatch => {
                info!(marker = %rule.marker(), "No need to update - content does not contain marker");
                states.push(WorkflowState::NoOp);
                return Ok(UpdateStatus::NoMatch);
            }
            UpdateDecision::DryRunMatch => {
                let occurrences = rule.occurrences(&text);
                info!(occurrences, "[DRY RUN] Would update renovate.json");
                states.push(WorkflowState::DryRunNoOp);
                return Ok(UpdateStatus::DryRun { occurrences });
            }
            UpdateDecision::MatchAndPublish => {
                info!(marker = %rule.marker(), "Content contains marker - proceeding with update");
            }
        }

        states.push(WorkflowState::Publishing);
        let updated = rule.apply(&text);
        let title = self.renderer.pr_title(rule)?;
        let body = self.renderer.pr_body(rule)?;
        let request = CommitRequest {
            repository: repository.clone(),
            branch: UPDATE_BRANCH.to_string(),
            // Written where it was found; nested configs stay nested.
            file_path: config_path.to_string(),
            content: updated.into_bytes(),
            signing_key: self.options.signing_key.clone(),
            message: self.renderer.commit_message(rule)?,
        };
        self.publisher.publish(&request).await?;

        states.push(WorkflowState::ResolvingDefaultBranch);
        let metadata = self
            .retry_rate_limited("resolve default branch", || {
                self.api.get_repository(&repository.owner, &repository.name)
            })
            .await
            .map_err(WorkflowError::RepositoryInfo)?;
        self.limiter.observe(metadata.rate.as_ref()).await;
        let base = metadata
            .repository
            .default_branch
            .filter(|branch| !branch.is_empty())
            .ok_or_else(|| WorkflowError::MissingDefaultBranch {
                repository: repository.full_name.clone(),
            })?;
        info!(base = %base, "Default branch resolved");

        states.push(WorkflowState::OpeningPullRequest);
        let pr_request = PullRequestRequest {
            owner: repository.owner.clone(),
            repo: repository.name.clone(),
            head: UPDATE_BRANCH.to_string(),
            base,
            title,
            body,
        };
        let pr = self
            .retry_rate_limited("open pull request", || {
                self.api.create_pull_request(&pr_request)
            })
            .await
            .map_err(WorkflowError::PullRequest)?;
        info!(pr_number = pr.number, url = %pr.url, "Pull request created successfully");

        states.push(WorkflowState::Done);
        Ok(UpdateStatus::PullRequestOpened {
            number: pr.number,
            url: pr.url,
        })
    }

    /// Runs `call`, waiting out a rate limit rejection and retrying once.
    async fn retry_rate_limited<T, F, Fut>(
        &self,
        operation: &str,
        call: F,
    ) -> Result<T, ApiError>
    where
        F: Fn() -> Fut,
        Fut: Future<Output = Result<T, ApiError>>,
    {
        match call().await {
            Err(ApiError::RateLimited { rate }) => {
                info!(operation, "Rate limit reached, retrying after reset");
                self.limiter.wait_for_reset(&rate).await;
                call().await
            }
            result => result,
        }
    }
}
