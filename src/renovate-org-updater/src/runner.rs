//! Orchestrates a scan and the per-repository updates.

mod config;
mod error;

pub use config::RunnerConfig;
pub use error::RunnerError;

use crate::discovery::OrgCrawler;
use crate::github::{GitHubApi, OctocrabApi};
use crate::probe::{ConfigProbe, ProbeResult};
use crate::publish::{CommitPublisher, GitExecutor, ProcessExecutor};
use crate::rate_limit::RateLimiter;
use crate::summary::{ProcessingResult, RunSummary};
use crate::templates::TemplateRenderer;
use crate::workflow::{UpdateStatus, UpdateWorkflow, WorkflowOptions};
use tracing::{error, info, warn};

/// Orchestrates a full run in organization or single-repository mode.
pub struct Runner<A = OctocrabApi, E = ProcessExecutor> {
    config: RunnerConfig,
    api: A,
    publisher: CommitPublisher<E>,
    limiter: RateLimiter,
    renderer: TemplateRenderer,
    options: WorkflowOptions,
}

impl Runner<OctocrabApi, ProcessExecutor> {
    /// Builds a runner talking to GitHub and running git as a subprocess.
    ///
    /// # Errors
    ///
    /// Returns an error if the GitHub client cannot be constructed.
    pub fn new(config: RunnerConfig) -> Result<Self, RunnerError> {
        let api = OctocrabApi::new(config.token(), config.api_url())?;
        let publisher = CommitPublisher::new(ProcessExecutor).with_git_host(config.git_host());
        Ok(Self::with_parts(config, api, publisher))
    }
}

impl<A: GitHubApi, E: GitExecutor> Runner<A, E> {
    /// Builds a runner from explicit collaborators.
    pub fn with_parts(config: RunnerConfig, api: A, publisher: CommitPublisher<E>) -> Self {
        let options = WorkflowOptions {
            dry_run: config.dry_run(),
            signing_key: config.signing_key().map(str::to_string),
            ..Default::default()
        };
        Self {
            config,
            api,
            publisher,
            limiter: RateLimiter::default(),
            renderer: TemplateRenderer::new(),
            options,
        }
    }

    /// Returns the API client.
    pub fn api(&self) -> &A {
        &self.api
    }

    /// Executes the run.
    ///
    /// In organization mode failures are contained per repository and
    /// recorded in the summary. In single-repository mode any failure is
    /// returned as an error.
    ///
    /// # Errors
    ///
    /// Returns [`RunnerError`] if the organization cannot be listed, or if
    /// processing the single repository fails.
    pub async fn run(&self) -> Result<RunSummary, RunnerError> {
        match self.config.repository() {
            Some(name) => self.run_single(name).await,
            None => self.run_organization().await,
        }
    }

    fn workflow(&self) -> UpdateWorkflow<'_, A, E> {
        UpdateWorkflow::new(
            &self.api,
            &self.publisher,
            &self.limiter,
            &self.renderer,
            &self.options,
        )
    }

    async fn run_organization(&self) -> Result<RunSummary, RunnerError> {
        let org = self.config.organization();
        let mut summary = RunSummary::new(org, self.config.dry_run());

        let report = OrgCrawler::new(&self.api, &self.limiter).crawl(org).await?;
        info!(
            count = report.matches.len(),
            "Found repositories with renovate.json"
        );

        summary.pages_fetched = report.pages_fetched;
        summary.repositories_scanned = report.repositories_scanned;
        summary.repositories_matched = report.matches.len();

        for skipped in report.skipped {
            summary.record_result(ProcessingResult::Skipped {
                repository: skipped.full_name,
                reason: skipped.reason,
            });
        }

        let workflow = self.workflow();
        for discovered in &report.matches {
            info!(repo = %discovered.repository.full_name, "Processing repository");
            let outcome = workflow
                .run(&discovered.repository, &discovered.config_path)
                .await;
            if let UpdateStatus::Failed { error, .. } = &outcome.status {
                warn!(
                    repo = %outcome.repository,
                    error = %error,
                    "Error processing repository, continuing"
                );
            }
            summary.record_result(ProcessingResult::Processed(outcome));
        }

        Ok(summary)
    }

    async fn run_single(&self, name: &str) -> Result<RunSummary, RunnerError> {
        let org = self.config.organization();
        let full_name = format!("{org}/{name}");
        let mut summary = RunSummary::new(org, self.config.dry_run());

        let response = self
            .api
            .get_repository(org, name)
            .await
            .map_err(|source| RunnerError::Repository {
                repository: full_name.clone(),
                source,
            })?;
        self.limiter.observe(response.rate.as_ref()).await;
        let repository = response.repository;
        info!(repo = %repository.full_name, "Processing single repository");
        summary.repositories_scanned = 1;

        let probe = ConfigProbe::new(&self.api, &self.limiter);
        let config_path = match probe.probe(&repository).await {
            ProbeResult::Found { path, .. } => path,
            ProbeResult::NotFound => {
                return Err(RunnerError::ConfigNotFound {
                    repository: repository.full_name,
                })
            }
            failed => {
                return Err(RunnerError::Probe {
                    repository: repository.full_name,
                    reason: failed.skip_reason().unwrap_or_default(),
                })
            }
        };
        summary.repositories_matched = 1;

        let outcome = self.workflow().run(&repository, &config_path).await;
        if let UpdateStatus::Failed { state, error } = &outcome.status {
            error!(repo = %repository.full_name, error = %error, "Error processing repository");
            return Err(RunnerError::Update {
                repository: repository.full_name.clone(),
                state: *state,
                error: error.clone(),
            });
        }

        summary.record_result(ProcessingResult::Processed(outcome));
        Ok(summary)
    }
}
