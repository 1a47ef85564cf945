//! Runner configuration.

use crate::config::{ConfigError, UpdaterSettings};
use std::fmt;
use url::Url;

/// Configuration for one run of the updater.
#[derive(Clone)]
pub struct RunnerConfig {
    /// Organization to scan (owner of the single repository otherwise).
    organization: String,
    /// Single repository to process instead of the whole organization.
    repository: Option<String>,
    /// GitHub token used for API calls.
    token: String,
    /// Whether to preview changes without committing or opening PRs.
    dry_run: bool,
    /// GPG key used to sign commits.
    signing_key: Option<String>,
    /// GitHub API base URL.
    api_url: Option<Url>,
    /// SSH host for clones and pushes.
    git_host: String,
}

impl fmt::Debug for RunnerConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RunnerConfig")
            .field("organization", &self.organization)
            .field("repository", &self.repository)
            .field("token", &"<redacted>")
            .field("dry_run", &self.dry_run)
            .field("signing_key", &self.signing_key)
            .field("api_url", &self.api_url)
            .field("git_host", &self.git_host)
            .finish()
    }
}

impl RunnerConfig {
    /// Creates a configuration scanning `organization` with default settings.
    pub fn new(organization: impl Into<String>, token: impl Into<String>) -> Self {
        let defaults = UpdaterSettings::default();
        Self {
            organization: organization.into(),
            repository: None,
            token: token.into(),
            dry_run: false,
            signing_key: None,
            api_url: None,
            git_host: defaults.git_host,
        }
    }

    /// Builds a configuration from validated settings.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] if the settings fail validation.
    pub fn from_settings(
        settings: UpdaterSettings,
        token: impl Into<String>,
        origin: &str,
    ) -> Result<Self, ConfigError> {
        settings.validate(origin)?;
        let api_url = settings.parsed_api_url(origin)?;
        Ok(Self {
            organization: settings.organization,
            repository: settings.repository,
            token: token.into(),
            dry_run: settings.dry_run,
            signing_key: settings.signing_key,
            api_url,
            git_host: settings.git_host,
        })
    }

    /// Restricts the run to a single repository.
    #[must_use]
    pub fn with_repository(mut self, repository: impl Into<String>) -> Self {
        self.repository = Some(repository.into());
        self
    }

    /// Enables or disables dry-run mode.
    #[must_use]
    pub fn with_dry_run(mut self, dry_run: bool) -> Self {
        self.dry_run = dry_run;
        self
    }

    /// Signs commits with the given GPG key.
    #[must_use]
    pub fn with_signing_key(mut self, signing_key: impl Into<String>) -> Self {
        self.signing_key = Some(signing_key.into());
        self
    }

    /// Returns the organization.
    pub fn organization(&self) -> &str {
        &self.organization
    }

    /// Returns the single repository, if configured.
    pub fn repository(&self) -> Option<&str> {
        self.repository.as_deref()
    }

    /// Returns the configured GitHub token.
    pub fn token(&self) -> &str {
        &self.token
    }

    /// Returns whether dry-run mode is enabled.
    pub fn dry_run(&self) -> bool {
        self.dry_run
    }

    /// Returns the signing key, if configured.
    pub fn signing_key(&self) -> Option<&str> {
        self.signing_key.as_deref()
    }

    /// Returns the API base URL, if configured.
    pub fn api_url(&self) -> Option<&Url> {
        self.api_url.as_ref()
    }

    /// Returns the SSH host for clones.
    pub fn git_host(&self) -> &str {
        &self.git_host
    }
}
