//! Settings file deserialization.

use super::ConfigError;
use crate::publish::DEFAULT_GIT_HOST;
use crate::workflow::OLD_ORG;
use serde::Deserialize;
use std::path::Path;
use url::Url;

/// Settings read from a TOML file.
///
/// Every key is optional:
///
/// ```toml
/// organization = "MyOrg"
/// repository = "some-repo"
/// dry-run = true
/// signing-key = "ABCDEF0123456789"
/// api-url = "https://github.example.com/api/v3"
/// git-host = "github.example.com"
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "kebab-case", deny_unknown_fields)]
pub struct UpdaterSettings {
    /// Organization to scan.
    #[serde(default = "default_organization")]
    pub organization: String,

    /// Single repository to process instead of the whole organization.
    #[serde(default)]
    pub repository: Option<String>,

    /// Report matches without committing or opening pull requests.
    #[serde(default)]
    pub dry_run: bool,

    /// GPG key used to sign commits.
    #[serde(default)]
    pub signing_key: Option<String>,

    /// GitHub API base URL.
    #[serde(default)]
    pub api_url: Option<String>,

    /// SSH host for clones and pushes.
    #[serde(default = "default_git_host")]
    pub git_host: String,
}

pub(crate) fn default_organization() -> String {
    OLD_ORG.to_string()
}

pub(crate) fn default_git_host() -> String {
    DEFAULT_GIT_HOST.to_string()
}

impl Default for UpdaterSettings {
    fn default() -> Self {
        Self {
            organization: default_organization(),
            repository: None,
            dry_run: false,
            signing_key: None,
            api_url: None,
            git_host: default_git_host(),
        }
    }
}

impl UpdaterSettings {
    /// Loads settings from a TOML file.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] if the file is missing, unreadable, malformed
    /// or fails validation.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        if !path.exists() {
            return Err(ConfigError::MissingFile {
                path: path.display().to_string(),
            });
        }

        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::IoError {
            path: path.display().to_string(),
            source: e,
        })?;

        let settings: Self = toml::from_str(&content).map_err(|e| ConfigError::TomlError {
            path: path.display().to_string(),
            source: e,
        })?;

        settings.validate(&path.display().to_string())?;
        Ok(settings)
    }

    /// Validates the settings.
    ///
    /// # Arguments
    ///
    /// * `origin` - Where the settings came from, used in error messages
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::ValidationError`] on the first invalid value.
    pub fn validate(&self, origin: &str) -> Result<(), ConfigError> {
        let invalid = |message: &str| ConfigError::ValidationError {
            path: origin.to_string(),
            message: message.to_string(),
        };

        if self.organization.trim().is_empty() {
            return Err(invalid("organization cannot be empty"));
        }

        if self
            .repository
            .as_deref()
            .is_some_and(|repo| repo.trim().is_empty())
        {
            return Err(invalid("repository cannot be empty"));
        }

        if self
            .signing_key
            .as_deref()
            .is_some_and(|key| key.trim().is_empty())
        {
            return Err(invalid("signing-key cannot be empty"));
        }

        if self.git_host.trim().is_empty() || self.git_host.contains(char::is_whitespace) {
            return Err(invalid("git-host must be a host name"));
        }

        self.parsed_api_url(origin)?;
        Ok(())
    }

    /// Parses `api-url`, requiring an http(s) URL.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::ValidationError`] if the URL is invalid.
    pub fn parsed_api_url(&self, origin: &str) -> Result<Option<Url>, ConfigError> {
        let Some(raw) = &self.api_url else {
            return Ok(None);
        };

        let url = Url::parse(raw).map_err(|e| ConfigError::ValidationError {
            path: origin.to_string(),
            message: format!("api-url '{raw}' is not a valid URL: {e}"),
        })?;

        if !matches!(url.scheme(), "http" | "https") {
            return Err(ConfigError::ValidationError {
                path: origin.to_string(),
                message: format!("api-url '{raw}' must use http or https"),
            });
        }

        Ok(Some(url))
    }
}
