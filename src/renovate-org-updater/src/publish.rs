//! Publishes a rewritten file as a commit on a new branch.
//!
//! Every call works in its own temporary clone:
//! 1. Clones the repository over SSH into a temp directory
//! 2. Creates and checks out the update branch
//! 3. Overwrites the file and stages it
//! 4. Optionally configures a signing key
//! 5. Commits and pushes the branch
//!
//! The temporary directory is removed when the call returns, whichever step
//! failed.

mod error;
mod executor;
mod request;

pub use error::{PublishError, PublishStep};
pub use executor::{CommandOutput, GitExecutor, ProcessExecutor};
pub use request::{CommitRequest, UPDATE_BRANCH};

use crate::github::Repository;
use std::path::{Path, PathBuf};
use tempfile::TempDir;
use tracing::{debug, info, info_span, warn, Instrument};

/// Default SSH host for clones and pushes.
pub const DEFAULT_GIT_HOST: &str = "github.com";

/// Prefix of temporary workspace directories.
const WORKSPACE_PREFIX: &str = "renovate-org-updater-";

/// Creates commits through an external git executor.
#[derive(Debug, Clone)]
pub struct CommitPublisher<E> {
    executor: E,
    git_host: String,
    temp_root: Option<PathBuf>,
}

impl<E: GitExecutor> CommitPublisher<E> {
    /// Creates a publisher cloning from [`DEFAULT_GIT_HOST`].
    pub fn new(executor: E) -> Self {
        Self {
            executor,
            git_host: DEFAULT_GIT_HOST.to_string(),
            temp_root: None,
        }
    }

    /// Sets the SSH host used in clone URLs.
    #[must_use]
    pub fn with_git_host(mut self, git_host: impl Into<String>) -> Self {
        self.git_host = git_host.into();
        self
    }

    /// Creates workspaces under `root` instead of the system temp directory.
    #[must_use]
    pub fn with_temp_root(mut self, root: impl Into<PathBuf>) -> Self {
        self.temp_root = Some(root.into());
        self
    }

    /// SSH remote of a repository, `git@host:owner/name.git`.
    #[must_use]
    pub fn clone_url(&self, repository: &Repository) -> String {
        format!(
            "git@{}:{}/{}.git",
            self.git_host, repository.owner, repository.name
        )
    }

    /// Pushes a branch holding one commit that overwrites the requested file.
    ///
    /// # Errors
    ///
    /// Returns [`PublishError`] naming the failed step. Command failures carry
    /// the executor's combined output.
    pub async fn publish(&self, request: &CommitRequest) -> Result<(), PublishError> {
        let span = info_span!(
            "publish",
            repo = %request.repository.full_name,
            branch = %request.branch
        );

        async {
            info!("Creating commit");

            let workspace = self.create_workspace()?;
            debug!(path = %workspace.path().display(), "Created temporary directory");

            let result = self.run_steps(request, workspace.path()).await;

            let path = workspace.path().to_path_buf();
            if let Err(e) = workspace.close() {
                warn!(path = %path.display(), error = %e, "Failed to remove temporary directory");
            }

            if result.is_ok() {
                info!("Branch pushed successfully");
            }
            result
        }
        .instrument(span)
        .await
    }

    fn create_workspace(&self) -> Result<TempDir, PublishError> {
        let mut builder = tempfile::Builder::new();
        builder.prefix(WORKSPACE_PREFIX);
        let created = match &self.temp_root {
            Some(root) => builder.tempdir_in(root),
            None => builder.tempdir(),
        };
        created.map_err(|source| PublishError::Io {
            step: PublishStep::CreateWorkspace,
            source,
        })
    }

    async fn run_steps(&self, request: &CommitRequest, workspace: &Path) -> Result<(), PublishError> {
        let clone_url = self.clone_url(&request.repository);
        let target = workspace.to_string_lossy();

        debug!(url = %clone_url, "Cloning repository");
        self.git(PublishStep::Clone, &["clone", &clone_url, &target], None)
            .await?;

        debug!("Creating and checking out branch");
        self.git(
            PublishStep::CreateBranch,
            &["checkout", "-b", &request.branch],
            Some(workspace),
        )
        .await?;

        write_file(workspace, &request.file_path, &request.content).await?;

        self.git(PublishStep::Stage, &["add", &request.file_path], Some(workspace))
            .await?;

        if let Some(key) = &request.signing_key {
            debug!(key = %key, "Configuring git for signing");
            self.git(
                PublishStep::ConfigureSigning,
                &["config", "user.signingkey", key],
                Some(workspace),
            )
            .await?;
        }

        let mut commit = vec!["commit", "-m", request.message.as_str()];
        if request.signing_key.is_some() {
            commit.push("-S");
        }
        debug!(command = %commit.join(" "), "Creating commit");
        self.git(PublishStep::Commit, &commit, Some(workspace))
            .await?;

        debug!("Pushing branch to remote");
        self.git(
            PublishStep::Push,
            &["push", "origin", &request.branch],
            Some(workspace),
        )
        .await?;

        Ok(())
    }

    /// Runs a git command, failing with the step's context.
    async fn git(
        &self,
        step: PublishStep,
        args: &[&str],
        cwd: Option<&Path>,
    ) -> Result<(), PublishError> {
        let output = self
            .executor
            .run("git", args, cwd)
            .await
            .map_err(|source| PublishError::Io { step, source })?;

        if !output.success {
            return Err(PublishError::Command {
                step,
                code: output
                    .code
                    .map_or_else(|| "signal".to_string(), |c| c.to_string()),
                output: output.combined,
            });
        }

        Ok(())
    }
}

/// Overwrites `file_path` relative to the clone root, creating parent
/// directories so `.github/renovate.json` is written in place.
async fn write_file(
    workspace: &Path,
    file_path: &str,
    content: &[u8],
) -> Result<(), PublishError> {
    let target = workspace.join(file_path);
    debug!(path = %target.display(), "Writing file");

    if let Some(parent) = target.parent() {
        tokio::fs::create_dir_all(parent)
            .await
            .map_err(|source| PublishError::Io {
                step: PublishStep::WriteFile,
                source,
            })?;
    }

    tokio::fs::write(&target, content)
        .await
        .map_err(|source| PublishError::Io {
            step: PublishStep::WriteFile,
            source,
        })
}
