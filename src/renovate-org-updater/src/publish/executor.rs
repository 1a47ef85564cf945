//! External command execution used for git plumbing.

use async_trait::async_trait;
use std::path::Path;
use std::process::Stdio;
use tokio::process::Command;

/// Exit status and output of an external command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandOutput {
    /// Whether the command exited successfully.
    pub success: bool,

    /// Exit code, if the process exited normally.
    pub code: Option<i32>,

    /// Stdout followed by stderr.
    pub combined: String,
}

impl CommandOutput {
    /// Successful output with the given text.
    pub fn ok(combined: impl Into<String>) -> Self {
        Self {
            success: true,
            code: Some(0),
            combined: combined.into(),
        }
    }

    /// Failed output with the given exit code and text.
    pub fn failed(code: i32, combined: impl Into<String>) -> Self {
        Self {
            success: false,
            code: Some(code),
            combined: combined.into(),
        }
    }
}

/// Runs external programs on behalf of the commit publisher.
#[async_trait]
pub trait GitExecutor: Send + Sync {
    /// Runs `program` with `args`, in `cwd` when given.
    ///
    /// # Errors
    ///
    /// Returns an I/O error only when the process could not be spawned; a
    /// non-zero exit is reported through [`CommandOutput::success`].
    async fn run(
        &self,
        program: &str,
        args: &[&str],
        cwd: Option<&Path>,
    ) -> std::io::Result<CommandOutput>;
}

/// Executes commands as child processes.
#[derive(Debug, Clone, Default)]
pub struct ProcessExecutor;

#[async_trait]
impl GitExecutor for ProcessExecutor {
    async fn run(
        &self,
        program: &str,
        args: &[&str],
        cwd: Option<&Path>,
    ) -> std::io::Result<CommandOutput> {
        let mut command = Command::new(program);
        command
            .args(args)
            .stdout(Stdio::piped())
            .stderr(Stdio::piped());
        if let Some(cwd) = cwd {
            command.current_dir(cwd);
        }

        let output = command.output().await?;
        let mut combined = String::from_utf8_lossy(&output.stdout).into_owned();
        combined.push_str(&String::from_utf8_lossy(&output.stderr));

        Ok(CommandOutput {
            success: output.status.success(),
            code: output.status.code(),
            combined,
        })
    }
}
