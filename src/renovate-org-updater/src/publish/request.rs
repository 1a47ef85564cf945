//! Commit request.

use crate::github::Repository;

/// Branch holding the rewritten configuration.
pub const UPDATE_BRANCH: &str = "update-renovate-config";

/// A change to materialize as a single commit on a new branch.
#[derive(Debug, Clone)]
pub struct CommitRequest {
    /// Target repository.
    pub repository: Repository,

    /// Branch to create and push.
    pub branch: String,

    /// Path of the file to overwrite, relative to the repository root.
    pub file_path: String,

    /// New file content.
    pub content: Vec<u8>,

    /// GPG key used to sign the commit, if any.
    pub signing_key: Option<String>,

    /// Commit message.
    pub message: String,
}
