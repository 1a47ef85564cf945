//! Discovered repository information.

use crate::github::Repository;
use serde::Serialize;

/// A repository confirmed to contain the configuration file.
#[derive(Debug, Clone, Serialize)]
pub struct DiscoveredRepository {
    /// The repository.
    pub repository: Repository,

    /// Path at which the configuration file was found.
    pub config_path: String,
}

/// A repository that could not be probed.
#[derive(Debug, Clone, Serialize)]
pub struct SkippedRepository {
    /// Full repository name in "owner/name" format.
    pub full_name: String,

    /// Reason for skipping.
    pub reason: String,
}

/// Result of crawling an organization.
#[derive(Debug, Clone, Default, Serialize)]
pub struct CrawlReport {
    /// Repositories holding the configuration file, in listing order.
    pub matches: Vec<DiscoveredRepository>,

    /// Repositories skipped because probing failed.
    pub skipped: Vec<SkippedRepository>,

    /// Number of listing requests issued, retries included.
    pub pages_fetched: u32,

    /// Number of distinct repositories probed.
    pub repositories_scanned: usize,
}
