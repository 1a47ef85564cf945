#![doc = include_str!(concat!("../", env!("CARGO_PKG_README")))]

pub mod config;
pub mod discovery;
pub mod github;
pub mod probe;
pub mod publish;
pub mod rate_limit;
pub mod runner;
pub mod summary;
pub mod templates;
pub mod workflow;

pub use config::{ConfigError, UpdaterSettings};
pub use discovery::{
    CrawlReport, DiscoveredRepository, DiscoveryError, OrgCrawler, SkippedRepository,
    MAX_LISTING_RETRIES,
};
pub use github::{
    ApiError, ContentDecodeError, ContentResponse, CreatedPullRequest, FileContent, GitHubApi,
    OctocrabApi, PullRequestRequest, Repository, RepositoryPage, RepositoryResponse,
};
pub use probe::{ConfigProbe, ProbeResult, CANDIDATE_PATHS, CONFIG_FILE_NAME};
pub use publish::{
    CommandOutput, CommitPublisher, CommitRequest, GitExecutor, ProcessExecutor, PublishError,
    PublishStep, UPDATE_BRANCH,
};
pub use rate_limit::{
    RateLimitDecision, RateLimitSnapshot, RateLimiter, LOW_WATER_MARK, MIN_RETRY_WAIT,
};
pub use runner::{Runner, RunnerConfig, RunnerError};
pub use summary::{ProcessingResult, RunSummary};
pub use templates::{TemplateError, TemplateRenderer};
pub use workflow::{
    RewriteRule, UpdateDecision, UpdateOutcome, UpdateStatus, UpdateWorkflow, WorkflowError,
    WorkflowOptions, WorkflowState,
};
