//! Test doubles shared by the integration tests.

#![allow(dead_code)]

use async_trait::async_trait;
use renovate_org_updater::{
    ApiError, CommandOutput, ContentResponse, CreatedPullRequest, FileContent, GitExecutor,
    GitHubApi, PullRequestRequest, RateLimitSnapshot, Repository, RepositoryPage,
    RepositoryResponse,
};
use std::collections::{HashMap, VecDeque};
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};
use std::time::{SystemTime, UNIX_EPOCH};

pub fn unix_now() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap()
        .as_secs()
}

/// Budget that never triggers a wait or a warning.
pub fn healthy_rate() -> RateLimitSnapshot {
    RateLimitSnapshot {
        remaining: 4999,
        limit: 5000,
        reset: unix_now() + 3600,
    }
}

/// Exhausted budget resetting `secs` from now.
pub fn exhausted_rate(secs: u64) -> RateLimitSnapshot {
    RateLimitSnapshot {
        remaining: 0,
        limit: 5000,
        reset: unix_now() + secs,
    }
}

pub fn rate_limited(secs: u64) -> ApiError {
    ApiError::RateLimited {
        rate: exhausted_rate(secs),
    }
}

/// Rejection whose reset time is long past.
pub fn stale_rate_limited() -> ApiError {
    ApiError::RateLimited {
        rate: RateLimitSnapshot {
            remaining: 0,
            limit: 5000,
            reset: 1,
        },
    }
}

pub fn server_error(resource: &str) -> ApiError {
    ApiError::Status {
        status: 500,
        resource: resource.to_string(),
        message: "Internal Server Error".to_string(),
    }
}

pub fn repo(owner: &str, name: &str) -> Repository {
    Repository::new(owner, name).with_default_branch("main")
}

/// API call recorded by [`FakeGitHub`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Call {
    ListPage(u32),
    GetContent { repo: String, path: String },
    GetRepository(String),
    CreatePullRequest(String),
}

#[derive(Default)]
struct FakeState {
    pages: Vec<Vec<Repository>>,
    page_rates: HashMap<u32, VecDeque<RateLimitSnapshot>>,
    page_errors: HashMap<u32, VecDeque<ApiError>>,
    files: HashMap<(String, String), String>,
    raw_files: HashMap<(String, String), FileContent>,
    content_errors: HashMap<(String, String), VecDeque<ApiError>>,
    metadata: HashMap<String, Repository>,
    metadata_errors: VecDeque<ApiError>,
    pr_errors: VecDeque<ApiError>,
    next_pr: u64,
    pull_requests: Vec<PullRequestRequest>,
    calls: Vec<Call>,
}

/// Scripted, in-memory GitHub.
#[derive(Default)]
pub struct FakeGitHub {
    state: Mutex<FakeState>,
}

impl FakeGitHub {
    pub fn new() -> Self {
        Self::default()
    }

    fn state(&self) -> std::sync::MutexGuard<'_, FakeState> {
        self.state.lock().unwrap_or_else(|e| e.into_inner())
    }

    /// Appends a listing page; pages link to the next one automatically.
    pub fn with_page(self, repositories: Vec<Repository>) -> Self {
        for repository in &repositories {
            self.state()
                .metadata
                .entry(repository.full_name.clone())
                .or_insert_with(|| repository.clone());
        }
        self.state().pages.push(repositories);
        self
    }

    pub fn with_file(self, full_name: &str, path: &str, text: &str) -> Self {
        self.state()
            .files
            .insert((full_name.to_string(), path.to_string()), text.to_string());
        self
    }

    pub fn with_raw_file(self, full_name: &str, content: FileContent) -> Self {
        self.state()
            .raw_files
            .insert((full_name.to_string(), content.path.clone()), content);
        self
    }

    /// Overrides repository metadata returned by `get_repository`.
    pub fn with_metadata(self, repository: Repository) -> Self {
        self.state()
            .metadata
            .insert(repository.full_name.clone(), repository);
        self
    }

    /// Next listing of `page` succeeds but reports `rate`.
    pub fn with_page_rate(self, page: u32, rate: RateLimitSnapshot) -> Self {
        self.state()
            .page_rates
            .entry(page)
            .or_default()
            .push_back(rate);
        self
    }

    /// Next listing of `page` fails with `error`.
    pub fn fail_page(self, page: u32, error: ApiError) -> Self {
        self.state()
            .page_errors
            .entry(page)
            .or_default()
            .push_back(error);
        self
    }

    /// Next content request for `path` fails with `error`.
    pub fn fail_content(self, full_name: &str, path: &str, error: ApiError) -> Self {
        self.state()
            .content_errors
            .entry((full_name.to_string(), path.to_string()))
            .or_default()
            .push_back(error);
        self
    }

    /// Next `get_repository` call fails with `error`.
    pub fn fail_metadata(self, error: ApiError) -> Self {
        self.state().metadata_errors.push_back(error);
        self
    }

    /// Next `create_pull_request` call fails with `error`.
    pub fn fail_pull_request(self, error: ApiError) -> Self {
        self.state().pr_errors.push_back(error);
        self
    }

    pub fn calls(&self) -> Vec<Call> {
        self.state().calls.clone()
    }

    pub fn page_requests(&self) -> Vec<u32> {
        self.calls()
            .into_iter()
            .filter_map(|call| match call {
                Call::ListPage(page) => Some(page),
                _ => None,
            })
            .collect()
    }

    pub fn content_requests(&self, full_name: &str) -> Vec<String> {
        self.calls()
            .into_iter()
            .filter_map(|call| match call {
                Call::GetContent { repo, path } if repo == full_name => Some(path),
                _ => None,
            })
            .collect()
    }

    pub fn pull_requests(&self) -> Vec<PullRequestRequest> {
        self.state().pull_requests.clone()
    }
}

#[async_trait]
impl GitHubApi for FakeGitHub {
    async fn list_org_repositories(
        &self,
        _org: &str,
        page: u32,
    ) -> Result<RepositoryPage, ApiError> {
        let mut state = self.state();
        state.calls.push(Call::ListPage(page));

        if let Some(error) = state.page_errors.get_mut(&page).and_then(VecDeque::pop_front) {
            return Err(error);
        }

        let index = page.saturating_sub(1) as usize;
        let repositories = state.pages.get(index).cloned().unwrap_or_default();
        let next_page = (index + 1 < state.pages.len()).then_some(page + 1);
        let rate = state
            .page_rates
            .get_mut(&page)
            .and_then(VecDeque::pop_front)
            .unwrap_or_else(healthy_rate);

        Ok(RepositoryPage {
            repositories,
            next_page,
            rate: Some(rate),
        })
    }

    async fn get_content(
        &self,
        owner: &str,
        repo: &str,
        path: &str,
    ) -> Result<ContentResponse, ApiError> {
        let full_name = format!("{owner}/{repo}");
        let key = (full_name.clone(), path.to_string());
        let mut state = self.state();
        state.calls.push(Call::GetContent {
            repo: full_name.clone(),
            path: path.to_string(),
        });

        if let Some(error) = state.content_errors.get_mut(&key).and_then(VecDeque::pop_front) {
            return Err(error);
        }

        let content = match (state.raw_files.get(&key), state.files.get(&key)) {
            (Some(raw), _) => raw.clone(),
            (None, Some(text)) => FileContent::from_text(path, format!("sha-{path}"), text),
            (None, None) => {
                return Err(ApiError::NotFound {
                    resource: format!("{full_name}/{path}"),
                    rate: Some(healthy_rate()),
                })
            }
        };

        Ok(ContentResponse {
            content,
            rate: Some(healthy_rate()),
        })
    }

    async fn get_repository(
        &self,
        owner: &str,
        repo: &str,
    ) -> Result<RepositoryResponse, ApiError> {
        let full_name = format!("{owner}/{repo}");
        let mut state = self.state();
        state.calls.push(Call::GetRepository(full_name.clone()));

        if let Some(error) = state.metadata_errors.pop_front() {
            return Err(error);
        }

        match state.metadata.get(&full_name) {
            Some(repository) => Ok(RepositoryResponse {
                repository: repository.clone(),
                rate: Some(healthy_rate()),
            }),
            None => Err(ApiError::NotFound {
                resource: full_name,
                rate: None,
            }),
        }
    }

    async fn create_pull_request(
        &self,
        request: &PullRequestRequest,
    ) -> Result<CreatedPullRequest, ApiError> {
        let full_name = format!("{}/{}", request.owner, request.repo);
        let mut state = self.state();
        state.calls.push(Call::CreatePullRequest(full_name.clone()));

        if let Some(error) = state.pr_errors.pop_front() {
            return Err(error);
        }

        state.next_pr += 1;
        let number = state.next_pr;
        state.pull_requests.push(request.clone());

        Ok(CreatedPullRequest {
            number,
            url: format!("https://github.com/{full_name}/pull/{number}"),
        })
    }
}

/// A command seen by [`RecordingExecutor`].
#[derive(Debug, Clone)]
pub struct RecordedCommand {
    pub program: String,
    pub args: Vec<String>,
    pub cwd: Option<PathBuf>,
}

#[derive(Default)]
struct ExecutorState {
    commands: Vec<RecordedCommand>,
    staged: Vec<(String, String)>,
    fail_on: Option<(String, CommandOutput)>,
    spawn_error_on: Option<String>,
    block_path_on_clone: Option<String>,
    workspaces: Vec<PathBuf>,
}

/// Records git invocations instead of running them.
#[derive(Clone, Default)]
pub struct RecordingExecutor {
    state: Arc<Mutex<ExecutorState>>,
}

impl RecordingExecutor {
    pub fn new() -> Self {
        Self::default()
    }

    fn state(&self) -> std::sync::MutexGuard<'_, ExecutorState> {
        self.state.lock().unwrap_or_else(|e| e.into_inner())
    }

    /// `git <subcommand>` exits with status 1 and `output`.
    pub fn failing_on(self, subcommand: &str, output: &str) -> Self {
        self.state().fail_on = Some((subcommand.to_string(), CommandOutput::failed(1, output)));
        self
    }

    /// `git <subcommand>` cannot be spawned.
    pub fn spawn_error_on(self, subcommand: &str) -> Self {
        self.state().spawn_error_on = Some(subcommand.to_string());
        self
    }

    /// `git clone` leaves a directory where the file is to be written.
    pub fn block_path_on_clone(self, path: &str) -> Self {
        self.state().block_path_on_clone = Some(path.to_string());
        self
    }

    pub fn commands(&self) -> Vec<RecordedCommand> {
        self.state().commands.clone()
    }

    /// Git subcommands in invocation order.
    pub fn subcommands(&self) -> Vec<String> {
        self.commands()
            .into_iter()
            .filter_map(|command| command.args.first().cloned())
            .collect()
    }

    /// Files staged with `git add`, with their content at that moment.
    pub fn staged(&self) -> Vec<(String, String)> {
        self.state().staged.clone()
    }

    /// Clone targets seen so far.
    pub fn workspaces(&self) -> Vec<PathBuf> {
        self.state().workspaces.clone()
    }
}

#[async_trait]
impl GitExecutor for RecordingExecutor {
    async fn run(
        &self,
        program: &str,
        args: &[&str],
        cwd: Option<&Path>,
    ) -> std::io::Result<CommandOutput> {
        let mut state = self.state();
        state.commands.push(RecordedCommand {
            program: program.to_string(),
            args: args.iter().map(|a| a.to_string()).collect(),
            cwd: cwd.map(Path::to_path_buf),
        });

        let subcommand = args.first().copied().unwrap_or_default();

        if state.spawn_error_on.as_deref() == Some(subcommand) {
            return Err(std::io::Error::new(
                std::io::ErrorKind::NotFound,
                "git not installed",
            ));
        }

        if let Some((failing, output)) = &state.fail_on {
            if failing == subcommand {
                return Ok(output.clone());
            }
        }

        match subcommand {
            "clone" => {
                let target = PathBuf::from(args[2]);
                if let Some(blocked) = &state.block_path_on_clone {
                    std::fs::create_dir_all(target.join(blocked))?;
                }
                state.workspaces.push(target);
            }
            "add" => {
                if let Some(cwd) = cwd {
                    let path = args[1].to_string();
                    let content = std::fs::read_to_string(cwd.join(&path))?;
                    state.staged.push((path, content));
                }
            }
            _ => {}
        }

        Ok(CommandOutput::ok(""))
    }
}
