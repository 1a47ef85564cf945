//! CLI for the Renovate Org Updater.
//!
//! This tool scans a GitHub organization for `renovate.json` files that extend
//! presets from the old organization and opens pull requests moving them to
//! the new one.

use chrono::Local;
use clap::{Parser, ValueEnum};
use renovate_org_updater::{
    ProcessingResult, RunSummary, Runner, RunnerConfig, RunnerError, UpdateStatus,
    UpdaterSettings,
};
use std::fs::{self, File, OpenOptions};
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use std::sync::Mutex;
use tracing::{error, info};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

/// Renovate Org Updater - Move renovate.json presets to a new GitHub organization.
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// GitHub organization to scan.
    #[arg(long)]
    org: Option<String>,

    /// Process only this repository of the organization.
    #[arg(long)]
    repo: Option<String>,

    /// Preview changes without committing or opening PRs.
    #[arg(long)]
    dry_run: bool,

    /// GitHub Personal Access Token.
    #[arg(long, env = "GITHUB_TOKEN", hide_env_values = true)]
    token: String,

    /// GPG key ID used to sign commits.
    #[arg(long)]
    gpg_key: Option<String>,

    /// Path to a TOML settings file. Flags override its values.
    #[arg(long)]
    config: Option<PathBuf>,

    /// GitHub API base URL (GitHub Enterprise).
    #[arg(long)]
    api_url: Option<String>,

    /// SSH host used for clones and pushes.
    #[arg(long)]
    git_host: Option<String>,

    /// Directory receiving the run's log file.
    #[arg(long, default_value = "logs")]
    log_dir: PathBuf,

    /// Summary output format.
    #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
    output: OutputFormat,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
enum OutputFormat {
    Text,
    Json,
}

#[tokio::main]
async fn main() -> ExitCode {
    let args = Args::parse();

    // octocrab's TLS stack needs a process-wide crypto provider.
    let _ = rustls::crypto::aws_lc_rs::default_provider().install_default();

    init_tracing(&args.log_dir);

    let output = args.output;
    match run(args).await {
        Ok(summary) => {
            print_summary(&summary, output);

            if summary.has_failures() {
                ExitCode::from(1)
            } else {
                ExitCode::from(0)
            }
        }
        Err(e) => {
            error!(error = %e, "Critical failure");
            ExitCode::from(2)
        }
    }
}

/// Initializes tracing with environment filter support.
///
/// Events go to stdout in compact form and, when the log directory is
/// writable, to `<log_dir>/renovate-updater_<timestamp>.log` without ANSI
/// colors. `RUST_LOG` overrides the default `info` level.
fn init_tracing(log_dir: &Path) {
    let (file_layer, file_error) = match open_log_file(log_dir) {
        Ok(file) => (
            Some(
                fmt::layer()
                    .with_ansi(false)
                    .with_target(false)
                    .with_writer(Mutex::new(file)),
            ),
            None,
        ),
        Err(e) => (None, Some(e)),
    };

    tracing_subscriber::registry()
        .with(fmt::layer().compact().with_target(false))
        .with(file_layer)
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    if let Some(e) = file_error {
        error!(dir = %log_dir.display(), error = %e, "Failed to open log file, logging to stdout only");
    }
}

fn open_log_file(log_dir: &Path) -> std::io::Result<File> {
    fs::create_dir_all(log_dir)?;
    let name = format!(
        "renovate-updater_{}.log",
        Local::now().format("%Y-%m-%d_%H-%M-%S")
    );
    OpenOptions::new()
        .create(true)
        .append(true)
        .open(log_dir.join(name))
}

/// Main execution logic.
async fn run(args: Args) -> Result<RunSummary, RunnerError> {
    let (mut settings, origin) = match &args.config {
        Some(path) => (
            UpdaterSettings::load(path)?,
            path.display().to_string(),
        ),
        None => (UpdaterSettings::default(), "command line".to_string()),
    };

    if let Some(org) = args.org {
        settings.organization = org;
    }
    if let Some(repo) = args.repo {
        settings.repository = Some(repo);
    }
    if args.dry_run {
        settings.dry_run = true;
    }
    if let Some(key) = args.gpg_key {
        settings.signing_key = Some(key);
    }
    if let Some(url) = args.api_url {
        settings.api_url = Some(url);
    }
    if let Some(host) = args.git_host {
        settings.git_host = host;
    }

    let config = RunnerConfig::from_settings(settings, args.token, &origin)?;
    info!(
        org = %config.organization(),
        repo = ?config.repository(),
        dry_run = config.dry_run(),
        "Starting renovate config update"
    );

    let runner = Runner::new(config)?;
    runner.run().await
}

/// Prints the final run summary.
fn print_summary(summary: &RunSummary, output: OutputFormat) {
    match output {
        OutputFormat::Json => match serde_json::to_string_pretty(summary) {
            Ok(json) => println!("{json}"),
            Err(e) => error!(error = %e, "Failed to serialize summary"),
        },
        OutputFormat::Text => print_text_summary(summary),
    }
}

fn print_text_summary(summary: &RunSummary) {
    println!("\nSummary:");
    println!(
        "  Mode: {}",
        if summary.dry_run { "Dry Run" } else { "Live" }
    );
    println!("  Organization: {}", summary.organization);
    println!("  Pages fetched: {}", summary.pages_fetched);
    println!("  Repositories scanned: {}", summary.repositories_scanned);
    println!("  Repositories with renovate.json: {}", summary.repositories_matched);

    if summary.dry_run {
        println!("  Would update: {}", summary.would_update);
    } else {
        println!("  PRs created: {}", summary.prs_created);
    }
    println!("  Unchanged: {}", summary.unchanged);
    println!("  Skipped: {}", summary.skipped);
    println!("  Failed: {}", summary.failed);

    for result in &summary.results {
        match result {
            ProcessingResult::Processed(outcome) => match &outcome.status {
                UpdateStatus::PullRequestOpened { url, .. } => {
                    println!("  {} -> {url}", outcome.repository);
                }
                UpdateStatus::Failed { state, error } => {
                    println!("  {} failed while {state}: {error}", outcome.repository);
                }
                _ => {}
            },
            ProcessingResult::Skipped { repository, reason } => {
                println!("  {repository} skipped: {reason}");
            }
        }
    }
}
