mod common;

use common::{repo, server_error, Call, FakeGitHub, RecordingExecutor};
use renovate_org_updater::{
    CommitPublisher, ProcessingResult, Runner, RunnerConfig, RunnerError, WorkflowState,
};
use tempfile::TempDir;

fn acme() -> FakeGitHub {
    FakeGitHub::new()
        .with_page(vec![repo("Acme", "A"), repo("Acme", "B")])
        .with_page(vec![repo("Acme", "C")])
        .with_file(
            "Acme/B",
            "renovate.json",
            "{\"extends\": [\"github>MyOrg/lib\"]}",
        )
        .with_file(
            "Acme/C",
            ".github/renovate.json",
            "{\"extends\": [\"config:base\"]}",
        )
}

fn runner(
    config: RunnerConfig,
    api: FakeGitHub,
    root: &TempDir,
) -> (Runner<FakeGitHub, RecordingExecutor>, RecordingExecutor) {
    let executor = RecordingExecutor::new();
    let publisher = CommitPublisher::new(executor.clone()).with_temp_root(root.path());
    (Runner::with_parts(config, api, publisher), executor)
}

#[tokio::test]
async fn organization_run_updates_only_matching_repository() {
    let root = TempDir::new().unwrap();
    let (runner, executor) = runner(RunnerConfig::new("Acme", "token"), acme(), &root);

    let summary = runner.run().await.unwrap();

    assert_eq!(summary.organization, "Acme");
    assert_eq!(summary.pages_fetched, 2);
    assert_eq!(summary.repositories_scanned, 3);
    assert_eq!(summary.repositories_matched, 2);
    assert_eq!(summary.prs_created, 1);
    assert_eq!(summary.unchanged, 1);
    assert!(summary.all_success());

    // Only B is cloned, committed and pushed.
    let clones: Vec<_> = executor
        .commands()
        .into_iter()
        .filter(|c| c.args[0] == "clone")
        .map(|c| c.args[1].clone())
        .collect();
    assert_eq!(clones, vec!["git@github.com:Acme/B.git"]);
    assert_eq!(
        executor.staged(),
        vec![(
            "renovate.json".to_string(),
            "{\"extends\": [\"github>MyOtherOrg/lib\"]}".to_string()
        )]
    );

    let prs = runner.api().pull_requests();
    assert_eq!(prs.len(), 1);
    assert_eq!(prs[0].repo, "B");
    assert_eq!(prs[0].base, "main");

    let statuses: Vec<_> = summary
        .results
        .iter()
        .map(|result| match result {
            ProcessingResult::Processed(outcome) => {
                (outcome.repository.as_str(), outcome.status.as_str())
            }
            ProcessingResult::Skipped { repository, .. } => (repository.as_str(), "skipped"),
        })
        .collect();
    assert_eq!(
        statuses,
        vec![
            ("Acme/B", "pull_request_opened"),
            ("Acme/C", "no_match"),
        ]
    );
    assert!(std::fs::read_dir(root.path()).unwrap().next().is_none());
}

#[tokio::test]
async fn dry_run_reports_would_update_without_writes() {
    let root = TempDir::new().unwrap();
    let config = RunnerConfig::new("Acme", "token").with_dry_run(true);
    let (runner, executor) = runner(config, acme(), &root);

    let summary = runner.run().await.unwrap();

    assert!(summary.dry_run);
    assert_eq!(summary.would_update, 1);
    assert_eq!(summary.prs_created, 0);
    assert!(executor.commands().is_empty());
    assert!(runner.api().pull_requests().is_empty());
}

#[tokio::test]
async fn organization_run_contains_repository_failures() {
    let root = TempDir::new().unwrap();
    let api = acme()
        .with_file("Acme/A", "renovate.json", "{\"extends\": [\"github>MyOrg/a\"]}")
        .fail_pull_request(server_error("pulls"));
    let (runner, executor) = runner(RunnerConfig::new("Acme", "token"), api, &root);

    let summary = runner.run().await.unwrap();

    // A's pull request fails, B still gets one.
    assert_eq!(summary.failed, 1);
    assert_eq!(summary.prs_created, 1);
    assert!(summary.has_failures());
    assert_eq!(
        executor.subcommands().iter().filter(|s| *s == "push").count(),
        2
    );
}

#[tokio::test]
async fn listing_failure_is_fatal() {
    let root = TempDir::new().unwrap();
    let api = acme().fail_page(1, server_error("/orgs/Acme/repos"));
    let (runner, _) = runner(RunnerConfig::new("Acme", "token"), api, &root);

    let result = runner.run().await;

    assert!(matches!(result, Err(RunnerError::Discovery(_))));
}

#[tokio::test]
async fn single_repository_mode_processes_only_that_repository() {
    let root = TempDir::new().unwrap();
    let config = RunnerConfig::new("Acme", "token").with_repository("B");
    let (runner, _) = runner(config, acme(), &root);

    let summary = runner.run().await.unwrap();

    assert_eq!(summary.repositories_scanned, 1);
    assert_eq!(summary.prs_created, 1);
    assert!(!runner
        .api()
        .calls()
        .iter()
        .any(|call| matches!(call, Call::ListPage(_))));
}

#[tokio::test]
async fn single_repository_without_config_is_an_error() {
    let root = TempDir::new().unwrap();
    let config = RunnerConfig::new("Acme", "token").with_repository("A");
    let (runner, _) = runner(config, acme(), &root);

    let result = runner.run().await;

    assert!(matches!(
        result,
        Err(RunnerError::ConfigNotFound { repository }) if repository == "Acme/A"
    ));
}

#[tokio::test]
async fn single_repository_lookup_failure_is_an_error() {
    let root = TempDir::new().unwrap();
    let config = RunnerConfig::new("Acme", "token").with_repository("B");
    let api = acme().fail_metadata(server_error("/repos/Acme/B"));
    let (runner, _) = runner(config, api, &root);

    let result = runner.run().await;

    assert!(matches!(result, Err(RunnerError::Repository { .. })));
}

#[tokio::test]
async fn single_repository_update_failure_is_an_error() {
    let root = TempDir::new().unwrap();
    let config = RunnerConfig::new("Acme", "token").with_repository("B");
    let api = acme().fail_pull_request(server_error("pulls"));
    let (runner, _) = runner(config, api, &root);

    let result = runner.run().await;

    assert!(matches!(
        result,
        Err(RunnerError::Update {
            state: WorkflowState::OpeningPullRequest,
            ..
        })
    ));
}

#[tokio::test]
async fn signing_key_signs_the_commit() {
    let root = TempDir::new().unwrap();
    let config = RunnerConfig::new("Acme", "token").with_signing_key("ABC123");
    let (runner, executor) = runner(config, acme(), &root);

    let summary = runner.run().await.unwrap();

    assert_eq!(summary.prs_created, 1);
    let commands = executor.commands();
    assert!(commands
        .iter()
        .any(|c| c.args == ["config", "user.signingkey", "ABC123"]));
    let commit = commands.iter().find(|c| c.args[0] == "commit").unwrap();
    assert_eq!(commit.args.last().map(String::as_str), Some("-S"));
}
