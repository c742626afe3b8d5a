// tests/handlers.rs

use std::sync::Arc;

use serde_json::json;
use sitepipe::engine::{HostEnv, Pipeline, TaskKind};
use sitepipe::errors::SitepipeError;
use sitepipe::services::{AuditIssue, AuditReport, PruneReport, Services, ToolOutcome};
use sitepipe::tasks::dotnet::dotnet_args;
use sitepipe::tasks::git::repo_dir_name;
use sitepipe::tasks::{doctor, overlay, prune, tool};
use sitepipe_test_utils::builders::{StepBuilder, context, task_input};
use sitepipe_test_utils::fakes::{FakeAuditor, FakePruner, FakeSiteTool};
use sitepipe_test_utils::{init_tracing, read, write_tree};
use tempfile::TempDir;

fn overlay_fixture() -> TempDir {
    let dir = TempDir::new().unwrap();
    write_tree(
        dir.path(),
        &[
            ("theme/css/site.css", "new css"),
            ("theme/favicon.ico", "icon"),
            ("theme/drafts/note.md", "draft"),
        ],
    );
    dir
}

#[test]
fn overlay_copies_filtered_tree() {
    init_tracing();
    let dir = overlay_fixture();
    let opts = StepBuilder::new("overlay")
        .opt("source", "theme")
        .opt("destination", "_site")
        .opt("exclude", json!(["drafts/**"]))
        .options();
    let env = HostEnv::empty();

    let out = overlay::run(
        &task_input(TaskKind::Overlay, "theme", &opts, &env),
        &context(dir.path()),
    )
    .unwrap();

    assert!(out.message.starts_with("overlay copied 2 files"), "{}", out.message);
    assert_eq!(read(dir.path(), "_site/css/site.css"), "new css");
    assert!(dir.path().join("_site/favicon.ico").exists());
    assert!(!dir.path().join("_site/drafts").exists());
}

#[test]
fn overlay_without_overwrite_keeps_existing_files() {
    init_tracing();
    let dir = overlay_fixture();
    write_tree(dir.path(), &[("_site/css/site.css", "built css")]);
    let opts = StepBuilder::new("overlay")
        .opt("source", "theme")
        .opt("destination", "_site")
        .opt("include", json!(["css/**", "*.ico"]))
        .opt("overwrite", false)
        .options();
    let env = HostEnv::empty();

    let out = overlay::run(
        &task_input(TaskKind::Overlay, "theme", &opts, &env),
        &context(dir.path()),
    )
    .unwrap();

    assert!(out.message.ends_with("(1 existing files kept)"), "{}", out.message);
    assert_eq!(read(dir.path(), "_site/css/site.css"), "built css");
    assert!(dir.path().join("_site/favicon.ico").exists());
}

#[test]
fn overlay_missing_source_is_a_precondition_failure() {
    let dir = TempDir::new().unwrap();
    let opts = StepBuilder::new("overlay")
        .opt("source", "nowhere")
        .opt("destination", "_site")
        .options();
    let env = HostEnv::empty();

    let err = overlay::run(
        &task_input(TaskKind::Overlay, "theme", &opts, &env),
        &context(dir.path()),
    )
    .unwrap_err();
    assert!(matches!(err, SitepipeError::Precondition(_)));
}

#[test]
fn dotnet_arguments_follow_the_options() {
    let dir = TempDir::new().unwrap();
    let ctx = context(dir.path());
    let opts = StepBuilder::new("dotnet-publish")
        .opt("project", "src/App/App.csproj")
        .opt("framework", "net8.0")
        .opt("runtime", "linux-x64")
        .opt("output", "publish")
        .opt("args", json!(["--self-contained"]))
        .options();

    let args = dotnet_args(TaskKind::DotnetPublish, &opts, &ctx).unwrap();
    let project = dir.path().join("src/App/App.csproj");
    let output = dir.path().join("publish");
    assert_eq!(
        args,
        vec![
            "publish".to_string(),
            project.to_string_lossy().into_owned(),
            "-c".into(),
            "Release".into(),
            "--nologo".into(),
            "-f".into(),
            "net8.0".into(),
            "-r".into(),
            "linux-x64".into(),
            "-o".into(),
            output.to_string_lossy().into_owned(),
            "--self-contained".into(),
        ]
    );

    let build = StepBuilder::new("dotnet-build")
        .opt("project", "App.sln")
        .opt("configuration", "Debug")
        .options();
    let args = dotnet_args(TaskKind::DotnetBuild, &build, &ctx).unwrap();
    assert_eq!(args[0], "build");
    assert_eq!(args[2..5], ["-c", "Debug", "--nologo"]);

    let missing = StepBuilder::new("dotnet-build").options();
    assert!(matches!(
        dotnet_args(TaskKind::DotnetBuild, &missing, &ctx),
        Err(SitepipeError::ConfigError(_))
    ));
}

#[test]
fn repository_directory_names() {
    assert_eq!(repo_dir_name("https://github.com/acme/docs.git"), "docs");
    assert_eq!(repo_dir_name("https://github.com/acme/docs/"), "docs");
    assert_eq!(repo_dir_name("git@github.com:acme/theme.git"), "theme");
    assert_eq!(repo_dir_name("/srv/mirrors/site"), "site");
}

#[tokio::test]
async fn prune_reads_the_token_from_the_host_environment() {
    init_tracing();
    let dir = TempDir::new().unwrap();
    let pruner = Arc::new(FakePruner::new(PruneReport {
        scanned: 9,
        matched: 3,
        deleted: 3,
        kept: 6,
        ..PruneReport::default()
    }));
    let log = Arc::clone(&pruner.requests);
    let services = Services::unconfigured().with_pruner(pruner);
    let opts = StepBuilder::new("github-artifacts-prune")
        .opt("repository", "acme/docs")
        .opt("tokenEnv", "DOCS_TOKEN")
        .opt("include", json!(["site-*"]))
        .options();
    let env = HostEnv::from_pairs([("DOCS_TOKEN", "s3cret"), ("GITHUB_TOKEN", "other")]);

    let out = prune::run(
        &task_input(TaskKind::GithubArtifactsPrune, "prune", &opts, &env),
        &context(dir.path()),
        &services,
    )
    .await
    .unwrap();

    assert_eq!(
        out.message,
        "artifacts pruned: scanned 9, matched 3, deleted 3, kept 6"
    );
    let requests = log.lock().unwrap();
    assert_eq!(requests[0].token.as_deref(), Some("s3cret"));
    assert_eq!(requests[0].keep_latest, 5);
    assert_eq!(requests[0].include, vec!["site-*"]);
    assert!(!requests[0].dry_run);
}

#[tokio::test]
async fn prune_rejects_malformed_repository() {
    let dir = TempDir::new().unwrap();
    let opts = StepBuilder::new("github-artifacts-prune")
        .opt("repository", "docs")
        .options();
    let env = HostEnv::empty();

    let err = prune::run(
        &task_input(TaskKind::GithubArtifactsPrune, "prune", &opts, &env),
        &context(dir.path()),
        &Services::unconfigured(),
    )
    .await
    .unwrap_err();
    assert!(err.to_string().contains("owner/name"), "{err}");
}

#[tokio::test]
async fn tool_summary_includes_warning_buckets() {
    init_tracing();
    let dir = TempDir::new().unwrap();
    let site_tool = Arc::new(FakeSiteTool::new(ToolOutcome {
        message: Some("sitemap: 42 urls".to_string()),
        warnings: vec!["[LOC] a".into(), "[LOC] b".into(), "plain".into()],
        ..ToolOutcome::default()
    }));
    let log = Arc::clone(&site_tool.requests);
    let services = Services::unconfigured().with_tools(site_tool);
    let opts = StepBuilder::new("sitemap").opt("baseUrl", "https://x").options();
    let env = HostEnv::empty();

    let out = tool::run(
        &task_input(TaskKind::Sitemap, "Sitemap", &opts, &env),
        &context(dir.path()),
        &services,
    )
    .await
    .unwrap();

    assert_eq!(
        out.message,
        "sitemap: 42 urls; 3 warnings (LOC=2, UNCODED=1)"
    );
    let requests = log.lock().unwrap();
    assert_eq!(requests[0].task, "sitemap");
    assert_eq!(requests[0].label, "Sitemap");
    assert_eq!(requests[0].options.get("baseUrl"), Some(&json!("https://x")));
}

#[tokio::test]
async fn failing_tool_is_a_task_failure() {
    let dir = TempDir::new().unwrap();
    let services = Services::unconfigured().with_tools(Arc::new(FakeSiteTool::new(ToolOutcome {
        success: false,
        errors: vec!["feed missing".into()],
        ..ToolOutcome::default()
    })));
    let opts = StepBuilder::new("llms").options();
    let env = HostEnv::empty();

    let err = tool::run(
        &task_input(TaskKind::Llms, "llms", &opts, &env),
        &context(dir.path()),
        &services,
    )
    .await
    .unwrap_err();
    assert!(matches!(err, SitepipeError::TaskFailed(_)));
    assert_eq!(err.to_string(), "llms failed; errors: feed missing");
}

#[tokio::test]
async fn doctor_combines_verify_and_audit() {
    init_tracing();
    let dir = TempDir::new().unwrap();
    let services = Services::unconfigured()
        .with_tools(Arc::new(FakeSiteTool::new(ToolOutcome::ok("pins ok"))))
        .with_auditor(Arc::new(FakeAuditor::passing()));
    let opts = StepBuilder::new("doctor")
        .opt("siteRoot", ".")
        .opt("verify", true)
        .options();
    let env = HostEnv::empty();

    let out = doctor::run(
        &task_input(TaskKind::Doctor, "doctor", &opts, &env),
        &context(dir.path()),
        &services,
    )
    .await
    .unwrap();

    assert_eq!(
        out.message,
        "doctor ok: pins ok; audit passed: 3 pages, 10 links, 4 assets, 0 errors, 0 warnings"
    );
}

#[tokio::test]
async fn doctor_stops_when_verification_fails() {
    init_tracing();
    let dir = TempDir::new().unwrap();
    let auditor = Arc::new(FakeAuditor::passing());
    let audit_log = Arc::clone(&auditor.requests);
    let services = Services::unconfigured()
        .with_tools(Arc::new(FakeSiteTool::new(ToolOutcome {
            success: false,
            message: Some("pin drift: theme".into()),
            ..ToolOutcome::default()
        })))
        .with_auditor(auditor);
    let opts = StepBuilder::new("doctor")
        .opt("siteRoot", ".")
        .opt("verify", true)
        .options();
    let env = HostEnv::empty();

    let err = doctor::run(
        &task_input(TaskKind::Doctor, "doctor", &opts, &env),
        &context(dir.path()),
        &services,
    )
    .await
    .unwrap_err();

    assert_eq!(err.to_string(), "doctor failed: pin drift: theme");
    assert!(audit_log.lock().unwrap().is_empty());
}

#[tokio::test]
async fn doctor_reports_audit_failure() {
    init_tracing();
    let dir = TempDir::new().unwrap();
    let services = Services::unconfigured().with_auditor(Arc::new(FakeAuditor::new(AuditReport {
        success: false,
        issues: vec![AuditIssue::new("error", "links", Some("a.html"), "dead link")],
        ..AuditReport::default()
    })));
    let opts = StepBuilder::new("doctor").opt("siteRoot", ".").options();
    let env = HostEnv::empty();

    let err = doctor::run(
        &task_input(TaskKind::Doctor, "doctor", &opts, &env),
        &context(dir.path()),
        &services,
    )
    .await
    .unwrap_err();

    let message = err.to_string();
    assert!(message.starts_with("doctor failed: audit failed: dead link"), "{message}");
}

#[tokio::test]
async fn unconfigured_collaborators_name_the_missing_tool() {
    init_tracing();
    let dir = TempDir::new().unwrap();
    let steps = vec![
        StepBuilder::new("sitemap")
            .opt("continueOnError", true)
            .build(),
        StepBuilder::new("build").build(),
    ];

    let run = Pipeline::new(Services::unconfigured(), HostEnv::empty())
        .run(&steps, context(dir.path()))
        .await;

    assert!(!run.result.success);
    assert_eq!(run.result.step_count, 2);
    assert!(
        run.result.steps[0].message.contains("tools.site"),
        "{}",
        run.result.steps[0].message
    );
    assert!(
        run.result.steps[1].message.contains("no builder is configured"),
        "{}",
        run.result.steps[1].message
    );
}
