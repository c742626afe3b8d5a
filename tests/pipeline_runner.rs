// tests/pipeline_runner.rs

use sitepipe::engine::{ExecutionContext, HostEnv, Pipeline, TaskKind, UNKNOWN_TASK_MESSAGE};
use sitepipe::services::Services;
use sitepipe_test_utils::builders::{StepBuilder, context};
use sitepipe_test_utils::init_tracing;
use tempfile::TempDir;

fn pipeline() -> Pipeline {
    Pipeline::new(Services::unconfigured(), HostEnv::empty())
}

fn ok_step(label: &str) -> StepBuilder {
    StepBuilder::new("overlay")
        .label(label)
        .opt("source", "src")
        .opt("destination", "dst")
}

fn base_with_src() -> TempDir {
    let dir = TempDir::new().unwrap();
    std::fs::create_dir_all(dir.path().join("src")).unwrap();
    std::fs::write(dir.path().join("src/a.txt"), "a").unwrap();
    dir
}

#[test]
fn every_discriminator_round_trips() {
    assert_eq!(TaskKind::ALL.len(), 30);
    for kind in TaskKind::ALL {
        assert_eq!(kind.as_str().parse::<TaskKind>().unwrap(), *kind);
        assert_eq!(
            kind.as_str().to_uppercase().parse::<TaskKind>().unwrap(),
            *kind
        );
    }
    assert!("teleport".parse::<TaskKind>().is_err());
}

#[tokio::test]
async fn unknown_task_fails_and_aborts() {
    init_tracing();
    let dir = base_with_src();
    let steps = vec![
        StepBuilder::new("teleport").build(),
        ok_step("after").build(),
    ];

    let run = pipeline().run(&steps, context(dir.path())).await;

    assert!(!run.result.success);
    assert_eq!(run.result.step_count, 1);
    assert_eq!(run.result.steps[0].message, UNKNOWN_TASK_MESSAGE);
    assert_eq!(run.result.steps[0].task, "teleport");
    assert!(!dir.path().join("dst").exists());
}

#[tokio::test]
async fn continue_on_error_records_failure_and_proceeds() {
    init_tracing();
    let dir = base_with_src();
    let steps = vec![
        StepBuilder::new("teleport")
            .opt("continueOnError", true)
            .build(),
        ok_step("after").build(),
    ];

    let run = pipeline().run(&steps, context(dir.path())).await;

    assert!(!run.result.success);
    assert_eq!(run.result.step_count, 2);
    assert_eq!(run.result.step_count, run.result.steps.len());
    assert!(!run.result.steps[0].success);
    assert!(run.result.steps[1].success);
    assert!(dir.path().join("dst/a.txt").exists());
}

#[tokio::test]
async fn continue_on_failure_alias_is_honoured() {
    init_tracing();
    let dir = base_with_src();
    let steps = vec![
        StepBuilder::new("audit")
            .opt("siteRoot", "src")
            .opt("continue_on_failure", true)
            .build(),
        ok_step("after").build(),
    ];

    let run = pipeline().run(&steps, context(dir.path())).await;
    assert_eq!(run.result.step_count, 2);
    assert!(run.result.steps[0].message.contains("no auditor is configured"));
}

#[tokio::test]
async fn discriminators_match_case_insensitively() {
    init_tracing();
    let dir = base_with_src();
    let steps = vec![
        StepBuilder::new("OverLay")
            .opt("source", "src")
            .opt("destination", "dst")
            .build(),
    ];

    let run = pipeline().run(&steps, context(dir.path())).await;
    assert!(run.result.success, "{:?}", run.result);
    assert_eq!(run.result.steps[0].task, "OverLay");
}

#[tokio::test]
async fn results_follow_configuration_order() {
    init_tracing();
    let dir = base_with_src();
    let steps: Vec<_> = ["one", "two", "three"]
        .iter()
        .map(|l| ok_step(l).build())
        .collect();

    let run = pipeline().run(&steps, context(dir.path())).await;
    let labels: Vec<_> = run.result.steps.iter().map(|s| s.label.as_str()).collect();
    assert_eq!(labels, vec!["one", "two", "three"]);
    assert!(run.result.success);
    assert_eq!(run.result.step_count, 3);
}

#[tokio::test]
async fn config_errors_name_the_option() {
    init_tracing();
    let dir = TempDir::new().unwrap();
    let steps = vec![StepBuilder::new("hook").opt("command", "true").build()];

    let run = pipeline().run(&steps, context(dir.path())).await;
    assert!(!run.result.success);
    assert!(
        run.result.steps[0].message.contains("'event'"),
        "{}",
        run.result.steps[0].message
    );
}

#[cfg(unix)]
#[tokio::test]
async fn allow_failure_turns_nonzero_exit_into_success() {
    init_tracing();
    let dir = TempDir::new().unwrap();
    let steps = vec![
        StepBuilder::new("exec")
            .opt("command", "sh")
            .opt("args", serde_json::json!(["-c", "echo broken >&2; exit 2"]))
            .opt("allowFailure", true)
            .build(),
        StepBuilder::new("exec").opt("command", "true").build(),
    ];

    let run = pipeline().run(&steps, context(dir.path())).await;

    assert!(run.result.success, "{:?}", run.result);
    assert_eq!(run.result.step_count, 2);
    let message = &run.result.steps[0].message;
    assert!(message.contains("allowed failure"), "{message}");
    assert!(message.contains("broken"), "{message}");
}

#[cfg(unix)]
#[tokio::test]
async fn nonzero_exit_without_allow_failure_aborts() {
    init_tracing();
    let dir = TempDir::new().unwrap();
    let steps = vec![
        StepBuilder::new("exec")
            .opt("command", "sh")
            .opt("args", "-c 'exit 4'")
            .build(),
        StepBuilder::new("exec").opt("command", "true").build(),
    ];

    let run = pipeline().run(&steps, context(dir.path())).await;

    assert!(!run.result.success);
    assert_eq!(run.result.step_count, 1);
    assert!(run.result.steps[0].message.contains("exited with code 4"));
}

#[cfg(unix)]
#[tokio::test]
async fn allow_failure_does_not_cover_timeouts() {
    init_tracing();
    let dir = TempDir::new().unwrap();
    let steps = vec![
        StepBuilder::new("exec")
            .opt("command", "sleep")
            .opt("args", serde_json::json!(["5"]))
            .opt("timeoutSeconds", 1)
            .opt("allowFailure", true)
            .build(),
    ];

    let run = pipeline().run(&steps, context(dir.path())).await;

    assert!(!run.result.success);
    assert!(run.result.steps[0].message.contains("timed out"));
}

#[tokio::test]
async fn mode_defaults_follow_fast_flag() {
    let dir = TempDir::new().unwrap();
    assert_eq!(ExecutionContext::new(dir.path(), false, None).mode, "default");
    assert_eq!(ExecutionContext::new(dir.path(), true, None).mode, "fast");
    assert_eq!(
        ExecutionContext::new(dir.path(), true, Some("preview".into())).mode,
        "preview"
    );
}

#[tokio::test]
async fn malformed_runner_flags_fail_the_step_naming_the_option() {
    init_tracing();
    let dir = base_with_src();
    let steps = vec![
        ok_step("flaky").opt("allowFailure", "maybe").build(),
        ok_step("after").build(),
    ];

    let run = pipeline().run(&steps, context(dir.path())).await;

    assert!(!run.result.success);
    assert_eq!(run.result.step_count, 1);
    let message = &run.result.steps[0].message;
    assert!(message.contains("'allowFailure'"), "{message}");
    assert!(message.contains("a boolean"), "{message}");
    assert!(!dir.path().join("dst").exists());
}

#[tokio::test]
async fn malformed_continue_flag_is_not_treated_as_false_silently() {
    init_tracing();
    let dir = base_with_src();
    let steps = vec![
        ok_step("first").opt("continueOnError", "sometimes").build(),
        ok_step("after").build(),
    ];

    let run = pipeline().run(&steps, context(dir.path())).await;

    assert!(!run.result.success);
    assert_eq!(run.result.step_count, 1);
    let message = &run.result.steps[0].message;
    assert!(message.contains("'continueOnError'"), "{message}");
}
