// tests/bridge.rs
#![cfg(unix)]

use serde_json::{Value, json};
use sitepipe::config::{ToolCommand, ToolsSection};
use sitepipe::engine::{HostEnv, Pipeline};
use sitepipe::errors::SitepipeError;
use sitepipe::services::{ProcessBridge, SiteTool, Services, ToolOutcome, ToolRequest};
use sitepipe_test_utils::builders::{StepBuilder, context};
use sitepipe_test_utils::{init_tracing, read, with_timeout};
use tempfile::TempDir;

/// `sh -c <script> bridge <task>`: the task arrives as `$1`.
fn shell_tool(script: &str) -> ToolCommand {
    ToolCommand {
        command: "sh".to_string(),
        args: vec!["-c".to_string(), script.to_string(), "bridge".to_string()],
        timeout_seconds: Some(5),
    }
}

fn tool_request(dir: &TempDir) -> ToolRequest {
    ToolRequest {
        task: "sitemap".to_string(),
        label: "Sitemap".to_string(),
        base_directory: dir.path().to_path_buf(),
        mode: "default".to_string(),
        fast: false,
        options: json!({ "baseUrl": "https://docs.example" })
            .as_object()
            .cloned()
            .unwrap(),
    }
}

#[tokio::test]
async fn request_goes_to_stdin_and_report_comes_back() {
    init_tracing();
    let dir = TempDir::new().unwrap();
    let bridge = ProcessBridge::new(
        "site",
        shell_tool(r#"cat > request.json; printf '{"message":"%s done","warnings":["[W1] x"]}' "$1""#),
        dir.path(),
    );

    let outcome = with_timeout(bridge.run(&tool_request(&dir))).await.unwrap();

    assert_eq!(
        outcome,
        ToolOutcome {
            success: true,
            message: Some("sitemap done".to_string()),
            warnings: vec!["[W1] x".to_string()],
            errors: Vec::new(),
        }
    );
    let sent: Value = serde_json::from_str(&read(dir.path(), "request.json")).unwrap();
    assert_eq!(sent["task"], json!("sitemap"));
    assert_eq!(sent["label"], json!("Sitemap"));
    assert_eq!(sent["options"]["baseUrl"], json!("https://docs.example"));
    assert_eq!(sent["fast"], json!(false));
}

#[tokio::test]
async fn unparseable_report_is_a_task_failure() {
    init_tracing();
    let dir = TempDir::new().unwrap();
    let bridge = ProcessBridge::new("site", shell_tool("cat >/dev/null; echo not-json"), dir.path());

    let err = with_timeout(bridge.run(&tool_request(&dir)))
        .await
        .unwrap_err();
    assert!(matches!(err, SitepipeError::TaskFailed(_)));
    assert!(err.to_string().contains("invalid report for sitemap"), "{err}");
}

#[tokio::test]
async fn nonzero_exit_is_a_process_failure() {
    init_tracing();
    let dir = TempDir::new().unwrap();
    let bridge = ProcessBridge::new(
        "site",
        shell_tool("cat >/dev/null; echo 'tool crashed' >&2; exit 7"),
        dir.path(),
    );

    let err = with_timeout(bridge.run(&tool_request(&dir)))
        .await
        .unwrap_err();
    assert!(matches!(err, SitepipeError::ProcessFailed { exit_code: 7, .. }));
    assert!(err.to_string().contains("tool crashed"), "{err}");
}

#[tokio::test]
async fn configured_tools_are_wired_into_the_pipeline() {
    init_tracing();
    let dir = TempDir::new().unwrap();
    let tools = ToolsSection {
        site: Some(shell_tool(
            r#"cat >/dev/null; printf '{"message":"%s ok"}' "$1""#,
        )),
        ..ToolsSection::default()
    };
    let services = Services::from_tools(&tools, dir.path());
    let steps = vec![
        StepBuilder::new("llms").build(),
        StepBuilder::new("indexnow").build(),
    ];

    let run = with_timeout(
        Pipeline::new(services, HostEnv::empty()).run(&steps, context(dir.path())),
    )
    .await;

    assert!(run.result.success, "{:?}", run.result);
    assert_eq!(run.result.steps[0].message, "llms ok");
    assert_eq!(run.result.steps[1].message, "indexnow ok");
}
