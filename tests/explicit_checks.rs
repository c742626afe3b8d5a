// tests/explicit_checks.rs

use std::sync::Arc;

use serde_json::json;
use sitepipe::config::StepOptions;
use sitepipe::engine::{HostEnv, Pipeline};
use sitepipe::errors::SitepipeError;
use sitepipe::policy::{AUDIT_CHECKS, ensure_explicit_checks, missing_explicit_checks};
use sitepipe::services::Services;
use sitepipe_test_utils::builders::{StepBuilder, context};
use sitepipe_test_utils::fakes::FakeAuditor;
use sitepipe_test_utils::init_tracing;
use tempfile::TempDir;

fn options(value: serde_json::Value) -> StepOptions {
    StepOptions::from(value.as_object().cloned().unwrap())
}

#[test]
fn guard_is_off_by_default() {
    assert!(ensure_explicit_checks(&options(json!({}))).is_ok());
    assert_eq!(missing_explicit_checks(&options(json!({}))).len(), 6);
}

#[test]
fn missing_checks_are_listed_in_canonical_order() {
    let opts = options(json!({
        "requireExplicitChecks": true,
        "checkLinks": true,
        "checkAssets": false,
        "checkNavigation": true
    }));

    assert_eq!(
        missing_explicit_checks(&opts),
        vec!["checkTitles", "checkIds", "checkStructure"]
    );
    match ensure_explicit_checks(&opts) {
        Err(SitepipeError::ConfigError(msg)) => {
            assert!(msg.contains("checkTitles, checkIds, checkStructure"), "{msg}");
            assert!(!msg.contains("checkLinks"));
        }
        other => panic!("expected ConfigError, got {other:?}"),
    }
}

#[test]
fn aliases_satisfy_the_guard() {
    let opts = options(json!({
        "requireExplicitChecks": true,
        "check_links": true,
        "checkAssets": true,
        "checkNavigation": false,
        "checkTitles": true,
        "checkDuplicateIds": true,
        "checkHtmlStructure": false
    }));
    assert!(missing_explicit_checks(&opts).is_empty());
    assert!(ensure_explicit_checks(&opts).is_ok());
}

#[test]
fn canonical_checks_are_the_expected_six() {
    let names: Vec<_> = AUDIT_CHECKS.iter().map(|c| c.name).collect();
    assert_eq!(
        names,
        vec![
            "checkLinks",
            "checkAssets",
            "checkNav",
            "checkTitles",
            "checkIds",
            "checkStructure"
        ]
    );
}

#[tokio::test]
async fn auditor_is_not_invoked_when_the_guard_fails() {
    init_tracing();
    let dir = TempDir::new().unwrap();
    let auditor = Arc::new(FakeAuditor::passing());
    let log = Arc::clone(&auditor.requests);
    let services = Services::unconfigured().with_auditor(auditor);

    let steps = vec![
        StepBuilder::new("audit")
            .opt("siteRoot", ".")
            .opt("requireExplicitChecks", true)
            .opt("checkLinks", true)
            .build(),
    ];
    let run = Pipeline::new(services, HostEnv::empty())
        .run(&steps, context(dir.path()))
        .await;

    assert!(!run.result.success);
    assert!(run.result.steps[0].message.contains("checkAssets"));
    assert!(log.lock().unwrap().is_empty());
}

#[tokio::test]
async fn explicit_checks_are_forwarded_under_canonical_names() {
    init_tracing();
    let dir = TempDir::new().unwrap();
    let auditor = Arc::new(FakeAuditor::passing());
    let log = Arc::clone(&auditor.requests);
    let services = Services::unconfigured().with_auditor(auditor);

    let steps = vec![
        StepBuilder::new("audit")
            .opt("siteRoot", ".")
            .opt("checkDuplicateIds", false)
            .opt("checkLinks", true)
            .build(),
    ];
    let run = Pipeline::new(services, HostEnv::empty())
        .run(&steps, context(dir.path()))
        .await;
    assert!(run.result.success, "{:?}", run.result);

    let requests = log.lock().unwrap();
    assert_eq!(requests[0].checks.get("checkIds"), Some(&json!(false)));
    assert_eq!(requests[0].checks.get("checkLinks"), Some(&json!(true)));
    assert!(requests[0].checks.get("checkNav").is_none());
}
