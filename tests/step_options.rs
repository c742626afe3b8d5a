use serde_json::json;
use sitepipe::config::{StepOptions, normalize_key};
use sitepipe::errors::SitepipeError;

fn options(value: serde_json::Value) -> StepOptions {
    StepOptions::from(value.as_object().cloned().unwrap())
}

#[test]
fn keys_match_across_case_and_separators() {
    assert_eq!(normalize_key("timeoutSeconds"), "timeoutseconds");
    assert_eq!(normalize_key("timeout-seconds"), "timeoutseconds");
    assert_eq!(normalize_key("TIMEOUT_SECONDS"), "timeoutseconds");

    let opts = options(json!({ "timeout-seconds": 30 }));
    assert_eq!(opts.get::<i64>(&["timeoutSeconds"]).unwrap(), Some(30));
}

#[test]
fn first_present_alias_wins() {
    let opts = options(json!({ "checkRendered": true, "other": 1 }));
    assert_eq!(
        opts.get::<bool>(&["renderedChecks", "checkRendered"]).unwrap(),
        Some(true)
    );

    let both = options(json!({ "checkRendered": true, "renderedChecks": false }));
    assert_eq!(
        both.get::<bool>(&["renderedChecks", "checkRendered"]).unwrap(),
        Some(false)
    );
}

#[test]
fn null_values_count_as_absent() {
    let opts = options(json!({ "maxHtmlFiles": null }));
    assert!(!opts.contains(&["maxHtmlFiles"]));
    assert_eq!(opts.get_or(&["maxHtmlFiles"], 7i64).unwrap(), 7);
}

#[test]
fn bools_and_ints_are_coerced_from_strings() {
    let opts = options(json!({ "a": "yes", "b": "off", "c": " 42 ", "d": 0 }));
    assert_eq!(opts.get::<bool>(&["a"]).unwrap(), Some(true));
    assert_eq!(opts.get::<bool>(&["b"]).unwrap(), Some(false));
    assert_eq!(opts.get::<i64>(&["c"]).unwrap(), Some(42));
    assert_eq!(opts.get::<bool>(&["d"]).unwrap(), Some(false));
}

#[test]
fn lists_accept_arrays_and_delimited_strings() {
    let opts = options(json!({
        "include": ["a/**", "b/*.html"],
        "exclude": "tmp/**, drafts/**;old/**"
    }));
    assert_eq!(opts.get_list(&["include"]).unwrap(), vec!["a/**", "b/*.html"]);
    assert_eq!(
        opts.get_list(&["exclude"]).unwrap(),
        vec!["tmp/**", "drafts/**", "old/**"]
    );
    assert!(opts.get_list(&["missing"]).unwrap().is_empty());
}

#[test]
fn wrong_type_is_a_config_error_naming_the_option() {
    let opts = options(json!({ "timeoutSeconds": "soon" }));
    match opts.get::<i64>(&["timeoutSeconds"]) {
        Err(SitepipeError::ConfigError(msg)) => {
            assert!(msg.contains("timeoutSeconds"), "{msg}");
            assert!(msg.contains("integer"), "{msg}");
        }
        other => panic!("expected ConfigError, got {other:?}"),
    }
}

#[test]
fn required_blank_string_is_missing() {
    let opts = options(json!({ "event": "   " }));
    match opts.require_string(&["event"]) {
        Err(SitepipeError::ConfigError(msg)) => assert!(msg.contains("'event'")),
        other => panic!("expected ConfigError, got {other:?}"),
    }
}

#[test]
fn set_replaces_existing_spelling() {
    let mut opts = options(json!({ "max_html_files": 0 }));
    opts.set("maxHtmlFiles", json!(200));
    assert_eq!(opts.as_map().len(), 1);
    assert_eq!(opts.as_map()["max_html_files"], json!(200));
}
