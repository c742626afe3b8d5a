// tests/properties.rs

use std::path::PathBuf;

use proptest::prelude::*;
use serde_json::{Map, Value, json};
use sitepipe::config::{StepOptions, normalize_key};
use sitepipe::engine::{TaskKind, paths_equal};
use sitepipe::policy::apply_fast_mode;
use sitepipe::report::bucket_warnings;
use sitepipe::report::summary::{MAX_ERROR_SAMPLE, clamp_sample};

fn warning() -> impl Strategy<Value = String> {
    prop_oneof![
        "\\[[A-Ca-c]\\] [a-z ]{0,12}",
        "[a-z ]{0,12}",
    ]
}

fn fast_options() -> impl Strategy<Value = StepOptions> {
    (
        proptest::option::of(any::<bool>()),
        proptest::option::of(0i64..5_000),
        proptest::option::of(any::<bool>()),
        proptest::option::of(any::<bool>()),
    )
        .prop_map(|(rendered, max, images, respect)| {
            let mut map = Map::new();
            if let Some(v) = rendered {
                map.insert("renderedChecks".into(), json!(v));
            }
            if let Some(v) = max {
                map.insert("maxHtmlFiles".into(), json!(v));
            }
            if let Some(v) = images {
                map.insert("optimizeImages".into(), json!(v));
            }
            if let Some(v) = respect {
                map.insert("fastRespectExplicit".into(), Value::Bool(v));
            }
            StepOptions::from(map)
        })
}

proptest! {
    #[test]
    fn normalize_key_is_idempotent(key in "[A-Za-z_-]{0,24}") {
        let once = normalize_key(&key);
        prop_assert_eq!(normalize_key(&once), once.clone());
        prop_assert!(!once.contains('-') && !once.contains('_'));
    }

    #[test]
    fn bucketing_preserves_the_total(
        warnings in proptest::collection::vec(warning(), 0..40),
        top_n in 0usize..6,
    ) {
        let buckets = bucket_warnings(&warnings, top_n);
        let total: usize = buckets.iter().map(|b| b.count).sum();
        prop_assert_eq!(total, warnings.len());
        prop_assert!(buckets.len() <= top_n + 1);
    }

    #[test]
    fn clamped_sample_stays_in_range(n in any::<i64>()) {
        let clamped = clamp_sample(n);
        prop_assert!(clamped <= MAX_ERROR_SAMPLE);
        if (0..=MAX_ERROR_SAMPLE as i64).contains(&n) {
            prop_assert_eq!(clamped as i64, n);
        }
    }

    #[test]
    fn path_comparison_ignores_case_and_trailing_separator(
        segments in proptest::collection::vec("[a-zA-Z0-9]{1,8}", 1..5),
    ) {
        let path = PathBuf::from(format!("/{}", segments.join("/")));
        let upper = PathBuf::from(format!("/{}/", segments.join("/").to_uppercase()));
        prop_assert!(paths_equal(&path, &path));
        prop_assert!(paths_equal(&path, &upper));
    }

    #[test]
    fn fast_mode_is_idempotent(options in fast_options()) {
        let mut options = options;
        for kind in [TaskKind::Audit, TaskKind::Optimize, TaskKind::SeoDoctor] {
            apply_fast_mode(kind, &mut options).unwrap();
            let settled = options.clone();
            let again = apply_fast_mode(kind, &mut options).unwrap();
            prop_assert!(again.is_empty());
            prop_assert_eq!(&options, &settled);
        }
    }
}
