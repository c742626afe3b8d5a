// tests/summaries.rs

use serde_json::json;
use sitepipe::config::StepOptions;
use sitepipe::report::summary::{audit_headline, clamp_sample, sample_errors, sample_issues};
use sitepipe::report::warnings::{OTHER, UNCODED, warning_code};
use sitepipe::report::{
    PipelineResult, StepResult, SummaryOptions, WarningBucket, bucket_warnings, format_buckets,
    summarize_audit, summarize_optimize, summarize_prune,
};
use sitepipe::services::{AuditIssue, AuditReport, OptimizeReport, PruneReport};

fn bucket(code: &str, count: usize) -> WarningBucket {
    WarningBucket {
        code: code.to_string(),
        count,
    }
}

#[test]
fn warnings_bucket_by_leading_code() {
    let warnings = ["[A] x", "[A] y", "[B] z", "no-code w"];
    let buckets = bucket_warnings(&warnings, 1);
    assert_eq!(buckets, vec![bucket("A", 2), bucket(OTHER, 2)]);
    assert_eq!(format_buckets(&buckets), "A=2, OTHER=2");
}

#[test]
fn codes_are_case_insensitive_and_ties_alphabetical() {
    let warnings = ["[b] one", "[B] two", "[a] three", "[A] four", "plain"];
    let buckets = bucket_warnings(&warnings, 5);
    assert_eq!(
        buckets,
        vec![bucket("A", 2), bucket("B", 2), bucket(UNCODED, 1)]
    );
    assert_eq!(warning_code("  [seo-001] title"), Some("SEO-001".to_string()));
    assert_eq!(warning_code("[] empty"), None);
    assert_eq!(warning_code("text [X] later"), None);
}

#[test]
fn error_sample_is_clamped_and_truncated() {
    assert_eq!(clamp_sample(-3), 0);
    assert_eq!(clamp_sample(500), 50);
    assert_eq!(clamp_sample(7), 7);

    let errors: Vec<String> = (0..8).map(|i| format!("error {i}")).collect();
    assert_eq!(
        sample_errors(&errors, 2),
        "error 0 | error 1 | (+6 more)"
    );
    assert_eq!(sample_errors(&errors, 0), "");

    let long = vec!["e".repeat(400)];
    let sample = sample_errors(&long, 5);
    assert_eq!(sample.chars().count(), 160);
}

#[test]
fn blank_errors_are_not_counted_as_more() {
    let errors: Vec<String> = ["first", "", "  ", "second", "\n", "third"]
        .iter()
        .map(|e| e.to_string())
        .collect();
    assert_eq!(sample_errors(&errors, 2), "first | second | (+1 more)");
    assert_eq!(sample_errors(&errors, 3), "first | second | third");
}

#[test]
fn uncoded_bucket_competes_for_the_top_slots() {
    let warnings = ["plain one", "plain two", "plain three", "[A] x", "[B] y"];
    let buckets = bucket_warnings(&warnings, 1);
    assert_eq!(buckets, vec![bucket(UNCODED, 3), bucket(OTHER, 2)]);
}

#[test]
fn summary_options_read_step_settings() {
    let opts = StepOptions::from(
        json!({ "summaryMaxErrors": 99, "warningTopN": 2 })
            .as_object()
            .cloned()
            .unwrap(),
    );
    let summary = SummaryOptions::from_options(&opts).unwrap();
    assert_eq!(summary.max_errors, 50);
    assert_eq!(summary.warning_top_n, 2);
    assert_eq!(SummaryOptions::default().max_errors, 5);
}

#[test]
fn passing_audit_lists_only_nonzero_optional_counters() {
    let report = AuditReport {
        pages: 12,
        links: 80,
        assets: 9,
        broken_links: 0,
        nav_mismatches: 2,
        ..AuditReport::default()
    };
    let line = summarize_audit(&report, &SummaryOptions::default());
    assert_eq!(
        line,
        "audit passed: 12 pages, 80 links, 9 assets, 0 errors, 0 warnings, 2 nav mismatches"
    );
}

#[test]
fn failed_audit_prefers_non_gate_error_headline() {
    let report = AuditReport {
        success: false,
        pages: 2,
        errors: vec!["raw failure".to_string()],
        issues: vec![
            AuditIssue::new("error", "gate", None, "gate tripped"),
            AuditIssue::new("warning", "seo", Some("a.html"), "short title"),
            AuditIssue::new("error", "links", Some("b.html"), "broken link to /x"),
        ],
        ..AuditReport::default()
    };

    assert_eq!(audit_headline(&report).as_deref(), Some("broken link to /x"));
    let line = summarize_audit(&report, &SummaryOptions::default());
    assert!(line.starts_with("audit failed: broken link to /x;"), "{line}");
    assert!(line.contains("errors: raw failure"), "{line}");

    let issues = sample_issues(&report.issues, 5);
    assert_eq!(
        issues,
        vec![
            "[error] [links] b.html broken link to /x",
            "[error] [gate] gate tripped",
            "[warning] [seo] a.html short title",
        ]
    );
}

#[test]
fn headline_falls_back_to_raw_errors_then_any_issue() {
    let raw_only = AuditReport {
        success: false,
        errors: vec!["  ".to_string(), "first\nreal error".to_string()],
        issues: vec![AuditIssue::new("error", "gate", None, "gate")],
        ..AuditReport::default()
    };
    assert_eq!(audit_headline(&raw_only).as_deref(), Some("first real error"));

    let gate_only = AuditReport {
        success: false,
        issues: vec![AuditIssue::new("error", "gate", None, "gate tripped")],
        ..AuditReport::default()
    };
    assert_eq!(audit_headline(&gate_only).as_deref(), Some("gate tripped"));
}

#[test]
fn audit_summary_includes_warning_buckets() {
    let report = AuditReport {
        warnings: vec!["[A] x".into(), "[A] y".into(), "[B] z".into()],
        ..AuditReport::default()
    };
    let line = summarize_audit(
        &report,
        &SummaryOptions {
            max_errors: 5,
            warning_top_n: 1,
        },
    );
    assert!(line.ends_with("; warning codes: A=2, OTHER=1"), "{line}");
}

#[test]
fn optimize_and_prune_summaries() {
    let optimize = OptimizeReport {
        html_files: 4,
        css_files: 1,
        js_files: 2,
        bytes_saved: 1024,
        ..OptimizeReport::default()
    };
    assert_eq!(
        summarize_optimize(&optimize, &SummaryOptions::default()),
        "optimize done: 4 HTML, 1 CSS, 2 JS files, 1024 bytes saved"
    );

    let prune = PruneReport {
        scanned: 10,
        matched: 4,
        deleted: 0,
        kept: 6,
        dry_run: true,
        ..PruneReport::default()
    };
    assert_eq!(
        summarize_prune(&prune, &SummaryOptions::default()),
        "artifacts pruned: scanned 10, matched 4, deleted 0, kept 6 (dry run)"
    );
}

#[test]
fn pipeline_result_folds_steps() {
    let result = PipelineResult::from_steps(vec![
        StepResult::succeeded("Build", "build", "ok"),
        StepResult::failed("Audit", "audit", "bad"),
    ]);
    assert_eq!(result.step_count, 2);
    assert!(!result.success);

    let json = serde_json::to_value(&result).unwrap();
    assert_eq!(json["stepCount"], json!(2));
    assert_eq!(json["steps"][1]["message"], json!("bad"));
    assert!(result.render_text().contains("pipeline failed (2 step(s))"));
}
