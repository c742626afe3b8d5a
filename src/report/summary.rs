// src/report/summary.rs

//! One-line summaries of multi-faceted collaborator reports.

use crate::config::StepOptions;
use crate::errors::Result;
use crate::exec::preview::{flatten_newlines, truncate_chars};
use crate::report::warnings::{bucket_warnings, format_buckets};
use crate::services::{AuditIssue, AuditReport, OptimizeReport, PruneReport, ToolOutcome};

/// Upper bound for the error sample size.
pub const MAX_ERROR_SAMPLE: usize = 50;
/// Character budget per sampled error or issue.
pub const SAMPLE_ENTRY_CHARS: usize = 160;
/// Structured issues listed on failure.
pub const ISSUE_SAMPLE: usize = 5;

/// Knobs for summary size, read from the step options.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SummaryOptions {
    pub max_errors: usize,
    pub warning_top_n: usize,
}

impl Default for SummaryOptions {
    fn default() -> Self {
        Self {
            max_errors: 5,
            warning_top_n: 5,
        }
    }
}

impl SummaryOptions {
    pub fn from_options(options: &StepOptions) -> Result<Self> {
        let defaults = Self::default();
        let max_errors = options
            .get::<i64>(&["summaryMaxErrors", "maxErrors"])?
            .map(clamp_sample)
            .unwrap_or(defaults.max_errors);
        let warning_top_n = options
            .get::<i64>(&["warningTopN", "summaryTopWarnings"])?
            .map(|n| n.max(0) as usize)
            .unwrap_or(defaults.warning_top_n);
        Ok(Self {
            max_errors,
            warning_top_n,
        })
    }
}

/// Clamp a requested sample size to `[0, MAX_ERROR_SAMPLE]`.
pub fn clamp_sample(n: i64) -> usize {
    n.clamp(0, MAX_ERROR_SAMPLE as i64) as usize
}

/// Summarise an audit report into a single line.
///
/// Primary counters always appear; optional counters only when nonzero. A
/// failed report leads with the most likely root cause and appends bounded
/// error and issue samples.
pub fn summarize_audit(report: &AuditReport, opts: &SummaryOptions) -> String {
    let mut parts = vec![format!(
        "{} pages, {} links, {} assets, {} errors, {} warnings",
        report.pages,
        report.links,
        report.assets,
        report.error_count(),
        report.warning_count()
    )];

    let optional = [
        (report.broken_links, "broken links"),
        (report.missing_assets, "missing assets"),
        (report.nav_mismatches, "nav mismatches"),
        (report.new_issues, "new issues"),
    ];
    for (count, what) in optional {
        if count > 0 {
            parts.push(format!("{count} {what}"));
        }
    }

    let mut line = parts.join(", ");
    if !report.warnings.is_empty() && opts.warning_top_n > 0 {
        let buckets = bucket_warnings(&report.warnings, opts.warning_top_n);
        line.push_str(&format!("; warning codes: {}", format_buckets(&buckets)));
    }

    if report.success {
        return format!("audit passed: {line}");
    }

    let headline = audit_headline(report).unwrap_or_else(|| "audit gate failed".to_string());
    let mut out = format!("audit failed: {headline}; {line}");

    let errors = sample_errors(&report.errors, opts.max_errors);
    if !errors.is_empty() {
        out.push_str(&format!("; errors: {errors}"));
    }
    let issues = sample_issues(&report.issues, ISSUE_SAMPLE);
    if !issues.is_empty() {
        out.push_str(&format!("; issues: {}", issues.join(" | ")));
    }
    out
}

/// Most likely root cause of a failed audit.
///
/// Prefers the first error issue outside the `gate` category, then the first
/// raw error string, then any issue message.
pub fn audit_headline(report: &AuditReport) -> Option<String> {
    let clean = |s: &str| {
        let s = flatten_newlines(s);
        (!s.is_empty()).then(|| truncate_chars(&s, SAMPLE_ENTRY_CHARS))
    };

    report
        .issues
        .iter()
        .filter(|i| i.is_error() && !i.is_gate())
        .find_map(|i| clean(&i.message))
        .or_else(|| report.errors.iter().find_map(|e| clean(e.as_str())))
        .or_else(|| report.issues.iter().find_map(|i| clean(&i.message)))
}

/// At most `max` (clamped) errors, each truncated, joined with ` | `.
pub fn sample_errors(errors: &[String], max: usize) -> String {
    let max = max.min(MAX_ERROR_SAMPLE);
    let non_blank: Vec<String> = errors
        .iter()
        .map(|e| flatten_newlines(e))
        .filter(|e| !e.is_empty())
        .collect();
    let mut sample: Vec<String> = non_blank
        .iter()
        .take(max)
        .map(|e| truncate_chars(e, SAMPLE_ENTRY_CHARS))
        .collect();
    if sample.is_empty() {
        return String::new();
    }
    if non_blank.len() > sample.len() {
        sample.push(format!("(+{} more)", non_blank.len() - sample.len()));
    }
    sample.join(" | ")
}

/// Up to `max` issues formatted `[severity] [category] path message`, ordered
/// non-gate errors, gate errors, other non-gate issues, everything else.
pub fn sample_issues(issues: &[AuditIssue], max: usize) -> Vec<String> {
    let mut ordered: Vec<&AuditIssue> = issues.iter().collect();
    ordered.sort_by_key(|i| issue_tier(i));
    ordered
        .into_iter()
        .take(max)
        .map(|i| truncate_chars(&format_issue(i), SAMPLE_ENTRY_CHARS))
        .collect()
}

fn issue_tier(issue: &AuditIssue) -> u8 {
    match (issue.is_error(), issue.is_gate()) {
        (true, false) => 0,
        (true, true) => 1,
        (false, false) => 2,
        (false, true) => 3,
    }
}

pub fn format_issue(issue: &AuditIssue) -> String {
    let mut s = format!("[{}] [{}]", issue.severity, issue.category);
    if let Some(path) = issue.path.as_deref().filter(|p| !p.is_empty()) {
        s.push(' ');
        s.push_str(path);
    }
    s.push(' ');
    s.push_str(&flatten_newlines(&issue.message));
    s
}

pub fn summarize_optimize(report: &OptimizeReport, opts: &SummaryOptions) -> String {
    let mut parts = vec![format!(
        "{} HTML, {} CSS, {} JS files",
        report.html_files, report.css_files, report.js_files
    )];
    let optional = [
        (report.images_optimized, "images optimized"),
        (report.bytes_saved, "bytes saved"),
        (report.hashed_assets, "hashed assets"),
    ];
    for (count, what) in optional {
        if count > 0 {
            parts.push(format!("{count} {what}"));
        }
    }
    if !report.warnings.is_empty() {
        parts.push(format!("{} warnings", report.warnings.len()));
    }
    let line = parts.join(", ");

    if report.success {
        return format!("optimize done: {line}");
    }
    let headline = report
        .errors
        .iter()
        .map(|e| flatten_newlines(e))
        .find(|e| !e.is_empty())
        .map(|e| truncate_chars(&e, SAMPLE_ENTRY_CHARS))
        .unwrap_or_else(|| "optimizer reported failure".to_string());
    let mut out = format!("optimize failed: {headline}; {line}");
    let errors = sample_errors(&report.errors, opts.max_errors);
    if !errors.is_empty() {
        out.push_str(&format!("; errors: {errors}"));
    }
    out
}

pub fn summarize_prune(report: &PruneReport, opts: &SummaryOptions) -> String {
    let mut line = format!(
        "scanned {}, matched {}, deleted {}, kept {}",
        report.scanned, report.matched, report.deleted, report.kept
    );
    if report.failed > 0 {
        line.push_str(&format!(", failed {}", report.failed));
    }
    if report.dry_run {
        line.push_str(" (dry run)");
    }
    if report.success {
        return format!("artifacts pruned: {line}");
    }
    let mut out = format!("artifact prune failed: {line}");
    let errors = sample_errors(&report.errors, opts.max_errors);
    if !errors.is_empty() {
        out.push_str(&format!("; errors: {errors}"));
    }
    out
}

/// Summary of a generator tool's outcome.
pub fn summarize_tool(task: &str, outcome: &ToolOutcome, opts: &SummaryOptions) -> String {
    let mut out = outcome
        .message
        .as_deref()
        .map(flatten_newlines)
        .filter(|m| !m.is_empty())
        .unwrap_or_else(|| {
            if outcome.success {
                format!("{task} completed")
            } else {
                format!("{task} failed")
            }
        });
    if !outcome.warnings.is_empty() && opts.warning_top_n > 0 {
        let buckets = bucket_warnings(&outcome.warnings, opts.warning_top_n);
        out.push_str(&format!(
            "; {} warnings ({})",
            outcome.warnings.len(),
            format_buckets(&buckets)
        ));
    }
    if !outcome.success {
        let errors = sample_errors(&outcome.errors, opts.max_errors);
        if !errors.is_empty() {
            out.push_str(&format!("; errors: {errors}"));
        }
    }
    out
}
