// src/services/types.rs

//! Request and report shapes exchanged with the external collaborators.
//!
//! All of them are serde-friendly (camelCase) so the process bridge can pass
//! requests as JSON on stdin and parse reports from stdout. Report fields all
//! default, so a collaborator only has to emit what it knows.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BuildRequest {
    pub config: Option<PathBuf>,
    pub source: PathBuf,
    pub output: PathBuf,
    pub base_url: Option<String>,
    pub clean: bool,
    pub fast: bool,
    pub mode: String,
    /// Full step options, for builder-specific settings.
    pub options: Map<String, Value>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct BuildOutcome {
    /// Where the site was written; defaults to the requested output.
    pub output_path: Option<PathBuf>,
    /// Files written or modified. `None` lets the engine diff the output
    /// directory itself.
    pub updated_files: Option<Vec<PathBuf>>,
    pub pages: u64,
    pub message: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AuditRequest {
    pub site_root: PathBuf,
    pub include: Vec<String>,
    pub exclude: Vec<String>,
    /// Canonical check name to enabled flag.
    pub checks: Map<String, Value>,
    /// 0 means unlimited.
    pub max_html_files: i64,
    pub rendered_checks: bool,
    pub baseline_path: Option<PathBuf>,
    pub fail_on_warnings: bool,
    pub fail_on_new_issues: bool,
    pub options: Map<String, Value>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct AuditIssue {
    pub severity: String,
    pub category: String,
    pub path: Option<String>,
    pub message: String,
}

impl AuditIssue {
    pub fn new(severity: &str, category: &str, path: Option<&str>, message: &str) -> Self {
        Self {
            severity: severity.to_string(),
            category: category.to_string(),
            path: path.map(str::to_string),
            message: message.to_string(),
        }
    }

    pub fn is_error(&self) -> bool {
        self.severity.eq_ignore_ascii_case("error")
    }

    pub fn is_warning(&self) -> bool {
        self.severity.eq_ignore_ascii_case("warning") || self.severity.eq_ignore_ascii_case("warn")
    }

    /// Issue raised by the aggregate pass/fail gate rather than a rule.
    pub fn is_gate(&self) -> bool {
        self.category.eq_ignore_ascii_case("gate")
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct AuditReport {
    pub success: bool,
    pub pages: u64,
    pub links: u64,
    pub assets: u64,
    pub errors: Vec<String>,
    pub warnings: Vec<String>,
    pub issues: Vec<AuditIssue>,
    pub broken_links: u64,
    pub missing_assets: u64,
    pub nav_mismatches: u64,
    pub new_issues: u64,
}

impl Default for AuditReport {
    fn default() -> Self {
        Self {
            success: true,
            pages: 0,
            links: 0,
            assets: 0,
            errors: Vec::new(),
            warnings: Vec::new(),
            issues: Vec::new(),
            broken_links: 0,
            missing_assets: 0,
            nav_mismatches: 0,
            new_issues: 0,
        }
    }
}

impl AuditReport {
    pub fn error_count(&self) -> usize {
        let issue_errors = self.issues.iter().filter(|i| i.is_error()).count();
        self.errors.len().max(issue_errors)
    }

    pub fn warning_count(&self) -> usize {
        let issue_warnings = self.issues.iter().filter(|i| i.is_warning()).count();
        self.warnings.len().max(issue_warnings)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OptimizeRequest {
    pub site_root: PathBuf,
    pub include: Vec<String>,
    pub exclude: Vec<String>,
    pub minify_html: bool,
    pub minify_css: bool,
    pub minify_js: bool,
    pub optimize_images: bool,
    pub hash_assets: bool,
    pub cache_headers: bool,
    /// 0 means unlimited.
    pub max_html_files: i64,
    pub options: Map<String, Value>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct OptimizeReport {
    pub success: bool,
    pub html_files: u64,
    pub css_files: u64,
    pub js_files: u64,
    pub images_optimized: u64,
    pub bytes_saved: u64,
    pub hashed_assets: u64,
    pub errors: Vec<String>,
    pub warnings: Vec<String>,
}

impl Default for OptimizeReport {
    fn default() -> Self {
        Self {
            success: true,
            html_files: 0,
            css_files: 0,
            js_files: 0,
            images_optimized: 0,
            bytes_saved: 0,
            hashed_assets: 0,
            errors: Vec::new(),
            warnings: Vec::new(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PruneRequest {
    /// `owner/name`.
    pub repository: String,
    pub token: Option<String>,
    pub api_base_url: Option<String>,
    pub keep_latest: u32,
    pub max_age_days: Option<u32>,
    pub include: Vec<String>,
    pub exclude: Vec<String>,
    pub max_delete: Option<u32>,
    pub dry_run: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct PruneReport {
    pub success: bool,
    pub scanned: u64,
    pub matched: u64,
    pub deleted: u64,
    pub kept: u64,
    pub failed: u64,
    pub dry_run: bool,
    pub errors: Vec<String>,
}

impl Default for PruneReport {
    fn default() -> Self {
        Self {
            success: true,
            scanned: 0,
            matched: 0,
            deleted: 0,
            kept: 0,
            failed: 0,
            dry_run: false,
            errors: Vec::new(),
        }
    }
}

/// Request for the generator tools (sitemap, apidocs, llms, ...).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ToolRequest {
    pub task: String,
    pub label: String,
    pub base_directory: PathBuf,
    pub mode: String,
    pub fast: bool,
    pub options: Map<String, Value>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ToolOutcome {
    pub success: bool,
    pub message: Option<String>,
    pub warnings: Vec<String>,
    pub errors: Vec<String>,
}

impl Default for ToolOutcome {
    fn default() -> Self {
        Self {
            success: true,
            message: None,
            warnings: Vec::new(),
            errors: Vec::new(),
        }
    }
}

impl ToolOutcome {
    pub fn ok(message: impl Into<String>) -> Self {
        Self {
            message: Some(message.into()),
            ..Self::default()
        }
    }
}
