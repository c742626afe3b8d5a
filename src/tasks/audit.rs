// src/tasks/audit.rs

//! `audit`: run the configured [`SiteAuditor`] over a site root.
//!
//! Before the auditor is invoked the explicit-check guard runs and the
//! include set may be narrowed to the HTML files the last build wrote.
//!
//! [`SiteAuditor`]: crate::services::SiteAuditor

use std::path::{Path, PathBuf};

use serde_json::{Map, Value};
use tracing::info;

use crate::config::StepOptions;
use crate::engine::ExecutionContext;
use crate::errors::{Result, SitepipeError};
use crate::policy::{AUDIT_CHECKS, ensure_explicit_checks};
use crate::report::{SummaryOptions, summarize_audit};
use crate::scope::{Scope, scope_from_build};
use crate::services::{AuditReport, AuditRequest, Services};
use crate::tasks::{EXCLUDE, INCLUDE, TaskInput, TaskOutput};

pub const SITE_ROOT: &[&str] = &["siteRoot", "root", "site"];
pub const RENDERED_CHECKS: &[&str] = &["renderedChecks", "checkRendered"];
pub const RENDERED_CHECKS_DEFAULT: bool = false;
pub const MAX_HTML_FILES: &[&str] = &["maxHtmlFiles", "maxFiles"];
pub const SCOPE_FROM_BUILD: &[&str] = &["scopeFromBuild", "scopeToBuild"];
pub const BASELINE: &[&str] = &["baseline", "baselinePath"];
pub const FAIL_ON_WARNINGS: &[&str] = &["failOnWarnings"];
pub const FAIL_ON_NEW_ISSUES: &[&str] = &["failOnNewIssues", "failOnNew"];

/// Site root for audit/optimize: the configured root, else the last
/// build's output directory.
pub fn site_root(options: &StepOptions, ctx: &ExecutionContext) -> Result<PathBuf> {
    if let Some(root) = options.get_path(SITE_ROOT)? {
        return Ok(ctx.resolve(root));
    }
    ctx.last_build_output.clone().ok_or_else(|| {
        SitepipeError::config(format!(
            "missing required option '{}' (and no earlier build step)",
            SITE_ROOT[0]
        ))
    })
}

/// Include patterns after carryover scoping. `None` means the narrowed set
/// is empty and the step has nothing to do.
pub fn scoped_include(
    options: &StepOptions,
    ctx: &ExecutionContext,
    root: &Path,
) -> Result<Option<Vec<String>>> {
    let include = options.get_list(INCLUDE)?;
    let requested = options.get_or(SCOPE_FROM_BUILD, false)?;
    match scope_from_build(ctx, root, &include, requested) {
        Scope::Configured => Ok(Some(include)),
        Scope::Narrowed(files) if files.is_empty() => Ok(None),
        Scope::Narrowed(files) => Ok(Some(files)),
    }
}

pub fn skip_message(task: &str, root: &Path) -> String {
    format!(
        "{task} skipped: the last build updated no HTML files under {}",
        root.display()
    )
}

/// What the audit step will do.
#[derive(Debug, Clone, PartialEq)]
pub enum AuditPlan {
    Run(AuditRequest),
    Skip(String),
}

/// Validate the options and build the auditor request.
pub fn plan(options: &StepOptions, ctx: &ExecutionContext) -> Result<AuditPlan> {
    ensure_explicit_checks(options)?;

    let root = site_root(options, ctx)?;
    let Some(include) = scoped_include(options, ctx, &root)? else {
        return Ok(AuditPlan::Skip(skip_message("audit", &root)));
    };

    let mut checks = Map::new();
    for check in &AUDIT_CHECKS {
        if let Some(enabled) = options.get::<bool>(&check.spellings())? {
            checks.insert(check.name.to_string(), Value::Bool(enabled));
        }
    }

    Ok(AuditPlan::Run(AuditRequest {
        site_root: root,
        include,
        exclude: options.get_list(EXCLUDE)?,
        checks,
        max_html_files: options.get_or(MAX_HTML_FILES, 0)?,
        rendered_checks: options.get_or(RENDERED_CHECKS, RENDERED_CHECKS_DEFAULT)?,
        baseline_path: options.get_path(BASELINE)?.map(|p| ctx.resolve(p)),
        fail_on_warnings: options.get_or(FAIL_ON_WARNINGS, false)?,
        fail_on_new_issues: options.get_or(FAIL_ON_NEW_ISSUES, false)?,
        options: options.as_map().clone(),
    }))
}

/// Run the auditor and summarise. A failed report becomes
/// [`SitepipeError::TaskFailed`] carrying the summary.
pub async fn execute(
    request: &AuditRequest,
    services: &Services,
    summary: &SummaryOptions,
) -> Result<(AuditReport, String)> {
    info!(
        root = %request.site_root.display(),
        include = request.include.len(),
        max_html_files = request.max_html_files,
        rendered_checks = request.rendered_checks,
        "auditing site"
    );
    let report = services.auditor.audit(request).await?;
    let line = summarize_audit(&report, summary);
    if report.success {
        Ok((report, line))
    } else {
        Err(SitepipeError::TaskFailed(line))
    }
}

pub async fn run(
    input: &TaskInput<'_>,
    ctx: &ExecutionContext,
    services: &Services,
) -> Result<TaskOutput> {
    let summary = SummaryOptions::from_options(input.options)?;
    match plan(input.options, ctx)? {
        AuditPlan::Skip(message) => {
            info!(step = %input.label, "{message}");
            Ok(TaskOutput::message(message))
        }
        AuditPlan::Run(request) => {
            let (_, line) = execute(&request, services, &summary).await?;
            Ok(TaskOutput::message(line))
        }
    }
}
