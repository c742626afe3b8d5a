// src/scope/carryover.rs

//! Narrowing audit/optimize scope to the files the last build changed.

use std::path::Path;

use tracing::{debug, info};

use crate::engine::ExecutionContext;
use crate::scope::patterns::is_html_file;

/// Decision for a step's include patterns.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Scope {
    /// Use the step's own include/exclude patterns.
    Configured,
    /// Restrict to these HTML files written by the last build.
    Narrowed(Vec<String>),
}

/// Decide whether a step rooted at `root` may reuse the last build's
/// updated-file set.
///
/// Narrowing only happens when the step has no explicit include, scoping is
/// requested (explicitly, or implied by fast mode), and `root` is the very
/// directory the last build wrote to.
pub fn scope_from_build(
    ctx: &ExecutionContext,
    root: &Path,
    explicit_include: &[String],
    scope_requested: bool,
) -> Scope {
    if !explicit_include.is_empty() {
        return Scope::Configured;
    }
    if !(scope_requested || ctx.fast) {
        return Scope::Configured;
    }
    if !ctx.is_last_build_output(root) {
        debug!(
            root = %root.display(),
            last_build = ?ctx.last_build_output,
            "root differs from last build output; not narrowing scope"
        );
        return Scope::Configured;
    }

    let files: Vec<String> = ctx
        .last_build_updated
        .iter()
        .filter(|p| is_html_file(p))
        .map(|p| p.to_string_lossy().into_owned())
        .collect();

    info!(
        root = %root.display(),
        html_files = files.len(),
        "narrowing scope to files updated by the last build"
    );
    Scope::Narrowed(files)
}
