// src/tasks/overlay.rs

//! `overlay`: copy a directory tree onto another, filtered by globs.

use anyhow::Context;
use tracing::{debug, info};

use crate::engine::ExecutionContext;
use crate::errors::{Result, SitepipeError};
use crate::scope::patterns::relative_slash_path;
use crate::scope::{PathFilter, collect_matching_files};
use crate::tasks::{EXCLUDE, INCLUDE, TaskInput, TaskOutput};

pub const SOURCE: &[&str] = &["source", "from", "src"];
pub const DESTINATION: &[&str] = &["destination", "to", "dest", "output"];
pub const OVERWRITE: &[&str] = &["overwrite"];

pub fn run(input: &TaskInput<'_>, ctx: &ExecutionContext) -> Result<TaskOutput> {
    let options = input.options;
    let source = ctx.resolve(options.require_string(SOURCE)?);
    let destination = ctx.resolve(options.require_string(DESTINATION)?);
    let overwrite = options.get_or(OVERWRITE, true)?;

    if !source.is_dir() {
        return Err(SitepipeError::Precondition(format!(
            "overlay source not found: {}",
            source.display()
        )));
    }

    let filter = PathFilter::new(&options.get_list(INCLUDE)?, &options.get_list(EXCLUDE)?)?;
    let files = collect_matching_files(&source, &filter)?;

    let mut copied = 0usize;
    let mut skipped = 0usize;
    for file in &files {
        let Some(rel) = relative_slash_path(&source, file) else {
            continue;
        };
        let target = destination.join(&rel);
        if target.exists() && !overwrite {
            debug!(file = %rel, "target exists; skipping");
            skipped += 1;
            continue;
        }
        if let Some(parent) = target.parent() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("creating {}", parent.display()))?;
        }
        std::fs::copy(file, &target)
            .with_context(|| format!("copying {} to {}", file.display(), target.display()))?;
        copied += 1;
    }

    info!(
        source = %source.display(),
        destination = %destination.display(),
        copied,
        skipped,
        "overlay applied"
    );
    let mut message = format!(
        "overlay copied {copied} files from {} to {}",
        source.display(),
        destination.display()
    );
    if skipped > 0 {
        message.push_str(&format!(" ({skipped} existing files kept)"));
    }
    Ok(TaskOutput::message(message))
}
