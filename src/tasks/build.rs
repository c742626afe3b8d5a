// src/tasks/build.rs

//! `build`: render the site through the configured [`SiteBuilder`] and
//! record which files it wrote for later steps.
//!
//! [`SiteBuilder`]: crate::services::SiteBuilder

use std::collections::BTreeSet;
use std::path::PathBuf;

use tracing::{debug, info};

use crate::engine::{BuildCarryover, ExecutionContext};
use crate::errors::Result;
use crate::scope::DirSnapshot;
use crate::services::{BuildRequest, Services};
use crate::tasks::{TaskInput, TaskOutput};

pub const CONFIG: &[&str] = &["config", "configPath", "siteConfig"];
pub const SOURCE: &[&str] = &["source", "sourceDir", "input"];
pub const OUTPUT: &[&str] = &["output", "outputDir", "out"];
pub const BASE_URL: &[&str] = &["baseUrl", "siteUrl"];
pub const CLEAN: &[&str] = &["clean"];

/// Output directory when none is configured.
pub const DEFAULT_OUTPUT: &str = "_site";

pub async fn run(
    input: &TaskInput<'_>,
    ctx: &ExecutionContext,
    services: &Services,
) -> Result<TaskOutput> {
    let options = input.options;
    let output = ctx.resolve(
        options
            .get_string(OUTPUT)?
            .unwrap_or_else(|| DEFAULT_OUTPUT.to_string()),
    );
    let request = BuildRequest {
        config: options.get_path(CONFIG)?.map(|p| ctx.resolve(p)),
        source: match options.get_path(SOURCE)? {
            Some(p) => ctx.resolve(p),
            None => ctx.base_dir.clone(),
        },
        output: output.clone(),
        base_url: options.get_string(BASE_URL)?,
        clean: options.get_or(CLEAN, false)?,
        fast: ctx.fast,
        mode: ctx.mode.clone(),
        options: options.as_map().clone(),
    };

    let before = DirSnapshot::capture(&output)?;
    info!(
        source = %request.source.display(),
        output = %output.display(),
        fast = ctx.fast,
        "building site"
    );
    let outcome = services.builder.build(&request).await?;

    let output_dir = outcome
        .output_path
        .map(|p| ctx.resolve(p))
        .unwrap_or(output);

    let updated_files: BTreeSet<PathBuf> = match outcome.updated_files {
        Some(files) => files
            .into_iter()
            .map(|f| if f.is_absolute() { f } else { output_dir.join(f) })
            .collect(),
        None => {
            let after = DirSnapshot::capture(&output_dir)?;
            let changed = after.changed_since(&before);
            debug!(
                files = after.len(),
                changed = changed.len(),
                "builder did not report updated files; diffed output directory"
            );
            changed
        }
    };

    let mut message = match outcome.message.filter(|m| !m.trim().is_empty()) {
        Some(m) => m,
        None => format!("built {} pages into {}", outcome.pages, output_dir.display()),
    };
    message.push_str(&format!(" ({} files updated)", updated_files.len()));

    Ok(TaskOutput::with_carryover(
        message,
        BuildCarryover {
            output_dir,
            updated_files,
        },
    ))
}
