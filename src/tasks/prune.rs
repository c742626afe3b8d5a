// src/tasks/prune.rs

//! `github-artifacts-prune`: retention for remote build artifacts.

use tracing::info;

use crate::engine::ExecutionContext;
use crate::errors::{Result, SitepipeError};
use crate::report::{SummaryOptions, summarize_prune};
use crate::services::{PruneRequest, Services};
use crate::tasks::{EXCLUDE, INCLUDE, TaskInput, TaskOutput};

pub const REPOSITORY: &[&str] = &["repository", "repo"];
pub const TOKEN_ENV: &[&str] = &["tokenEnv", "tokenEnvVar"];
pub const API_BASE_URL: &[&str] = &["apiBaseUrl", "apiUrl"];
pub const KEEP_LATEST: &[&str] = &["keepLatest", "keep"];
pub const MAX_AGE_DAYS: &[&str] = &["maxAgeDays", "olderThanDays"];
pub const MAX_DELETE: &[&str] = &["maxDelete"];
pub const DRY_RUN: &[&str] = &["dryRun"];

pub const DEFAULT_TOKEN_ENV: &str = "GITHUB_TOKEN";
pub const DEFAULT_KEEP_LATEST: u32 = 5;

pub async fn run(
    input: &TaskInput<'_>,
    ctx: &ExecutionContext,
    services: &Services,
) -> Result<TaskOutput> {
    let options = input.options;
    let repository = options.require_string(REPOSITORY)?;
    if !repository.contains('/') {
        return Err(SitepipeError::config(format!(
            "option 'repository' must be 'owner/name' (got '{repository}')"
        )));
    }

    let token_env = options
        .get_string(TOKEN_ENV)?
        .unwrap_or_else(|| DEFAULT_TOKEN_ENV.to_string());
    let token = input.env.get(&token_env).map(str::to_string);

    let request = PruneRequest {
        repository,
        token,
        api_base_url: options.get_string(API_BASE_URL)?,
        keep_latest: options.get_or(KEEP_LATEST, DEFAULT_KEEP_LATEST)?,
        max_age_days: options.get(MAX_AGE_DAYS)?,
        include: options.get_list(INCLUDE)?,
        exclude: options.get_list(EXCLUDE)?,
        max_delete: options.get(MAX_DELETE)?,
        dry_run: options.get_or(DRY_RUN, false)?,
    };

    info!(
        repository = %request.repository,
        keep_latest = request.keep_latest,
        dry_run = request.dry_run,
        has_token = request.token.is_some(),
        mode = %ctx.mode,
        "pruning artifacts"
    );
    let report = services.pruner.prune(&request).await?;
    let line = summarize_prune(&report, &SummaryOptions::from_options(options)?);
    if report.success {
        Ok(TaskOutput::message(line))
    } else {
        Err(SitepipeError::TaskFailed(line))
    }
}
