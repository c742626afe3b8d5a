// src/tasks/hook.rs

//! `hook`: run a user script at a named pipeline event.

use serde::Serialize;
use tracing::{debug, info};

use crate::engine::ExecutionContext;
use crate::errors::Result;
use crate::exec::run_process;
use crate::tasks::{TaskInput, TaskOutput, command_spec, path_string, utc_now, write_file, write_json};

pub const EVENT: &[&str] = &["event", "hookEvent"];
pub const CONTEXT_PATH: &[&str] = &["contextPath", "contextFile"];
pub const STDOUT_PATH: &[&str] = &["stdoutPath", "stdoutFile"];
pub const STDERR_PATH: &[&str] = &["stderrPath", "stderrFile"];

pub const ENV_EVENT: &str = "SITEPIPE_HOOK_EVENT";
pub const ENV_LABEL: &str = "SITEPIPE_HOOK_LABEL";
pub const ENV_MODE: &str = "SITEPIPE_HOOK_MODE";
pub const ENV_WORKDIR: &str = "SITEPIPE_HOOK_WORKDIR";
pub const ENV_BASEDIR: &str = "SITEPIPE_HOOK_BASEDIR";
pub const ENV_ID: &str = "SITEPIPE_HOOK_ID";
pub const ENV_CONTEXT: &str = "SITEPIPE_HOOK_CONTEXT";

/// Payload written to `contextPath` before the hook starts.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HookContext {
    pub event: String,
    pub label: String,
    pub step_id: String,
    pub mode: String,
    pub base_directory: String,
    pub working_directory: String,
    pub utc: String,
}

pub async fn run(input: &TaskInput<'_>, ctx: &ExecutionContext) -> Result<TaskOutput> {
    let options = input.options;
    let event = options.require_string(EVENT)?;
    let step_id = input.step_id()?;
    let base_dir = path_string(&ctx.base_dir);

    let tokens = [
        ("baseDir", base_dir.as_str()),
        ("event", event.as_str()),
        ("label", input.label),
        ("mode", ctx.mode.as_str()),
    ];
    let mut spec = command_spec(options, ctx, &tokens)?;
    let work_dir = path_string(&spec.working_dir);

    spec = spec
        .env(ENV_EVENT, &event)
        .env(ENV_LABEL, input.label)
        .env(ENV_MODE, &ctx.mode)
        .env(ENV_WORKDIR, &work_dir)
        .env(ENV_BASEDIR, &base_dir);
    if options.contains(crate::tasks::STEP_ID) {
        spec = spec.env(ENV_ID, &step_id);
    }

    if let Some(path) = options.get_path(CONTEXT_PATH)? {
        let path = ctx.resolve(path);
        let payload = HookContext {
            event: event.clone(),
            label: input.label.to_string(),
            step_id: step_id.clone(),
            mode: ctx.mode.clone(),
            base_directory: base_dir.clone(),
            working_directory: work_dir.clone(),
            utc: utc_now(),
        };
        write_json(&path, &payload)?;
        debug!(event = %event, path = %path.display(), "hook context written");
        spec = spec.env(ENV_CONTEXT, path_string(&path));
    }

    let command_line = spec.display_command();
    info!(event = %event, step_id = %step_id, command = %command_line, "running hook");
    let output = run_process(&spec).await?;

    if let Some(path) = options.get_path(STDOUT_PATH)? {
        write_file(&ctx.resolve(path), &output.stdout)?;
    }
    if let Some(path) = options.get_path(STDERR_PATH)? {
        write_file(&ctx.resolve(path), &output.stderr)?;
    }

    let output = output.into_success(&command_line)?;
    Ok(TaskOutput::message(format!(
        "hook '{event}' completed (exit {})",
        output.exit_code
    )))
}
