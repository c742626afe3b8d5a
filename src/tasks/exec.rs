// src/tasks/exec.rs

//! `exec`: run an arbitrary command.

use tracing::info;

use crate::engine::ExecutionContext;
use crate::errors::Result;
use crate::exec::run_process;
use crate::exec::preview::output_preview;
use crate::tasks::{TaskInput, TaskOutput, command_spec, path_string};

pub async fn run(input: &TaskInput<'_>, ctx: &ExecutionContext) -> Result<TaskOutput> {
    let base_dir = path_string(&ctx.base_dir);
    let tokens = [("baseDir", base_dir.as_str()), ("mode", ctx.mode.as_str())];
    let spec = command_spec(input.options, ctx, &tokens)?
        .env("SITEPIPE_MODE", &ctx.mode)
        .env("SITEPIPE_BASEDIR", &base_dir);
    let command_line = spec.display_command();

    info!(step = %input.label, command = %command_line, "exec");
    let output = run_process(&spec).await?.into_success(&command_line)?;

    let mut message = format!("{command_line} exited 0");
    if let Some(excerpt) = output_preview("", &output.stdout_text()) {
        message.push_str(&format!(": {excerpt}"));
    }
    Ok(TaskOutput::message(message))
}
