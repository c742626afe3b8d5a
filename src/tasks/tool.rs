// src/tasks/tool.rs

//! Generator tools (sitemap, apidocs, llms, changelog, ...) behind
//! [`SiteTool`]. The engine passes the step through and summarises.
//!
//! [`SiteTool`]: crate::services::SiteTool

use tracing::info;

use crate::engine::ExecutionContext;
use crate::errors::{Result, SitepipeError};
use crate::report::{SummaryOptions, summarize_tool};
use crate::services::{Services, ToolRequest};
use crate::tasks::{TaskInput, TaskOutput};

pub async fn run(
    input: &TaskInput<'_>,
    ctx: &ExecutionContext,
    services: &Services,
) -> Result<TaskOutput> {
    let request = ToolRequest {
        task: input.kind.as_str().to_string(),
        label: input.label.to_string(),
        base_directory: ctx.base_dir.clone(),
        mode: ctx.mode.clone(),
        fast: ctx.fast,
        options: input.options.as_map().clone(),
    };

    info!(step = %input.label, task = %input.kind, "running site tool");
    let outcome = services.tools.run(&request).await?;
    let summary = SummaryOptions::from_options(input.options)?;
    let line = summarize_tool(input.kind.as_str(), &outcome, &summary);
    if outcome.success {
        Ok(TaskOutput::message(line))
    } else {
        Err(SitepipeError::TaskFailed(line))
    }
}
