// src/tasks/doctor.rs

//! `doctor`: optional version-pin verification followed by an audit, with
//! one combined summary.

use tracing::info;

use crate::engine::{ExecutionContext, TaskKind};
use crate::errors::{Result, SitepipeError};
use crate::report::{SummaryOptions, summarize_tool};
use crate::services::{Services, ToolRequest};
use crate::tasks::audit::{self, AuditPlan};
use crate::tasks::{TaskInput, TaskOutput};

pub const VERIFY: &[&str] = &["verify", "verifyPins", "checkPins"];

pub async fn run(
    input: &TaskInput<'_>,
    ctx: &ExecutionContext,
    services: &Services,
) -> Result<TaskOutput> {
    let options = input.options;
    let summary = SummaryOptions::from_options(options)?;
    // Guard and scope errors surface before anything runs.
    let plan = audit::plan(options, ctx)?;

    let mut parts = Vec::new();
    if options.get_or(VERIFY, false)? {
        let request = ToolRequest {
            task: TaskKind::Verify.as_str().to_string(),
            label: input.label.to_string(),
            base_directory: ctx.base_dir.clone(),
            mode: ctx.mode.clone(),
            fast: ctx.fast,
            options: options.as_map().clone(),
        };
        let outcome = services.tools.run(&request).await?;
        let line = summarize_tool("verify", &outcome, &summary);
        if !outcome.success {
            return Err(SitepipeError::TaskFailed(format!("doctor failed: {line}")));
        }
        parts.push(line);
    }

    match plan {
        AuditPlan::Skip(message) => parts.push(message),
        AuditPlan::Run(request) => match audit::execute(&request, services, &summary).await {
            Ok((_, line)) => parts.push(line),
            Err(SitepipeError::TaskFailed(line)) => {
                parts.push(line);
                return Err(SitepipeError::TaskFailed(format!(
                    "doctor failed: {}",
                    parts.join("; ")
                )));
            }
            Err(other) => return Err(other),
        },
    }

    info!(step = %input.label, "doctor finished");
    Ok(TaskOutput::message(format!("doctor ok: {}", parts.join("; "))))
}
