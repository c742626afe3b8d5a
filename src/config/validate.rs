// src/config/validate.rs

use crate::config::model::{PipelineDocument, PipelineStep, RawPipelineDocument, ToolCommand};
use crate::config::options::StepOptions;
use crate::errors::{Result, SitepipeError};

impl TryFrom<RawPipelineDocument> for PipelineDocument {
    type Error = SitepipeError;

    fn try_from(raw: RawPipelineDocument) -> std::result::Result<Self, Self::Error> {
        ensure_has_steps(&raw)?;
        validate_tools(&raw)?;
        let steps = resolve_steps(raw.steps)?;
        Ok(PipelineDocument::new_unchecked(steps, raw.tools))
    }
}

/// Validate a raw document without consuming it.
pub fn validate_document(raw: &RawPipelineDocument) -> Result<()> {
    ensure_has_steps(raw)?;
    validate_tools(raw)?;
    resolve_steps(raw.steps.clone()).map(|_| ())
}

fn ensure_has_steps(raw: &RawPipelineDocument) -> Result<()> {
    if raw.steps.is_empty() {
        return Err(SitepipeError::config(
            "pipeline must contain at least one step",
        ));
    }
    Ok(())
}

fn validate_tools(raw: &RawPipelineDocument) -> Result<()> {
    let tools = &raw.tools;
    let roles: [(&str, Option<&ToolCommand>); 5] = [
        ("builder", tools.builder.as_ref()),
        ("auditor", tools.auditor.as_ref()),
        ("optimizer", tools.optimizer.as_ref()),
        ("pruner", tools.pruner.as_ref()),
        ("site", tools.site.as_ref()),
    ];
    for (role, tool) in roles {
        if let Some(tool) = tool {
            if tool.command.trim().is_empty() {
                return Err(SitepipeError::config(format!(
                    "tools.{role}.command must not be empty"
                )));
            }
        }
    }
    Ok(())
}

fn resolve_steps(raw_steps: Vec<crate::config::model::RawStep>) -> Result<Vec<PipelineStep>> {
    raw_steps
        .into_iter()
        .enumerate()
        .map(|(index, raw)| {
            let task = raw
                .task
                .map(|t| t.trim().to_string())
                .filter(|t| !t.is_empty())
                .ok_or_else(|| {
                    SitepipeError::config(format!("step {} is missing 'task'", index + 1))
                })?;
            let label = raw
                .label
                .map(|l| l.trim().to_string())
                .filter(|l| !l.is_empty())
                .unwrap_or_else(|| task.clone());
            Ok(PipelineStep::new(task, label, StepOptions::from(raw.options)))
        })
        .collect()
}
