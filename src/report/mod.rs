// src/report/mod.rs

//! Per-step and whole-pipeline results, plus the summary builders that turn
//! large collaborator reports into bounded one-line messages.

pub mod summary;
pub mod warnings;

use serde::Serialize;

pub use summary::{
    SummaryOptions, summarize_audit, summarize_optimize, summarize_prune, summarize_tool,
};
pub use warnings::{WarningBucket, bucket_warnings, format_buckets};

/// Outcome of one step. Immutable once the handler has returned.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StepResult {
    pub label: String,
    pub task: String,
    pub success: bool,
    pub message: String,
}

impl StepResult {
    pub fn succeeded(label: &str, task: &str, message: impl Into<String>) -> Self {
        Self {
            label: label.to_string(),
            task: task.to_string(),
            success: true,
            message: message.into(),
        }
    }

    pub fn failed(label: &str, task: &str, message: impl Into<String>) -> Self {
        Self {
            label: label.to_string(),
            task: task.to_string(),
            success: false,
            message: message.into(),
        }
    }
}

/// Outcome of a whole run, folded from step results in execution order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PipelineResult {
    pub step_count: usize,
    pub success: bool,
    pub steps: Vec<StepResult>,
}

impl PipelineResult {
    pub fn from_steps(steps: Vec<StepResult>) -> Self {
        Self {
            step_count: steps.len(),
            success: steps.iter().all(|s| s.success),
            steps,
        }
    }

    /// Console rendering: one line per step plus a closing verdict.
    pub fn render_text(&self) -> String {
        let mut out = String::new();
        for (i, step) in self.steps.iter().enumerate() {
            let mark = if step.success { "ok" } else { "FAIL" };
            out.push_str(&format!(
                "[{:>2}] {mark:<4} {} ({}): {}\n",
                i + 1,
                step.label,
                step.task,
                step.message
            ));
        }
        out.push_str(&format!(
            "pipeline {} ({} step(s))\n",
            if self.success { "succeeded" } else { "failed" },
            self.step_count
        ));
        out
    }
}
