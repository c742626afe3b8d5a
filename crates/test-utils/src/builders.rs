#![allow(dead_code)]

use std::path::Path;

use serde_json::{Map, Value};
use sitepipe::config::{
    PipelineDocument, PipelineStep, RawPipelineDocument, RawStep, StepOptions, ToolCommand,
    ToolsSection,
};
use sitepipe::engine::{ExecutionContext, HostEnv, TaskKind};
use sitepipe::tasks::TaskInput;

/// Builder for `PipelineStep` to simplify test setup.
pub struct StepBuilder {
    task: String,
    label: Option<String>,
    options: Map<String, Value>,
}

impl StepBuilder {
    pub fn new(task: &str) -> Self {
        Self {
            task: task.to_string(),
            label: None,
            options: Map::new(),
        }
    }

    pub fn label(mut self, label: &str) -> Self {
        self.label = Some(label.to_string());
        self
    }

    pub fn opt(mut self, key: &str, value: impl Into<Value>) -> Self {
        self.options.insert(key.to_string(), value.into());
        self
    }

    pub fn options(&self) -> StepOptions {
        StepOptions::from(self.options.clone())
    }

    pub fn raw(self) -> RawStep {
        RawStep {
            task: Some(self.task),
            label: self.label,
            options: self.options,
        }
    }

    pub fn build(self) -> PipelineStep {
        let label = self.label.clone().unwrap_or_else(|| self.task.clone());
        PipelineStep::new(self.task, label, StepOptions::from(self.options))
    }
}

/// Builder for a validated `PipelineDocument`.
#[derive(Default)]
pub struct DocumentBuilder {
    raw: RawPipelineDocument,
}

impl DocumentBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn step(mut self, step: StepBuilder) -> Self {
        self.raw.steps.push(step.raw());
        self
    }

    pub fn tools(mut self, tools: ToolsSection) -> Self {
        self.raw.tools = tools;
        self
    }

    pub fn auditor(mut self, command: &str) -> Self {
        self.raw.tools.auditor = Some(ToolCommand::new(command));
        self
    }

    pub fn build(self) -> PipelineDocument {
        PipelineDocument::try_from(self.raw).expect("Failed to build valid document from builder")
    }
}

/// Context rooted at `base_dir`, normal mode.
pub fn context(base_dir: &Path) -> ExecutionContext {
    ExecutionContext::new(base_dir, false, None)
}

/// Context rooted at `base_dir`, fast mode.
pub fn fast_context(base_dir: &Path) -> ExecutionContext {
    ExecutionContext::new(base_dir, true, None)
}

/// Handler input for direct handler tests.
pub fn task_input<'a>(
    kind: TaskKind,
    label: &'a str,
    options: &'a StepOptions,
    env: &'a HostEnv,
) -> TaskInput<'a> {
    TaskInput {
        index: 0,
        kind,
        label,
        options,
        env,
    }
}
