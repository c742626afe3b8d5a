// src/config/model.rs

use serde::Deserialize;
use serde_json::{Map, Value};

use crate::config::options::StepOptions;

/// Pipeline document as read from disk, before validation.
///
/// Accepted shapes:
///
/// ```json
/// [
///   { "task": "build", "config": "site.json", "out": "_site" },
///   { "task": "audit", "label": "Audit site", "siteRoot": "_site" }
/// ]
/// ```
///
/// or an object with `steps` plus an optional `tools` section:
///
/// ```toml
/// [tools.auditor]
/// command = "site-auditor"
///
/// [[steps]]
/// task = "audit"
/// siteRoot = "_site"
/// ```
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum DocumentShape {
    Steps(Vec<RawStep>),
    Full(RawPipelineDocument),
}

impl From<DocumentShape> for RawPipelineDocument {
    fn from(shape: DocumentShape) -> Self {
        match shape {
            DocumentShape::Steps(steps) => RawPipelineDocument {
                steps,
                tools: ToolsSection::default(),
            },
            DocumentShape::Full(doc) => doc,
        }
    }
}

#[derive(Debug, Clone, Deserialize, Default)]
pub struct RawPipelineDocument {
    #[serde(default)]
    pub steps: Vec<RawStep>,

    #[serde(default)]
    pub tools: ToolsSection,
}

/// One step object. Every key other than `task` and `label` is an option.
#[derive(Debug, Clone, Deserialize, Default)]
pub struct RawStep {
    #[serde(default)]
    pub task: Option<String>,

    #[serde(default)]
    pub label: Option<String>,

    #[serde(flatten)]
    pub options: Map<String, Value>,
}

/// External commands backing the collaborator interfaces.
///
/// Any role left empty is reported as "not configured" when a step needs it.
#[derive(Debug, Clone, Deserialize, Default)]
pub struct ToolsSection {
    #[serde(default)]
    pub builder: Option<ToolCommand>,
    #[serde(default)]
    pub auditor: Option<ToolCommand>,
    #[serde(default)]
    pub optimizer: Option<ToolCommand>,
    #[serde(default)]
    pub pruner: Option<ToolCommand>,
    /// Fallback for the generator tasks (sitemap, apidocs, llms, ...).
    #[serde(default)]
    pub site: Option<ToolCommand>,
}

#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct ToolCommand {
    pub command: String,

    #[serde(default)]
    pub args: Vec<String>,

    #[serde(default, alias = "timeout_seconds", alias = "timeout-seconds")]
    pub timeout_seconds: Option<i64>,
}

impl ToolCommand {
    pub fn new(command: impl Into<String>) -> Self {
        Self {
            command: command.into(),
            args: Vec::new(),
            timeout_seconds: None,
        }
    }
}

/// A validated, immutable pipeline step. Identity is its position in
/// [`PipelineDocument::steps`].
#[derive(Debug, Clone, PartialEq)]
pub struct PipelineStep {
    pub task: String,
    pub label: String,
    pub options: StepOptions,
}

impl PipelineStep {
    pub fn new(task: impl Into<String>, label: impl Into<String>, options: StepOptions) -> Self {
        Self {
            task: task.into(),
            label: label.into(),
            options,
        }
    }
}

/// Validated pipeline document.
#[derive(Debug, Clone)]
pub struct PipelineDocument {
    steps: Vec<PipelineStep>,
    tools: ToolsSection,
}

impl PipelineDocument {
    pub(crate) fn new_unchecked(steps: Vec<PipelineStep>, tools: ToolsSection) -> Self {
        Self { steps, tools }
    }

    pub fn steps(&self) -> &[PipelineStep] {
        &self.steps
    }

    pub fn tools(&self) -> &ToolsSection {
        &self.tools
    }
}
