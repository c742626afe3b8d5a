// src/services/bridge.rs

//! Collaborator implementation backed by an external command.
//!
//! The command is invoked as `<command> <args...> <task>` in the base
//! directory. The request is written to stdin as JSON; the process must
//! print one JSON report object on stdout and exit 0.

use std::path::{Path, PathBuf};

use serde::Serialize;
use serde::de::DeserializeOwned;
use tracing::debug;

use crate::config::ToolCommand;
use crate::errors::{Result, SitepipeError};
use crate::exec::{ProcessSpec, run_process};
use crate::services::{
    ArtifactPruner, AssetOptimizer, AuditReport, AuditRequest, BoxFuture, BuildOutcome,
    BuildRequest, OptimizeReport, OptimizeRequest, PruneReport, PruneRequest, SiteAuditor,
    SiteBuilder, SiteTool, ToolOutcome, ToolRequest,
};

#[derive(Debug, Clone)]
pub struct ProcessBridge {
    role: &'static str,
    tool: ToolCommand,
    base_dir: PathBuf,
}

impl ProcessBridge {
    pub fn new(role: &'static str, tool: ToolCommand, base_dir: &Path) -> Self {
        Self {
            role,
            tool,
            base_dir: base_dir.to_path_buf(),
        }
    }

    /// Send `request` to the tool for `task` and parse its JSON report.
    pub async fn invoke<Req, Resp>(&self, task: &str, request: &Req) -> Result<Resp>
    where
        Req: Serialize + ?Sized,
        Resp: DeserializeOwned,
    {
        let payload = serde_json::to_vec(request)?;
        let mut args = self.tool.args.clone();
        args.push(task.to_string());

        let spec = ProcessSpec::new(&self.tool.command, &self.base_dir)
            .args(args)
            .stdin(payload)
            .timeout_secs(self.tool.timeout_seconds.unwrap_or(0));
        let command_line = spec.display_command();

        let output = run_process(&spec).await?.into_success(&command_line)?;
        debug!(role = self.role, task, bytes = output.stdout.len(), "bridge report received");

        serde_json::from_str(output.stdout_text().trim()).map_err(|e| {
            SitepipeError::TaskFailed(format!(
                "{} '{}' returned an invalid report for {task}: {e}",
                self.role, self.tool.command
            ))
        })
    }
}

impl SiteBuilder for ProcessBridge {
    fn build<'a>(&'a self, request: &'a BuildRequest) -> BoxFuture<'a, Result<BuildOutcome>> {
        Box::pin(self.invoke("build", request))
    }
}

impl SiteAuditor for ProcessBridge {
    fn audit<'a>(&'a self, request: &'a AuditRequest) -> BoxFuture<'a, Result<AuditReport>> {
        Box::pin(self.invoke("audit", request))
    }
}

impl AssetOptimizer for ProcessBridge {
    fn optimize<'a>(
        &'a self,
        request: &'a OptimizeRequest,
    ) -> BoxFuture<'a, Result<OptimizeReport>> {
        Box::pin(self.invoke("optimize", request))
    }
}

impl ArtifactPruner for ProcessBridge {
    fn prune<'a>(&'a self, request: &'a PruneRequest) -> BoxFuture<'a, Result<PruneReport>> {
        Box::pin(self.invoke("github-artifacts-prune", request))
    }
}

impl SiteTool for ProcessBridge {
    fn run<'a>(&'a self, request: &'a ToolRequest) -> BoxFuture<'a, Result<ToolOutcome>> {
        Box::pin(self.invoke(&request.task, request))
    }
}
