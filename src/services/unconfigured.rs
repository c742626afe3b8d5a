// src/services/unconfigured.rs

use crate::errors::{Result, SitepipeError};
use crate::services::{
    ArtifactPruner, AssetOptimizer, AuditReport, AuditRequest, BoxFuture, BuildOutcome,
    BuildRequest, OptimizeReport, OptimizeRequest, PruneReport, PruneRequest, SiteAuditor,
    SiteBuilder, SiteTool, ToolOutcome, ToolRequest,
};

/// Placeholder for a collaborator role with no configured command.
#[derive(Debug, Clone, Copy)]
pub struct Unconfigured {
    role: &'static str,
}

impl Unconfigured {
    pub fn new(role: &'static str) -> Self {
        Self { role }
    }

    fn error(&self) -> SitepipeError {
        SitepipeError::config(format!(
            "no {role} is configured; add tools.{role} to the pipeline document",
            role = self.role
        ))
    }

    fn fail<'a, T: Send + 'a>(&self) -> BoxFuture<'a, Result<T>> {
        let err = self.error();
        Box::pin(async move { Err(err) })
    }
}

impl SiteBuilder for Unconfigured {
    fn build<'a>(&'a self, _request: &'a BuildRequest) -> BoxFuture<'a, Result<BuildOutcome>> {
        self.fail()
    }
}

impl SiteAuditor for Unconfigured {
    fn audit<'a>(&'a self, _request: &'a AuditRequest) -> BoxFuture<'a, Result<AuditReport>> {
        self.fail()
    }
}

impl AssetOptimizer for Unconfigured {
    fn optimize<'a>(
        &'a self,
        _request: &'a OptimizeRequest,
    ) -> BoxFuture<'a, Result<OptimizeReport>> {
        self.fail()
    }
}

impl ArtifactPruner for Unconfigured {
    fn prune<'a>(&'a self, _request: &'a PruneRequest) -> BoxFuture<'a, Result<PruneReport>> {
        self.fail()
    }
}

impl SiteTool for Unconfigured {
    fn run<'a>(&'a self, request: &'a ToolRequest) -> BoxFuture<'a, Result<ToolOutcome>> {
        let err = SitepipeError::config(format!(
            "no site tool is configured for task '{}'; add tools.site to the pipeline document",
            request.task
        ));
        Box::pin(async move { Err(err) })
    }
}
