// src/services/mod.rs

//! Collaborator interfaces used by the task handlers.
//!
//! The engine never renders pages, parses HTML or talks to remote APIs
//! itself; it drives these traits. Production wiring uses
//! [`bridge::ProcessBridge`] (an external command speaking JSON) or
//! [`unconfigured::Unconfigured`]; tests provide fakes.

use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;

use crate::config::ToolsSection;
use crate::errors::Result;

pub mod bridge;
pub mod types;
pub mod unconfigured;

pub use bridge::ProcessBridge;
pub use types::{
    AuditIssue, AuditReport, AuditRequest, BuildOutcome, BuildRequest, OptimizeReport,
    OptimizeRequest, PruneReport, PruneRequest, ToolOutcome, ToolRequest,
};
pub use unconfigured::Unconfigured;

pub type BoxFuture<'a, T> = Pin<Box<dyn Future<Output = T> + Send + 'a>>;

/// Static-page builder.
pub trait SiteBuilder: Send + Sync {
    fn build<'a>(&'a self, request: &'a BuildRequest) -> BoxFuture<'a, Result<BuildOutcome>>;
}

/// HTML / link / navigation auditor.
pub trait SiteAuditor: Send + Sync {
    fn audit<'a>(&'a self, request: &'a AuditRequest) -> BoxFuture<'a, Result<AuditReport>>;
}

/// Minification, image transcoding and asset hashing.
pub trait AssetOptimizer: Send + Sync {
    fn optimize<'a>(
        &'a self,
        request: &'a OptimizeRequest,
    ) -> BoxFuture<'a, Result<OptimizeReport>>;
}

/// Remote build-artifact retention.
pub trait ArtifactPruner: Send + Sync {
    fn prune<'a>(&'a self, request: &'a PruneRequest) -> BoxFuture<'a, Result<PruneReport>>;
}

/// Generator tools (sitemap, apidocs, llms, changelog, verify, ...).
pub trait SiteTool: Send + Sync {
    fn run<'a>(&'a self, request: &'a ToolRequest) -> BoxFuture<'a, Result<ToolOutcome>>;
}

/// The set of collaborators handed to every handler.
#[derive(Clone)]
pub struct Services {
    pub builder: Arc<dyn SiteBuilder>,
    pub auditor: Arc<dyn SiteAuditor>,
    pub optimizer: Arc<dyn AssetOptimizer>,
    pub pruner: Arc<dyn ArtifactPruner>,
    pub tools: Arc<dyn SiteTool>,
}

impl std::fmt::Debug for Services {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Services").finish_non_exhaustive()
    }
}

impl Default for Services {
    fn default() -> Self {
        Self::unconfigured()
    }
}

impl Services {
    /// Every collaborator reports "not configured".
    pub fn unconfigured() -> Self {
        Self {
            builder: Arc::new(Unconfigured::new("builder")),
            auditor: Arc::new(Unconfigured::new("auditor")),
            optimizer: Arc::new(Unconfigured::new("optimizer")),
            pruner: Arc::new(Unconfigured::new("pruner")),
            tools: Arc::new(Unconfigured::new("site")),
        }
    }

    /// Wire a process bridge for every role configured in `[tools]`.
    pub fn from_tools(tools: &ToolsSection, base_dir: &std::path::Path) -> Self {
        let mut services = Self::unconfigured();
        if let Some(cmd) = &tools.builder {
            services.builder = Arc::new(ProcessBridge::new("builder", cmd.clone(), base_dir));
        }
        if let Some(cmd) = &tools.auditor {
            services.auditor = Arc::new(ProcessBridge::new("auditor", cmd.clone(), base_dir));
        }
        if let Some(cmd) = &tools.optimizer {
            services.optimizer = Arc::new(ProcessBridge::new("optimizer", cmd.clone(), base_dir));
        }
        if let Some(cmd) = &tools.pruner {
            services.pruner = Arc::new(ProcessBridge::new("pruner", cmd.clone(), base_dir));
        }
        if let Some(cmd) = &tools.site {
            services.tools = Arc::new(ProcessBridge::new("site", cmd.clone(), base_dir));
        }
        services
    }

    pub fn with_builder(mut self, builder: Arc<dyn SiteBuilder>) -> Self {
        self.builder = builder;
        self
    }

    pub fn with_auditor(mut self, auditor: Arc<dyn SiteAuditor>) -> Self {
        self.auditor = auditor;
        self
    }

    pub fn with_optimizer(mut self, optimizer: Arc<dyn AssetOptimizer>) -> Self {
        self.optimizer = optimizer;
        self
    }

    pub fn with_pruner(mut self, pruner: Arc<dyn ArtifactPruner>) -> Self {
        self.pruner = pruner;
        self
    }

    pub fn with_tools(mut self, tools: Arc<dyn SiteTool>) -> Self {
        self.tools = tools;
        self
    }
}
