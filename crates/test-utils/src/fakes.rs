#![allow(dead_code)]

use std::path::PathBuf;
use std::sync::{Arc, Mutex};

use sitepipe::errors::Result;
use sitepipe::services::{
    ArtifactPruner, AssetOptimizer, AuditReport, AuditRequest, BoxFuture, BuildOutcome,
    BuildRequest, OptimizeReport, OptimizeRequest, PruneReport, PruneRequest, Services,
    SiteAuditor, SiteBuilder, SiteTool, ToolOutcome, ToolRequest,
};

/// Shared log of the requests a fake received.
pub type Recorded<T> = Arc<Mutex<Vec<T>>>;

fn record<T: Clone>(log: &Recorded<T>, request: &T) {
    log.lock().unwrap().push(request.clone());
}

/// A fake builder that:
/// - writes the configured files under the requested output directory
/// - optionally reports them as `updatedFiles` (otherwise the engine diffs)
pub struct FakeBuilder {
    files: Vec<(String, String)>,
    report_updated: bool,
    pub requests: Recorded<BuildRequest>,
}

impl FakeBuilder {
    pub fn new() -> Self {
        Self {
            files: Vec::new(),
            report_updated: true,
            requests: Arc::default(),
        }
    }

    pub fn writes(mut self, rel_path: &str, content: &str) -> Self {
        self.files.push((rel_path.to_string(), content.to_string()));
        self
    }

    /// Leave `updatedFiles` out of the outcome.
    pub fn silent(mut self) -> Self {
        self.report_updated = false;
        self
    }
}

impl Default for FakeBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl SiteBuilder for FakeBuilder {
    fn build<'a>(&'a self, request: &'a BuildRequest) -> BoxFuture<'a, Result<BuildOutcome>> {
        Box::pin(async move {
            record(&self.requests, request);
            let mut updated = Vec::new();
            for (rel, content) in &self.files {
                let path = request.output.join(rel);
                if let Some(parent) = path.parent() {
                    std::fs::create_dir_all(parent)?;
                }
                std::fs::write(&path, content)?;
                updated.push(PathBuf::from(rel));
            }
            Ok(BuildOutcome {
                output_path: None,
                updated_files: self.report_updated.then_some(updated),
                pages: self.files.len() as u64,
                message: None,
            })
        })
    }
}

/// A fake auditor returning a canned report and recording requests.
pub struct FakeAuditor {
    report: AuditReport,
    pub requests: Recorded<AuditRequest>,
}

impl FakeAuditor {
    pub fn new(report: AuditReport) -> Self {
        Self {
            report,
            requests: Arc::default(),
        }
    }

    pub fn passing() -> Self {
        Self::new(AuditReport {
            pages: 3,
            links: 10,
            assets: 4,
            ..AuditReport::default()
        })
    }
}

impl SiteAuditor for FakeAuditor {
    fn audit<'a>(&'a self, request: &'a AuditRequest) -> BoxFuture<'a, Result<AuditReport>> {
        Box::pin(async move {
            record(&self.requests, request);
            Ok(self.report.clone())
        })
    }
}

pub struct FakeOptimizer {
    report: OptimizeReport,
    pub requests: Recorded<OptimizeRequest>,
}

impl FakeOptimizer {
    pub fn new(report: OptimizeReport) -> Self {
        Self {
            report,
            requests: Arc::default(),
        }
    }
}

impl AssetOptimizer for FakeOptimizer {
    fn optimize<'a>(
        &'a self,
        request: &'a OptimizeRequest,
    ) -> BoxFuture<'a, Result<OptimizeReport>> {
        Box::pin(async move {
            record(&self.requests, request);
            Ok(self.report.clone())
        })
    }
}

pub struct FakePruner {
    report: PruneReport,
    pub requests: Recorded<PruneRequest>,
}

impl FakePruner {
    pub fn new(report: PruneReport) -> Self {
        Self {
            report,
            requests: Arc::default(),
        }
    }
}

impl ArtifactPruner for FakePruner {
    fn prune<'a>(&'a self, request: &'a PruneRequest) -> BoxFuture<'a, Result<PruneReport>> {
        Box::pin(async move {
            record(&self.requests, request);
            Ok(self.report.clone())
        })
    }
}

pub struct FakeSiteTool {
    outcome: ToolOutcome,
    pub requests: Recorded<ToolRequest>,
}

impl FakeSiteTool {
    pub fn new(outcome: ToolOutcome) -> Self {
        Self {
            outcome,
            requests: Arc::default(),
        }
    }
}

impl SiteTool for FakeSiteTool {
    fn run<'a>(&'a self, request: &'a ToolRequest) -> BoxFuture<'a, Result<ToolOutcome>> {
        Box::pin(async move {
            record(&self.requests, request);
            Ok(self.outcome.clone())
        })
    }
}

/// Services where the auditor and optimizer pass and everything else is
/// unconfigured.
pub fn passing_services() -> Services {
    Services::unconfigured()
        .with_auditor(Arc::new(FakeAuditor::passing()))
        .with_optimizer(Arc::new(FakeOptimizer::new(OptimizeReport::default())))
}
