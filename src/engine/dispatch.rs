// src/engine/dispatch.rs

//! Task dispatch table: discriminator string to handler.

use std::fmt;
use std::str::FromStr;

use crate::engine::context::ExecutionContext;
use crate::errors::Result;
use crate::services::Services;
use crate::tasks::{self, TaskInput, TaskOutput};

/// Message of the step result produced for an unrecognised discriminator.
pub const UNKNOWN_TASK_MESSAGE: &str = "Unknown task";

macro_rules! task_kinds {
    ($($variant:ident => $name:literal),+ $(,)?) => {
        /// The closed set of task discriminators.
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
        pub enum TaskKind {
            $($variant),+
        }

        impl TaskKind {
            pub const ALL: &'static [TaskKind] = &[$(TaskKind::$variant),+];

            pub fn as_str(&self) -> &'static str {
                match self {
                    $(TaskKind::$variant => $name),+
                }
            }
        }

        impl FromStr for TaskKind {
            type Err = String;

            fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
                match s.trim().to_lowercase().as_str() {
                    $($name => Ok(TaskKind::$variant),)+
                    other => Err(format!("unknown task: {other}")),
                }
            }
        }
    };
}

task_kinds! {
    Build => "build",
    NavExport => "nav-export",
    Verify => "verify",
    MarkdownFix => "markdown-fix",
    ApiDocs => "apidocs",
    Changelog => "changelog",
    VersionHub => "version-hub",
    PackageHub => "package-hub",
    Llms => "llms",
    CompatMatrix => "compat-matrix",
    Sitemap => "sitemap",
    XrefMerge => "xref-merge",
    Optimize => "optimize",
    Audit => "audit",
    SeoDoctor => "seo-doctor",
    Doctor => "doctor",
    DotnetBuild => "dotnet-build",
    DotnetPublish => "dotnet-publish",
    Overlay => "overlay",
    Hosting => "hosting",
    Cloudflare => "cloudflare",
    IndexNow => "indexnow",
    Hook => "hook",
    HtmlTransform => "html-transform",
    DataTransform => "data-transform",
    ModelTransform => "model-transform",
    Exec => "exec",
    GitSync => "git-sync",
    SourcesSync => "sources-sync",
    GithubArtifactsPrune => "github-artifacts-prune",
}

impl fmt::Display for TaskKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Route a step to its handler.
pub async fn dispatch(
    input: &TaskInput<'_>,
    ctx: &ExecutionContext,
    services: &Services,
) -> Result<TaskOutput> {
    use TaskKind::*;

    match input.kind {
        Build => tasks::build::run(input, ctx, services).await,
        Audit => tasks::audit::run(input, ctx, services).await,
        Optimize => tasks::optimize::run(input, ctx, services).await,
        Doctor => tasks::doctor::run(input, ctx, services).await,
        GithubArtifactsPrune => tasks::prune::run(input, ctx, services).await,
        Hook => tasks::hook::run(input, ctx).await,
        Exec => tasks::exec::run(input, ctx).await,
        DataTransform | ModelTransform => tasks::transform::run_file(input, ctx).await,
        HtmlTransform => tasks::transform::run_html(input, ctx).await,
        DotnetBuild | DotnetPublish => tasks::dotnet::run(input, ctx).await,
        GitSync => tasks::git::run_single(input, ctx).await,
        SourcesSync => tasks::git::run_sources(input, ctx).await,
        Overlay => tasks::overlay::run(input, ctx),
        NavExport | Verify | MarkdownFix | ApiDocs | Changelog | VersionHub | PackageHub
        | Llms | CompatMatrix | Sitemap | XrefMerge | SeoDoctor | Hosting | Cloudflare
        | IndexNow => tasks::tool::run(input, ctx, services).await,
    }
}
