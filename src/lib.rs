// src/lib.rs

pub mod cli;
pub mod config;
pub mod engine;
pub mod errors;
pub mod exec;
pub mod logging;
pub mod policy;
pub mod report;
pub mod scope;
pub mod services;
pub mod tasks;
pub mod types;

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use tracing::{debug, info};

use crate::cli::CliArgs;
use crate::config::{PipelineDocument, load_and_validate};
use crate::engine::{ExecutionContext, HostEnv, Pipeline};
use crate::services::Services;

/// High-level entry point used by `main.rs`.
///
/// Loads the pipeline document, wires the collaborators configured under
/// `tools`, runs every step and prints the result. Returns whether the whole
/// pipeline succeeded.
pub async fn run(args: CliArgs, env: HostEnv) -> Result<bool> {
    let config_path = args.config.clone();
    let doc = load_and_validate(&config_path)
        .with_context(|| format!("loading pipeline document {}", config_path.display()))?;

    let base_dir = match &args.base_dir {
        Some(dir) => dir.clone(),
        None => config_root_dir(&config_path),
    };

    if args.dry_run {
        print_dry_run(&doc, &base_dir);
        return Ok(true);
    }

    let services = Services::from_tools(doc.tools(), &base_dir);
    let ctx = ExecutionContext::new(&base_dir, args.fast, args.mode.clone());
    info!(config = %config_path.display(), base_dir = %base_dir.display(), "loaded pipeline");

    let pipeline = Pipeline::new(services, env);
    let run = pipeline.run(doc.steps(), ctx).await;

    if args.json {
        println!("{}", serde_json::to_string_pretty(&run.result)?);
    } else {
        print!("{}", run.result.render_text());
    }

    Ok(run.result.success)
}

/// Directory relative step paths are resolved against.
///
/// - If the config path has a non-empty parent (e.g. "site/sitepipe.json"),
///   we use that directory.
/// - If it's just a bare filename, we fall back to the current working
///   directory.
fn config_root_dir(config_path: &Path) -> PathBuf {
    match config_path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
        _ => std::env::current_dir().unwrap_or_else(|_| PathBuf::from(".")),
    }
}

/// Simple dry-run output: list steps and the collaborators configured.
fn print_dry_run(doc: &PipelineDocument, base_dir: &Path) {
    println!("sitepipe dry-run");
    println!("  base_dir = {}", base_dir.display());
    let tools = doc.tools();
    let roles = [
        ("builder", &tools.builder),
        ("auditor", &tools.auditor),
        ("optimizer", &tools.optimizer),
        ("pruner", &tools.pruner),
        ("site", &tools.site),
    ];
    for (role, tool) in roles {
        if let Some(tool) = tool {
            println!("  tools.{role} = {} {}", tool.command, tool.args.join(" "));
        }
    }
    println!();

    println!("steps ({}):", doc.steps().len());
    for (i, step) in doc.steps().iter().enumerate() {
        let known = step.task.parse::<engine::TaskKind>().is_ok();
        println!(
            "  {:>2}. {} [{}]{}",
            i + 1,
            step.label,
            step.task,
            if known { "" } else { " (unknown task)" }
        );
        for (key, value) in step.options.as_map() {
            println!("      {key}: {value}");
        }
    }

    debug!("dry-run complete (no execution)");
}
