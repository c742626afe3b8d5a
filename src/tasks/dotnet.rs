// src/tasks/dotnet.rs

//! `dotnet-build` and `dotnet-publish`.

use tracing::info;

use crate::config::StepOptions;
use crate::engine::{ExecutionContext, TaskKind};
use crate::errors::Result;
use crate::exec::{ProcessSpec, run_process};
use crate::tasks::{
    ARGS, TIMEOUT_SECONDS, TaskInput, TaskOutput, path_string, user_env, working_dir,
};

pub const PROJECT: &[&str] = &["project", "projectPath", "solution"];
pub const CONFIGURATION: &[&str] = &["configuration", "config"];
pub const OUTPUT: &[&str] = &["output", "outputDir", "publishDir"];
pub const FRAMEWORK: &[&str] = &["framework"];
pub const RUNTIME: &[&str] = &["runtime", "rid"];
pub const DOTNET_PATH: &[&str] = &["dotnetPath", "dotnet"];

pub const DEFAULT_CONFIGURATION: &str = "Release";

/// Argument vector for `dotnet build` / `dotnet publish`.
pub fn dotnet_args(
    kind: TaskKind,
    options: &StepOptions,
    ctx: &ExecutionContext,
) -> Result<Vec<String>> {
    let verb = if kind == TaskKind::DotnetPublish {
        "publish"
    } else {
        "build"
    };
    let project = options.require_string(PROJECT)?;
    let configuration = options
        .get_string(CONFIGURATION)?
        .unwrap_or_else(|| DEFAULT_CONFIGURATION.to_string());

    let mut args = vec![
        verb.to_string(),
        path_string(&ctx.resolve(&project)),
        "-c".to_string(),
        configuration,
        "--nologo".to_string(),
    ];
    if let Some(framework) = options.get_string(FRAMEWORK)? {
        args.extend(["-f".to_string(), framework]);
    }
    if let Some(runtime) = options.get_string(RUNTIME)? {
        args.extend(["-r".to_string(), runtime]);
    }
    if let Some(output) = options.get_path(OUTPUT)? {
        args.extend(["-o".to_string(), path_string(&ctx.resolve(output))]);
    }
    args.extend(options.get_list(ARGS)?);
    Ok(args)
}

pub async fn run(input: &TaskInput<'_>, ctx: &ExecutionContext) -> Result<TaskOutput> {
    let options = input.options;
    let args = dotnet_args(input.kind, options, ctx)?;
    let dotnet = options
        .get_string(DOTNET_PATH)?
        .unwrap_or_else(|| "dotnet".to_string());

    let mut spec = ProcessSpec::new(dotnet, working_dir(options, ctx)?)
        .args(args)
        .timeout_secs(options.get_or(TIMEOUT_SECONDS, 0)?)
        .env("DOTNET_CLI_TELEMETRY_OPTOUT", "1")
        .env("DOTNET_NOLOGO", "1");
    spec.env.extend(user_env(options, &[])?);
    let command_line = spec.display_command();

    info!(step = %input.label, command = %command_line, "running dotnet");
    run_process(&spec).await?.into_success(&command_line)?;

    let project = options.require_string(PROJECT)?;
    Ok(TaskOutput::message(format!("{} {project} succeeded", input.kind)))
}
