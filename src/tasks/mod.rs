// src/tasks/mod.rs

//! Task handlers, one module per task family.
//!
//! Every handler has the shape
//! `(&TaskInput, &ExecutionContext[, &Services]) -> Result<TaskOutput>`.
//! Only `build` returns a carryover; the runner folds it into the context.
//! The helpers below are shared by the handlers that spawn processes.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use anyhow::Context;
use chrono::{SecondsFormat, Utc};
use serde::Serialize;
use serde_json::{Map, Value};

use crate::config::StepOptions;
use crate::engine::{BuildCarryover, ExecutionContext, HostEnv, TaskKind};
use crate::errors::{Result, SitepipeError};
use crate::exec::cmdline::substitute_tokens;
use crate::exec::{ProcessArgs, ProcessSpec};

pub mod audit;
pub mod build;
pub mod doctor;
pub mod dotnet;
pub mod exec;
pub mod git;
pub mod hook;
pub mod optimize;
pub mod overlay;
pub mod prune;
pub mod tool;
pub mod transform;

/// Downgrade a process or collaborator failure into a tolerated outcome.
pub const ALLOW_FAILURE: &[&str] = &["allowFailure", "allowFailures", "ignoreFailure"];

pub const COMMAND: &[&str] = &["command", "cmd"];
pub const ARGS: &[&str] = &["args", "arguments"];
pub const WORKING_DIRECTORY: &[&str] = &["workingDirectory", "workDir", "cwd"];
pub const TIMEOUT_SECONDS: &[&str] = &["timeoutSeconds", "timeout"];
pub const ENV: &[&str] = &["env", "environment"];
pub const SHELL: &[&str] = &["shell", "useShell"];
pub const STEP_ID: &[&str] = &["id", "stepId"];
pub const INCLUDE: &[&str] = &["include"];
pub const EXCLUDE: &[&str] = &["exclude"];

/// What the runner hands a handler.
#[derive(Debug, Clone, Copy)]
pub struct TaskInput<'a> {
    /// Zero-based position in the pipeline.
    pub index: usize,
    pub kind: TaskKind,
    pub label: &'a str,
    /// Options after fast-mode overrides.
    pub options: &'a StepOptions,
    pub env: &'a HostEnv,
}

impl TaskInput<'_> {
    /// The `id` option, else `step-<1-based index>`.
    pub fn step_id(&self) -> Result<String> {
        Ok(self
            .options
            .get_string(STEP_ID)?
            .unwrap_or_else(|| format!("step-{}", self.index + 1)))
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaskOutput {
    pub message: String,
    pub carryover: Option<BuildCarryover>,
}

impl TaskOutput {
    pub fn message(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            carryover: None,
        }
    }

    pub fn with_carryover(message: impl Into<String>, carryover: BuildCarryover) -> Self {
        Self {
            message: message.into(),
            carryover: Some(carryover),
        }
    }
}

pub fn allow_failure(options: &StepOptions) -> Result<bool> {
    options.get_or(ALLOW_FAILURE, false)
}

/// Configured `args`: a list is taken verbatim, a string is split like a
/// command line. `{token}` placeholders are substituted either way.
pub fn process_args(options: &StepOptions, tokens: &[(&str, &str)]) -> Result<ProcessArgs> {
    match options.raw(ARGS) {
        None => Ok(ProcessArgs::default()),
        Some(Value::String(line)) => Ok(ProcessArgs::Line(substitute_tokens(line, tokens))),
        Some(_) => {
            let args = options.get_list(ARGS)?;
            Ok(ProcessArgs::List(
                args.iter().map(|a| substitute_tokens(a, tokens)).collect(),
            ))
        }
    }
}

/// `workingDirectory` resolved against the base directory, else the base
/// directory itself.
pub fn working_dir(options: &StepOptions, ctx: &ExecutionContext) -> Result<PathBuf> {
    Ok(match options.get_path(WORKING_DIRECTORY)? {
        Some(dir) => ctx.resolve(dir),
        None => ctx.base_dir.clone(),
    })
}

/// The step's `env` object with `{token}` substitution on every value.
pub fn user_env(options: &StepOptions, tokens: &[(&str, &str)]) -> Result<BTreeMap<String, String>> {
    let Some(map) = options.get::<Map<String, Value>>(ENV)? else {
        return Ok(BTreeMap::new());
    };
    map.into_iter()
        .filter(|(_, value)| !value.is_null())
        .map(|(key, value)| {
            let raw = match value {
                Value::String(s) => s,
                Value::Number(n) => n.to_string(),
                Value::Bool(b) => b.to_string(),
                other => {
                    return Err(SitepipeError::config(format!(
                        "env value for '{key}' must be a string (got {other})"
                    )));
                }
            };
            Ok((key, substitute_tokens(&raw, tokens)))
        })
        .collect()
}

/// A [`ProcessSpec`] from the common `command`/`args`/`workingDirectory`/
/// `env`/`timeoutSeconds`/`shell` options.
pub fn command_spec(
    options: &StepOptions,
    ctx: &ExecutionContext,
    tokens: &[(&str, &str)],
) -> Result<ProcessSpec> {
    let command = substitute_tokens(&options.require_string(COMMAND)?, tokens);
    let mut spec = ProcessSpec::new(command, working_dir(options, ctx)?)
        .timeout_secs(options.get_or(TIMEOUT_SECONDS, 0)?)
        .shell(options.get_or(SHELL, false)?);
    spec.args = process_args(options, tokens)?;
    spec.env = user_env(options, tokens)?;
    Ok(spec)
}

/// UTC timestamp used in context files and reports.
pub fn utc_now() -> String {
    Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true)
}

pub fn path_string(path: &Path) -> String {
    path.to_string_lossy().into_owned()
}

/// Pretty-print `value` to `path`, creating parent directories.
pub fn write_json<T: Serialize>(path: &Path, value: &T) -> Result<()> {
    let json = serde_json::to_string_pretty(value)?;
    write_file(path, json.as_bytes())
}

pub fn write_file(path: &Path, contents: &[u8]) -> Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("creating directory {}", parent.display()))?;
    }
    std::fs::write(path, contents).with_context(|| format!("writing {}", path.display()))?;
    Ok(())
}
