// src/tasks/transform.rs

//! `data-transform`, `model-transform` and `html-transform`: pipe files
//! through an external command and detect whether the output changed.

use std::path::{Path, PathBuf};

use serde::Serialize;
use tracing::{info, warn};

use crate::config::StepOptions;
use crate::engine::{ExecutionContext, TaskKind};
use crate::errors::{Result, SitepipeError};
use crate::exec::run_process;
use crate::scope::{PathFilter, collect_matching_files, content_digest, is_html_file};
use crate::tasks::{
    EXCLUDE, INCLUDE, TaskInput, TaskOutput, allow_failure, command_spec, path_string, utc_now,
    write_file, write_json,
};
use crate::types::{InputMode, WriteMode};

pub const INPUT: &[&str] = &["input", "inputPath", "source"];
pub const OUTPUT: &[&str] = &["output", "outputPath", "destination"];
pub const INPUT_MODE: &[&str] = &["inputMode"];
pub const WRITE_MODE: &[&str] = &["writeMode", "outputMode"];
pub const REPORT_PATH: &[&str] = &["reportPath", "reportFile"];
pub const ROOT: &[&str] = &["root", "siteRoot", "directory"];

pub const ENV_INPUT: &str = "SITEPIPE_DATA_INPUT";
pub const ENV_OUTPUT: &str = "SITEPIPE_DATA_OUTPUT";
pub const ENV_BASEDIR: &str = "SITEPIPE_DATA_BASEDIR";
pub const ENV_MODE: &str = "SITEPIPE_DATA_MODE";
pub const ENV_WRITE_MODE: &str = "SITEPIPE_DATA_WRITE_MODE";

/// Report written to `reportPath` after a data/model transform.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TransformReport {
    pub input: String,
    pub output: String,
    pub mode: String,
    pub write_mode: String,
    pub exit_code: i32,
    pub changed: bool,
    pub allowed_failure: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error_preview: Option<String>,
    pub utc: String,
}

#[derive(Debug, Clone, Copy)]
struct Settings {
    input_mode: InputMode,
    write_mode: WriteMode,
    allow_failure: bool,
    require_json: bool,
}

impl Settings {
    fn from_options(options: &StepOptions, kind: TaskKind) -> Result<Self> {
        Ok(Self {
            input_mode: options.get_enum(INPUT_MODE)?.unwrap_or_default(),
            write_mode: options.get_enum(WRITE_MODE)?.unwrap_or_default(),
            allow_failure: allow_failure(options)?,
            require_json: kind == TaskKind::ModelTransform,
        })
    }
}

/// Result of transforming one file.
#[derive(Debug)]
struct FileOutcome {
    report: TransformReport,
    failure: Option<SitepipeError>,
}

async fn transform_file(
    options: &StepOptions,
    ctx: &ExecutionContext,
    settings: Settings,
    input: &Path,
    output: &Path,
) -> Result<FileOutcome> {
    if !input.is_file() {
        return Err(SitepipeError::Precondition(format!(
            "input file not found: {}",
            input.display()
        )));
    }

    let input_str = path_string(input);
    let output_str = path_string(output);
    let base_dir = path_string(&ctx.base_dir);
    let tokens = [
        ("input", input_str.as_str()),
        ("output", output_str.as_str()),
        ("baseDir", base_dir.as_str()),
    ];

    let mut spec = command_spec(options, ctx, &tokens)?
        .env(ENV_INPUT, &input_str)
        .env(ENV_OUTPUT, &output_str)
        .env(ENV_BASEDIR, &base_dir)
        .env(ENV_MODE, settings.input_mode.as_str())
        .env(ENV_WRITE_MODE, settings.write_mode.as_str());
    if settings.input_mode == InputMode::Stdin {
        let bytes = std::fs::read(input)
            .map_err(|e| SitepipeError::Precondition(format!("reading {input_str}: {e}")))?;
        spec = spec.stdin(bytes);
    }
    let command_line = spec.display_command();

    let before = content_digest(output)?;
    let result = run_process(&spec).await?;

    let mut failure = None;
    if result.success() {
        if settings.require_json {
            if let Err(reason) = check_json(&result.stdout, settings.write_mode, output) {
                failure = Some(SitepipeError::TaskFailed(format!(
                    "{command_line} did not produce valid JSON: {reason}"
                )));
            }
        }
        if failure.is_none() && settings.write_mode == WriteMode::Stdout {
            write_file(output, &result.stdout)?;
        }
    } else {
        failure = Some(result.failure(&command_line));
    }

    let after = content_digest(output)?;
    let allowed_failure = failure.is_some() && settings.allow_failure;
    let error_preview = failure.as_ref().and_then(|_| result.preview());

    let report = TransformReport {
        input: input_str,
        output: output_str,
        mode: settings.input_mode.as_str().to_string(),
        write_mode: settings.write_mode.as_str().to_string(),
        exit_code: result.exit_code,
        changed: before != after,
        allowed_failure,
        error_preview,
        utc: utc_now(),
    };
    Ok(FileOutcome { report, failure })
}

/// Model output must parse as JSON: captured stdout, or the file the process
/// wrote itself in passthrough mode.
fn check_json(
    stdout: &[u8],
    write_mode: WriteMode,
    output: &Path,
) -> std::result::Result<(), String> {
    let written;
    let bytes = match write_mode {
        WriteMode::Stdout => stdout,
        WriteMode::Passthrough => {
            written = std::fs::read(output)
                .map_err(|e| format!("reading {}: {e}", output.display()))?;
            &written
        }
    };
    serde_json::from_slice::<serde_json::Value>(bytes)
        .map(drop)
        .map_err(|e| e.to_string())
}

/// `data-transform` / `model-transform` on a single input file.
pub async fn run_file(input: &TaskInput<'_>, ctx: &ExecutionContext) -> Result<TaskOutput> {
    let options = input.options;
    let settings = Settings::from_options(options, input.kind)?;
    let in_path = ctx.resolve(options.require_string(INPUT)?);
    let out_path = match options.get_path(OUTPUT)? {
        Some(p) => ctx.resolve(p),
        None => in_path.clone(),
    };

    let outcome = transform_file(options, ctx, settings, &in_path, &out_path).await?;
    if let Some(path) = options.get_path(REPORT_PATH)? {
        write_json(&ctx.resolve(path), &outcome.report)?;
    }

    let report = &outcome.report;
    match outcome.failure {
        Some(err) if settings.allow_failure => {
            warn!(task = %input.kind, input = %report.input, error = %err, "transform failed; allowed failure");
            Ok(TaskOutput::message(format!(
                "{} allowed failure: {err}",
                input.kind
            )))
        }
        Some(err) => Err(err),
        None => {
            let state = if report.changed { "changed" } else { "unchanged" };
            info!(task = %input.kind, input = %report.input, output = %report.output, changed = report.changed, "transform done");
            Ok(TaskOutput::message(format!(
                "{} {} -> {} ({state})",
                input.kind, report.input, report.output
            )))
        }
    }
}

/// `html-transform`: every HTML file under `root`, rewritten in place.
pub async fn run_html(input: &TaskInput<'_>, ctx: &ExecutionContext) -> Result<TaskOutput> {
    let options = input.options;
    let settings = Settings::from_options(options, input.kind)?;
    let root = ctx.resolve(options.require_string(ROOT)?);
    if !root.is_dir() {
        return Err(SitepipeError::Precondition(format!(
            "html root not found: {}",
            root.display()
        )));
    }

    let filter = PathFilter::new(&options.get_list(INCLUDE)?, &options.get_list(EXCLUDE)?)?;
    let files: Vec<PathBuf> = collect_matching_files(&root, &filter)?
        .into_iter()
        .filter(|p| is_html_file(p))
        .collect();

    let mut changed = 0usize;
    let mut failed = 0usize;
    for file in &files {
        let outcome = transform_file(options, ctx, settings, file, file).await?;
        match outcome.failure {
            Some(err) if settings.allow_failure => {
                warn!(file = %file.display(), error = %err, "html transform failed; allowed failure");
                failed += 1;
            }
            Some(err) => return Err(err),
            None if outcome.report.changed => changed += 1,
            None => {}
        }
    }

    info!(root = %root.display(), files = files.len(), changed, failed, "html transform done");
    let mut message = format!("html-transform: {} files, {changed} changed", files.len());
    if failed > 0 {
        message.push_str(&format!(", {failed} allowed failures"));
    }
    Ok(TaskOutput::message(message))
}
