// src/cli.rs

//! CLI argument parsing using `clap`.

use std::path::PathBuf;

use clap::{Parser, ValueEnum};

#[derive(Debug, Clone, Parser)]
#[command(
    name = "sitepipe",
    version,
    about = "Run a declarative site-publishing pipeline step by step.",
    long_about = None
)]
pub struct CliArgs {
    /// Pipeline document (JSON, or TOML by extension).
    #[arg(long, short = 'c', value_name = "PATH", default_value = "sitepipe.json")]
    pub config: PathBuf,

    /// Base directory for relative paths in step options.
    ///
    /// Default: the directory containing the pipeline document.
    #[arg(long, value_name = "DIR")]
    pub base_dir: Option<PathBuf>,

    /// Trade thoroughness for speed (per-task option overrides).
    #[arg(long, env = "SITEPIPE_FAST")]
    pub fast: bool,

    /// Execution mode exported to hooks and exec steps.
    ///
    /// Default: "fast" with --fast, otherwise "default".
    #[arg(long, value_name = "MODE", env = "SITEPIPE_MODE")]
    pub mode: Option<String>,

    /// Print the pipeline result as JSON on stdout.
    #[arg(long)]
    pub json: bool,

    /// Log level for every target. Without it, `SITEPIPE_LOG` (any
    /// tracing filter directive) or `info` applies.
    #[arg(long, value_enum, value_name = "LEVEL")]
    pub log_level: Option<LogLevel>,

    /// Validate the document and list the steps without running them.
    #[arg(long)]
    pub dry_run: bool,
}

#[derive(Debug, Copy, Clone, PartialEq, Eq, ValueEnum)]
pub enum LogLevel {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

impl LogLevel {
    pub fn as_directive(self) -> &'static str {
        match self {
            LogLevel::Error => "error",
            LogLevel::Warn => "warn",
            LogLevel::Info => "info",
            LogLevel::Debug => "debug",
            LogLevel::Trace => "trace",
        }
    }
}

pub fn parse() -> CliArgs {
    CliArgs::parse()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults() {
        let args = CliArgs::try_parse_from(["sitepipe"]).unwrap();
        assert_eq!(args.config, PathBuf::from("sitepipe.json"));
        assert!(args.base_dir.is_none());
        assert!(!args.json && !args.dry_run);
        assert!(args.log_level.is_none());
    }

    #[test]
    fn flags_parse() {
        let args = CliArgs::try_parse_from([
            "sitepipe",
            "-c",
            "site/pipeline.toml",
            "--base-dir",
            "/srv/site",
            "--fast",
            "--mode",
            "preview",
            "--json",
            "--log-level",
            "debug",
        ])
        .unwrap();
        assert_eq!(args.config, PathBuf::from("site/pipeline.toml"));
        assert_eq!(args.base_dir, Some(PathBuf::from("/srv/site")));
        assert!(args.fast);
        assert_eq!(args.mode.as_deref(), Some("preview"));
        assert!(args.json);
        assert_eq!(args.log_level, Some(LogLevel::Debug));
    }
}
