// src/exec/process.rs

//! Supervised execution of a single external process.
//!
//! Shared by every task that shells out (hooks, transforms, exec, git,
//! dotnet, and the collaborator process bridge).

use std::borrow::Cow;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::process::Stdio;
use std::time::Duration;

use tokio::io::{AsyncRead, AsyncReadExt, AsyncWriteExt};
use tokio::process::Command;
use tokio::task::JoinHandle;
use tokio::time::Instant;
use tracing::{debug, info, warn};

use crate::errors::{Result, SitepipeError};
use crate::exec::cmdline::{display_arg, shell_quote, split_command_line};
use crate::exec::preview::output_preview;
use crate::exec::tree::{self, ProcessTreeGuard};

/// Timeout applied when a non-positive value is configured.
pub const DEFAULT_TIMEOUT_SECS: u64 = 600;

/// Clamp a configured timeout to a usable positive value.
pub fn normalize_timeout(timeout_secs: i64) -> u64 {
    if timeout_secs <= 0 {
        DEFAULT_TIMEOUT_SECS
    } else {
        timeout_secs as u64
    }
}

/// Arguments as configured: an explicit list, or a single command-line
/// string that still needs splitting.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProcessArgs {
    List(Vec<String>),
    Line(String),
}

impl Default for ProcessArgs {
    fn default() -> Self {
        ProcessArgs::List(Vec::new())
    }
}

impl ProcessArgs {
    pub fn to_vec(&self) -> Result<Vec<String>> {
        match self {
            ProcessArgs::List(args) => Ok(args.clone()),
            ProcessArgs::Line(line) => split_command_line(line),
        }
    }
}

/// Everything needed to run one supervised process.
#[derive(Debug, Clone)]
pub struct ProcessSpec {
    pub command: String,
    pub args: ProcessArgs,
    pub working_dir: PathBuf,
    pub env: BTreeMap<String, String>,
    pub stdin: Option<Vec<u8>>,
    pub timeout_secs: i64,
    /// Run `command` + args through `sh -c` (or `cmd /C`).
    pub shell: bool,
}

impl ProcessSpec {
    pub fn new(command: impl Into<String>, working_dir: impl Into<PathBuf>) -> Self {
        Self {
            command: command.into(),
            args: ProcessArgs::default(),
            working_dir: working_dir.into(),
            env: BTreeMap::new(),
            stdin: None,
            timeout_secs: DEFAULT_TIMEOUT_SECS as i64,
            shell: false,
        }
    }

    pub fn args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.args = ProcessArgs::List(args.into_iter().map(Into::into).collect());
        self
    }

    pub fn arg_line(mut self, line: impl Into<String>) -> Self {
        self.args = ProcessArgs::Line(line.into());
        self
    }

    pub fn env(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.env.insert(key.into(), value.into());
        self
    }

    pub fn stdin(mut self, content: impl Into<Vec<u8>>) -> Self {
        self.stdin = Some(content.into());
        self
    }

    pub fn timeout_secs(mut self, secs: i64) -> Self {
        self.timeout_secs = secs;
        self
    }

    pub fn shell(mut self, shell: bool) -> Self {
        self.shell = shell;
        self
    }

    /// Human-readable command line for logs and error messages.
    pub fn display_command(&self) -> String {
        let args = match &self.args {
            ProcessArgs::List(args) => args.iter().map(|a| display_arg(a)).collect::<Vec<_>>(),
            ProcessArgs::Line(line) if line.trim().is_empty() => Vec::new(),
            ProcessArgs::Line(line) => vec![line.trim().to_string()],
        };
        if args.is_empty() {
            self.command.clone()
        } else {
            format!("{} {}", self.command, args.join(" "))
        }
    }
}

/// Captured result of a process that exited on its own.
///
/// Output is kept as raw bytes; use [`stdout_text`](Self::stdout_text) and
/// [`stderr_text`](Self::stderr_text) for a lossy UTF-8 view.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProcessOutput {
    pub exit_code: i32,
    pub stdout: Vec<u8>,
    pub stderr: Vec<u8>,
}

impl ProcessOutput {
    pub fn success(&self) -> bool {
        self.exit_code == 0
    }

    pub fn stdout_text(&self) -> Cow<'_, str> {
        String::from_utf8_lossy(&self.stdout)
    }

    pub fn stderr_text(&self) -> Cow<'_, str> {
        String::from_utf8_lossy(&self.stderr)
    }

    /// Short single-line excerpt of the output (stderr first).
    pub fn preview(&self) -> Option<String> {
        output_preview(&self.stderr_text(), &self.stdout_text())
    }

    /// Turn a nonzero exit into [`SitepipeError::ProcessFailed`].
    pub fn into_success(self, command: &str) -> Result<ProcessOutput> {
        if self.success() {
            Ok(self)
        } else {
            Err(self.failure(command))
        }
    }

    pub fn failure(&self, command: &str) -> SitepipeError {
        SitepipeError::ProcessFailed {
            command: command.to_string(),
            exit_code: self.exit_code,
            preview: self.preview(),
        }
    }
}

/// Run a process to completion under supervision.
///
/// - Fails with [`SitepipeError::Precondition`] before spawning when the
///   working directory does not exist.
/// - stdout and stderr are drained concurrently with the wait so a chatty
///   child can never block on a full pipe.
/// - The timeout covers the child and any descendants still holding its
///   output pipes. When it elapses the whole process tree is killed and
///   [`SitepipeError::Timeout`] is returned.
///
/// A nonzero exit code is *not* an error here; callers decide with
/// [`ProcessOutput::into_success`].
pub async fn run_process(spec: &ProcessSpec) -> Result<ProcessOutput> {
    ensure_working_dir(&spec.working_dir)?;

    let timeout_secs = normalize_timeout(spec.timeout_secs);
    let command_line = spec.display_command();
    let mut cmd = build_command(spec)?;

    cmd.current_dir(&spec.working_dir)
        .envs(&spec.env)
        .stdin(if spec.stdin.is_some() {
            Stdio::piped()
        } else {
            Stdio::null()
        })
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .kill_on_drop(true);
    tree::prepare(&mut cmd);

    info!(
        command = %command_line,
        cwd = %spec.working_dir.display(),
        timeout_secs,
        "starting process"
    );

    let mut child = cmd.spawn().map_err(|e| SitepipeError::SpawnFailed {
        command: command_line.clone(),
        reason: e.to_string(),
    })?;
    let mut guard = ProcessTreeGuard::new(child.id(), command_line.clone());

    let stdin = match (child.stdin.take(), spec.stdin.clone()) {
        (Some(mut pipe), Some(bytes)) => Some(tokio::spawn(async move {
            if let Err(e) = pipe.write_all(&bytes).await {
                // The child may legitimately exit without reading its input.
                debug!(error = %e, "stdin closed before all input was written");
            }
            drop(pipe);
        })),
        _ => None,
    };
    let mut drains = Drains {
        stdout: spawn_drain(child.stdout.take()),
        stderr: spawn_drain(child.stderr.take()),
        stdin,
    };

    let deadline = Instant::now() + Duration::from_secs(timeout_secs);

    let waited = tokio::time::timeout_at(deadline, child.wait()).await;
    let status = match waited {
        Ok(status) => status?,
        Err(_elapsed) => {
            warn!(
                command = %command_line,
                timeout_secs,
                "process timed out; killing process tree"
            );
            guard.kill_now();
            if let Err(e) = child.kill().await {
                debug!(command = %command_line, error = %e, "child already gone after tree kill");
            }
            drains.abort();
            return Err(SitepipeError::Timeout {
                command: command_line,
                seconds: timeout_secs,
            });
        }
    };

    // Background descendants may still hold the output pipes open; the
    // guard stays armed until both streams reach EOF.
    let collected = tokio::time::timeout_at(deadline, drains.collect()).await;
    let (stdout, stderr) = match collected {
        Ok(collected) => collected,
        Err(_elapsed) => {
            warn!(
                command = %command_line,
                timeout_secs,
                "process exited but its descendants kept output open; killing process tree"
            );
            guard.kill_now();
            drains.abort();
            return Err(SitepipeError::Timeout {
                command: command_line,
                seconds: timeout_secs,
            });
        }
    };
    guard.disarm();

    let exit_code = status.code().unwrap_or(-1);
    info!(
        command = %command_line,
        exit_code,
        success = status.success(),
        "process exited"
    );

    Ok(ProcessOutput {
        exit_code,
        stdout,
        stderr,
    })
}

fn ensure_working_dir(dir: &Path) -> Result<()> {
    if dir.is_dir() {
        Ok(())
    } else {
        Err(SitepipeError::Precondition(format!(
            "working directory not found: {}",
            dir.display()
        )))
    }
}

fn build_command(spec: &ProcessSpec) -> Result<Command> {
    if spec.shell {
        let mut line = spec.command.clone();
        match &spec.args {
            ProcessArgs::List(args) => {
                for arg in args {
                    line.push(' ');
                    line.push_str(&shell_quote(arg, cfg!(windows)));
                }
            }
            ProcessArgs::Line(raw) if !raw.trim().is_empty() => {
                line.push(' ');
                line.push_str(raw.trim());
            }
            ProcessArgs::Line(_) => {}
        }
        let cmd = if cfg!(windows) {
            let mut c = Command::new("cmd");
            c.arg("/C").arg(line);
            c
        } else {
            let mut c = Command::new("sh");
            c.arg("-c").arg(line);
            c
        };
        return Ok(cmd);
    }

    let mut cmd = Command::new(&spec.command);
    cmd.args(spec.args.to_vec()?);
    Ok(cmd)
}

fn spawn_drain<R>(pipe: Option<R>) -> JoinHandle<Vec<u8>>
where
    R: AsyncRead + Unpin + Send + 'static,
{
    tokio::spawn(async move {
        let mut buf = Vec::new();
        if let Some(mut reader) = pipe {
            if let Err(e) = reader.read_to_end(&mut buf).await {
                debug!(error = %e, "output stream closed with error");
            }
        }
        buf
    })
}

/// Background tasks feeding and draining the child's standard streams.
struct Drains {
    stdout: JoinHandle<Vec<u8>>,
    stderr: JoinHandle<Vec<u8>>,
    stdin: Option<JoinHandle<()>>,
}

impl Drains {
    /// Wait for both output streams to reach EOF.
    async fn collect(&mut self) -> (Vec<u8>, Vec<u8>) {
        let stdout = join_drain(&mut self.stdout).await;
        let stderr = join_drain(&mut self.stderr).await;
        if let Some(task) = self.stdin.take() {
            let _ = task.await;
        }
        (stdout, stderr)
    }

    fn abort(&self) {
        self.stdout.abort();
        self.stderr.abort();
        if let Some(task) = &self.stdin {
            task.abort();
        }
    }
}

async fn join_drain(task: &mut JoinHandle<Vec<u8>>) -> Vec<u8> {
    match task.await {
        Ok(bytes) => bytes,
        Err(e) => {
            warn!(error = %e, "output drain task failed");
            Vec::new()
        }
    }
}
