// src/exec/tree.rs

//! Whole-process-tree termination.
//!
//! On Unix every supervised child is spawned as the leader of a new process
//! group, so killing the group reaches grandchildren too. On Windows the
//! tree is terminated with `taskkill /T /F`.

use std::io;

use tokio::process::Command;
use tracing::{debug, warn};

/// Configure `cmd` so that its whole tree can be killed later.
pub fn prepare(cmd: &mut Command) {
    #[cfg(unix)]
    {
        cmd.process_group(0);
    }
    #[cfg(not(unix))]
    {
        let _ = cmd;
    }
}

/// Kills the process tree rooted at `pid` when dropped, unless disarmed.
///
/// Kill failures are logged and never escalated.
#[derive(Debug)]
pub struct ProcessTreeGuard {
    pid: Option<u32>,
    command: String,
}

impl ProcessTreeGuard {
    pub fn new(pid: Option<u32>, command: impl Into<String>) -> Self {
        Self {
            pid,
            command: command.into(),
        }
    }

    /// The process exited normally; nothing to clean up.
    pub fn disarm(&mut self) {
        self.pid = None;
    }

    /// Kill the tree now (idempotent).
    pub fn kill_now(&mut self) {
        if let Some(pid) = self.pid.take() {
            match kill_tree(pid) {
                Ok(()) => debug!(pid, command = %self.command, "killed process tree"),
                Err(e) => warn!(
                    pid,
                    command = %self.command,
                    error = %e,
                    "failed to kill process tree"
                ),
            }
        }
    }
}

impl Drop for ProcessTreeGuard {
    fn drop(&mut self) {
        self.kill_now();
    }
}

/// Forcibly terminate the process group led by `pid`.
#[cfg(unix)]
pub fn kill_tree(pid: u32) -> io::Result<()> {
    let pgid = libc::pid_t::try_from(pid)
        .map_err(|_| io::Error::new(io::ErrorKind::InvalidInput, "pid out of range"))?;
    // SAFETY: killpg has no memory-safety preconditions.
    let rc = unsafe { libc::killpg(pgid, libc::SIGKILL) };
    if rc == 0 {
        return Ok(());
    }
    let err = io::Error::last_os_error();
    if err.raw_os_error() == Some(libc::ESRCH) {
        // Group already gone.
        Ok(())
    } else {
        Err(err)
    }
}

/// Forcibly terminate the process tree rooted at `pid`.
#[cfg(windows)]
pub fn kill_tree(pid: u32) -> io::Result<()> {
    let status = std::process::Command::new("taskkill")
        .args(["/PID", &pid.to_string(), "/T", "/F"])
        .stdout(std::process::Stdio::null())
        .stderr(std::process::Stdio::null())
        .status()?;
    if status.success() {
        Ok(())
    } else {
        Err(io::Error::other(format!("taskkill exited with {status}")))
    }
}
