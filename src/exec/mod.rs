// src/exec/mod.rs

//! Process execution layer.
//!
//! This module runs external programs with `tokio::process::Command` under a
//! single supervision protocol:
//!
//! - [`process`] spawns, drains stdout/stderr concurrently, enforces the
//!   timeout and interprets the exit code.
//! - [`tree`] owns process-group setup and the drop guard that kills the
//!   whole tree.
//! - [`preview`] builds the one-line output excerpt attached to messages.
//! - [`cmdline`] splits configured argument strings and substitutes tokens.

pub mod cmdline;
pub mod preview;
pub mod process;
pub mod tree;

pub use process::{
    DEFAULT_TIMEOUT_SECS, ProcessArgs, ProcessOutput, ProcessSpec, normalize_timeout, run_process,
};
