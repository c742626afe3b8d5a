// src/engine/mod.rs

//! Pipeline execution engine.
//!
//! - [`dispatch`] maps a task discriminator to its handler.
//! - [`context`] holds the state threaded through a run (base directory,
//!   fast flag, mode, build carryover).
//! - [`runner`] iterates steps in order, applies fast-mode overrides,
//!   records results and decides when to abort.
//! - [`env`] is the host environment snapshot injected into handlers.

pub mod context;
pub mod dispatch;
pub mod env;
pub mod runner;

pub use context::{BuildCarryover, ExecutionContext, paths_equal};
pub use dispatch::{TaskKind, UNKNOWN_TASK_MESSAGE, dispatch};
pub use env::HostEnv;
pub use runner::{Pipeline, PipelineRun};
