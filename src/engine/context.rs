// src/engine/context.rs

//! State threaded through one pipeline run.

use std::collections::BTreeSet;
use std::path::{Component, Path, PathBuf};

use tracing::info;

/// Mode reported to hooks when none is given explicitly.
pub const DEFAULT_MODE: &str = "default";
/// Mode reported to hooks in fast mode when none is given explicitly.
pub const FAST_MODE: &str = "fast";

/// Mutable state for the duration of one run.
///
/// Only the runner mutates it, by folding the [`BuildCarryover`] a build
/// handler returns. Every other handler receives `&ExecutionContext`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExecutionContext {
    pub base_dir: PathBuf,
    pub fast: bool,
    pub mode: String,
    pub last_build_output: Option<PathBuf>,
    pub last_build_updated: BTreeSet<PathBuf>,
}

/// What a build step hands forward to later steps.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BuildCarryover {
    pub output_dir: PathBuf,
    pub updated_files: BTreeSet<PathBuf>,
}

impl ExecutionContext {
    pub fn new(base_dir: impl Into<PathBuf>, fast: bool, mode: Option<String>) -> Self {
        let mode = mode
            .map(|m| m.trim().to_string())
            .filter(|m| !m.is_empty())
            .unwrap_or_else(|| {
                if fast { FAST_MODE } else { DEFAULT_MODE }.to_string()
            });
        Self {
            base_dir: base_dir.into(),
            fast,
            mode,
            last_build_output: None,
            last_build_updated: BTreeSet::new(),
        }
    }

    /// Resolve a configured path against the base directory.
    pub fn resolve(&self, path: impl AsRef<Path>) -> PathBuf {
        let path = path.as_ref();
        if path.is_absolute() {
            path.to_path_buf()
        } else {
            self.base_dir.join(path)
        }
    }

    pub fn apply_carryover(&mut self, carryover: BuildCarryover) {
        info!(
            output = %carryover.output_dir.display(),
            updated = carryover.updated_files.len(),
            "recorded build output for later steps"
        );
        self.last_build_output = Some(carryover.output_dir);
        self.last_build_updated = carryover.updated_files;
    }

    /// Whether `root` is the directory the last build wrote to.
    pub fn is_last_build_output(&self, root: &Path) -> bool {
        self.last_build_output
            .as_deref()
            .is_some_and(|out| paths_equal(out, root))
    }
}

/// Lexically normalise a path: drop `.` components, fold `..`, and strip
/// trailing separators.
pub fn normalize_path(path: &Path) -> PathBuf {
    let mut out = PathBuf::new();
    for component in path.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => {
                if !out.pop() {
                    out.push("..");
                }
            }
            other => out.push(other.as_os_str()),
        }
    }
    out
}

/// Case-insensitive comparison of two normalised paths, with `\` and `/`
/// treated alike.
pub fn paths_equal(a: &Path, b: &Path) -> bool {
    let key = |p: &Path| {
        normalize_path(p)
            .to_string_lossy()
            .replace('\\', "/")
            .trim_end_matches('/')
            .to_lowercase()
    };
    key(a) == key(b)
}
