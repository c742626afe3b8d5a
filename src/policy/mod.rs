// src/policy/mod.rs

//! Option policies applied before a handler runs.

pub mod explicit_checks;
pub mod fast_mode;

pub use explicit_checks::{AUDIT_CHECKS, ensure_explicit_checks, missing_explicit_checks};
pub use fast_mode::{FAST_MAX_HTML_FILES, FastOverride, apply_fast_mode};
