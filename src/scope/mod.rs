// src/scope/mod.rs

//! File scoping: glob filters, blake3 change detection, and reuse of the
//! last build's updated-file set.

pub mod carryover;
pub mod patterns;
pub mod snapshot;

pub use carryover::{Scope, scope_from_build};
pub use patterns::{PathFilter, collect_matching_files, is_html_file};
pub use snapshot::{DirSnapshot, compute_file_hash, content_digest};
