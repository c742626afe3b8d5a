// src/config/mod.rs

//! Pipeline document loading and validation.
//!
//! Responsibilities:
//! - Define the serde-backed document model (`model.rs`).
//! - Provide the typed option accessor used by every handler (`options.rs`).
//! - Load a JSON or TOML document from disk (`loader.rs`).
//! - Validate step-level invariants (`validate.rs`).

pub mod loader;
pub mod model;
pub mod options;
pub mod validate;

pub use loader::{DocumentFormat, load_and_validate, load_from_path, parse_document};
pub use model::{
    PipelineDocument, PipelineStep, RawPipelineDocument, RawStep, ToolCommand, ToolsSection,
};
pub use options::{FromOption, StepOptions, normalize_key};
pub use validate::validate_document;
