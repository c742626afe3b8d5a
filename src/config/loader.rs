// src/config/loader.rs

use std::fs;
use std::path::{Path, PathBuf};

use crate::config::model::{DocumentShape, PipelineDocument, RawPipelineDocument};
use crate::errors::Result;

/// Document syntax, picked from the file extension.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DocumentFormat {
    Json,
    Toml,
}

impl DocumentFormat {
    /// `.toml` files are TOML; everything else is read as JSON.
    pub fn from_path(path: &Path) -> Self {
        match path.extension().and_then(|e| e.to_str()) {
            Some(ext) if ext.eq_ignore_ascii_case("toml") => DocumentFormat::Toml,
            _ => DocumentFormat::Json,
        }
    }
}

/// Parse a pipeline document without semantic validation.
pub fn parse_document(contents: &str, format: DocumentFormat) -> Result<RawPipelineDocument> {
    let shape: DocumentShape = match format {
        DocumentFormat::Json => serde_json::from_str(contents)?,
        DocumentFormat::Toml => toml::from_str(contents)?,
    };
    Ok(shape.into())
}

/// Load a pipeline document from a given path and return the raw model.
///
/// This only performs deserialization; use [`load_and_validate`] to also
/// check step-level invariants.
pub fn load_from_path(path: impl AsRef<Path>) -> Result<RawPipelineDocument> {
    let path = path.as_ref();
    let contents = fs::read_to_string(path)?;
    parse_document(&contents, DocumentFormat::from_path(path))
}

/// Load a pipeline document from path and run validation.
///
/// - Reads JSON or TOML.
/// - Resolves labels (defaulting to the task discriminator).
/// - Checks that there is at least one step and every step names a task.
///
/// Unknown task discriminators are *not* rejected here; the engine reports
/// them as failed steps at run time.
pub fn load_and_validate(path: impl AsRef<Path>) -> Result<PipelineDocument> {
    let raw = load_from_path(&path)?;
    PipelineDocument::try_from(raw)
}

/// Default pipeline document location: `sitepipe.json` in the current
/// working directory.
pub fn default_config_path() -> PathBuf {
    PathBuf::from("sitepipe.json")
}
