// src/scope/snapshot.rs

//! Content digests used for change detection.

use std::collections::{BTreeMap, BTreeSet};
use std::fs::File;
use std::io::Read;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use blake3::Hasher;
use tracing::debug;

use crate::scope::patterns::{PathFilter, collect_matching_files};

/// Compute the hash of a single file.
pub fn compute_file_hash(path: &Path) -> Result<String> {
    let mut hasher = Hasher::new();
    let mut file =
        File::open(path).with_context(|| format!("opening file for hashing: {:?}", path))?;
    let mut buf = [0u8; 8192];
    loop {
        let n = file.read(&mut buf)?;
        if n == 0 {
            break;
        }
        hasher.update(&buf[..n]);
    }
    Ok(hasher.finalize().to_hex().to_string())
}

/// Digest of a file's content, or `None` when it does not exist.
pub fn content_digest(path: &Path) -> Result<Option<String>> {
    if path.is_file() {
        compute_file_hash(path).map(Some)
    } else {
        Ok(None)
    }
}

/// File digests under a directory at one point in time.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DirSnapshot {
    hashes: BTreeMap<PathBuf, String>,
}

impl DirSnapshot {
    /// Hash every file under `root`. A missing root yields an empty snapshot.
    pub fn capture(root: &Path) -> Result<Self> {
        if !root.is_dir() {
            return Ok(Self::default());
        }
        let mut hashes = BTreeMap::new();
        for path in collect_matching_files(root, &PathFilter::match_all())? {
            let hash = compute_file_hash(&path)?;
            hashes.insert(path, hash);
        }
        debug!(root = %root.display(), files = hashes.len(), "captured directory snapshot");
        Ok(Self { hashes })
    }

    pub fn len(&self) -> usize {
        self.hashes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.hashes.is_empty()
    }

    /// Files that are new or whose content differs from `before`.
    pub fn changed_since(&self, before: &DirSnapshot) -> BTreeSet<PathBuf> {
        self.hashes
            .iter()
            .filter(|(path, hash)| before.hashes.get(*path) != Some(*hash))
            .map(|(path, _)| path.clone())
            .collect()
    }
}
