//! Template source discovery.
//!
//! A `.jsonnet` file is a template and gets evaluated into a workflow. A `.libsonnet`
//! file is a library: importable, never evaluated on its own. Everything else is
//! ignored. Walk order is lexicographic per directory so that listings, and the
//! definitions built from them, are stable between runs.

use std::path::{Path, PathBuf};

use walkdir::WalkDir;

use crate::paths::PathInfo;

pub const TEMPLATE_EXTENSION: &str = "jsonnet";
pub const LIBRARY_EXTENSION: &str = "libsonnet";

/// Classification of a source file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SourceKind {
    Template,
    Library,
}

impl SourceKind {
    /// Classify a path by extension, `None` for files the engine does not read.
    pub fn classify(path: &Path) -> Option<Self> {
        match path.extension().and_then(|ext| ext.to_str()) {
            Some(TEMPLATE_EXTENSION) => Some(Self::Template),
            Some(LIBRARY_EXTENSION) => Some(Self::Library),
            _ => None,
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum CatalogError {
    #[error("failed to walk '{}': {source}", root.display())]
    Walk {
        root: PathBuf,
        source: walkdir::Error,
    },
}

/// List templates and libraries under `root`, interleaved in walk order.
pub fn list_sources(root: &Path) -> Result<Vec<PathInfo>, CatalogError> {
    walk(root, |_| true)
}

/// List only the templates under `root`.
pub fn list_template_sources(root: &Path) -> Result<Vec<PathInfo>, CatalogError> {
    walk(root, |kind| kind == SourceKind::Template)
}

fn walk(root: &Path, keep: impl Fn(SourceKind) -> bool) -> Result<Vec<PathInfo>, CatalogError> {
    if !root.exists() {
        tracing::debug!(?root, "Source directory does not exist, nothing to list");
        return Ok(Vec::new());
    }

    let mut found = Vec::new();
    for entry in WalkDir::new(root).sort_by_file_name() {
        let entry = entry.map_err(|e| CatalogError::Walk {
            root: root.to_path_buf(),
            source: e,
        })?;
        if !entry.file_type().is_file() {
            continue;
        }
        if let Some(kind) = SourceKind::classify(entry.path()) {
            if keep(kind) {
                found.push(PathInfo::local(entry.path()));
            }
        }
    }

    Ok(found)
}
