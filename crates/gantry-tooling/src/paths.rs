//! Path bookkeeping shared by local and dependency-provided templates.

use std::path::PathBuf;

/// Where a template lives and how it should be presented.
///
/// Local templates use the same path for all three fields. Templates that come from a
/// dependency are read from the dependency's materialized directory but described
/// relative to the dependency (`my-lib/workflows/build.jsonnet`), so the description
/// stays stable regardless of where the cache happens to be.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PathInfo {
    /// Path handed to the evaluator as the template's own location (import base).
    pub source_path: PathBuf,
    /// Path the template bytes are read from.
    pub local_path: PathBuf,
    /// Display path, also written into the generated header.
    pub description: String,
}

impl PathInfo {
    /// Path info for a file discovered on local storage.
    pub fn local(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        Self {
            description: path.display().to_string(),
            source_path: path.clone(),
            local_path: path,
        }
    }
}
