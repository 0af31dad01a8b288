//! Project root plus configuration.

use std::path::{Path, PathBuf};

use crate::config::GantryConfig;

/// Everything the pipeline needs to know about the project it runs in.
///
/// All configured paths are resolved against `root`. An empty root keeps paths
/// relative, which is what the CLI uses so that reported paths match what users type.
#[derive(Debug, Clone, Default)]
pub struct GantryContext {
    pub root: PathBuf,
    pub config: GantryConfig,
}

impl GantryContext {
    pub fn new(root: impl Into<PathBuf>, config: GantryConfig) -> Self {
        Self {
            root: root.into(),
            config,
        }
    }

    /// Resolve a configured path against the project root.
    pub fn resolve_path(&self, path: impl AsRef<Path>) -> PathBuf {
        self.root.join(path)
    }

    pub fn templates_dir(&self) -> PathBuf {
        self.resolve_path(&self.config.templates.dir)
    }

    pub fn libs_dir(&self) -> PathBuf {
        self.resolve_path(&self.config.templates.libs_dir)
    }

    pub fn output_dir(&self) -> PathBuf {
        self.resolve_path(&self.config.workflows.output_dir)
    }
}
