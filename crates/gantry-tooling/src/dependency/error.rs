//! Error types for dependency resolution.

use std::path::PathBuf;

/// Why a single dependency could not be used.
///
/// Failures are memoized alongside successes, so the error carries rendered messages
/// rather than source errors and can be cloned to every caller.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DependencyError {
    #[error("failed to fetch dependency '{reference}': {message}")]
    Fetch { reference: String, message: String },

    #[error("dependency '{reference}' not found at {}", path.display())]
    NotFound { reference: String, path: PathBuf },

    #[error("invalid manifest for dependency '{reference}': {message}")]
    Manifest { reference: String, message: String },
}

impl DependencyError {
    /// The configured reference this error belongs to.
    pub fn reference(&self) -> &str {
        match self {
            Self::Fetch { reference, .. }
            | Self::NotFound { reference, .. }
            | Self::Manifest { reference, .. } => reference,
        }
    }
}
