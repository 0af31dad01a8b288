//! Template dependencies: local directories or remote `.tar.gz` archives that provide
//! templates (via `gantry-package.toml`) or just importable libraries.

pub mod cache;
pub mod error;
pub mod manifest;
pub mod resolver;

pub use cache::DependencyCache;
pub use error::DependencyError;
pub use manifest::{ManifestError, PackageManifest, MANIFEST_FILENAME};
pub use resolver::{dependency_name, Dependency, DependencyResolver};
