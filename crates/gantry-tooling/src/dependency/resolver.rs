//! Dependency resolution with per-run memoization.
//!
//! A reference is either a local directory (resolved against the project root) or a
//! remote `.tar.gz` URL. Remote references are fetched and extracted at most once per
//! resolver; repeated calls, including failed ones, return the memoized outcome.

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, PoisonError};
use std::time::Duration;

use once_cell::sync::OnceCell;

use super::cache::DependencyCache;
use super::error::DependencyError;
use super::manifest::PackageManifest;
use crate::catalog::{self, CatalogError};
use crate::context::GantryContext;
use crate::fetch::{self, Fetcher, HttpFetcher};
use crate::paths::PathInfo;

const ARCHIVE_SUFFIXES: [&str; 2] = [".tar.gz", ".tgz"];

/// A materialized dependency.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Dependency {
    /// The reference exactly as configured.
    pub reference: String,
    /// Display name: last path segment without archive extension.
    pub name: String,
    /// Where the dependency's files live on disk.
    pub local_dir: PathBuf,
    /// Template paths from the manifest, relative to `local_dir`.
    pub manifest_files: Vec<String>,
    /// Library paths from the manifest, relative to `local_dir`.
    pub manifest_libs: Vec<String>,
    /// Whether a manifest was found at all.
    pub has_manifest: bool,
}

impl Dependency {
    /// Templates provided by this dependency, in manifest order.
    pub fn templates(&self) -> Vec<PathInfo> {
        self.manifest_files
            .iter()
            .map(|file| {
                let path = self.local_dir.join(file);
                PathInfo {
                    source_path: path.clone(),
                    local_path: path,
                    description: format!("{}/{}", self.name, file),
                }
            })
            .collect()
    }

    /// Files whose changes can affect generated output.
    ///
    /// Manifest templates then manifest libraries. Without a manifest every template
    /// and library under `local_dir` is importable, so all of them are listed.
    pub fn observable_files(&self) -> Result<Vec<PathBuf>, CatalogError> {
        if !self.has_manifest {
            return Ok(catalog::list_sources(&self.local_dir)?
                .into_iter()
                .map(|info| info.local_path)
                .collect());
        }

        Ok(self
            .manifest_files
            .iter()
            .chain(&self.manifest_libs)
            .map(|file| self.local_dir.join(file))
            .collect())
    }
}

type Memo = Arc<OnceCell<Result<Dependency, DependencyError>>>;

/// Resolves dependency references for one run.
#[derive(Debug)]
pub struct DependencyResolver {
    root: PathBuf,
    cache: DependencyCache,
    fetcher: Box<dyn Fetcher>,
    resolved: Mutex<HashMap<String, Memo>>,
}

impl DependencyResolver {
    pub fn new(root: impl Into<PathBuf>, cache: DependencyCache, fetcher: Box<dyn Fetcher>) -> Self {
        Self {
            root: root.into(),
            cache,
            fetcher,
            resolved: Mutex::new(HashMap::new()),
        }
    }

    /// Resolver using the context's root, cache location, and fetch timeout.
    pub fn for_context(context: &GantryContext) -> Self {
        let templates = &context.config.templates;
        let cache = match &templates.cache_dir {
            Some(dir) => DependencyCache::new(context.resolve_path(dir)),
            None => DependencyCache::from_env(),
        };
        let fetcher = HttpFetcher::new(Duration::from_secs(templates.fetch_timeout_secs));
        Self::new(context.root.clone(), cache, Box::new(fetcher))
    }

    pub fn is_remote(reference: &str) -> bool {
        fetch::remote_url(reference).is_some()
    }

    /// Deterministic extraction directory for a remote reference.
    pub fn cache_dir_for(&self, reference: &str) -> PathBuf {
        self.cache.dir_for(reference)
    }

    /// Resolve a reference, fetching it on first use.
    pub fn resolve(&self, reference: &str) -> Result<Dependency, DependencyError> {
        let memo = {
            let mut resolved = self.resolved.lock().unwrap_or_else(PoisonError::into_inner);
            Arc::clone(resolved.entry(reference.to_string()).or_default())
        };

        // Lock released: different references resolve independently, the same
        // reference waits on its cell.
        memo.get_or_init(|| self.materialize(reference)).clone()
    }

    fn materialize(&self, reference: &str) -> Result<Dependency, DependencyError> {
        let local_dir = match fetch::remote_url(reference) {
            Some(url) => {
                tracing::debug!(%url, "Fetching dependency");
                let archive = self
                    .fetcher
                    .fetch(&url)
                    .map_err(|e| DependencyError::Fetch {
                        reference: reference.to_string(),
                        message: e.to_string(),
                    })?;
                self.cache.materialize(reference, &archive)?
            }
            None => {
                let path = self.root.join(reference);
                if !path.is_dir() {
                    return Err(DependencyError::NotFound {
                        reference: reference.to_string(),
                        path,
                    });
                }
                path
            }
        };

        let manifest =
            PackageManifest::load(&local_dir).map_err(|e| DependencyError::Manifest {
                reference: reference.to_string(),
                message: e.to_string(),
            })?;

        if let Some(manifest) = &manifest {
            let missing = manifest
                .files
                .iter()
                .chain(&manifest.libs)
                .find(|entry| !local_dir.join(entry).is_file());
            if let Some(entry) = missing {
                return Err(DependencyError::Manifest {
                    reference: reference.to_string(),
                    message: format!("listed file '{entry}' does not exist"),
                });
            }
        }

        let dependency = Dependency {
            reference: reference.to_string(),
            name: dependency_name(reference),
            has_manifest: manifest.is_some(),
            manifest_files: manifest.as_ref().map(|m| m.files.clone()).unwrap_or_default(),
            manifest_libs: manifest.map(|m| m.libs).unwrap_or_default(),
            local_dir,
        };
        tracing::debug!(
            dependency = %dependency.name,
            dir = ?dependency.local_dir,
            templates = dependency.manifest_files.len(),
            "Resolved dependency"
        );
        Ok(dependency)
    }
}

/// Display name for a reference: its last path segment, archive suffix removed.
pub fn dependency_name(reference: &str) -> String {
    let path = match fetch::remote_url(reference) {
        Some(url) => url.path().to_string(),
        None => reference.to_string(),
    };

    let segment = Path::new(path.trim_end_matches('/'))
        .file_name()
        .and_then(|name| name.to_str())
        .unwrap_or(reference);

    ARCHIVE_SUFFIXES
        .iter()
        .find_map(|suffix| segment.strip_suffix(suffix))
        .unwrap_or(segment)
        .to_string()
}
