//! Extraction cache for remote dependency archives.
//!
//! Archives are unpacked to `<base>/_url_<hash>/`, where the hash is taken from the
//! reference string so that the same reference always lands in the same place.
//! The default base is `~/.cache/gantry/dependencies/`. Every fetch replaces the
//! previous extraction; nothing is trusted across runs.

use std::collections::hash_map::DefaultHasher;
use std::hash::{Hash, Hasher};
use std::path::{Path, PathBuf};

use flate2::read::GzDecoder;

use super::error::DependencyError;
use super::manifest::MANIFEST_FILENAME;

const CACHE_DIR_NAME: &str = "gantry";
const DEPENDENCIES_DIR_NAME: &str = "dependencies";

/// Location of extracted remote dependencies.
#[derive(Debug, Clone)]
pub struct DependencyCache {
    base: PathBuf,
}

impl DependencyCache {
    pub fn new(base: impl Into<PathBuf>) -> Self {
        Self { base: base.into() }
    }

    /// Cache rooted in the user cache directory: `$XDG_CACHE_HOME/gantry/dependencies`,
    /// then `$HOME/.cache/gantry/dependencies`, then the system temp directory.
    pub fn from_env() -> Self {
        let cache_dir = if let Ok(xdg) = std::env::var("XDG_CACHE_HOME") {
            PathBuf::from(xdg)
        } else if let Ok(home) = std::env::var("HOME") {
            PathBuf::from(home).join(".cache")
        } else {
            tracing::debug!("Neither XDG_CACHE_HOME nor HOME is set, caching under temp dir");
            std::env::temp_dir()
        };

        Self::new(cache_dir.join(CACHE_DIR_NAME).join(DEPENDENCIES_DIR_NAME))
    }

    pub fn base(&self) -> &Path {
        &self.base
    }

    /// Deterministic extraction directory for a reference.
    pub fn dir_for(&self, reference: &str) -> PathBuf {
        let mut hasher = DefaultHasher::new();
        reference.hash(&mut hasher);
        self.base.join(format!("_url_{:016x}", hasher.finish()))
    }

    /// Unpack a `.tar.gz` archive for `reference` and return the package root.
    pub(crate) fn materialize(
        &self,
        reference: &str,
        archive: &[u8],
    ) -> Result<PathBuf, DependencyError> {
        let target = self.dir_for(reference);
        let fetch_error = |message: String| DependencyError::Fetch {
            reference: reference.to_string(),
            message,
        };

        if target.exists() {
            std::fs::remove_dir_all(&target).map_err(|e| {
                fetch_error(format!(
                    "cannot clear cache directory {}: {e}",
                    target.display()
                ))
            })?;
        }
        std::fs::create_dir_all(&target).map_err(|e| {
            fetch_error(format!(
                "cannot create cache directory {}: {e}",
                target.display()
            ))
        })?;

        let mut unpacker = tar::Archive::new(GzDecoder::new(archive));
        if let Err(e) = unpacker.unpack(&target) {
            // Clean up partial extraction
            let _ = std::fs::remove_dir_all(&target);
            return Err(fetch_error(format!("cannot extract archive: {e}")));
        }

        package_root(&target)
            .map_err(|e| fetch_error(format!("cannot read extracted archive: {e}")))
    }
}

/// Packages wrapped in a single top-level directory (`repo-main/`) use that directory
/// as the root, but only when the manifest lives there. Anything else, such as a
/// library-only `lib/` archive, keeps the extraction directory as the root.
fn package_root(extracted: &Path) -> std::io::Result<PathBuf> {
    if extracted.join(MANIFEST_FILENAME).try_exists()? {
        return Ok(extracted.to_path_buf());
    }

    let entries = std::fs::read_dir(extracted)?.collect::<Result<Vec<_>, _>>()?;
    match entries.as_slice() {
        [only]
            if only.file_type()?.is_dir() && only.path().join(MANIFEST_FILENAME).try_exists()? =>
        {
            Ok(only.path())
        }
        _ => Ok(extracted.to_path_buf()),
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use flate2::write::GzEncoder;
    use flate2::Compression;

    /// Build an in-memory `.tar.gz` from `(path, content)` pairs.
    pub(crate) fn tar_gz(files: &[(&str, &str)]) -> Vec<u8> {
        let encoder = GzEncoder::new(Vec::new(), Compression::default());
        let mut builder = tar::Builder::new(encoder);
        for (path, content) in files {
            let mut header = tar::Header::new_gnu();
            header.set_size(content.len() as u64);
            header.set_mode(0o644);
            header.set_cksum();
            builder
                .append_data(&mut header, path, content.as_bytes())
                .unwrap();
        }
        builder.into_inner().unwrap().finish().unwrap()
    }

    #[test]
    fn test_dir_for_is_deterministic() {
        let cache = DependencyCache::new("/cache");
        let a = cache.dir_for("https://example.com/a.tar.gz");
        assert_eq!(a, cache.dir_for("https://example.com/a.tar.gz"));
        assert_ne!(a, cache.dir_for("https://example.com/b.tar.gz"));
        assert!(a.starts_with("/cache"));
        assert!(a.file_name().unwrap().to_str().unwrap().starts_with("_url_"));
    }

    #[test]
    #[serial_test::serial]
    fn test_from_env_prefers_xdg_cache_home() {
        let previous = std::env::var_os("XDG_CACHE_HOME");
        std::env::set_var("XDG_CACHE_HOME", "/xdg-cache");

        let cache = DependencyCache::from_env();

        match previous {
            Some(value) => std::env::set_var("XDG_CACHE_HOME", value),
            None => std::env::remove_var("XDG_CACHE_HOME"),
        }
        assert_eq!(cache.base(), Path::new("/xdg-cache/gantry/dependencies"));
    }

    #[test]
    fn test_materialize_flat_archive() {
        let dir = tempfile::tempdir().unwrap();
        let cache = DependencyCache::new(dir.path());
        let archive = tar_gz(&[
            ("gantry-package.toml", "files = []\n"),
            ("lib/a.libsonnet", "{}"),
        ]);

        let root = cache.materialize("ref", &archive).unwrap();
        assert_eq!(root, cache.dir_for("ref"));
        assert!(root.join("lib/a.libsonnet").is_file());
    }

    #[test]
    fn test_materialize_unwraps_single_top_level_dir() {
        let dir = tempfile::tempdir().unwrap();
        let cache = DependencyCache::new(dir.path());
        let archive = tar_gz(&[
            ("my-lib-main/gantry-package.toml", "files = []\n"),
            ("my-lib-main/workflows/a.jsonnet", "{}"),
        ]);

        let root = cache.materialize("ref", &archive).unwrap();
        assert_eq!(root, cache.dir_for("ref").join("my-lib-main"));
        assert!(root.join("workflows/a.jsonnet").is_file());
    }

    #[test]
    fn test_materialize_keeps_single_library_dir_in_place() {
        let dir = tempfile::tempdir().unwrap();
        let cache = DependencyCache::new(dir.path());
        let archive = tar_gz(&[
            ("lib/steps.libsonnet", "{}"),
            ("lib/more.libsonnet", "{}"),
        ]);

        let root = cache.materialize("ref", &archive).unwrap();
        assert_eq!(root, cache.dir_for("ref"));
        assert!(root.join("lib/steps.libsonnet").is_file());
    }

    #[test]
    fn test_materialize_replaces_previous_extraction() {
        let dir = tempfile::tempdir().unwrap();
        let cache = DependencyCache::new(dir.path());
        cache
            .materialize("ref", &tar_gz(&[("old.libsonnet", "{}"), ("keep.libsonnet", "{}")]))
            .unwrap();
        let root = cache
            .materialize("ref", &tar_gz(&[("new.libsonnet", "{}"), ("keep.libsonnet", "{}")]))
            .unwrap();

        assert!(!root.join("old.libsonnet").exists());
        assert!(root.join("new.libsonnet").is_file());
    }

    #[test]
    fn test_materialize_rejects_garbage() {
        let dir = tempfile::tempdir().unwrap();
        let cache = DependencyCache::new(dir.path());

        let result = cache.materialize("ref", b"definitely not gzip");
        assert!(matches!(result, Err(DependencyError::Fetch { .. })));
        assert!(!cache.dir_for("ref").exists());
    }
}
