//! Package manifest parsing (`gantry-package.toml`).
//!
//! A manifest at the root of a dependency lists the templates it provides. Without a
//! manifest, the dependency is only an import path for other templates.

use std::path::{Component, Path, PathBuf};

use serde::Deserialize;

pub const MANIFEST_FILENAME: &str = "gantry-package.toml";

/// Parsed `gantry-package.toml`.
#[derive(Debug, Default, Deserialize, PartialEq, Eq)]
pub struct PackageManifest {
    /// Templates provided by the package, relative to the package root.
    #[serde(default)]
    pub files: Vec<String>,

    /// Library files the templates rely on, relative to the package root.
    #[serde(default)]
    pub libs: Vec<String>,
}

impl PackageManifest {
    /// Load the manifest from a package directory, `Ok(None)` if there is none.
    pub fn load(dir: &Path) -> Result<Option<Self>, ManifestError> {
        let manifest_path = dir.join(MANIFEST_FILENAME);
        if !manifest_path.is_file() {
            return Ok(None);
        }

        let contents =
            std::fs::read_to_string(&manifest_path).map_err(|e| ManifestError::Io {
                path: manifest_path.clone(),
                source: e,
            })?;
        let manifest: Self = toml::from_str(&contents).map_err(|e| ManifestError::Parse {
            path: manifest_path.clone(),
            source: e,
        })?;

        let problems = manifest.validate();
        if !problems.is_empty() {
            return Err(ManifestError::Invalid {
                path: manifest_path,
                problems,
            });
        }

        Ok(Some(manifest))
    }

    /// Every listed path must stay inside the package.
    pub fn validate(&self) -> Vec<String> {
        self.files
            .iter()
            .chain(&self.libs)
            .filter(|entry| !is_package_relative(entry))
            .map(|entry| format!("'{entry}' must be a relative path inside the package"))
            .collect()
    }
}

fn is_package_relative(entry: &str) -> bool {
    !entry.is_empty()
        && Path::new(entry)
            .components()
            .all(|c| matches!(c, Component::Normal(_) | Component::CurDir))
}

#[derive(Debug, thiserror::Error)]
pub enum ManifestError {
    #[error("failed to read {}: {source}", path.display())]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("failed to parse {}: {source}", path.display())]
    Parse {
        path: PathBuf,
        source: toml::de::Error,
    },
    #[error("{}: {}", path.display(), problems.join("; "))]
    Invalid {
        path: PathBuf,
        problems: Vec<String>,
    },
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    #[test]
    fn test_parse_manifest() {
        let toml_str = r#"
files = ["workflows/lib-workflow.jsonnet", "workflows/release.jsonnet"]
libs = ["lib/steps.libsonnet"]
"#;
        let manifest: PackageManifest = toml::from_str(toml_str).unwrap();
        assert_eq!(manifest.files.len(), 2);
        assert_eq!(manifest.files[0], "workflows/lib-workflow.jsonnet");
        assert_eq!(manifest.libs, vec!["lib/steps.libsonnet"]);
        assert!(manifest.validate().is_empty());
    }

    #[test]
    fn test_load_missing_manifest() {
        let dir = tempfile::tempdir().unwrap();
        assert_eq!(PackageManifest::load(dir.path()).unwrap(), None);
    }

    #[test]
    fn test_load_manifest_from_dir() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(
            dir.path().join(MANIFEST_FILENAME),
            "files = [\"workflows/a.jsonnet\"]\n",
        )
        .unwrap();

        let manifest = PackageManifest::load(dir.path()).unwrap().unwrap();
        assert_eq!(manifest.files, vec!["workflows/a.jsonnet"]);
        assert!(manifest.libs.is_empty());
    }

    #[test]
    fn test_load_malformed_manifest() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join(MANIFEST_FILENAME), "files = [unterminated").unwrap();

        let result = PackageManifest::load(dir.path());
        assert!(matches!(result, Err(ManifestError::Parse { .. })));
    }

    #[test]
    fn test_escaping_paths_rejected() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(
            dir.path().join(MANIFEST_FILENAME),
            "files = [\"../outside.jsonnet\", \"/etc/passwd\", \"ok.jsonnet\"]\n",
        )
        .unwrap();

        match PackageManifest::load(dir.path()) {
            Err(ManifestError::Invalid { problems, .. }) => {
                assert_eq!(problems.len(), 2);
                assert!(problems[0].contains("../outside.jsonnet"));
            }
            other => panic!("expected invalid manifest, got {other:?}"),
        }
    }
}
