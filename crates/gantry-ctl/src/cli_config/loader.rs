//! Config file discovery and loading for `.gantry/config.toml`.
//!
//! An explicit path (`--config` or `GANTRY_CONFIG`) must exist. Without one, the
//! project-local `.gantry/config.toml` is used when present and built-in defaults
//! otherwise.

use std::path::{Path, PathBuf};

use gantry_tooling::config::GantryConfig;

pub(crate) const DEFAULT_CONFIG_PATH: &str = ".gantry/config.toml";

#[derive(Debug, thiserror::Error)]
pub(crate) enum ConfigError {
    #[error("config file {} does not exist", path.display())]
    NotFound { path: PathBuf },

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
}

/// Load the configuration from `explicit`, or from the default location.
pub(crate) fn load_config(explicit: Option<&Path>) -> Result<GantryConfig, ConfigError> {
    let path = match explicit {
        Some(path) => {
            let path = expand_path(&path.to_string_lossy());
            if !path.is_file() {
                return Err(ConfigError::NotFound { path });
            }
            path
        }
        None => {
            let path = PathBuf::from(DEFAULT_CONFIG_PATH);
            if !path.is_file() {
                tracing::debug!(?path, "No config file, using defaults");
                return Ok(GantryConfig::default());
            }
            path
        }
    };

    let contents = std::fs::read_to_string(&path).map_err(|e| ConfigError::Io {
        path: path.clone(),
        source: e,
    })?;
    let mut config: GantryConfig = toml::from_str(&contents).map_err(|e| ConfigError::Parse {
        path: path.clone(),
        source: e,
    })?;
    tracing::debug!(?path, "Loaded config");

    expand_config_paths(&mut config);
    Ok(config)
}

/// Resolve `~` in every user-supplied location.
fn expand_config_paths(config: &mut GantryConfig) {
    let templates = &mut config.templates;
    for entry in templates.libs.iter_mut().chain(templates.dependencies.iter_mut()) {
        *entry = expand_path(entry).to_string_lossy().into_owned();
    }
    if let Some(cache_dir) = templates.cache_dir.as_mut() {
        *cache_dir = expand_path(cache_dir).to_string_lossy().into_owned();
    }
}

/// Expand a configured path, resolving `~` to the home directory.
pub(crate) fn expand_path(path: &str) -> PathBuf {
    if let Some(rest) = path.strip_prefix("~/") {
        if let Some(home) = home_dir() {
            return home.join(rest);
        }
    }
    PathBuf::from(path)
}

fn home_dir() -> Option<PathBuf> {
    std::env::var("HOME").ok().map(PathBuf::from)
}
