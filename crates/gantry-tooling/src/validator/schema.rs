//! Loading and compiling workflow JSON schemas.

use std::path::{Path, PathBuf};

use crate::fetch::{self, FetchError, Fetcher};

#[derive(Debug, thiserror::Error)]
pub enum SchemaLoadError {
    #[error("failed to fetch schema '{uri}': {source}")]
    Fetch { uri: String, source: FetchError },

    #[error("failed to read schema {}: {source}", path.display())]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("schema '{uri}' is not valid JSON: {source}")]
    Parse {
        uri: String,
        source: serde_json::Error,
    },

    #[error("schema '{uri}' could not be compiled: {message}")]
    Compile { uri: String, message: String },
}

/// Load the raw schema document behind `uri`: a remote URL or a path under `root`.
pub fn load_schema(
    uri: &str,
    root: &Path,
    fetcher: &dyn Fetcher,
) -> Result<serde_json::Value, SchemaLoadError> {
    let bytes = match fetch::remote_url(uri) {
        Some(url) => fetcher.fetch(&url).map_err(|e| SchemaLoadError::Fetch {
            uri: uri.to_string(),
            source: e,
        })?,
        None => {
            let path = root.join(uri);
            std::fs::read(&path).map_err(|e| SchemaLoadError::Io { path, source: e })?
        }
    };

    serde_json::from_slice(&bytes).map_err(|e| SchemaLoadError::Parse {
        uri: uri.to_string(),
        source: e,
    })
}

/// Load and compile the schema behind `uri`.
pub fn compile_schema(
    uri: &str,
    root: &Path,
    fetcher: &dyn Fetcher,
) -> Result<jsonschema::Validator, SchemaLoadError> {
    let schema = load_schema(uri, root, fetcher)?;
    jsonschema::validator_for(&schema).map_err(|e| SchemaLoadError::Compile {
        uri: uri.to_string(),
        message: e.to_string(),
    })
}

/// Every violation of `instance` against `schema`, as `<instance path>: <description>`.
pub fn violations(schema: &jsonschema::Validator, instance: &serde_json::Value) -> Vec<String> {
    schema
        .iter_errors(instance)
        .map(|error| {
            let location = error.instance_path.to_string();
            let location = if location.is_empty() {
                "(root)".to_string()
            } else {
                location
            };
            format!("{location}: {error}")
        })
        .collect()
}
