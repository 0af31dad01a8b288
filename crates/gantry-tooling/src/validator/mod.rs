//! Workflow checks: JSON-schema validation and content drift.
//!
//! Both checks are configured per workflow name and return a fresh
//! [`ValidationResult`]. Problems with the workflow itself are reported in the
//! result; only infrastructure failures (an unloadable schema, an unreadable
//! destination) come back as `Err`.

mod schema;

use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::{Arc, Mutex, PoisonError};
use std::time::Duration;

pub use schema::{compile_schema, load_schema, violations, SchemaLoadError};

use crate::context::GantryContext;
use crate::definition::{Definition, ValidationResult};
use crate::fetch::{Fetcher, HttpFetcher};

#[derive(Debug, thiserror::Error)]
pub enum ValidatorError {
    #[error("failed to read workflow {}: {source}", path.display())]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
}

/// Runs schema and content checks against definitions.
pub struct WorkflowValidator<'a> {
    context: &'a GantryContext,
    fetcher: Box<dyn Fetcher>,
    schemas: Mutex<HashMap<String, Arc<jsonschema::Validator>>>,
}

impl std::fmt::Debug for WorkflowValidator<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let cached: Vec<String> = self
            .schemas
            .lock()
            .map(|schemas| schemas.keys().cloned().collect())
            .unwrap_or_default();
        f.debug_struct("WorkflowValidator")
            .field("root", &self.context.root)
            .field("fetcher", &self.fetcher)
            .field("cached_schemas", &cached)
            .finish()
    }
}

impl<'a> WorkflowValidator<'a> {
    pub fn new(context: &'a GantryContext) -> Self {
        let timeout = Duration::from_secs(context.config.templates.fetch_timeout_secs);
        Self::with_fetcher(context, Box::new(HttpFetcher::new(timeout)))
    }

    pub fn with_fetcher(context: &'a GantryContext, fetcher: Box<dyn Fetcher>) -> Self {
        Self {
            context,
            fetcher,
            schemas: Mutex::new(HashMap::new()),
        }
    }

    /// Validate the definition's structure against its configured schema.
    pub fn validate_schema(
        &self,
        definition: &Definition,
    ) -> Result<ValidationResult, SchemaLoadError> {
        let workflows = &self.context.config.workflows;
        if !workflows.schema_enabled(&definition.name) {
            return Ok(ValidationResult::skipped(format!(
                "Schema checks disabled for {}, skipping",
                definition.name
            )));
        }

        let schema = self.schema(&workflows.schema_uri(&definition.name))?;
        let instance = definition
            .json
            .clone()
            .unwrap_or(serde_json::Value::Null);

        let errors = violations(&schema, &instance);
        if errors.is_empty() {
            Ok(ValidationResult::valid())
        } else {
            Ok(ValidationResult::invalid(errors))
        }
    }

    /// Compare the file at the definition's destination with its generated content.
    pub fn validate_content(
        &self,
        definition: &Definition,
    ) -> Result<ValidationResult, ValidatorError> {
        if !self.context.config.workflows.content_enabled(&definition.name) {
            return Ok(ValidationResult::skipped(format!(
                "Content checks disabled for {}, skipping",
                definition.name
            )));
        }

        let path = &definition.destination;
        let io_error = |e| ValidatorError::Io {
            path: path.clone(),
            source: e,
        };

        if !path.try_exists().map_err(io_error)? {
            return Ok(ValidationResult::invalid([format!(
                "Workflow missing for \"{}\" (expected workflow at {})",
                definition.name,
                path.display()
            )]));
        }

        let actual = std::fs::read(path).map_err(io_error)?;
        if actual == definition.content.as_bytes() {
            return Ok(ValidationResult::valid());
        }

        Ok(ValidationResult::drifted(
            format!(
                "Content is out of date for \"{}\" ({})",
                definition.name,
                path.display()
            ),
            String::from_utf8_lossy(&actual).into_owned(),
        ))
    }

    fn schema(&self, uri: &str) -> Result<Arc<jsonschema::Validator>, SchemaLoadError> {
        if let Some(schema) = self
            .schemas
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .get(uri)
        {
            return Ok(Arc::clone(schema));
        }

        tracing::debug!(%uri, "Loading workflow schema");
        let schema = Arc::new(compile_schema(uri, &self.context.root, self.fetcher.as_ref())?);
        self.schemas
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(uri.to_string(), Arc::clone(&schema));
        Ok(schema)
    }
}
