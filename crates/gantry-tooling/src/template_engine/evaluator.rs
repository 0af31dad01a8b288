//! Jsonnet evaluation.

use std::path::{Path, PathBuf};

use jrsonnet_evaluator::{EvaluationState, FileImportResolver, Val};

/// Hint appended to serialization errors.
const STRING_OUTPUT_HINT: &str =
    "templates must produce a string; serialize the workflow with std.manifestYamlDoc";

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum EvaluateError {
    /// Syntax or runtime failure inside the template.
    #[error("{0}")]
    Evaluation(String),

    /// The template evaluated, but not to usable workflow text.
    #[error("{0}")]
    Serialization(String),
}

impl EvaluateError {
    pub(crate) fn non_string(type_name: &str) -> Self {
        Self::Serialization(format!(
            "expected string result, got: {type_name}\n{STRING_OUTPUT_HINT}"
        ))
    }
}

/// Turns template source into workflow text.
///
/// `path` is the template's own location, used for relative imports. `search_paths`
/// are tried in order for every other import. Implementations must not keep state
/// between calls.
pub trait Evaluator: std::fmt::Debug {
    fn evaluate(
        &self,
        source: &str,
        path: &Path,
        search_paths: &[PathBuf],
    ) -> Result<String, EvaluateError>;
}

/// Production evaluator backed by `jrsonnet`.
#[derive(Debug, Default, Clone, Copy)]
pub struct JsonnetEvaluator;

impl Evaluator for JsonnetEvaluator {
    fn evaluate(
        &self,
        source: &str,
        path: &Path,
        search_paths: &[PathBuf],
    ) -> Result<String, EvaluateError> {
        let state = EvaluationState::default();
        state.with_stdlib();
        state.set_import_resolver(Box::new(FileImportResolver {
            library_paths: search_paths.to_vec(),
        }));

        let value = state
            .evaluate_snippet_raw(path.to_path_buf().into(), source.into())
            .map_err(|e| EvaluateError::Evaluation(state.stringify_err(&e).trim().to_string()))?;

        match value {
            // String output is emitted with a trailing newline
            Val::Str(text) => Ok(format!("{}\n", &*text)),
            other => Err(EvaluateError::non_string(value_type_name(&other))),
        }
    }
}

fn value_type_name(value: &Val) -> &'static str {
    match value {
        Val::Obj(_) => "object",
        Val::Arr(_) => "array",
        Val::Num(_) => "number",
        Val::Bool(_) => "boolean",
        Val::Null => "null",
        Val::Str(_) => "string",
        _ => "function",
    }
}
