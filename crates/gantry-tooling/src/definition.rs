//! Pipeline results: one [`Definition`] per template, and [`ValidationResult`]s for
//! each check run against it.

use std::path::PathBuf;

use serde::Serialize;

use crate::paths::PathInfo;

/// Severity of a validation message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Error,
    Info,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ValidationMessage {
    pub severity: Severity,
    pub text: String,
}

/// Outcome of one check: evaluation, schema, or content.
///
/// The same shape is used for all three; callers keep them apart.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ValidationResult {
    pub valid: bool,
    pub messages: Vec<ValidationMessage>,
    /// What was found on disk, set only when content drifted.
    #[serde(skip_serializing_if = "String::is_empty")]
    pub actual_content: String,
}

impl ValidationResult {
    pub fn valid() -> Self {
        Self {
            valid: true,
            messages: Vec::new(),
            actual_content: String::new(),
        }
    }

    pub fn invalid(errors: impl IntoIterator<Item = String>) -> Self {
        Self {
            valid: false,
            messages: errors
                .into_iter()
                .map(|text| ValidationMessage {
                    severity: Severity::Error,
                    text,
                })
                .collect(),
            actual_content: String::new(),
        }
    }

    /// A check that did not run: valid, with a single informational message.
    pub fn skipped(reason: String) -> Self {
        Self {
            valid: true,
            messages: vec![ValidationMessage {
                severity: Severity::Info,
                text: reason,
            }],
            actual_content: String::new(),
        }
    }

    pub fn drifted(reason: String, actual_content: String) -> Self {
        Self {
            actual_content,
            ..Self::invalid([reason])
        }
    }

    /// Error-severity messages, in order.
    pub fn errors(&self) -> impl Iterator<Item = &str> {
        self.messages
            .iter()
            .filter(|m| m.severity == Severity::Error)
            .map(|m| m.text.as_str())
    }
}

/// A workflow produced (or not) from one template.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Definition {
    /// Workflow name, the template's file stem.
    pub name: String,
    /// Path the template was evaluated as.
    pub source: PathBuf,
    /// Human-facing source path.
    pub description: String,
    /// Where the generated workflow belongs.
    pub destination: PathBuf,
    /// Generated workflow text including header; empty when evaluation failed.
    pub content: String,
    /// Structural form of the generated workflow; `None` when evaluation failed.
    #[serde(skip)]
    pub json: Option<serde_json::Value>,
    /// Evaluation status.
    pub status: ValidationResult,
}

impl Definition {
    pub(crate) fn generated(
        template: &PathInfo,
        name: String,
        destination: PathBuf,
        content: String,
        json: serde_json::Value,
    ) -> Self {
        Self {
            name,
            source: template.source_path.clone(),
            description: template.description.clone(),
            destination,
            content,
            json: Some(json),
            status: ValidationResult::valid(),
        }
    }

    pub(crate) fn failed(
        template: &PathInfo,
        name: String,
        destination: PathBuf,
        error: String,
    ) -> Self {
        Self {
            name,
            source: template.source_path.clone(),
            description: template.description.clone(),
            destination,
            content: String::new(),
            json: None,
            status: ValidationResult::invalid([error]),
        }
    }
}
