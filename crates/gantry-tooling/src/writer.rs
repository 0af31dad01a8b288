//! Writing generated workflows to disk.

use std::path::PathBuf;

use serde::Serialize;

use crate::definition::Definition;

/// What happened to one destination file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum UpdateOutcome {
    Created,
    Updated,
    Unchanged,
    /// The definition failed to evaluate; nothing was written.
    Skipped,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct WorkflowUpdate {
    pub name: String,
    pub destination: PathBuf,
    pub outcome: UpdateOutcome,
}

#[derive(Debug, thiserror::Error)]
pub enum WriterError {
    #[error("failed to write workflow {}: {source}", path.display())]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
}

/// Write every valid definition to its destination, in order.
pub fn update_workflows(definitions: &[Definition]) -> Result<Vec<WorkflowUpdate>, WriterError> {
    definitions
        .iter()
        .map(|definition| {
            Ok(WorkflowUpdate {
                name: definition.name.clone(),
                destination: definition.destination.clone(),
                outcome: update_workflow(definition)?,
            })
        })
        .collect()
}

/// Write one definition, leaving an identical file untouched.
pub fn update_workflow(definition: &Definition) -> Result<UpdateOutcome, WriterError> {
    if !definition.status.valid {
        tracing::debug!(workflow = %definition.name, "Skipping invalid definition");
        return Ok(UpdateOutcome::Skipped);
    }

    let path = &definition.destination;
    let io_error = |e| WriterError::Io {
        path: path.clone(),
        source: e,
    };

    let outcome = if path.try_exists().map_err(io_error)? {
        if std::fs::read(path).map_err(io_error)? == definition.content.as_bytes() {
            return Ok(UpdateOutcome::Unchanged);
        }
        UpdateOutcome::Updated
    } else {
        UpdateOutcome::Created
    };

    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent).map_err(|e| WriterError::Io {
            path: parent.to_path_buf(),
            source: e,
        })?;
    }
    std::fs::write(path, &definition.content).map_err(io_error)?;

    tracing::debug!(workflow = %definition.name, ?outcome, "Wrote workflow");
    Ok(outcome)
}
