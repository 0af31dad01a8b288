//! `gantry ls`: list workflows, where they come from, and where they are written.

use anyhow::Context as _;
use gantry_tooling::template_engine::TemplateEngine;
use gantry_tooling::GantryContext;
use serde::Serialize;

use crate::output;

/// One row of `gantry ls --json`.
#[derive(Debug, Serialize)]
struct WorkflowEntry<'a> {
    name: &'a str,
    source: &'a str,
    destination: String,
    valid: bool,
}

pub(crate) fn handle_list_command(context: &GantryContext, json: bool) -> anyhow::Result<()> {
    let engine = TemplateEngine::new(context);
    let definitions = engine
        .evaluate_all()
        .context("failed to evaluate templates")?;

    let entries: Vec<WorkflowEntry<'_>> = definitions
        .iter()
        .map(|definition| WorkflowEntry {
            name: &definition.name,
            source: &definition.description,
            destination: definition.destination.display().to_string(),
            valid: definition.status.valid,
        })
        .collect();

    if json {
        output::plain(serde_json::to_string_pretty(&entries)?);
        return Ok(());
    }

    if entries.is_empty() {
        output::warning("No workflows found.");
        output::hint(format!(
            "Add a template under {} or run `gantry init`.",
            context.templates_dir().display()
        ));
        return Ok(());
    }

    output::header("Workflows:");
    output::blank();
    for entry in &entries {
        if entry.valid {
            output::item(entry.name);
        } else {
            output::item(format!("{} (fails to evaluate)", entry.name));
        }
        output::label("    Source", entry.source);
        output::label("    Destination", &entry.destination);
    }

    Ok(())
}
