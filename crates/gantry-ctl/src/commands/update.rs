//! `gantry update`: write every workflow that evaluated cleanly.

use anyhow::Context as _;
use gantry_tooling::template_engine::TemplateEngine;
use gantry_tooling::writer::{self, UpdateOutcome};
use gantry_tooling::GantryContext;

use crate::output;

pub(crate) fn handle_update_command(context: &GantryContext) -> anyhow::Result<()> {
    let engine = TemplateEngine::new(context);
    let definitions = engine
        .evaluate_all()
        .context("failed to evaluate templates")?;
    let mut failures = super::report_dependency_failures(&engine);

    let updates = writer::update_workflows(&definitions)?;
    for (definition, update) in definitions.iter().zip(&updates) {
        let target = update.destination.display();
        match update.outcome {
            UpdateOutcome::Created => output::action("create", true, target),
            UpdateOutcome::Updated => output::action("update", true, target),
            UpdateOutcome::Unchanged => output::action("identical", false, target),
            UpdateOutcome::Skipped => {
                failures += 1;
                output::error(format!(
                    "{} ({}): {}",
                    definition.name,
                    definition.description,
                    definition.status.errors().collect::<Vec<_>>().join("; ")
                ));
            }
        }
    }

    if failures > 0 {
        anyhow::bail!("update finished with {failures} problem(s)");
    }

    Ok(())
}
