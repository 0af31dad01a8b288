//! `gantry sources`: print every local file that can change generated output.
//!
//! One path per line and nothing else, for feeding file watchers:
//! `gantry sources | entr gantry update`.

use gantry_tooling::template_engine::TemplateEngine;
use gantry_tooling::GantryContext;

use crate::output;

pub(crate) fn handle_sources_command(context: &GantryContext) -> anyhow::Result<()> {
    let engine = TemplateEngine::new(context);
    for path in engine.observable_sources()? {
        output::plain(path.display());
    }

    for failure in engine.dependency_failures() {
        tracing::warn!(dependency = %failure.reference(), error = %failure, "Dependency sources unavailable");
    }

    Ok(())
}
