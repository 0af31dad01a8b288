//! Command handlers for the gantry CLI.
//!
//! Each module handles one subcommand, delegating to `gantry-tooling` for the pipeline.

pub(crate) mod check;
pub(crate) mod init;
pub(crate) mod list;
pub(crate) mod sources;
pub(crate) mod update;

pub(crate) use check::handle_check_command;
pub(crate) use init::handle_init_command;
pub(crate) use list::handle_list_command;
pub(crate) use sources::handle_sources_command;
pub(crate) use update::handle_update_command;

use gantry_tooling::template_engine::TemplateEngine;

use crate::output;

/// Print every dependency that failed to resolve; returns how many did.
fn report_dependency_failures(engine: &TemplateEngine<'_>) -> usize {
    let failures = engine.dependency_failures();
    for failure in failures {
        output::error(failure);
    }
    failures.len()
}
