//! `gantry init`: bootstrap `.gantry/config.toml` and an example template.

use std::path::{Path, PathBuf};

use askama::Template;
use gantry_tooling::catalog::TEMPLATE_EXTENSION;
use gantry_tooling::config::{GantryConfig, DEFAULT_SCHEMA_URI};

use crate::cli_config::loader::DEFAULT_CONFIG_PATH;
use crate::output;

/// Askama template for generating `.gantry/config.toml`.
#[derive(Template, Debug)]
#[template(path = "init-config.toml", escape = "none")]
struct InitConfigTemplate<'a> {
    templates_dir: &'a str,
    libs_dir: &'a str,
    output_dir: &'a str,
    schema_uri: &'a str,
}

/// Askama template for the example workflow.
#[derive(Template, Debug)]
#[template(path = "init-workflow.jsonnet", escape = "none")]
struct InitWorkflowTemplate<'a> {
    name: &'a str,
}

pub(crate) fn handle_init_command(name: &str) -> anyhow::Result<()> {
    let defaults = GantryConfig::default();
    let config_path = PathBuf::from(DEFAULT_CONFIG_PATH);
    let workflow_path = Path::new(&defaults.templates.dir)
        .join(format!("{name}.{TEMPLATE_EXTENSION}"));

    for path in [&config_path, &workflow_path] {
        if path.exists() {
            output::warning(format!("{} already exists.", path.display()));
            output::hint("Remove it first if you want to reinitialize.");
            anyhow::bail!("refusing to overwrite {}", path.display());
        }
    }

    let config = InitConfigTemplate {
        templates_dir: &defaults.templates.dir,
        libs_dir: &defaults.templates.libs_dir,
        output_dir: &defaults.workflows.output_dir,
        schema_uri: DEFAULT_SCHEMA_URI,
    }
    .render()?;
    let workflow = InitWorkflowTemplate { name }.render()?;

    write_new(&config_path, &config)?;
    output::success(format!("Created {}", config_path.display()));
    write_new(&workflow_path, &workflow)?;
    output::success(format!("Created {}", workflow_path.display()));

    output::blank();
    output::hint("Next steps:");
    output::plain("  gantry update    # Generate workflows from templates");
    output::plain("  gantry check     # Verify generated workflows are valid and current");

    Ok(())
}

fn write_new(path: &Path, content: &str) -> anyhow::Result<()> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    std::fs::write(path, content)
        .map_err(|e| anyhow::anyhow!("failed to write {}: {e}", path.display()))
}
