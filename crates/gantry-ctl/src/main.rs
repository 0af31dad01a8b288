//! `gantry`: generate GitHub Actions workflows from Jsonnet templates and keep the
//! committed files honest.

mod cli_config;
mod commands;
mod output;

use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, Subcommand};
use gantry_tooling::GantryContext;
use tracing_subscriber::EnvFilter;

#[derive(Debug, Parser)]
#[command(name = "gantry", version, about, long_about = None, styles = output::clap_styles())]
struct Cli {
    /// Config file [default: .gantry/config.toml]
    #[arg(long, global = true, env = "GANTRY_CONFIG", value_name = "PATH")]
    config: Option<PathBuf>,

    /// Enable debug logging (overridden by RUST_LOG)
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Disable colored output
    #[arg(long, global = true)]
    no_color: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Check that every workflow evaluates, matches its schema, and is up to date
    Check {
        /// Show the differing lines of out-of-date workflows
        #[arg(long)]
        show_diffs: bool,
    },
    /// Regenerate workflows from their templates
    Update,
    /// List workflows with their sources and destinations
    #[command(alias = "list")]
    Ls {
        /// Print as JSON
        #[arg(long)]
        json: bool,
    },
    /// Print every file that can affect generated workflows, one per line
    Sources,
    /// Create a starter config and an example template
    Init {
        /// Name of the example workflow
        #[arg(long, default_value = "build")]
        name: String,
    },
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    if cli.no_color {
        anstream::ColorChoice::Never.write_global();
    }
    init_tracing(cli.verbose);

    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            output::error(format!("{e:#}"));
            ExitCode::FAILURE
        }
    }
}

fn init_tracing(verbose: bool) {
    let directive = if verbose { "gantry=debug" } else { "gantry=warn" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(directive));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn run(cli: Cli) -> anyhow::Result<()> {
    let context = || -> anyhow::Result<GantryContext> {
        let config = cli_config::load_config(cli.config.as_deref())?;
        Ok(GantryContext::new(PathBuf::new(), config))
    };

    match cli.command {
        Commands::Check { show_diffs } => {
            commands::handle_check_command(&context()?, show_diffs)
        }
        Commands::Update => commands::handle_update_command(&context()?),
        Commands::Ls { json } => commands::handle_list_command(&context()?, json),
        Commands::Sources => commands::handle_sources_command(&context()?),
        Commands::Init { name } => commands::handle_init_command(&name),
    }
}
