//! Locating and loading the project configuration for the CLI.
//!
//! The configuration model itself lives in `gantry_tooling::config`; this module only
//! decides which file to read and how to report problems with it.

pub(crate) mod loader;

pub(crate) use loader::{load_config, ConfigError};
