//! Workflow template pipeline for gantry.
//!
//! Turns Jsonnet templates into GitHub Actions workflow files and checks that the
//! committed files are still in sync with their templates. This crate is consumed by
//! `gantry-ctl` and has no terminal or process concerns of its own.
//!
//! # Modules
//!
//! - [`catalog`]: Template and library discovery under a source directory
//! - [`config`]: `.gantry/config.toml` model with per-workflow overrides
//! - [`context`]: Project root plus config, resolving every configured path
//! - [`definition`]: `Definition` and `ValidationResult`, the pipeline's result contract
//! - [`dependency`]: Local and remote template dependencies, fetched at most once per run
//! - [`fetch`]: URL fetching shared by dependencies and schema loading
//! - [`template_engine`]: Jsonnet evaluation into definitions, plus observable sources
//! - [`validator`]: Schema and content drift checks for definitions
//! - [`writer`]: Writing generated workflows to their destinations

pub mod catalog;
pub mod config;
pub mod context;
pub mod definition;
pub mod dependency;
pub mod fetch;
pub mod paths;
pub mod template_engine;
pub mod validator;
pub mod writer;

pub use context::GantryContext;
pub use definition::{Definition, Severity, ValidationMessage, ValidationResult};
pub use paths::PathInfo;
