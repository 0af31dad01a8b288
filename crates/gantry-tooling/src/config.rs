//! Project configuration (`.gantry/config.toml`).
//!
//! Template settings apply to the whole project. Workflow checks are looked up per
//! workflow name: an entry under `[workflows.overrides.<name>]` wins, otherwise
//! `[workflows.defaults]` applies, otherwise the built-in default.

use std::collections::BTreeMap;

use serde::Deserialize;

/// Schema used for workflow checks when nothing else is configured.
pub const DEFAULT_SCHEMA_URI: &str = "https://json.schemastore.org/github-workflow.json";

fn default_templates_dir() -> String {
    ".gantry/workflows".to_string()
}

fn default_libs_dir() -> String {
    ".gantry/libs".to_string()
}

fn default_output_dir() -> String {
    ".github/workflows".to_string()
}

fn default_fetch_timeout_secs() -> u64 {
    30
}

/// Top-level configuration.
#[derive(Debug, Clone, Default, Deserialize, PartialEq)]
#[serde(rename_all = "kebab-case")]
pub struct GantryConfig {
    #[serde(default)]
    pub templates: TemplatesConfig,

    #[serde(default)]
    pub workflows: WorkflowsConfig,
}

/// Supported template engines. Unknown names are rejected at parse time.
#[derive(Debug, Clone, Copy, Default, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum TemplateEngineKind {
    #[default]
    Jsonnet,
}

/// Where templates come from and what they may import.
#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(rename_all = "kebab-case")]
pub struct TemplatesConfig {
    #[serde(default)]
    pub engine: TemplateEngineKind,

    /// Directory scanned for templates. Default: `.gantry/workflows`.
    #[serde(default = "default_templates_dir")]
    pub dir: String,

    /// Project library directory, always on the import search path. Default: `.gantry/libs`.
    #[serde(default = "default_libs_dir")]
    pub libs_dir: String,

    /// Extra library directories, single library files, or remote library archives.
    #[serde(default)]
    pub libs: Vec<String>,

    /// Template packages: local directories or remote `.tar.gz` URLs.
    #[serde(default)]
    pub dependencies: Vec<String>,

    /// Where remote archives are extracted. Default: the user cache directory.
    pub cache_dir: Option<String>,

    /// HTTP timeout for dependency and schema downloads.
    #[serde(default = "default_fetch_timeout_secs")]
    pub fetch_timeout_secs: u64,
}

impl Default for TemplatesConfig {
    fn default() -> Self {
        Self {
            engine: TemplateEngineKind::default(),
            dir: default_templates_dir(),
            libs_dir: default_libs_dir(),
            libs: Vec::new(),
            dependencies: Vec::new(),
            cache_dir: None,
            fetch_timeout_secs: default_fetch_timeout_secs(),
        }
    }
}

/// Output location and per-workflow check settings.
#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(rename_all = "kebab-case")]
pub struct WorkflowsConfig {
    /// Directory generated workflows are written to. Default: `.github/workflows`.
    #[serde(default = "default_output_dir")]
    pub output_dir: String,

    #[serde(default)]
    pub defaults: WorkflowConfig,

    /// Settings keyed by workflow name.
    #[serde(default)]
    pub overrides: BTreeMap<String, WorkflowConfig>,
}

impl Default for WorkflowsConfig {
    fn default() -> Self {
        Self {
            output_dir: default_output_dir(),
            defaults: WorkflowConfig::default(),
            overrides: BTreeMap::new(),
        }
    }
}

/// Settings that can be given as defaults or per workflow. Unset fields fall through.
#[derive(Debug, Clone, Default, Deserialize, PartialEq)]
#[serde(rename_all = "kebab-case")]
pub struct WorkflowConfig {
    #[serde(default)]
    pub checks: ChecksConfig,
}

#[derive(Debug, Clone, Default, Deserialize, PartialEq)]
#[serde(rename_all = "kebab-case")]
pub struct ChecksConfig {
    #[serde(default)]
    pub schema: SchemaCheckConfig,

    #[serde(default)]
    pub content: ContentCheckConfig,
}

#[derive(Debug, Clone, Default, Deserialize, PartialEq)]
#[serde(rename_all = "kebab-case")]
pub struct SchemaCheckConfig {
    pub enabled: Option<bool>,

    /// `http(s)://` or `file://` URL, or a path relative to the project root.
    pub uri: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize, PartialEq)]
#[serde(rename_all = "kebab-case")]
pub struct ContentCheckConfig {
    pub enabled: Option<bool>,
}

impl WorkflowsConfig {
    /// Look up a per-workflow property: override, then defaults, then `fallback`.
    pub fn workflow_property<T>(
        &self,
        name: &str,
        fallback: T,
        property: impl Fn(&WorkflowConfig) -> Option<T>,
    ) -> T {
        self.overrides
            .get(name)
            .and_then(&property)
            .or_else(|| property(&self.defaults))
            .unwrap_or(fallback)
    }

    pub fn schema_enabled(&self, name: &str) -> bool {
        self.workflow_property(name, true, |c| c.checks.schema.enabled)
    }

    pub fn content_enabled(&self, name: &str) -> bool {
        self.workflow_property(name, true, |c| c.checks.content.enabled)
    }

    pub fn schema_uri(&self, name: &str) -> String {
        self.workflow_property(name, DEFAULT_SCHEMA_URI.to_string(), |c| {
            c.checks.schema.uri.clone()
        })
    }
}
