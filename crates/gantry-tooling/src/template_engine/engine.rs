//! Template evaluation pipeline.

use std::collections::HashSet;
use std::path::{Path, PathBuf};

use once_cell::unsync::OnceCell;

use super::evaluator::{EvaluateError, Evaluator, JsonnetEvaluator};
use crate::catalog::{self, CatalogError};
use crate::context::GantryContext;
use crate::definition::Definition;
use crate::dependency::{Dependency, DependencyError, DependencyResolver};
use crate::paths::PathInfo;

const GENERATED_HEADER: &str = "# File generated by gantry, do not modify";
const WORKFLOW_EXTENSION: &str = "yml";

/// Dependencies and import paths, computed once per engine.
#[derive(Debug, Default)]
pub struct Resolution {
    /// Template dependencies that resolved, in configured order.
    pub dependencies: Vec<Dependency>,
    /// Remote `templates.libs` entries, used only for imports.
    pub libraries: Vec<Dependency>,
    /// Dependencies that could not be used.
    pub failures: Vec<DependencyError>,
    /// Import search path handed to every evaluation.
    pub search_paths: Vec<PathBuf>,
}

/// Evaluates every template of a project into [`Definition`]s.
#[derive(Debug)]
pub struct TemplateEngine<'a> {
    context: &'a GantryContext,
    resolver: DependencyResolver,
    evaluator: Box<dyn Evaluator>,
    resolution: OnceCell<Resolution>,
}

impl<'a> TemplateEngine<'a> {
    pub fn new(context: &'a GantryContext) -> Self {
        Self::with_parts(
            context,
            DependencyResolver::for_context(context),
            Box::new(JsonnetEvaluator),
        )
    }

    pub fn with_parts(
        context: &'a GantryContext,
        resolver: DependencyResolver,
        evaluator: Box<dyn Evaluator>,
    ) -> Self {
        Self {
            context,
            resolver,
            evaluator,
            resolution: OnceCell::new(),
        }
    }

    /// Evaluate dependency templates, then local templates.
    ///
    /// Evaluation and serialization failures are recorded on the returned definitions;
    /// only storage errors abort.
    pub fn evaluate_all(&self) -> Result<Vec<Definition>, EngineError> {
        let resolution = self.resolution();

        let mut templates: Vec<PathInfo> = resolution
            .dependencies
            .iter()
            .flat_map(Dependency::templates)
            .collect();
        templates.extend(catalog::list_template_sources(&self.context.templates_dir())?);

        templates
            .iter()
            .map(|template| self.evaluate(template, &resolution.search_paths))
            .collect()
    }

    /// Every local file whose change may alter generated output, in a fixed order:
    /// configured libs, the templates directory, the libs directory, then each
    /// resolved dependency's files.
    pub fn observable_sources(&self) -> Result<Vec<PathBuf>, EngineError> {
        let mut sources = Vec::new();

        for lib in &self.context.config.templates.libs {
            if DependencyResolver::is_remote(lib) {
                continue;
            }
            let path = self.context.resolve_path(lib);
            if path.is_dir() {
                sources.extend(local_paths(catalog::list_sources(&path)?));
            } else {
                sources.push(path);
            }
        }

        sources.extend(local_paths(catalog::list_sources(
            &self.context.templates_dir(),
        )?));
        sources.extend(local_paths(catalog::list_sources(&self.context.libs_dir())?));

        for dependency in &self.resolution().dependencies {
            sources.extend(dependency.observable_files()?);
        }

        let mut seen = HashSet::new();
        sources.retain(|path| seen.insert(path.clone()));
        Ok(sources)
    }

    /// Dependencies that failed to resolve during this run.
    pub fn dependency_failures(&self) -> &[DependencyError] {
        &self.resolution().failures
    }

    pub fn search_paths(&self) -> &[PathBuf] {
        &self.resolution().search_paths
    }

    fn resolution(&self) -> &Resolution {
        self.resolution.get_or_init(|| self.resolve())
    }

    fn resolve(&self) -> Resolution {
        let templates = &self.context.config.templates;
        let mut resolution = Resolution::default();

        let mut resolve_into = |reference: &str, library_only: bool| {
            match self.resolver.resolve(reference) {
                Ok(dependency) if library_only => resolution.libraries.push(dependency),
                Ok(dependency) => resolution.dependencies.push(dependency),
                Err(e) => {
                    tracing::warn!(dependency = %reference, error = %e, "Failed to resolve dependency");
                    resolution.failures.push(e);
                }
            }
        };

        for reference in &templates.dependencies {
            resolve_into(reference, false);
        }
        for lib in templates.libs.iter().filter(|lib| DependencyResolver::is_remote(lib)) {
            resolve_into(lib, true);
        }

        let mut search_paths: Vec<PathBuf> = templates
            .libs
            .iter()
            .filter(|lib| !DependencyResolver::is_remote(lib))
            .map(|lib| {
                let path = self.context.resolve_path(lib);
                match path.parent() {
                    Some(parent) if path.is_file() => parent.to_path_buf(),
                    _ => path,
                }
            })
            .collect();
        search_paths.push(self.context.libs_dir());
        search_paths.extend(resolution.libraries.iter().map(|d| d.local_dir.clone()));
        search_paths.extend(resolution.dependencies.iter().map(|d| d.local_dir.clone()));

        let mut seen = HashSet::new();
        search_paths.retain(|path| seen.insert(path.clone()));
        tracing::debug!(?search_paths, "Import search path");

        resolution.search_paths = search_paths;
        resolution
    }

    fn evaluate(
        &self,
        template: &PathInfo,
        search_paths: &[PathBuf],
    ) -> Result<Definition, EngineError> {
        let name = workflow_name(&template.source_path);
        let destination = self
            .context
            .output_dir()
            .join(format!("{name}.{WORKFLOW_EXTENSION}"));

        let source =
            std::fs::read_to_string(&template.local_path).map_err(|e| EngineError::Io {
                path: template.local_path.clone(),
                source: e,
            })?;

        tracing::debug!(template = %template.description, "Evaluating template");
        let output = match self
            .evaluator
            .evaluate(&source, &template.source_path, search_paths)
        {
            Ok(output) => output,
            Err(e) => {
                tracing::debug!(template = %template.description, error = %e, "Template failed");
                return Ok(Definition::failed(template, name, destination, e.to_string()));
            }
        };

        let json = match to_json(&output) {
            Ok(json) => json,
            Err(e) => {
                return Ok(Definition::failed(template, name, destination, e.to_string()));
            }
        };

        let content = format!(
            "{GENERATED_HEADER}\n# Source: {}\n{output}",
            template.description
        );
        Ok(Definition::generated(template, name, destination, content, json))
    }
}

/// Parse generated YAML into its JSON form for schema checks.
///
/// YAML that JSON cannot express, such as non-string mapping keys, is reported apart
/// from YAML that does not parse.
fn to_json(output: &str) -> Result<serde_json::Value, EvaluateError> {
    let yaml: serde_yaml::Value = serde_yaml::from_str(output).map_err(|e| {
        EvaluateError::Serialization(format!("generated output is not valid YAML: {e}"))
    })?;
    serde_yaml::from_value(yaml).map_err(|e| {
        EvaluateError::Serialization(format!(
            "generated output cannot be converted to JSON: {e}"
        ))
    })
}

/// Workflow name for a template: its file name without extension.
pub fn workflow_name(path: &Path) -> String {
    path.file_stem()
        .map(|stem| stem.to_string_lossy().into_owned())
        .unwrap_or_default()
}

fn local_paths(sources: Vec<PathInfo>) -> impl Iterator<Item = PathBuf> {
    sources.into_iter().map(|info| info.local_path)
}

#[derive(Debug, thiserror::Error)]
pub enum EngineError {
    #[error(transparent)]
    Catalog(#[from] CatalogError),

    #[error("failed to read template {}: {source}", path.display())]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
}
