//! Subcommand implementations
//!
//! Each command renders to a `String`; printing and exit codes belong to
//! `main`.

use crate::config::LabConfig;
use anyhow::{anyhow, Context, Result};
use indexmap::IndexMap;
use otlab_core::{ScenarioDescriptor, ScenarioId, SourceRevisionInfo};
use otlab_registry::ScenarioRegistry;
use otlab_resolve::{
    project, DeployPlan, DeploymentMetadata, EnvVar, HelmValues, Overrides, ResolvedConfig,
    Resolver, ServiceCatalog,
};
use otlab_revision::{default_source, RevisionSource};
use serde::Serialize;
use std::fmt::Write as _;
use std::path::Path;

/// Output flavor
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OutputFormat {
    /// Human-readable
    #[default]
    Text,
    /// Pretty JSON
    Json,
}

/// Helm values rendering
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ValuesFormat {
    /// `--set-string key=value` arguments, one per line
    #[default]
    Set,
    /// Nested YAML document
    Yaml,
}

/// Everything a command needs: registry, settings, revision
#[derive(Debug)]
pub struct Lab {
    registry: ScenarioRegistry,
    config: LabConfig,
    revision: SourceRevisionInfo,
    catalog: ServiceCatalog,
}

impl Lab {
    /// Assemble from parts
    #[must_use]
    pub fn new(registry: ScenarioRegistry, config: LabConfig, revision: SourceRevisionInfo) -> Self {
        Self {
            registry,
            config,
            revision,
            catalog: ServiceCatalog::demo(),
        }
    }

    /// Load the registry named by `config` (or the built-in one) and
    /// capture revision info from the configured repository root
    ///
    /// # Errors
    /// If the registry file cannot be read or fails validation.
    pub fn load(config: LabConfig) -> Result<Self> {
        let registry = match &config.registry_file {
            Some(path) => ScenarioRegistry::from_yaml_file(path)
                .with_context(|| format!("loading registry {}", path.display()))?,
            None => ScenarioRegistry::with_defaults().context("built-in registry")?,
        };

        let root = config
            .repository_root
            .clone()
            .unwrap_or_else(|| Path::new(".").to_path_buf());
        let revision = default_source(&root).capture();

        tracing::debug!(
            scenarios = registry.len(),
            commit_sha = %revision.commit_sha,
            "lab loaded"
        );
        Ok(Self::new(registry, config, revision))
    }

    /// Replace the demo service catalog
    #[must_use]
    pub fn with_catalog(mut self, catalog: ServiceCatalog) -> Self {
        self.catalog = catalog;
        self
    }

    /// Registry in use
    #[inline]
    #[must_use]
    pub fn registry(&self) -> &ScenarioRegistry {
        &self.registry
    }

    /// Settings in use
    #[inline]
    #[must_use]
    pub fn config(&self) -> &LabConfig {
        &self.config
    }

    /// Captured revision
    #[inline]
    #[must_use]
    pub fn revision(&self) -> &SourceRevisionInfo {
        &self.revision
    }

    fn resolve(&self, id: ScenarioId, flags: &Overrides) -> Result<ResolvedConfig> {
        let overrides = self.config.effective_overrides(flags.clone());
        Resolver::new(&self.registry)
            .resolve(id, &overrides, self.revision.clone())
            .with_context(|| format!("resolving {id}"))
    }
}

/// `list`: registered scenarios in registration order
///
/// # Errors
/// JSON serialization failure only.
pub fn list(lab: &Lab, format: OutputFormat) -> Result<String> {
    let descriptors: Vec<&ScenarioDescriptor> = lab.registry.descriptors().collect();
    match format {
        OutputFormat::Json => Ok(serde_json::to_string_pretty(&descriptors)?),
        OutputFormat::Text => {
            let mut out = String::new();
            for d in descriptors {
                writeln!(
                    out,
                    "{:<10} {:<16} {:<20} {:<8} {}",
                    d.id.as_str(),
                    d.pattern.as_str(),
                    d.namespace.as_str(),
                    d.service_prefix.as_str(),
                    d.telemetry_endpoint
                )?;
            }
            Ok(out)
        }
    }
}

/// `describe`: one descriptor in full
///
/// # Errors
/// Unknown scenario.
pub fn describe(lab: &Lab, id: ScenarioId, format: OutputFormat) -> Result<String> {
    let d = lab.registry.lookup(id)?;
    match format {
        OutputFormat::Json => Ok(serde_json::to_string_pretty(d)?),
        OutputFormat::Text => {
            let components: Vec<&str> = d.required_components.iter().map(|c| c.as_str()).collect();
            let mut out = String::new();
            writeln!(out, "scenario:            {}", d.id)?;
            writeln!(out, "pattern:             {}", d.pattern)?;
            writeln!(out, "namespace:           {}", d.namespace)?;
            writeln!(out, "service prefix:      {}", d.service_prefix)?;
            writeln!(out, "telemetry endpoint:  {}", d.telemetry_endpoint)?;
            writeln!(out, "required components: {}", components.join(", "))?;
            if !d.description.is_empty() {
                writeln!(out, "description:         {}", d.description)?;
            }
            Ok(out)
        }
    }
}

/// `resolve`: the resolved configuration
///
/// # Errors
/// Unknown scenario or invalid override.
pub fn resolve(lab: &Lab, id: ScenarioId, flags: &Overrides, format: OutputFormat) -> Result<String> {
    let config = lab.resolve(id, flags)?;
    match format {
        OutputFormat::Json => Ok(serde_json::to_string_pretty(&config)?),
        OutputFormat::Text => {
            let mut out = String::new();
            writeln!(out, "scenario:           {}", config.scenario())?;
            writeln!(out, "pattern:            {}", config.pattern())?;
            writeln!(out, "namespace:          {}", config.namespace())?;
            writeln!(out, "service prefix:     {}", config.service_prefix())?;
            writeln!(out, "telemetry endpoint: {}", config.telemetry_endpoint())?;
            writeln!(out, "git commit sha:     {}", config.revision().commit_sha)?;
            writeln!(out, "git repository url: {}", config.revision().repository_url)?;
            Ok(out)
        }
    }
}

#[derive(Debug, Serialize)]
struct MetadataView {
    labels: IndexMap<&'static str, String>,
    annotations: IndexMap<&'static str, String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    environment: Option<Vec<EnvVar>>,
}

/// `metadata`: labels, annotations and, for a named service, its environment
///
/// # Errors
/// Resolution failure or an unknown service.
pub fn metadata(
    lab: &Lab,
    id: ScenarioId,
    flags: &Overrides,
    service: Option<&str>,
    format: OutputFormat,
) -> Result<String> {
    let config = lab.resolve(id, flags)?;
    let metadata = project(&config);

    let environment = match service {
        Some(base) => {
            let spec = lab
                .catalog
                .get(base)
                .ok_or_else(|| anyhow!("unknown service '{base}'"))?;
            Some(lab.catalog.environment(&config, &metadata, spec)?)
        }
        None => None,
    };

    let view = MetadataView {
        labels: metadata.labels(),
        annotations: metadata.annotations(),
        environment,
    };

    match format {
        OutputFormat::Json => Ok(serde_json::to_string_pretty(&view)?),
        OutputFormat::Text => {
            let mut out = String::new();
            writeln!(out, "labels:")?;
            for (key, value) in &view.labels {
                writeln!(out, "  {key}={value}")?;
            }
            writeln!(out, "annotations:")?;
            for (key, value) in &view.annotations {
                writeln!(out, "  {key}={value}")?;
            }
            if let Some(vars) = &view.environment {
                writeln!(out, "environment:")?;
                for var in vars {
                    writeln!(out, "  {}={}", var.name, var.value)?;
                }
            }
            Ok(out)
        }
    }
}

/// `values`: Helm values, chart-wide or for one service
///
/// # Errors
/// Resolution failure or an unknown service.
pub fn values(
    lab: &Lab,
    id: ScenarioId,
    flags: &Overrides,
    service: Option<&str>,
    format: ValuesFormat,
) -> Result<String> {
    let config = lab.resolve(id, flags)?;
    let metadata: DeploymentMetadata = project(&config);

    let values = match service {
        Some(base) => {
            let spec = lab
                .catalog
                .get(base)
                .ok_or_else(|| anyhow!("unknown service '{base}'"))?;
            HelmValues::for_service(&config, &metadata, &lab.catalog, spec)?
        }
        None => HelmValues::global(&config, &metadata),
    };

    match format {
        ValuesFormat::Yaml => Ok(values.to_yaml()?),
        ValuesFormat::Set => Ok(values
            .to_set_args()
            .chunks(2)
            .map(|pair| pair.join(" "))
            .collect::<Vec<_>>()
            .join("\n")
            + "\n"),
    }
}

/// `plan`: deploy commands for one or more scenarios
///
/// # Errors
/// The first scenario that fails to resolve or plan.
pub fn plan(lab: &Lab, ids: &[ScenarioId], flags: &Overrides, format: OutputFormat) -> Result<String> {
    let options = lab.config.plan_options();
    let plans = ids
        .iter()
        .map(|&id| {
            let config = lab.resolve(id, flags)?;
            let metadata = project(&config);
            DeployPlan::for_scenario(&config, &metadata, &lab.catalog, &options)
                .with_context(|| format!("planning {id}"))
        })
        .collect::<Result<Vec<_>>>()?;

    match format {
        OutputFormat::Json => Ok(serde_json::to_string_pretty(&plans)?),
        OutputFormat::Text => {
            let mut out = String::new();
            for plan in &plans {
                writeln!(out, "# {}", plan.scenario())?;
                for command in plan.commands() {
                    writeln!(out, "{command}")?;
                }
            }
            Ok(out)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn lab() -> Lab {
        Lab::new(
            ScenarioRegistry::builtin().clone(),
            LabConfig::default(),
            SourceRevisionInfo::unknown(),
        )
    }

    #[test]
    fn list_text_has_one_row_per_scenario() {
        let out = list(&lab(), OutputFormat::Text).unwrap();
        assert_eq!(out.lines().count(), 3);
        assert!(out.lines().next().unwrap().starts_with("scenario1"));
    }

    #[test]
    fn unknown_service_is_an_error() {
        let err = metadata(
            &lab(),
            ScenarioId::Scenario1,
            &Overrides::none(),
            Some("billing-service"),
            OutputFormat::Text,
        )
        .unwrap_err();
        assert!(err.to_string().contains("billing-service"));
    }

    #[test]
    fn set_values_are_one_pair_per_line() {
        let out = values(
            &lab(),
            ScenarioId::Scenario1,
            &Overrides::none(),
            None,
            ValuesFormat::Set,
        )
        .unwrap();
        assert!(out.lines().all(|line| line.starts_with("--set-string ")));
        assert!(out.contains("--set-string global.servicePrefix=datadog"));
    }
}
