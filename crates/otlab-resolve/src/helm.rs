//! Helm values derived from a resolved scenario
//!
//! Values are kept as flat dotted keys in insertion order and can be emitted
//! either as `--set-string` arguments or as a nested YAML document.

use crate::catalog::{ServiceCatalog, ServiceSpec};
use crate::error::NamingError;
use crate::metadata::DeploymentMetadata;
use crate::resolver::ResolvedConfig;
use indexmap::IndexMap;
use serde::Serialize;
use serde_yaml::{Mapping, Value};

/// Ordered flat Helm values
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct HelmValues {
    entries: IndexMap<String, String>,
}

impl HelmValues {
    /// Create empty values
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Chart-wide values shared by every release of a scenario
    #[must_use]
    pub fn global(config: &ResolvedConfig, metadata: &DeploymentMetadata) -> Self {
        let mut values = Self::new();
        values.set("global.scenario", &metadata.scenario);
        values.set("global.deploymentPattern", &metadata.deployment_pattern);
        values.set("global.namespace", config.namespace().as_str());
        values.set("global.servicePrefix", config.service_prefix().as_str());
        values.set("global.otelEndpoint", &metadata.telemetry_target);
        values.set("global.git.commitSha", &metadata.git_commit_sha);
        values.set("global.git.repositoryUrl", &metadata.git_repository_url);
        values
    }

    /// Values for one service release: globals, name, port, metadata and environment
    ///
    /// # Errors
    /// [`NamingError`] if a derived name is invalid.
    pub fn for_service(
        config: &ResolvedConfig,
        metadata: &DeploymentMetadata,
        catalog: &ServiceCatalog,
        service: &ServiceSpec,
    ) -> Result<Self, NamingError> {
        let mut values = Self::global(config, metadata);
        values.set("service.name", config.service_name(&service.base)?.as_str());
        values.set("service.port", service.port.to_string());

        for (key, value) in metadata.labels() {
            values.set(format!("podLabels.{key}"), value);
        }
        for (key, value) in metadata.annotations() {
            values.set(format!("podAnnotations.{key}"), value);
        }
        for var in catalog.environment(config, metadata, service)? {
            values.set(format!("env.{}", var.name), var.value);
        }

        Ok(values)
    }

    /// Set a value, replacing any previous one in place
    pub fn set(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.entries.insert(key.into(), value.into());
    }

    /// Value for a dotted key
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&str> {
        self.entries.get(key).map(String::as_str)
    }

    /// `(key, value)` pairs in insertion order
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    /// Number of values
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Check if empty
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// `--set-string key=value` argument pairs
    ///
    /// Commas and backslashes in values are escaped the way Helm expects.
    #[must_use]
    pub fn to_set_args(&self) -> Vec<String> {
        self.iter()
            .flat_map(|(key, value)| {
                [
                    "--set-string".to_string(),
                    format!("{key}={}", escape_set_value(value)),
                ]
            })
            .collect()
    }

    /// Nested YAML document
    ///
    /// # Errors
    /// Serialization failure.
    pub fn to_yaml(&self) -> Result<String, serde_yaml::Error> {
        let mut root = Mapping::new();
        for (key, value) in self.iter() {
            insert_path(&mut root, key, value);
        }
        serde_yaml::to_string(&Value::Mapping(root))
    }
}

fn escape_set_value(value: &str) -> String {
    value.replace('\\', "\\\\").replace(',', "\\,")
}

fn insert_path(root: &mut Mapping, path: &str, value: &str) {
    let mut segments = path.split('.').peekable();
    let mut current = root;

    while let Some(segment) = segments.next() {
        let key = Value::String(segment.to_string());
        if segments.peek().is_none() {
            current.insert(key, Value::String(value.to_string()));
            return;
        }

        let entry = current
            .entry(key)
            .or_insert_with(|| Value::Mapping(Mapping::new()));
        if !entry.is_mapping() {
            *entry = Value::Mapping(Mapping::new());
        }
        let Value::Mapping(next) = entry else {
            return;
        };
        current = next;
    }
}
