//! Scenario resolution
//!
//! Combines a registry descriptor, caller overrides and the captured source
//! revision into one immutable [`ResolvedConfig`].
//!
//! # Precedence
//!
//! ```text
//! ^ Highest
//! * explicit override (per field)
//! * scenario descriptor default
//! v Lowest
//! ```

use crate::error::{OverrideField, ResolveError};
use otlab_core::{
    ComponentId, DeploymentPattern, DnsLabel, Endpoint, ScenarioId, SourceRevisionInfo,
};
use otlab_registry::ScenarioRegistry;
use serde::{Deserialize, Serialize};

/// Caller-supplied overrides
///
/// Each field is applied independently: overriding the endpoint keeps the
/// scenario's namespace and prefix.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Overrides {
    /// Telemetry endpoint override
    pub endpoint: Option<String>,
    /// Namespace override
    pub namespace: Option<String>,
    /// Service prefix override
    pub service_prefix: Option<String>,
}

impl Overrides {
    /// No overrides
    #[inline]
    #[must_use]
    pub fn none() -> Self {
        Self::default()
    }

    /// With endpoint override
    #[inline]
    #[must_use]
    pub fn with_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.endpoint = Some(endpoint.into());
        self
    }

    /// With namespace override
    #[inline]
    #[must_use]
    pub fn with_namespace(mut self, namespace: impl Into<String>) -> Self {
        self.namespace = Some(namespace.into());
        self
    }

    /// With service prefix override
    #[inline]
    #[must_use]
    pub fn with_service_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.service_prefix = Some(prefix.into());
        self
    }

    /// Check if nothing is overridden
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.endpoint.is_none() && self.namespace.is_none() && self.service_prefix.is_none()
    }

    /// Fill unset fields from `fallback`, field by field
    #[must_use]
    pub fn or(self, fallback: Self) -> Self {
        Self {
            endpoint: self.endpoint.or(fallback.endpoint),
            namespace: self.namespace.or(fallback.namespace),
            service_prefix: self.service_prefix.or(fallback.service_prefix),
        }
    }
}

/// Fully resolved, deploy-ready configuration of one scenario
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ResolvedConfig {
    scenario: ScenarioId,
    pattern: DeploymentPattern,
    namespace: DnsLabel,
    service_prefix: DnsLabel,
    telemetry_endpoint: Endpoint,
    required_components: Vec<ComponentId>,
    revision: SourceRevisionInfo,
}

impl ResolvedConfig {
    /// Scenario
    #[inline]
    #[must_use]
    pub fn scenario(&self) -> ScenarioId {
        self.scenario
    }

    /// Deployment pattern
    #[inline]
    #[must_use]
    pub fn pattern(&self) -> DeploymentPattern {
        self.pattern
    }

    /// Namespace
    #[inline]
    #[must_use]
    pub fn namespace(&self) -> &DnsLabel {
        &self.namespace
    }

    /// Service prefix
    #[inline]
    #[must_use]
    pub fn service_prefix(&self) -> &DnsLabel {
        &self.service_prefix
    }

    /// Telemetry endpoint
    #[inline]
    #[must_use]
    pub fn telemetry_endpoint(&self) -> &Endpoint {
        &self.telemetry_endpoint
    }

    /// Components that must be ready first
    #[inline]
    #[must_use]
    pub fn required_components(&self) -> &[ComponentId] {
        &self.required_components
    }

    /// Source revision captured for this deploy
    #[inline]
    #[must_use]
    pub fn revision(&self) -> &SourceRevisionInfo {
        &self.revision
    }
}

/// Resolves scenarios against a borrowed registry
#[derive(Debug, Clone, Copy)]
pub struct Resolver<'r> {
    registry: &'r ScenarioRegistry,
}

impl<'r> Resolver<'r> {
    /// Create resolver over `registry`
    #[inline]
    #[must_use]
    pub fn new(registry: &'r ScenarioRegistry) -> Self {
        Self { registry }
    }

    /// Registry this resolver reads from
    #[inline]
    #[must_use]
    pub fn registry(&self) -> &'r ScenarioRegistry {
        self.registry
    }

    /// Resolve a scenario
    ///
    /// Pure: identical inputs give equal outputs.
    ///
    /// # Errors
    /// - [`ResolveError::UnknownScenario`] if `id` is not registered
    /// - [`ResolveError::InvalidOverride`] naming the first malformed override
    pub fn resolve(
        &self,
        id: ScenarioId,
        overrides: &Overrides,
        revision: SourceRevisionInfo,
    ) -> Result<ResolvedConfig, ResolveError> {
        let descriptor = self
            .registry
            .lookup(id)
            .map_err(|_| ResolveError::UnknownScenario(id))?;

        let telemetry_endpoint = match &overrides.endpoint {
            Some(raw) => Endpoint::parse(raw.as_str())
                .map_err(|e| invalid_override(OverrideField::Endpoint, raw, &e))?,
            None => descriptor.telemetry_endpoint.clone(),
        };

        let namespace = match &overrides.namespace {
            Some(raw) => DnsLabel::parse(raw.as_str())
                .map_err(|e| invalid_override(OverrideField::Namespace, raw, &e))?,
            None => descriptor.namespace.clone(),
        };

        let service_prefix = match &overrides.service_prefix {
            Some(raw) => DnsLabel::parse(raw.as_str())
                .map_err(|e| invalid_override(OverrideField::ServicePrefix, raw, &e))?,
            None => descriptor.service_prefix.clone(),
        };

        if overrides.namespace.is_some() {
            if let Some(owner) = self
                .registry
                .descriptors()
                .find(|d| d.id != id && d.namespace == namespace)
            {
                tracing::warn!(
                    scenario = %id,
                    namespace = %namespace,
                    owner = %owner.id,
                    "namespace override collides with another scenario"
                );
            }
        }

        tracing::debug!(
            scenario = %id,
            namespace = %namespace,
            prefix = %service_prefix,
            endpoint = %telemetry_endpoint,
            "scenario resolved"
        );

        Ok(ResolvedConfig {
            scenario: id,
            pattern: descriptor.pattern,
            namespace,
            service_prefix,
            telemetry_endpoint,
            required_components: descriptor.required_components.clone(),
            revision,
        })
    }

    /// Resolve every registered scenario, in registration order
    ///
    /// # Errors
    /// The first resolution failure.
    pub fn resolve_all(
        &self,
        overrides: &Overrides,
        revision: &SourceRevisionInfo,
    ) -> Result<Vec<ResolvedConfig>, ResolveError> {
        self.registry
            .all_scenarios()
            .map(|id| self.resolve(id, overrides, revision.clone()))
            .collect()
    }
}

fn invalid_override(field: OverrideField, value: &str, error: &otlab_core::CoreError) -> ResolveError {
    ResolveError::InvalidOverride {
        field,
        value: value.to_string(),
        reason: error.reason(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn resolver() -> Resolver<'static> {
        Resolver::new(ScenarioRegistry::builtin())
    }

    #[test]
    fn resolve_uses_descriptor_defaults() {
        let config = resolver()
            .resolve(ScenarioId::Scenario2, &Overrides::none(), SourceRevisionInfo::unknown())
            .unwrap();
        assert_eq!(config.namespace().as_str(), "otel-scenario2");
        assert_eq!(config.service_prefix().as_str(), "otel");
        assert_eq!(config.pattern(), DeploymentPattern::ViaCollector);
    }

    #[test]
    fn endpoint_override_keeps_siblings() {
        let config = resolver()
            .resolve(
                ScenarioId::Scenario1,
                &Overrides::none().with_endpoint("http://10.0.0.5:4318"),
                SourceRevisionInfo::unknown(),
            )
            .unwrap();
        assert_eq!(config.telemetry_endpoint().as_str(), "http://10.0.0.5:4318");
        assert_eq!(config.namespace().as_str(), "datadog-scenario1");
        assert_eq!(config.service_prefix().as_str(), "datadog");
    }

    #[test]
    fn malformed_endpoint_names_field() {
        let err = resolver()
            .resolve(
                ScenarioId::Scenario1,
                &Overrides::none().with_endpoint("datadog-agent:4318"),
                SourceRevisionInfo::unknown(),
            )
            .unwrap_err();
        assert_eq!(err.override_field(), Some(OverrideField::Endpoint));
        assert!(err.to_string().starts_with("invalid endpoint override 'datadog-agent:4318'"));
    }

    #[test]
    fn malformed_namespace_is_not_normalized() {
        let err = resolver()
            .resolve(
                ScenarioId::Scenario3,
                &Overrides::none().with_namespace("DDOT"),
                SourceRevisionInfo::unknown(),
            )
            .unwrap_err();
        assert_eq!(err.override_field(), Some(OverrideField::Namespace));
    }

    #[test]
    fn unknown_scenario_in_partial_registry() {
        let registry = ScenarioRegistry::new(
            otlab_registry::builtin_descriptors()
                .unwrap()
                .into_iter()
                .filter(|d| d.id != ScenarioId::Scenario2),
        )
        .unwrap();
        let err = Resolver::new(&registry)
            .resolve(ScenarioId::Scenario2, &Overrides::none(), SourceRevisionInfo::unknown())
            .unwrap_err();
        assert_eq!(err, ResolveError::UnknownScenario(ScenarioId::Scenario2));
    }

    #[test]
    fn overrides_or_is_per_field() {
        let cli = Overrides::none().with_endpoint("http://a:1");
        let file = Overrides::none()
            .with_endpoint("http://b:2")
            .with_namespace("lab");
        let merged = cli.or(file);
        assert_eq!(merged.endpoint.as_deref(), Some("http://a:1"));
        assert_eq!(merged.namespace.as_deref(), Some("lab"));
        assert!(merged.service_prefix.is_none());
    }

    #[test]
    fn resolve_all_follows_registry_order() {
        let configs = resolver()
            .resolve_all(&Overrides::none(), &SourceRevisionInfo::unknown())
            .unwrap();
        let ids: Vec<_> = configs.iter().map(ResolvedConfig::scenario).collect();
        assert_eq!(ids, ScenarioId::ALL.to_vec());
    }
}
