//! Built-in scenario table
//!
//! One row per scenario. This is the only place scenario defaults live.

use crate::error::RegistryResult;
use crate::registry::ScenarioRegistry;
use once_cell::sync::Lazy;
use otlab_core::{ComponentId, DnsLabel, Endpoint, ScenarioDescriptor, ScenarioId};

struct Row {
    id: ScenarioId,
    namespace: &'static str,
    service_prefix: &'static str,
    endpoint: &'static str,
    components: &'static [&'static str],
    description: &'static str,
}

const ROWS: [Row; 3] = [
    Row {
        id: ScenarioId::Scenario1,
        namespace: "datadog-scenario1",
        service_prefix: "datadog",
        endpoint: "http://datadog-agent.datadog.svc.cluster.local:4318",
        components: &["datadog-agent"],
        description: "OTLP straight to the Datadog Agent",
    },
    Row {
        id: ScenarioId::Scenario2,
        namespace: "otel-scenario2",
        service_prefix: "otel",
        endpoint: "http://otel-collector.otel-collector.svc.cluster.local:4318",
        components: &["otel-collector"],
        description: "OTLP to the upstream OpenTelemetry Collector",
    },
    Row {
        id: ScenarioId::Scenario3,
        namespace: "ddot-scenario3",
        service_prefix: "ddot",
        endpoint: "http://ddot-agent.datadog.svc.cluster.local:4318",
        components: &["datadog-agent", "ddot-collector"],
        description: "OTLP to the Datadog distribution of the OpenTelemetry Collector",
    },
];

static BUILTIN: Lazy<ScenarioRegistry> = Lazy::new(|| {
    ScenarioRegistry::with_defaults().expect("built-in scenario table must be consistent")
});

/// Built-in descriptors, in registration order
///
/// # Errors
/// Only if a row holds an invalid literal.
pub fn builtin_descriptors() -> RegistryResult<Vec<ScenarioDescriptor>> {
    ROWS.iter()
        .map(|row| -> RegistryResult<ScenarioDescriptor> {
            let components = row
                .components
                .iter()
                .map(|c| ComponentId::new(*c))
                .collect::<Result<Vec<_>, _>>()?;

            Ok(ScenarioDescriptor::new(
                row.id,
                DnsLabel::parse(row.namespace)?,
                DnsLabel::parse(row.service_prefix)?,
                Endpoint::parse(row.endpoint)?,
            )
            .with_components(components)
            .with_description(row.description))
        })
        .collect()
}

impl ScenarioRegistry {
    /// Create registry with the built-in scenarios
    ///
    /// # Errors
    /// Propagates validation failures of the built-in table.
    pub fn with_defaults() -> RegistryResult<Self> {
        Self::new(builtin_descriptors()?)
    }

    /// Process-wide built-in registry
    ///
    /// Validated on first access. A broken built-in table aborts the process
    /// before anything can be resolved against it.
    #[must_use]
    pub fn builtin() -> &'static Self {
        &BUILTIN
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builtin_table_is_valid() {
        let registry = ScenarioRegistry::with_defaults().unwrap();
        assert_eq!(registry.len(), ScenarioId::ALL.len());
        registry.validate().unwrap();
    }

    #[test]
    fn builtin_order_matches_declaration() {
        let order: Vec<_> = ScenarioRegistry::builtin().all_scenarios().collect();
        assert_eq!(order, ScenarioId::ALL.to_vec());
    }

    #[test]
    fn builtin_prefixes() {
        let registry = ScenarioRegistry::builtin();
        let prefixes: Vec<_> = registry
            .descriptors()
            .map(|d| d.service_prefix.as_str())
            .collect();
        assert_eq!(prefixes, vec!["datadog", "otel", "ddot"]);
    }

    #[test]
    fn builtin_patterns_follow_ids() {
        for descriptor in ScenarioRegistry::builtin().descriptors() {
            assert_eq!(descriptor.pattern, descriptor.id.pattern());
        }
    }
}
