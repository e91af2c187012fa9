//! Testing utilities for OTLab workspace
//!
//! Shared fixtures for descriptors, registries and revision info.

#![allow(missing_docs)]

use otlab_core::{ComponentId, DnsLabel, Endpoint, ScenarioDescriptor, ScenarioId, SourceRevisionInfo};
use otlab_registry::ScenarioRegistry;
use otlab_resolve::Resolver;

pub const SAMPLE_COMMIT: &str = "3f2c1a9e8b7d6c5f4e3d2c1b0a9f8e7d6c5b4a39";
pub const SAMPLE_REPOSITORY: &str = "github.com/acme/otel-lab";

/// Two-scenario registry document used by file-loading tests
pub const SAMPLE_REGISTRY_YAML: &str = r"
scenarios:
  - id: scenario2
    pattern: via-collector
    namespace: lab-collector
    service_prefix: col
    telemetry_endpoint: http://collector.lab.svc.cluster.local:4318
    required_components: [otel-collector]
    description: collector first
  - id: scenario1
    pattern: direct-to-agent
    namespace: lab-agent
    service_prefix: agt
    telemetry_endpoint: http://agent.lab.svc.cluster.local:4318
    required_components: [datadog-agent]
";

pub fn label(value: &str) -> DnsLabel {
    DnsLabel::parse(value).unwrap()
}

pub fn endpoint(value: &str) -> Endpoint {
    Endpoint::parse(value).unwrap()
}

pub fn descriptor(id: ScenarioId, namespace: &str, prefix: &str) -> ScenarioDescriptor {
    ScenarioDescriptor::new(id, label(namespace), label(prefix), endpoint("http://collector:4318"))
        .with_components(vec![ComponentId::new("otel-collector").unwrap()])
}

pub fn sample_revision() -> SourceRevisionInfo {
    SourceRevisionInfo::new(SAMPLE_COMMIT, SAMPLE_REPOSITORY)
}

pub fn builtin_registry() -> ScenarioRegistry {
    ScenarioRegistry::with_defaults().unwrap()
}

pub fn builtin_resolver() -> Resolver<'static> {
    Resolver::new(ScenarioRegistry::builtin())
}
