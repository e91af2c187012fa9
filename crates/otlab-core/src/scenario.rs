//! Scenarios and their descriptors
//!
//! [`ScenarioId`] is the closed set of deployment topologies the lab knows
//! about. Adding a topology means adding a variant here and one row to the
//! registry table.

use crate::endpoint::Endpoint;
use crate::error::CoreError;
use crate::label::DnsLabel;
use serde::{Deserialize, Serialize};
use std::fmt::{self, Display, Formatter};
use std::str::FromStr;

/// Scenario identifier
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ScenarioId {
    /// Services export straight to the Datadog Agent
    Scenario1,
    /// Services export to an OpenTelemetry Collector
    Scenario2,
    /// Services export to the Datadog distribution of the Collector
    Scenario3,
}

impl ScenarioId {
    /// Every variant, in declaration order
    pub const ALL: [ScenarioId; 3] = [Self::Scenario1, Self::Scenario2, Self::Scenario3];

    /// Textual identifier
    #[inline]
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Scenario1 => "scenario1",
            Self::Scenario2 => "scenario2",
            Self::Scenario3 => "scenario3",
        }
    }

    /// Short name lab scripts use for this scenario (`datadog`, `otel`, `ddot`)
    ///
    /// Only an alias for parsing; the service prefix actually used comes from
    /// the registry.
    #[inline]
    #[must_use]
    pub fn alias(&self) -> &'static str {
        match self {
            Self::Scenario1 => "datadog",
            Self::Scenario2 => "otel",
            Self::Scenario3 => "ddot",
        }
    }

    /// Pattern this scenario stands for
    #[inline]
    #[must_use]
    pub fn pattern(&self) -> DeploymentPattern {
        match self {
            Self::Scenario1 => DeploymentPattern::DirectToAgent,
            Self::Scenario2 => DeploymentPattern::ViaCollector,
            Self::Scenario3 => DeploymentPattern::ViaCuratedDistribution,
        }
    }
}

impl Display for ScenarioId {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ScenarioId {
    type Err = CoreError;

    /// Accepts `scenario1`, `1`, the pattern name (`direct-to-agent`) or the
    /// short alias (`datadog`)
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let needle = s.trim();
        Self::ALL
            .into_iter()
            .find(|id| {
                needle == id.as_str()
                    || needle == &id.as_str()["scenario".len()..]
                    || needle == id.pattern().as_str()
                    || needle == id.alias()
            })
            .ok_or_else(|| CoreError::UnknownScenarioId(s.to_string()))
    }
}

/// How telemetry flows from the services to the backend
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum DeploymentPattern {
    /// Service → Agent OTLP receiver
    DirectToAgent,
    /// Service → OpenTelemetry Collector → backend
    ViaCollector,
    /// Service → vendor-curated Collector distribution
    ViaCuratedDistribution,
}

impl DeploymentPattern {
    /// Wire value
    #[inline]
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::DirectToAgent => "direct-to-agent",
            Self::ViaCollector => "via-collector",
            Self::ViaCuratedDistribution => "via-curated-distribution",
        }
    }
}

impl Display for DeploymentPattern {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Upstream component that must be ready before a scenario deploys
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ComponentId(DnsLabel);

impl ComponentId {
    /// Create a component identifier
    pub fn new(name: impl Into<String>) -> Result<Self, CoreError> {
        DnsLabel::parse(name).map(Self)
    }

    /// Borrow as `&str`
    #[inline]
    #[must_use]
    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }
}

impl Display for ComponentId {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        Display::fmt(&self.0, f)
    }
}

impl FromStr for ComponentId {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s)
    }
}

/// Everything a scenario identifier resolves to
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScenarioDescriptor {
    /// Scenario this descriptor belongs to
    pub id: ScenarioId,
    /// Deployment pattern
    pub pattern: DeploymentPattern,
    /// Isolation namespace, unique per scenario
    pub namespace: DnsLabel,
    /// Prefix joined to base service names with `-`, unique per scenario
    pub service_prefix: DnsLabel,
    /// Upstream OTLP destination
    pub telemetry_endpoint: Endpoint,
    /// Components that must be ready before deployment
    #[serde(default)]
    pub required_components: Vec<ComponentId>,
    /// Free-form summary
    #[serde(default)]
    pub description: String,
}

impl ScenarioDescriptor {
    /// Create descriptor with the pattern implied by `id`
    #[must_use]
    pub fn new(
        id: ScenarioId,
        namespace: DnsLabel,
        service_prefix: DnsLabel,
        telemetry_endpoint: Endpoint,
    ) -> Self {
        Self {
            id,
            pattern: id.pattern(),
            namespace,
            service_prefix,
            telemetry_endpoint,
            required_components: Vec::new(),
            description: String::new(),
        }
    }

    /// With required components
    #[inline]
    #[must_use]
    pub fn with_components(mut self, components: Vec<ComponentId>) -> Self {
        self.required_components = components;
        self
    }

    /// With description
    #[inline]
    #[must_use]
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn scenario_id_parses_aliases() {
        assert_eq!("scenario1".parse::<ScenarioId>().unwrap(), ScenarioId::Scenario1);
        assert_eq!("2".parse::<ScenarioId>().unwrap(), ScenarioId::Scenario2);
        assert_eq!(
            "via-curated-distribution".parse::<ScenarioId>().unwrap(),
            ScenarioId::Scenario3
        );
        assert_eq!("datadog".parse::<ScenarioId>().unwrap(), ScenarioId::Scenario1);
        assert_eq!("otel".parse::<ScenarioId>().unwrap(), ScenarioId::Scenario2);
        assert_eq!("ddot".parse::<ScenarioId>().unwrap(), ScenarioId::Scenario3);
    }

    #[test]
    fn scenario_id_aliases_are_distinct() {
        for id in ScenarioId::ALL {
            for other in ScenarioId::ALL {
                if id != other {
                    assert_ne!(id.alias(), other.alias());
                    assert_ne!(id.alias(), other.pattern().as_str());
                }
            }
        }
    }

    #[test]
    fn scenario_id_rejects_unknown() {
        let err = "scenario9".parse::<ScenarioId>().unwrap_err();
        assert_eq!(err, CoreError::UnknownScenarioId("scenario9".into()));
    }

    #[test]
    fn scenario_id_serde_is_lowercase() {
        let json = serde_json::to_string(&ScenarioId::Scenario2).unwrap();
        assert_eq!(json, "\"scenario2\"");
    }

    #[test]
    fn pattern_wire_values() {
        let json = serde_json::to_string(&DeploymentPattern::ViaCuratedDistribution).unwrap();
        assert_eq!(json, "\"via-curated-distribution\"");
        assert_eq!(ScenarioId::Scenario1.pattern().as_str(), "direct-to-agent");
    }

    #[test]
    fn descriptor_from_yaml_validates_fields() {
        let yaml = r"
id: scenario2
pattern: via-collector
namespace: otel-scenario2
service_prefix: otel
telemetry_endpoint: http://otel-collector:4318
required_components: [otel-collector]
";
        let desc: ScenarioDescriptor = serde_yaml::from_str(yaml).unwrap();
        assert_eq!(desc.service_prefix.as_str(), "otel");
        assert_eq!(desc.required_components[0].as_str(), "otel-collector");

        let bad = yaml.replace("otel-scenario2", "Otel_Scenario2");
        assert!(serde_yaml::from_str::<ScenarioDescriptor>(&bad).is_err());
    }
}
