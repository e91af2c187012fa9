//! YAML registry documents
//!
//! Lets a lab checkout replace the built-in table:
//!
//! ```yaml
//! scenarios:
//!   - id: scenario1
//!     pattern: direct-to-agent
//!     namespace: datadog-scenario1
//!     service_prefix: datadog
//!     telemetry_endpoint: http://datadog-agent.datadog.svc.cluster.local:4318
//!     required_components: [datadog-agent]
//! ```
//!
//! Loaded tables go through the same validation as the built-in one.

use crate::error::{RegistryError, RegistryResult};
use crate::registry::ScenarioRegistry;
use otlab_core::ScenarioDescriptor;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// On-disk registry document
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RegistryDocument {
    /// Scenario rows, in registration order
    pub scenarios: Vec<ScenarioDescriptor>,
}

impl ScenarioRegistry {
    /// Parse and validate a registry from YAML text
    ///
    /// # Errors
    /// [`RegistryError::Parse`] for malformed YAML or invalid field values,
    /// [`RegistryError::RegistryConflict`] for collisions.
    pub fn from_yaml_str(yaml: &str) -> RegistryResult<Self> {
        let document: RegistryDocument = serde_yaml::from_str(yaml)?;
        Self::new(document.scenarios)
    }

    /// Read, parse and validate a registry file
    ///
    /// # Errors
    /// [`RegistryError::Io`] if the file cannot be read, otherwise as
    /// [`ScenarioRegistry::from_yaml_str`].
    pub fn from_yaml_file(path: impl AsRef<Path>) -> RegistryResult<Self> {
        let path = path.as_ref();
        let text =
            std::fs::read_to_string(path).map_err(|e| RegistryError::io_error(path, e))?;

        tracing::debug!(path = %path.display(), "loading scenario registry");
        Self::from_yaml_str(&text)
    }

    /// Serialize this registry as a YAML document
    ///
    /// # Errors
    /// [`RegistryError::Parse`] if serialization fails.
    pub fn to_yaml(&self) -> RegistryResult<String> {
        let document = RegistryDocument {
            scenarios: self.descriptors().cloned().collect(),
        };
        Ok(serde_yaml::to_string(&document)?)
    }
}
