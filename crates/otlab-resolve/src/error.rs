//! Error types for resolution and naming
//!
//! Provides error handling for:
//! - Unknown scenarios
//! - Overrides that break naming or addressing rules
//! - Derived names that break platform constraints
//! - Inconsistent service catalogs
//!
//! All of them are deterministic in their inputs and never retried.

use otlab_core::ScenarioId;
use std::fmt::{self, Display, Formatter};

/// Field an override targets
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum OverrideField {
    /// Telemetry endpoint
    Endpoint,
    /// Namespace
    Namespace,
    /// Service prefix
    ServicePrefix,
}

impl Display for OverrideField {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Endpoint => "endpoint",
            Self::Namespace => "namespace",
            Self::ServicePrefix => "service-prefix",
        })
    }
}

/// Resolution errors
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ResolveError {
    /// Scenario is not in the registry
    #[error("unknown scenario: {0}")]
    UnknownScenario(ScenarioId),

    /// Caller-supplied override is malformed
    #[error("invalid {field} override '{value}': {reason}")]
    InvalidOverride {
        /// Offending field
        field: OverrideField,
        /// Value as supplied
        value: String,
        /// Broken rule
        reason: String,
    },
}

impl ResolveError {
    /// Field named by an `InvalidOverride`
    #[inline]
    #[must_use]
    pub fn override_field(&self) -> Option<OverrideField> {
        match self {
            Self::InvalidOverride { field, .. } => Some(*field),
            Self::UnknownScenario(_) => None,
        }
    }

    /// Always `false`
    #[inline]
    #[must_use]
    pub fn is_retryable(&self) -> bool {
        false
    }
}

/// Service name derivation errors
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum NamingError {
    /// Derived name exceeds 63 characters
    #[error("service name '{name}' is {len} characters long (max 63)")]
    NameTooLong {
        /// Computed name
        name: String,
        /// Its length
        len: usize,
    },

    /// Base name is not a valid label fragment
    #[error("invalid base service name '{base}': {reason}")]
    InvalidBaseName {
        /// Base name as supplied
        base: String,
        /// Broken rule
        reason: String,
    },
}

/// Service catalog errors
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CatalogError {
    /// Two services share a base name
    #[error("duplicate service: {0}")]
    DuplicateService(String),

    /// Dependency on a service that is not in the catalog
    #[error("service '{service}' depends on unknown service '{dependency}'")]
    UnknownDependency {
        /// Dependent service
        service: String,
        /// Missing dependency
        dependency: String,
    },

    /// Dependencies form a cycle
    #[error("dependency cycle through '{0}'")]
    DependencyCycle(String),

    /// Base name is invalid
    #[error(transparent)]
    Naming(#[from] NamingError),
}
