//! Error types for the scenario registry

use otlab_core::{CoreError, DeploymentPattern, ScenarioId};
use std::fmt::{self, Display, Formatter};
use std::path::PathBuf;

/// Descriptor field that must be unique across the registry
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ConflictField {
    /// Two entries share a scenario id
    Scenario,
    /// Two entries share a namespace
    Namespace,
    /// Two entries share a service prefix
    ServicePrefix,
}

impl Display for ConflictField {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Scenario => "scenario",
            Self::Namespace => "namespace",
            Self::ServicePrefix => "service-prefix",
        })
    }
}

/// Registry errors
#[derive(Debug, thiserror::Error)]
pub enum RegistryError {
    /// Scenario is not part of this registry
    #[error("unknown scenario: {0}")]
    UnknownScenario(ScenarioId),

    /// Two descriptors collide on an isolation or naming boundary
    #[error("registry conflict: {first} and {second} share {field} '{value}'")]
    RegistryConflict {
        /// Colliding field
        field: ConflictField,
        /// Shared value
        value: String,
        /// Scenario registered first
        first: ScenarioId,
        /// Scenario that collided with it
        second: ScenarioId,
    },

    /// Entry declares a pattern its scenario does not stand for
    #[error("{scenario} is {expected}, but its entry declares {declared}")]
    PatternMismatch {
        /// Scenario of the entry
        scenario: ScenarioId,
        /// Pattern written in the entry
        declared: DeploymentPattern,
        /// Pattern implied by the scenario id
        expected: DeploymentPattern,
    },

    /// Registry entry holds an invalid value
    #[error("invalid registry entry: {0}")]
    InvalidEntry(#[from] CoreError),

    /// Registry document could not be parsed
    #[error("failed to parse registry: {0}")]
    Parse(#[from] serde_yaml::Error),

    /// Registry file could not be read
    #[error("io error reading {path}: {source}")]
    Io {
        /// File that failed
        path: PathBuf,
        /// Underlying error
        #[source]
        source: std::io::Error,
    },
}

impl RegistryError {
    /// Create IO error for path
    pub fn io_error(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }

    /// Check if error is a startup-time invariant violation
    #[inline]
    #[must_use]
    pub fn is_conflict(&self) -> bool {
        matches!(self, Self::RegistryConflict { .. })
    }

    /// Check if error is retryable
    ///
    /// Only IO can change between attempts.
    #[inline]
    #[must_use]
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::Io { .. })
    }
}

/// Result alias for registry operations
pub type RegistryResult<T> = Result<T, RegistryError>;
