//! Scenario registry
//!
//! Provides [`ScenarioRegistry`], the ordered, validated table from
//! [`ScenarioId`] to [`ScenarioDescriptor`].

use crate::error::{ConflictField, RegistryError, RegistryResult};
use indexmap::IndexMap;
use otlab_core::{ScenarioDescriptor, ScenarioId};
use std::collections::HashMap;

/// Validated scenario table
///
/// Construction always validates, so holding a `ScenarioRegistry` means
/// namespaces and service prefixes are unique and every entry's pattern is
/// the one its id stands for. Iteration follows
/// registration order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScenarioRegistry {
    entries: IndexMap<ScenarioId, ScenarioDescriptor>,
}

impl ScenarioRegistry {
    /// Build a registry from descriptors, in registration order
    ///
    /// # Errors
    /// [`RegistryError::RegistryConflict`] if an id, namespace or service
    /// prefix appears twice, [`RegistryError::PatternMismatch`] if an entry
    /// declares a pattern other than its id's.
    pub fn new(descriptors: impl IntoIterator<Item = ScenarioDescriptor>) -> RegistryResult<Self> {
        let mut entries = IndexMap::new();

        for descriptor in descriptors {
            if entries.contains_key(&descriptor.id) {
                return Err(RegistryError::RegistryConflict {
                    field: ConflictField::Scenario,
                    value: descriptor.id.to_string(),
                    first: descriptor.id,
                    second: descriptor.id,
                });
            }
            entries.insert(descriptor.id, descriptor);
        }

        let registry = Self { entries };
        registry.validate()?;

        tracing::debug!(scenarios = registry.len(), "scenario registry validated");
        Ok(registry)
    }

    /// Re-check uniqueness of namespaces and service prefixes
    ///
    /// # Errors
    /// [`RegistryError::RegistryConflict`] naming the first collision found.
    pub fn validate(&self) -> RegistryResult<()> {
        let mut namespaces: HashMap<&str, ScenarioId> = HashMap::new();
        let mut prefixes: HashMap<&str, ScenarioId> = HashMap::new();

        for descriptor in self.entries.values() {
            if descriptor.pattern != descriptor.id.pattern() {
                return Err(RegistryError::PatternMismatch {
                    scenario: descriptor.id,
                    declared: descriptor.pattern,
                    expected: descriptor.id.pattern(),
                });
            }

            if let Some(&first) = namespaces.get(descriptor.namespace.as_str()) {
                return Err(RegistryError::RegistryConflict {
                    field: ConflictField::Namespace,
                    value: descriptor.namespace.to_string(),
                    first,
                    second: descriptor.id,
                });
            }
            namespaces.insert(descriptor.namespace.as_str(), descriptor.id);

            if let Some(&first) = prefixes.get(descriptor.service_prefix.as_str()) {
                return Err(RegistryError::RegistryConflict {
                    field: ConflictField::ServicePrefix,
                    value: descriptor.service_prefix.to_string(),
                    first,
                    second: descriptor.id,
                });
            }
            prefixes.insert(descriptor.service_prefix.as_str(), descriptor.id);
        }

        Ok(())
    }

    /// Look up the descriptor for a scenario
    ///
    /// # Errors
    /// [`RegistryError::UnknownScenario`] if `id` was not registered.
    pub fn lookup(&self, id: ScenarioId) -> RegistryResult<&ScenarioDescriptor> {
        self.entries
            .get(&id)
            .ok_or(RegistryError::UnknownScenario(id))
    }

    /// Registered scenarios in registration order
    pub fn all_scenarios(&self) -> impl Iterator<Item = ScenarioId> + '_ {
        self.entries.keys().copied()
    }

    /// Registered descriptors in registration order
    pub fn descriptors(&self) -> impl Iterator<Item = &ScenarioDescriptor> {
        self.entries.values()
    }

    /// Check if scenario is registered
    #[inline]
    #[must_use]
    pub fn contains(&self, id: ScenarioId) -> bool {
        self.entries.contains_key(&id)
    }

    /// Number of registered scenarios
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Check if registry is empty
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
