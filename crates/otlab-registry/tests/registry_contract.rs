use otlab_core::{DeploymentPattern, ScenarioId};
use otlab_registry::{ConflictField, RegistryError, ScenarioRegistry};
use otlab_test_utils::{builtin_registry, descriptor, SAMPLE_REGISTRY_YAML};
use pretty_assertions::assert_eq;
use std::collections::HashSet;
use std::io::Write;

#[test]
fn every_registered_scenario_looks_up_with_unique_boundaries() {
    let registry = builtin_registry();
    let mut namespaces = HashSet::new();
    let mut prefixes = HashSet::new();

    for id in registry.all_scenarios() {
        let descriptor = registry.lookup(id).unwrap();
        assert_eq!(descriptor.id, id);
        assert!(namespaces.insert(descriptor.namespace.clone()));
        assert!(prefixes.insert(descriptor.service_prefix.clone()));
    }

    assert_eq!(namespaces.len(), registry.len());
}

#[test]
fn shared_namespace_fails_before_any_lookup() {
    let result = ScenarioRegistry::new([
        descriptor(ScenarioId::Scenario1, "team-lab", "one"),
        descriptor(ScenarioId::Scenario2, "two-lab", "two"),
        descriptor(ScenarioId::Scenario3, "team-lab", "three"),
    ]);

    let Err(RegistryError::RegistryConflict { field, first, second, .. }) = result else {
        panic!("expected namespace conflict");
    };
    assert_eq!(field, ConflictField::Namespace);
    assert_eq!((first, second), (ScenarioId::Scenario1, ScenarioId::Scenario3));
}

#[test]
fn yaml_registry_keeps_document_order() {
    let registry = ScenarioRegistry::from_yaml_str(SAMPLE_REGISTRY_YAML).unwrap();

    let order: Vec<_> = registry.all_scenarios().collect();
    assert_eq!(order, vec![ScenarioId::Scenario2, ScenarioId::Scenario1]);

    let collector = registry.lookup(ScenarioId::Scenario2).unwrap();
    assert_eq!(collector.namespace.as_str(), "lab-collector");
    assert_eq!(collector.description, "collector first");

    assert!(matches!(
        registry.lookup(ScenarioId::Scenario3),
        Err(RegistryError::UnknownScenario(ScenarioId::Scenario3))
    ));
}

#[test]
fn yaml_registry_with_conflict_is_rejected() {
    let yaml = SAMPLE_REGISTRY_YAML.replace("service_prefix: agt", "service_prefix: col");
    let err = ScenarioRegistry::from_yaml_str(&yaml).unwrap_err();
    assert!(err.is_conflict());
    assert_eq!(
        err.to_string(),
        "registry conflict: scenario2 and scenario1 share service-prefix 'col'"
    );
}

#[test]
fn yaml_registry_cannot_relabel_a_scenario_pattern() {
    let yaml = SAMPLE_REGISTRY_YAML.replace("pattern: direct-to-agent", "pattern: via-collector");
    let err = ScenarioRegistry::from_yaml_str(&yaml).unwrap_err();

    let RegistryError::PatternMismatch { scenario, declared, expected } = err else {
        panic!("expected pattern mismatch");
    };
    assert_eq!(scenario, ScenarioId::Scenario1);
    assert_eq!(declared, DeploymentPattern::ViaCollector);
    assert_eq!(expected, DeploymentPattern::DirectToAgent);
}

#[test]
fn yaml_registry_with_invalid_value_is_a_parse_error() {
    let yaml = SAMPLE_REGISTRY_YAML.replace(
        "http://collector.lab.svc.cluster.local:4318",
        "collector.lab.svc.cluster.local:4318",
    );
    let err = ScenarioRegistry::from_yaml_str(&yaml).unwrap_err();
    assert!(matches!(err, RegistryError::Parse(_)));
}

#[test]
fn yaml_registry_rejects_unknown_scenario_id() {
    let yaml = SAMPLE_REGISTRY_YAML.replace("id: scenario2", "id: scenario7");
    assert!(ScenarioRegistry::from_yaml_str(&yaml).is_err());
}

#[test]
fn registry_file_round_trips_through_yaml() {
    let original = builtin_registry();
    let mut file = tempfile::NamedTempFile::new().unwrap();
    file.write_all(original.to_yaml().unwrap().as_bytes()).unwrap();

    let loaded = ScenarioRegistry::from_yaml_file(file.path()).unwrap();
    assert_eq!(loaded, original);
}

#[test]
fn missing_registry_file_is_io_error() {
    let dir = tempfile::tempdir().unwrap();
    let err = ScenarioRegistry::from_yaml_file(dir.path().join("absent.yaml")).unwrap_err();
    assert!(matches!(err, RegistryError::Io { .. }));
    assert!(err.is_retryable());
}

mod properties {
    use super::*;
    use proptest::prelude::*;

    proptest! {
        #[test]
        fn prop_any_builtin_subset_keeps_order(
            picks in proptest::sample::subsequence(ScenarioId::ALL.to_vec(), 0..=3)
                .prop_shuffle()
        ) {
            let builtin = builtin_registry();
            let rows: Vec<_> = picks
                .iter()
                .map(|&id| builtin.lookup(id).unwrap().clone())
                .collect();

            let registry = ScenarioRegistry::new(rows).unwrap();
            let order: Vec<_> = registry.all_scenarios().collect();
            prop_assert_eq!(order, picks.clone());

            for id in ScenarioId::ALL {
                prop_assert_eq!(registry.contains(id), picks.contains(&id));
            }
        }

        #[test]
        fn prop_shared_prefix_is_always_a_conflict(prefix in "[a-z][a-z0-9]{0,8}") {
            let result = ScenarioRegistry::new([
                descriptor(ScenarioId::Scenario1, "ns-one", &prefix),
                descriptor(ScenarioId::Scenario2, "ns-two", &prefix),
            ]);
            prop_assert!(matches!(
                result,
                Err(RegistryError::RegistryConflict { field: ConflictField::ServicePrefix, .. })
            ), "expected RegistryConflict on ServicePrefix, got {:?}", result);
        }
    }
}
