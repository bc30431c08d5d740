//! End-to-end pledge lifecycle scenarios.

use std::sync::Arc;

use pledge_registry::*;

fn principal(name: &str) -> PrincipalId {
    PrincipalId::new(name)
}

fn registry_at(height: u64, config: RegistryConfig) -> (PledgeRegistry, Arc<ManualHeight>) {
    let heights = Arc::new(ManualHeight::new(BlockHeight(height)));
    let registry = PledgeRegistry::new(config, heights.clone()).expect("valid config");
    (registry, heights)
}

#[test]
fn report_pledge_from_creation_to_termination() {
    let (mut registry, _) = registry_at(50, RegistryConfig::default());
    let a = principal("A");

    registry.initialize(&a, "finish report").unwrap();
    let view = registry.verify(&a).unwrap();
    assert!(view.exists);
    assert!(!view.fulfilled);

    registry.assign_priority(&a, 2).unwrap();

    registry.set_temporal_boundary(&a, 100).unwrap();
    let bound = registry.temporal_bound_of(&a).unwrap().unwrap();
    assert_eq!(bound.deadline, BlockHeight(150));
    assert!(!bound.alert_activated);

    let text = "finish report v2";
    registry.modify(&a, text, true).unwrap();
    assert_eq!(
        registry.verify(&a).unwrap(),
        PledgeView {
            exists: true,
            text_length: text.chars().count(),
            fulfilled: true,
        }
    );

    let receipt = registry.terminate(&a).unwrap();
    assert_eq!(receipt.operation, PledgeOperation::Terminate);
    assert!(!registry.verify(&a).unwrap().exists);

    // Priority and deadline outlive the commitment.
    assert_eq!(registry.priority_of(&a).unwrap(), Some(PriorityWeight::Medium));
    assert_eq!(
        registry.temporal_bound_of(&a).unwrap().map(|b| b.deadline),
        Some(BlockHeight(150))
    );
}

#[test]
fn orphans_are_visible_in_exported_tables() {
    let (mut registry, _) = registry_at(0, RegistryConfig::default());
    let a = principal("A");
    registry.initialize(&a, "task").unwrap();
    registry.assign_priority(&a, 3).unwrap();
    registry.terminate(&a).unwrap();

    let tables = registry.tables().unwrap();
    assert!(tables.commitments.is_empty());
    assert_eq!(tables.priorities.get(&a), Some(&PriorityWeight::High));

    // Mutations still require a live pledge even though a record remains.
    assert_eq!(
        registry.assign_priority(&a, 1).unwrap_err(),
        PledgeError::NotFound(a.clone())
    );
    assert_eq!(registry.priority_of(&a).unwrap(), Some(PriorityWeight::High));
}

#[test]
fn cascade_configuration_drops_everything() {
    let config = RegistryConfig::from_toml_str("termination = \"cascade\"").unwrap();
    let (mut registry, _) = registry_at(10, config);
    let a = principal("A");

    registry.initialize(&a, "task").unwrap();
    registry.assign_priority(&a, 1).unwrap();
    registry.set_temporal_boundary(&a, 3).unwrap();
    registry.terminate(&a).unwrap();

    assert_eq!(registry.tables().unwrap(), PledgeTables::default());
    assert_eq!(registry.summary().unwrap(), RegistrySummary::default());
}

#[test]
fn delegation_is_open_by_default() {
    let (mut registry, _) = registry_at(0, RegistryConfig::default());
    let (a, b) = (principal("A"), principal("B"));

    let receipt = registry.delegate(&a, &b, "pair on review").unwrap();
    assert_eq!(receipt.owner, b);
    assert!(registry.verify(&b).unwrap().exists);
    assert!(!registry.verify(&a).unwrap().exists);

    // Self-delegation behaves like initialize.
    registry.delegate(&a, &a, "my own").unwrap();
    assert!(registry.verify(&a).unwrap().exists);

    // B now manages the delegated pledge as its own.
    registry.modify(&b, "pair on review", true).unwrap();
    assert!(registry.verify(&b).unwrap().fulfilled);
}

#[test]
fn self_only_delegation_from_config_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("pledges.toml");
    std::fs::write(&path, "delegation = \"self_only\"\n").unwrap();

    let config = RegistryConfig::load(&path).unwrap();
    let (mut registry, _) = registry_at(0, config);
    let (a, b) = (principal("A"), principal("B"));

    assert!(matches!(
        registry.delegate(&a, &b, "not yours").unwrap_err(),
        PledgeError::Unauthorized { .. }
    ));
    registry.delegate(&b, &b, "mine").unwrap();
    assert!(registry.verify(&b).unwrap().exists);
}

#[test]
fn deadlines_follow_the_height_source() {
    let (mut registry, heights) = registry_at(1_000, RegistryConfig::default());
    let a = principal("A");
    registry.initialize(&a, "renew certificate").unwrap();

    registry.set_temporal_boundary(&a, 20).unwrap();
    assert_eq!(
        registry.temporal_bound_of(&a).unwrap().unwrap().deadline,
        BlockHeight(1_020)
    );

    // The environment moves forward; nothing fires on its own.
    heights.advance(500);
    let bound = registry.temporal_bound_of(&a).unwrap().unwrap();
    assert!(bound.is_due_at(heights.current_height()));
    assert!(!bound.alert_activated);

    let due = registry.bounds_due_at(heights.current_height()).unwrap();
    assert_eq!(due, vec![(a.clone(), bound)]);
    registry.set_alert(&a, true).unwrap();
    assert!(registry
        .bounds_due_at(heights.current_height())
        .unwrap()
        .is_empty());
}

#[test]
fn custom_store_through_trait() {
    let heights: Arc<dyn HeightSource> = Arc::new(FixedHeight(BlockHeight(5)));
    let mut registry =
        PledgeRegistry::with_store(InMemoryPledgeStore::new(), RegistryConfig::default(), heights)
            .unwrap();
    let a = principal("A");

    registry.initialize(&a, "task").unwrap();
    registry.set_temporal_boundary(&a, 1).unwrap();
    assert_eq!(
        registry.temporal_bound_of(&a).unwrap().unwrap().deadline,
        BlockHeight(6)
    );
}

#[test]
fn exported_json_restores_identically() {
    let (mut registry, heights) = registry_at(7, RegistryConfig::default());
    for (name, level) in [("A", 1), ("B", 2), ("C", 3)] {
        let p = principal(name);
        registry.initialize(&p, &format!("pledge of {name}")).unwrap();
        registry.assign_priority(&p, level).unwrap();
    }
    registry.set_temporal_boundary(&principal("B"), 9).unwrap();
    registry.terminate(&principal("C")).unwrap();

    let json = registry.tables().unwrap().to_json().unwrap();
    let restored = PledgeRegistry::from_tables(
        PledgeTables::from_json(&json).unwrap(),
        RegistryConfig::default(),
        heights,
    )
    .unwrap();

    assert_eq!(restored.tables().unwrap(), registry.tables().unwrap());
    assert_eq!(restored.summary().unwrap(), registry.summary().unwrap());
}
