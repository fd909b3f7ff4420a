use restbridge_model::{
    EntityDescription, EntityModel, HierarchyNode, ModelError, PropertyDescription, PropertyKind,
};

/// Base → Sub1, Base → Sub2, Sub1 → Leaf.
fn make_model() -> EntityModel {
    EntityModel::builder()
        .entity(
            EntityDescription::new("Base")
                .with_property(PropertyDescription::attribute("remote_id")),
        )
        .entity(
            EntityDescription::child_of("Sub1", "Base")
                .with_property(PropertyDescription::attribute("name")),
        )
        .entity(EntityDescription::child_of("Sub2", "Base"))
        .entity(EntityDescription::child_of("Leaf", "Sub1"))
        .build()
        .expect("model should validate")
}

// ── Building & lookup ────────────────────────────────────────────

#[test]
fn entities_resolvable_by_name() {
    let model = make_model();
    assert_eq!(model.len(), 4);
    assert!(model.entity("Base").is_some());
    assert!(model.entity("Leaf").is_some());
    assert!(model.entity("Nope").is_none());
}

#[test]
fn entities_iterate_in_declaration_order() {
    let model = make_model();
    let names: Vec<String> = model.entities().map(|e| e.name().to_string()).collect();
    assert_eq!(names, ["Base", "Sub1", "Sub2", "Leaf"]);
}

#[test]
fn duplicate_entity_rejected() {
    let err = EntityModel::builder()
        .entity(EntityDescription::new("A"))
        .entity(EntityDescription::new("A"))
        .build()
        .unwrap_err();
    assert!(matches!(err, ModelError::DuplicateEntity(name) if name == "A"));
}

#[test]
fn unknown_parent_rejected() {
    let err = EntityModel::builder()
        .entity(EntityDescription::child_of("A", "Ghost"))
        .build()
        .unwrap_err();
    match err {
        ModelError::UnknownParent { entity, parent } => {
            assert_eq!(entity, "A");
            assert_eq!(parent, "Ghost");
        }
        other => panic!("unexpected error: {other}"),
    }
}

#[test]
fn inheritance_cycle_rejected() {
    let err = EntityModel::builder()
        .entity(EntityDescription::child_of("A", "B"))
        .entity(EntityDescription::child_of("B", "A"))
        .build()
        .unwrap_err();
    assert!(matches!(err, ModelError::InheritanceCycle(_)));
}

// ── Hierarchy navigation ─────────────────────────────────────────

#[test]
fn superentity_walks_up() {
    let model = make_model();
    let leaf = model.entity("Leaf").unwrap();
    let sub1 = leaf.superentity().unwrap();
    assert_eq!(sub1.name(), "Sub1");
    let base = sub1.superentity().unwrap();
    assert_eq!(base.name(), "Base");
    assert!(base.superentity().is_none());
}

#[test]
fn subentities_in_declaration_order() {
    let model = make_model();
    let base = model.entity("Base").unwrap();
    let children: Vec<String> = base
        .subentities()
        .iter()
        .map(|e| e.name().to_string())
        .collect();
    assert_eq!(children, ["Sub1", "Sub2"]);
}

#[test]
fn leaf_has_no_subentities() {
    let model = make_model();
    assert!(model.entity("Sub2").unwrap().subentities().is_empty());
}

#[test]
fn nodes_compare_and_hash_by_identity() {
    use std::collections::HashMap;
    let model = make_model();
    let a = model.entity("Sub1").unwrap();
    let b = model.entity("Sub1").unwrap();
    assert_eq!(a, b);
    assert_ne!(a, model.entity("Sub2").unwrap());

    let mut table = HashMap::new();
    table.insert(a, 1);
    assert_eq!(table.get(&b), Some(&1));
}

// ── Properties ───────────────────────────────────────────────────

#[test]
fn properties_are_not_inherited_on_the_node() {
    let model = make_model();
    let sub1 = model.entity("Sub1").unwrap();
    assert!(sub1.property("name").is_some());
    assert!(sub1.property("remote_id").is_none());
}

#[test]
fn relationship_property_keeps_destination() {
    let model = EntityModel::builder()
        .entity(
            EntityDescription::new("User")
                .with_property(PropertyDescription::relationship("friends", "User")),
        )
        .build()
        .unwrap();
    let user = model.entity("User").unwrap();
    let prop = user.property("friends").unwrap();
    assert_eq!(
        prop.kind,
        PropertyKind::Relationship {
            destination: "User".to_string()
        }
    );
}
