//! End-to-end inference scenarios over a building-metadata vocabulary.

use lintel::{
    EntityRef, FactStore, InferenceEngine, RelationRef, RuleKind, RuleProfile, Statement,
    Taxonomy, Value,
};
use std::collections::BTreeSet;

fn e(uri: &str) -> EntityRef {
    EntityRef::new(uri)
}

/// A small slice of a Brick-like vocabulary: points and sensors on one
/// branch, equipment and meters on the other.
fn brick_taxonomy() -> Taxonomy {
    Taxonomy::builder()
        // Points and sensors
        .class("brick:Point")
        .tag("tag:Point")
        .class("brick:Sensor")
        .parent("brick:Point")
        .tag("tag:Sensor")
        .class("brick:Flow_Sensor")
        .parent("brick:Sensor")
        .tag("tag:Flow")
        .class("brick:Air_Flow_Sensor")
        .parent("brick:Flow_Sensor")
        .tag("tag:Air")
        .class("brick:Air_Quality_Sensor")
        .parent("brick:Sensor")
        .tag("tag:Air")
        .tag("tag:Quality")
        .class("brick:CO2_Level_Sensor")
        .parent("brick:Air_Quality_Sensor")
        .tag("tag:CO2")
        .tag("tag:Level")
        .implies(RelationRef::has_substance(), Value::entity(e("brick:Air")))
        .implies(
            RelationRef::has_quantity(),
            Value::entity(e("brick:CO2_Level")),
        )
        // Locations
        .class("brick:Building")
        .tag("tag:Building")
        // Equipment and meters
        .class("brick:Equipment")
        .tag("tag:Equip")
        .class("brick:VAV")
        .parent("brick:Equipment")
        .tag("tag:VAV")
        .equivalent_to("brick:Variable_Air_Volume_Box")
        .class("brick:Variable_Air_Volume_Box")
        .parent("brick:Equipment")
        .tag("tag:VAV")
        .class("brick:Meter")
        .parent("brick:Equipment")
        .tag("tag:Meter")
        .class("brick:Building_Meter")
        .parent("brick:Meter")
        .tag("tag:Building")
        .requires_related(RelationRef::meters(), "brick:Building")
        .class("brick:Electrical_Meter")
        .parent("brick:Meter")
        .tag("tag:Electrical")
        .implies(
            RelationRef::has_substance(),
            Value::entity(e("brick:Electricity")),
        )
        .class("brick:Building_Electrical_Meter")
        .parent("brick:Building_Meter")
        .parent("brick:Electrical_Meter")
        .implies(
            RelationRef::has_substance(),
            Value::entity(e("brick:Electricity")),
        )
        .requires_related(RelationRef::meters(), "brick:Building")
        .class("brick:Water_Meter")
        .parent("brick:Meter")
        .tag("tag:Water")
        .implies(RelationRef::has_substance(), Value::entity(e("brick:Water")))
        .class("brick:Building_Water_Meter")
        .parent("brick:Building_Meter")
        .parent("brick:Water_Meter")
        .implies(RelationRef::has_substance(), Value::entity(e("brick:Water")))
        .requires_related(RelationRef::meters(), "brick:Building")
        .class("brick:Chilled_Water_Meter")
        .parent("brick:Water_Meter")
        .tag("tag:Chilled")
        .implies(
            RelationRef::has_substance(),
            Value::entity(e("brick:Chilled_Water")),
        )
        // Inverse relation pairs
        .inverse(RelationRef::has_point(), RelationRef::is_point_of())
        .inverse(RelationRef::meters(), RelationRef::is_metered_by())
        .build()
        .unwrap()
}

fn has_type(store: &FactStore, instance: &str, class: &str) -> bool {
    store
        .contains(&Statement::typed(e(instance), e(class)))
        .unwrap()
}

fn tag_statements(instance: &str, tags: &[&str]) -> Vec<Statement> {
    tags.iter()
        .map(|t| {
            Statement::new(
                e(instance),
                RelationRef::has_tag(),
                Value::entity(EntityRef::new(format!("tag:{}", t))),
            )
        })
        .collect()
}

#[test]
fn test_air_flow_tag_classification() {
    let taxonomy = brick_taxonomy();
    let store = FactStore::new();
    store
        .add_all(tag_statements("bldg:AFS1", &["Point", "Sensor", "Flow", "Air"]))
        .unwrap();

    InferenceEngine::new(&taxonomy).infer(&store).unwrap();

    assert!(has_type(&store, "bldg:AFS1", "brick:Air_Flow_Sensor"));
    // Inheritance then fills in the whole chain.
    assert!(has_type(&store, "bldg:AFS1", "brick:Flow_Sensor"));
    assert!(has_type(&store, "bldg:AFS1", "brick:Sensor"));
    assert!(has_type(&store, "bldg:AFS1", "brick:Point"));
}

#[test]
fn test_co2_sensor_substance() {
    let taxonomy = brick_taxonomy();
    let store = FactStore::new();
    store
        .add_all(tag_statements(
            "bldg:co2s1",
            &["CO2", "Level", "Sensor", "Point", "Air", "Quality"],
        ))
        .unwrap();

    InferenceEngine::new(&taxonomy).infer(&store).unwrap();

    assert!(has_type(&store, "bldg:co2s1", "brick:CO2_Level_Sensor"));
    // The measured substance is the air itself; CO2 level is the quantity.
    assert!(store
        .contains(&Statement::link(
            e("bldg:co2s1"),
            RelationRef::has_substance(),
            e("brick:Air"),
        ))
        .unwrap());
    assert!(store
        .contains(&Statement::link(
            e("bldg:co2s1"),
            RelationRef::has_quantity(),
            e("brick:CO2_Level"),
        ))
        .unwrap());
}

#[test]
fn test_typed_instance_acquires_class_tags() {
    let taxonomy = brick_taxonomy();
    let store = FactStore::new();
    store
        .add(Statement::typed(e("bldg:co2s1"), e("brick:CO2_Level_Sensor")))
        .unwrap();

    InferenceEngine::new(&taxonomy).infer(&store).unwrap();

    let tags: BTreeSet<String> = store
        .objects_of(&e("bldg:co2s1"), &RelationRef::has_tag())
        .unwrap()
        .into_iter()
        .filter_map(|v| v.as_entity().map(|t| t.as_str().to_string()))
        .collect();
    let expected: BTreeSet<String> =
        ["tag:CO2", "tag:Level", "tag:Sensor", "tag:Point", "tag:Air", "tag:Quality"]
            .iter()
            .map(|s| s.to_string())
            .collect();
    assert_eq!(tags, expected);
}

#[test]
fn test_building_electrical_meter() {
    let taxonomy = brick_taxonomy();
    let store = FactStore::new();
    store
        .add_all([
            Statement::typed(e("bldg:BEM"), e("brick:Electrical_Meter")),
            Statement::typed(e("bldg:B1"), e("brick:Building")),
            Statement::link(e("bldg:BEM"), RelationRef::meters(), e("bldg:B1")),
        ])
        .unwrap();

    InferenceEngine::new(&taxonomy).infer(&store).unwrap();

    assert!(has_type(&store, "bldg:BEM", "brick:Building_Electrical_Meter"));
    assert!(has_type(&store, "bldg:BEM", "brick:Building_Meter"));
    // The electrical substance comes along as an implied relation.
    assert!(store
        .contains(&Statement::link(
            e("bldg:BEM"),
            RelationRef::has_substance(),
            e("brick:Electricity"),
        ))
        .unwrap());
    // The building knows its meter through the inverse pair.
    assert!(store
        .contains(&Statement::link(
            e("bldg:B1"),
            RelationRef::is_metered_by(),
            e("bldg:BEM"),
        ))
        .unwrap());
}

#[test]
fn test_water_meter_substance_never_chilled() {
    let taxonomy = brick_taxonomy();
    let store = FactStore::new();
    store
        .add(Statement::typed(e("bldg:WM1"), e("brick:Water_Meter")))
        .unwrap();

    InferenceEngine::new(&taxonomy).infer(&store).unwrap();

    assert!(store
        .contains(&Statement::link(
            e("bldg:WM1"),
            RelationRef::has_substance(),
            e("brick:Water"),
        ))
        .unwrap());
    assert!(!store
        .contains(&Statement::link(
            e("bldg:WM1"),
            RelationRef::has_substance(),
            e("brick:Chilled_Water"),
        ))
        .unwrap());
    assert!(!has_type(&store, "bldg:WM1", "brick:Chilled_Water_Meter"));
}

#[test]
fn test_generic_meter_refined_by_substance() {
    let taxonomy = brick_taxonomy();
    let store = FactStore::new();
    store
        .add_all([
            Statement::typed(e("bldg:M1"), e("brick:Meter")),
            Statement::link(e("bldg:M1"), RelationRef::has_substance(), e("brick:Water")),
        ])
        .unwrap();

    InferenceEngine::new(&taxonomy).infer(&store).unwrap();

    assert!(has_type(&store, "bldg:M1", "brick:Water_Meter"));
    // Not the building-level variant: M1 meters no building.
    assert!(!has_type(&store, "bldg:M1", "brick:Building_Water_Meter"));
    assert!(!has_type(&store, "bldg:M1", "brick:Building_Meter"));
}

#[test]
fn test_building_meter_refined_by_substance() {
    let taxonomy = brick_taxonomy();
    let store = FactStore::new();
    store
        .add_all([
            Statement::typed(e("bldg:BM1"), e("brick:Meter")),
            Statement::typed(e("bldg:B1"), e("brick:Building")),
            Statement::link(e("bldg:BM1"), RelationRef::meters(), e("bldg:B1")),
            Statement::link(e("bldg:BM1"), RelationRef::has_substance(), e("brick:Water")),
        ])
        .unwrap();

    InferenceEngine::new(&taxonomy).infer(&store).unwrap();

    assert!(has_type(&store, "bldg:BM1", "brick:Building_Meter"));
    assert!(has_type(&store, "bldg:BM1", "brick:Building_Water_Meter"));
}

#[test]
fn test_equivalence_is_symmetric() {
    let taxonomy = brick_taxonomy();

    let forward = FactStore::new();
    forward
        .add(Statement::typed(e("bldg:V1"), e("brick:VAV")))
        .unwrap();
    InferenceEngine::new(&taxonomy).infer(&forward).unwrap();
    assert!(has_type(&forward, "bldg:V1", "brick:Variable_Air_Volume_Box"));

    let backward = FactStore::new();
    backward
        .add(Statement::typed(e("bldg:V2"), e("brick:Variable_Air_Volume_Box")))
        .unwrap();
    InferenceEngine::new(&taxonomy).infer(&backward).unwrap();
    assert!(has_type(&backward, "bldg:V2", "brick:VAV"));
}

#[test]
fn test_inverse_pair_is_exact() {
    let taxonomy = brick_taxonomy();
    let store = FactStore::new();
    store
        .add_all([
            Statement::link(e("bldg:AHU1"), RelationRef::has_point(), e("bldg:TS1")),
        ])
        .unwrap();

    InferenceEngine::new(&taxonomy).infer(&store).unwrap();

    assert!(store
        .contains(&Statement::link(
            e("bldg:TS1"),
            RelationRef::is_point_of(),
            e("bldg:AHU1"),
        ))
        .unwrap());
    // Exactly the inverse statement was added, nothing speculative.
    assert_eq!(store.len().unwrap(), 2);
}

#[test]
fn test_inference_is_idempotent() {
    let taxonomy = brick_taxonomy();
    let store = FactStore::new();
    store
        .add_all([
            Statement::typed(e("bldg:M1"), e("brick:Meter")),
            Statement::link(e("bldg:M1"), RelationRef::has_substance(), e("brick:Water")),
        ])
        .unwrap();

    let engine = InferenceEngine::new(&taxonomy);
    engine.infer(&store).unwrap();
    let closed = store.len().unwrap();

    let rerun = engine.infer(&store).unwrap();
    assert_eq!(rerun.added, 0);
    assert_eq!(store.len().unwrap(), closed);
}

#[test]
fn test_inference_is_monotonic() {
    let taxonomy = brick_taxonomy();
    let smaller = FactStore::new();
    smaller
        .add_all([
            Statement::typed(e("bldg:BEM"), e("brick:Electrical_Meter")),
            Statement::typed(e("bldg:B1"), e("brick:Building")),
        ])
        .unwrap();

    let larger = FactStore::new();
    larger.add_all(smaller.statements().unwrap()).unwrap();
    larger
        .add(Statement::link(e("bldg:BEM"), RelationRef::meters(), e("bldg:B1")))
        .unwrap();

    let engine = InferenceEngine::new(&taxonomy);
    engine.infer(&smaller).unwrap();
    engine.infer(&larger).unwrap();

    // A superset of base facts closes to a superset of conclusions, and no
    // base fact is ever lost.
    for st in smaller.statements().unwrap() {
        assert!(larger.contains(&st).unwrap());
    }
}

#[test]
fn test_closure_is_confluent_under_rule_order() {
    let taxonomy = brick_taxonomy();
    let seed = || {
        let store = FactStore::new();
        store
            .add_all([
                Statement::typed(e("bldg:BEM"), e("brick:Electrical_Meter")),
                Statement::typed(e("bldg:B1"), e("brick:Building")),
                Statement::link(e("bldg:BEM"), RelationRef::meters(), e("bldg:B1")),
                Statement::typed(e("bldg:V1"), e("brick:VAV")),
            ])
            .unwrap();
        store
    };

    let default_order = seed();
    InferenceEngine::new(&taxonomy).infer(&default_order).unwrap();

    let reversed = seed();
    InferenceEngine::new(&taxonomy)
        .with_profile(RuleProfile::only([
            RuleKind::Refinement,
            RuleKind::InverseRelations,
            RuleKind::ImpliedRelations,
            RuleKind::TagExpansion,
            RuleKind::TagClassification,
            RuleKind::EquivalenceExpansion,
            RuleKind::TypeInheritance,
        ]))
        .infer(&reversed)
        .unwrap();

    let mut a = default_order.statements().unwrap();
    let mut b = reversed.statements().unwrap();
    a.sort();
    b.sort();
    assert_eq!(a, b);
}

#[test]
fn test_unknown_classes_pass_through() {
    let taxonomy = brick_taxonomy();
    let store = FactStore::new();
    store
        .add(Statement::typed(e("bldg:X"), e("custom:Widget")))
        .unwrap();

    let summary = InferenceEngine::new(&taxonomy).infer(&store).unwrap();
    // Open world: an unknown class is kept but implies nothing.
    assert_eq!(summary.added, 0);
    assert!(has_type(&store, "bldg:X", "custom:Widget"));
}
