//! End-to-end tests of graph comparison and reconciliation.

use fixture_verify::config::{ConfigPreset, ToleranceConfig};
use fixture_verify::diff::{Difference, MismatchReason};
use fixture_verify::error::FaultKind;
use fixture_verify::schema::{FieldDescriptor, KindSchema, SchemaRegistry};
use fixture_verify::{
    init_logging, AssertionError, DiffEngine, EntityGraph, InMemoryStore, LazyRef, RecordRef,
    Reconciler, SchemaIdentityLookup, Value, VerifyConfig,
};
use std::rc::Rc;
use std::sync::Arc;

fn registry() -> Arc<SchemaRegistry> {
    let registry = SchemaRegistry::builder()
        .kind(
            KindSchema::new("Parent")
                .identifier("id")
                .scalar("id")
                .scalar("name")
                .scalar("score")
                .scalar("tags")
                .scalar("attrs")
                .field(FieldDescriptor::new("display_name").transient())
                .field(FieldDescriptor::one_to_many("children", "Child").inverse("parent"))
                .field(FieldDescriptor::one_to_one("favorite", "Child")),
        )
        .kind(
            KindSchema::new("Child")
                .identifier("id")
                .scalar("id")
                .scalar("label")
                .field(FieldDescriptor::many_to_one("parent", "Parent").mapped_by("children")),
        )
        .kind(KindSchema::new("Note").scalar("text"))
        .build()
        .expect("schema should be valid");
    Arc::new(registry)
}

fn engine() -> DiffEngine {
    init_logging("warn");
    DiffEngine::new(registry())
}

/// Parent 1 with children 2 and 3, wired in both directions.
fn family(graph: &mut EntityGraph, labels: [&str; 2]) -> RecordRef {
    let parent = graph
        .new_root("Parent")
        .with("id", 1_i64)
        .with("name", "parent")
        .with("score", 0.5)
        .with("tags", Value::bag(["x", "y"]))
        .with("attrs", Value::map([("color", "red")]));
    for (id, label) in [2_i64, 3].into_iter().zip(labels) {
        let child = graph.new_record("Child").with("id", id).with("label", label);
        child.set("parent", &parent);
        parent.push("children", &child);
    }
    parent
}

#[test]
fn bidirectional_graphs_compare_equal_and_terminate() {
    let (mut g1, mut g2) = (EntityGraph::new(), EntityGraph::new());
    family(&mut g1, ["a", "b"]);
    family(&mut g2, ["a", "b"]);
    assert!(engine().assert_entity_graphs_equal(&g1, &g2).is_ok());
}

#[test]
fn records_keep_their_contents_after_graph_drop() {
    fn load(name: &str) -> Vec<RecordRef> {
        let mut graph = EntityGraph::new();
        family(&mut graph, ["a", "b"]).set("name", name);
        graph.roots().to_vec()
    }

    let expected = load("ann");
    let actual = load("bob");
    assert!(expected[0].get("name").is_some());

    let difference = engine()
        .diff(&Value::from(&expected[0]), &Value::from(&actual[0]))
        .unwrap()
        .unwrap();
    assert_eq!(difference.paths(), vec!["$.name"]);

    let same = load("ann");
    assert!(engine()
        .assert_graphs_equal(&Value::from(&expected[0]), &Value::from(&same[0]))
        .is_ok());
}

#[test]
fn changed_root_is_reported_by_field_path() {
    let (mut g1, mut g2) = (EntityGraph::new(), EntityGraph::new());
    family(&mut g1, ["a", "b"]);
    family(&mut g2, ["a", "b"]).set("name", "renamed");
    g1.new_root("Parent").set("id", 7_i64);
    g2.new_root("Parent").set("id", 7_i64);

    let err = engine().assert_entity_graphs_equal(&g1, &g2).unwrap_err();
    assert_eq!(err.difference().unwrap().paths(), vec!["${Parent#1}.name"]);
    assert!(err.to_string().starts_with("1 difference found\n"));
}

#[test]
fn child_difference_is_reported_once() {
    let (mut g1, mut g2) = (EntityGraph::new(), EntityGraph::new());
    let p1 = family(&mut g1, ["a", "b"]);
    let p2 = family(&mut g2, ["a", "c"]);

    let difference = engine()
        .diff(&Value::from(&p1), &Value::from(&p2))
        .unwrap()
        .unwrap();
    assert_eq!(difference.paths(), vec!["$.children[1].label"]);
    assert_eq!(difference.count(), 1);
}

#[test]
fn non_owning_back_reference_is_ignored() {
    let (mut g1, mut g2) = (EntityGraph::new(), EntityGraph::new());
    let p1 = family(&mut g1, ["a", "b"]);
    let p2 = family(&mut g2, ["a", "b"]);

    // Point the actual children at an unrelated parent; only the mirror changes.
    let other = g2.new_record("Parent").with("id", 9_i64);
    if let Some(Value::List(children)) = p2.get("children") {
        for child in children {
            if let Value::Record(child) = child {
                child.set("parent", &other);
            }
        }
    }

    assert!(engine()
        .assert_graphs_equal(&Value::from(&p1), &Value::from(&p2))
        .is_ok());
}

#[test]
fn transient_field_is_ignored() {
    let (mut g1, mut g2) = (EntityGraph::new(), EntityGraph::new());
    family(&mut g1, ["a", "b"]).set("display_name", "One");
    family(&mut g2, ["a", "b"]).set("display_name", "Uno");
    assert!(engine().assert_entity_graphs_equal(&g1, &g2).is_ok());
}

#[test]
fn report_lists_every_difference() {
    let (mut g1, mut g2) = (EntityGraph::new(), EntityGraph::new());
    let p1 = family(&mut g1, ["a", "b"]);
    let p2 = family(&mut g2, ["z", "b"]);
    p2.set("name", "renamed");
    p2.set("attrs", Value::map([("color", "blue")]));

    let err = engine()
        .assert_graphs_equal(&Value::from(&p1), &Value::from(&p2))
        .unwrap_err();
    let AssertionError::Mismatch { report, difference } = err else {
        panic!("expected a mismatch");
    };
    assert_eq!(
        difference.paths(),
        vec!["$.name", "$.attrs[\"color\"]", "$.children[0].label"]
    );
    assert!(report.starts_with("3 differences found\n$ (Parent#1):\n"));
    assert!(report.contains("  .name: expected \"parent\", actual \"renamed\" (values differ)"));
    assert!(report.contains("      .label: expected \"a\", actual \"z\" (values differ)"));
}

#[test]
fn fail_fast_stops_after_first_difference() {
    let (mut g1, mut g2) = (EntityGraph::new(), EntityGraph::new());
    let p1 = family(&mut g1, ["a", "b"]);
    let p2 = family(&mut g2, ["z", "y"]);
    p2.set("name", "renamed");

    let engine = engine().with_config(VerifyConfig::from_preset(ConfigPreset::FailFast));
    let difference = engine
        .diff(&Value::from(&p1), &Value::from(&p2))
        .unwrap()
        .unwrap();
    assert_eq!(difference.count(), 1);
    assert_eq!(difference.paths(), vec!["$.name"]);
}

#[test]
fn unordered_fields_ignore_order() {
    let (mut g1, mut g2) = (EntityGraph::new(), EntityGraph::new());
    family(&mut g1, ["a", "b"]);
    family(&mut g2, ["a", "b"]).set("tags", Value::bag(["y", "x"]));
    assert!(engine().assert_entity_graphs_equal(&g1, &g2).is_ok());
}

#[test]
fn numeric_tolerance_is_configurable() {
    let (mut g1, mut g2) = (EntityGraph::new(), EntityGraph::new());
    family(&mut g1, ["a", "b"]);
    family(&mut g2, ["a", "b"]).set("score", 0.5 + 1e-12);
    assert!(engine().assert_entity_graphs_equal(&g1, &g2).is_ok());

    let strict = engine().with_tolerance(ToleranceConfig::exact());
    assert!(strict.assert_entity_graphs_equal(&g1, &g2).is_err());
}

#[test]
fn numbers_compare_across_representations() {
    let engine = engine();
    assert!(engine
        .diff(&Value::from(7_i32), &Value::from(7_i64))
        .unwrap()
        .is_none());
    assert!(engine
        .diff(&Value::from(7_i64), &Value::from(7.0_f64))
        .unwrap()
        .is_none());
    assert!(engine
        .diff(&Value::wrapped("ParentId", 1_i64), &Value::from(1_i64))
        .unwrap()
        .is_none());
}

#[test]
fn category_mismatch_is_a_leaf() {
    let difference = engine()
        .diff(&Value::from(1_i64), &Value::from("1"))
        .unwrap()
        .unwrap();
    assert!(matches!(
        difference,
        Difference::Leaf {
            reason: MismatchReason::Category { .. },
            ..
        }
    ));
}

#[test]
fn lazy_reference_is_materialized_before_comparison() {
    let registry = registry();
    let store = Rc::new(InMemoryStore::new(Arc::clone(&registry)));
    store
        .insert(RecordRef::new("Child").with("id", 2_i64).with("label", "b"))
        .unwrap();
    let engine = DiffEngine::new(registry);

    let expected = RecordRef::new("Parent")
        .with("id", 1_i64)
        .with("favorite", RecordRef::new("Child").with("id", 2_i64).with("label", "b"));
    let lazy = LazyRef::pending("Child", 2_i64, store.clone());
    let actual = RecordRef::new("Parent")
        .with("id", 1_i64)
        .with("favorite", lazy.clone());

    assert!(!lazy.is_resolved());
    assert!(engine
        .assert_graphs_equal(&Value::from(&expected), &Value::from(&actual))
        .is_ok());
    assert!(lazy.is_resolved());

    let dangling = RecordRef::new("Parent")
        .with("id", 1_i64)
        .with("favorite", LazyRef::pending("Child", 99_i64, store));
    let difference = engine
        .diff(&Value::from(&expected), &Value::from(&dangling))
        .unwrap()
        .unwrap();
    assert_eq!(difference.paths(), vec!["$.favorite"]);
    let Difference::Record { fields, .. } = difference else {
        panic!("expected a record node");
    };
    assert!(matches!(
        fields["favorite"],
        Difference::Leaf {
            reason: MismatchReason::UnresolvedReference,
            ..
        }
    ));
}

#[test]
fn undeclared_field_is_a_fault_not_a_mismatch() {
    let expected = RecordRef::new("Note").with("text", "hi").with("author", "ann");
    let actual = RecordRef::new("Note").with("text", "hi");
    let err = engine()
        .assert_graphs_equal(&Value::from(&expected), &Value::from(&actual))
        .unwrap_err();
    match err {
        AssertionError::Fault(fault) => assert!(matches!(
            fault.fault_kind(),
            Some(FaultKind::UndeclaredField { field, .. }) if field == "author"
        )),
        other => panic!("expected fault, got {other:?}"),
    }
}

#[test]
fn reconciliation_detects_record_not_removed() {
    let registry = registry();
    let engine = DiffEngine::new(Arc::clone(&registry));
    let identity = SchemaIdentityLookup::new(Arc::clone(&registry));
    let store = InMemoryStore::new(registry);

    let child = |id: i64| RecordRef::new("Child").with("id", id).with("label", "c");
    store.insert(child(1)).unwrap();
    store.insert(child(2)).unwrap();

    let setup = [child(1), child(2)];
    let expected = [child(1)];
    let reconciler = Reconciler::new(&engine, &identity, &store);

    let err = reconciler.verify(&setup, &expected).unwrap_err();
    let AssertionError::Unreconciled { report, outcome } = err else {
        panic!("expected a reconciliation failure");
    };
    assert_eq!(outcome.expected_removed, vec!["Child#2"]);
    assert_eq!(outcome.still_present, vec!["Child#2"]);
    assert!(report.contains("Expected removed, but present: Child#2"));

    store.remove("Child", &2_i64.into());
    assert!(reconciler.verify(&setup, &expected).is_ok());
}

#[test]
fn reconciliation_requires_identifiers() {
    let registry = registry();
    let engine = DiffEngine::new(Arc::clone(&registry));
    let identity = SchemaIdentityLookup::new(Arc::clone(&registry));
    let store = InMemoryStore::new(registry);

    let note = RecordRef::new("Note").with("text", "hi");
    let err = Reconciler::new(&engine, &identity, &store)
        .reconcile(&[note], &[])
        .unwrap_err();
    assert!(matches!(
        err.fault_kind(),
        Some(FaultKind::MissingIdentifierField { kind }) if kind == "Note"
    ));
}

#[test]
fn json_report_for_ci() {
    let engine = engine().with_config(VerifyConfig::from_preset(ConfigPreset::Ci));
    let err = engine
        .assert_graphs_equal(&Value::list([1, 2]), &Value::list([1, 3]))
        .unwrap_err();
    let json: serde_json::Value = serde_json::from_str(&err.to_string()).unwrap();
    assert_eq!(json["count"], 1);
    assert_eq!(json["paths"][0], "$[1]");
}
