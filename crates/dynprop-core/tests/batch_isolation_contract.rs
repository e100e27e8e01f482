//! Architectural Contract Test: Batch Isolation
//!
//! Constraints verified:
//! - A rejected entry does not stop the rest of the batch
//! - Rejected entries are reported with their reason
//! - The batch itself never fails
//!
//! If this test fails, one bad value from a configuration source could block
//! every other change in the same push.

mod common;

use common::*;
use dynprop_core::{Error, PropertyRegistry, Registry};
use serde_json::{Value, json};
use std::collections::HashMap;

#[test]
fn bad_entry_is_isolated() {
    let registry = Registry::new();
    let a = registry.get_int_property("a", 0).unwrap();
    let b = registry.get_int_property("b", 0).unwrap();
    let c = registry.get_int_property("c", 0).unwrap();

    let report = registry.update_properties(HashMap::from([
        ("a".to_string(), json!(1)),
        ("b".to_string(), json!("bad")),
        ("c".to_string(), json!(3)),
    ]));

    assert_eq!(registry.current_value("a"), Some(json!(1)));
    assert_eq!(registry.current_value("b"), Some(json!(0)));
    assert_eq!(registry.current_value("c"), Some(json!(3)));
    assert_eq!((a.value(), b.value(), c.value()), (1, 0, 3));

    let mut accepted = report.accepted.clone();
    accepted.sort();
    assert_eq!(accepted, vec!["a", "c"]);
    assert_eq!(report.rejected.len(), 1);
    assert!(matches!(
        &report.rejected[0],
        (name, Error::TypeMismatch { .. }) if name == "b"
    ));
}

#[test]
fn every_kind_of_failure_is_reported() {
    let registry = seeded_registry();

    let report = registry.update_properties(vec![
        ("timeout", json!(60)),
        ("unset", json!(1)),
        ("region", Value::Null),
        ("enabled", json!("yes")),
        ("ratio", json!(0.5)),
    ]);

    assert_eq!(report.accepted, vec!["timeout", "ratio"]);
    assert_eq!(report.rejected_names(), vec!["unset", "region", "enabled"]);

    let reasons: Vec<&Error> = report.rejected.iter().map(|(_, err)| err).collect();
    assert!(matches!(reasons[0], Error::Unregistered { .. }));
    assert!(matches!(reasons[1], Error::NullValue { .. }));
    assert!(matches!(reasons[2], Error::TypeMismatch { .. }));
    assert!(reasons.iter().all(|err| err.is_contract_violation()));
}

#[test]
fn nulls_for_unregistered_names_are_not_rejections() {
    let registry = seeded_registry();

    let report = registry.update_properties(vec![
        ("never_requested", Value::Null),
        ("timeout", json!(90)),
        ("region", Value::Null),
    ]);

    assert_eq!(report.accepted, vec!["never_requested", "timeout"]);
    assert_eq!(report.rejected_names(), vec!["region"]);
    assert!(!registry.is_registered("never_requested"));
    assert_eq!(registry.current_value("timeout"), Some(json!(90)));
}

#[test]
fn json_push_is_applied_as_batch() {
    let registry = seeded_registry();
    let region = registry.get_text_property("region", String::new()).unwrap();

    let report = registry
        .apply_json(r#"{"region": "us-east", "timeout": "slow", "limits": {"qps": 50}}"#)
        .unwrap();

    assert_eq!(region.value(), "us-east");
    assert_eq!(registry.current_value("limits"), Some(json!({"qps": 50})));
    assert_eq!(registry.current_value("timeout"), Some(json!(30)));
    assert_eq!(report.rejected_names(), vec!["timeout"]);
}

#[test]
fn empty_batch_is_clean() {
    let registry = seeded_registry();
    let report = registry.update_properties(Vec::<(String, Value)>::new());
    assert!(report.is_clean());
    assert!(report.accepted.is_empty());
}
