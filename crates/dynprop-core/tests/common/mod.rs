//! Shared fixtures for registry contract tests

#![allow(dead_code)]

use dynprop_core::{PropertyDecl, PropertyType, Registry, RegistryConfig};
use serde_json::json;

/// Registry with one declared property of every type
///
/// | name      | type       | default            |
/// |-----------|------------|--------------------|
/// | timeout   | integer    | 30                 |
/// | region    | text       | "eu-west"          |
/// | ratio     | double     | 0.25               |
/// | enabled   | boolean    | true               |
/// | limits    | structured | {"qps": 10}        |
pub fn seeded_registry() -> Registry {
    let config = RegistryConfig::new()
        .with_property(PropertyDecl::new("timeout", PropertyType::Integer, json!(30)))
        .with_property(PropertyDecl::new("region", PropertyType::Text, json!("eu-west")))
        .with_property(PropertyDecl::new("ratio", PropertyType::Double, json!(0.25)))
        .with_property(PropertyDecl::new("enabled", PropertyType::Boolean, json!(true)))
        .with_property(PropertyDecl::new(
            "limits",
            PropertyType::Structured,
            json!({"qps": 10}),
        ));

    Registry::from_config(&config).expect("seed configuration is valid")
}

/// A value of every type, paired with the type it matches
pub fn sample_values() -> Vec<(PropertyType, serde_json::Value)> {
    vec![
        (PropertyType::Text, json!("text")),
        (PropertyType::Integer, json!(7)),
        (PropertyType::Double, json!(7.5)),
        (PropertyType::Boolean, json!(false)),
        (PropertyType::Structured, json!({"k": "v"})),
    ]
}
