// # Property Registry Traits
//
// Read and write sides of the property registry.
//
// ## Usage
//
// ```rust
// use dynprop_core::{PropertyRegistry, Registry};
// use std::sync::Arc;
//
// struct Client {
//     timeout: dynprop_core::Property<i64>,
// }
//
// impl Client {
//     fn new(registry: &dyn PropertyRegistry) -> dynprop_core::Result<Self> {
//         Ok(Self {
//             timeout: registry.get_int_property("client.timeout", 30)?,
//         })
//     }
// }
//
// let registry: Arc<dyn PropertyRegistry> = Arc::new(Registry::new());
// let client = Client::new(registry.as_ref())?;
// assert_eq!(client.timeout.value(), 30);
// # Ok::<(), dynprop_core::Error>(())
// ```

use crate::error::Result;
use crate::property::Property;
use crate::registry::{BatchReport, Registry};
use serde_json::{Map, Value};
use std::collections::HashMap;

/// Read side of the registry: typed property handles
///
/// Each getter establishes the name with the given default on first use and fails with
/// `TypeConflict` when the name is already bound to another type.
pub trait PropertyRegistry: Send + Sync {
    /// Get a text property
    fn get_text_property(&self, name: &str, default: String) -> Result<Property<String>>;

    /// Get an integer property
    fn get_int_property(&self, name: &str, default: i64) -> Result<Property<i64>>;

    /// Get a floating-point property
    fn get_double_property(&self, name: &str, default: f64) -> Result<Property<f64>>;

    /// Get a boolean property
    fn get_bool_property(&self, name: &str, default: bool) -> Result<Property<bool>>;

    /// Get a structured (JSON object) property
    fn get_structured_property(
        &self,
        name: &str,
        default: Map<String, Value>,
    ) -> Result<Property<Map<String, Value>>>;
}

/// Write side of the registry, used by configuration sources
pub trait UpdatablePropertyRegistry: PropertyRegistry {
    /// Update one property and notify its handles
    fn update_property(&self, name: &str, value: Value) -> Result<()>;

    /// Apply a batch of updates; individual failures are reported, not returned
    fn update_properties(&self, values: HashMap<String, Value>) -> BatchReport;
}

impl PropertyRegistry for Registry {
    fn get_text_property(&self, name: &str, default: String) -> Result<Property<String>> {
        self.get_property(name, default)
    }

    fn get_int_property(&self, name: &str, default: i64) -> Result<Property<i64>> {
        self.get_property(name, default)
    }

    fn get_double_property(&self, name: &str, default: f64) -> Result<Property<f64>> {
        self.get_property(name, default)
    }

    fn get_bool_property(&self, name: &str, default: bool) -> Result<Property<bool>> {
        self.get_property(name, default)
    }

    fn get_structured_property(
        &self,
        name: &str,
        default: Map<String, Value>,
    ) -> Result<Property<Map<String, Value>>> {
        self.get_property(name, default)
    }
}

impl UpdatablePropertyRegistry for Registry {
    fn update_property(&self, name: &str, value: Value) -> Result<()> {
        Registry::update_property(self, name, value)
    }

    fn update_properties(&self, values: HashMap<String, Value>) -> BatchReport {
        Registry::update_properties(self, values)
    }
}
