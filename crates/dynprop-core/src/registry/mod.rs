//! Process-wide property registry
//!
//! The registry maps property names to their established type, their current value and
//! the fan-out that keeps handles up to date. Entries are created lazily on first
//! request and are never removed.
//!
//! ## Usage
//!
//! ```rust
//! use dynprop_core::{PropertyRegistry, Registry};
//! use serde_json::json;
//! use std::collections::HashMap;
//!
//! let registry = Registry::new();
//! let timeout = registry.get_int_property("timeout", 30)?;
//! let region = registry.get_text_property("region", "eu-west".to_string())?;
//!
//! // Pushed by an external configuration source
//! let report = registry.update_properties(HashMap::from([
//!     ("timeout".to_string(), json!(45)),
//!     ("region".to_string(), json!(7)),
//! ]));
//!
//! assert_eq!(timeout.value(), 45);
//! assert_eq!(region.value(), "eu-west");
//! assert_eq!(report.rejected_names(), vec!["region"]);
//! # Ok::<(), dynprop_core::Error>(())
//! ```
//!
//! ## Consistency
//!
//! A new handle reads the current value first and registers its listener afterwards. An
//! update accepted between those two steps is stored in the registry but is not
//! forwarded to that one handle; it catches up with the next update that changes the
//! value. Re-pushing an equal value is not dispatched and does not repair the gap.

use crate::config::RegistryConfig;
use crate::error::{Error, Result};
use crate::listener::ListenerSet;
use crate::property::Property;
use crate::types::{PropertyKind, PropertyType};
use dashmap::DashMap;
use dashmap::mapref::entry::Entry;
use parking_lot::Mutex;
use serde_json::Value;
use std::fmt;
use std::sync::Arc;
use tracing::{debug, error, info, trace};

/// State kept for one property name
struct Slot {
    /// Fixed at first use
    property_type: PropertyType,

    /// Current value; the lock also serializes updates of this name
    value: Mutex<Value>,

    /// Forwarding listeners, one per handle
    listeners: ListenerSet,
}

impl Slot {
    fn new(property_type: PropertyType, value: Value) -> Self {
        Self {
            property_type,
            value: Mutex::new(value),
            listeners: ListenerSet::new(),
        }
    }
}

/// Registry of typed, runtime-updatable properties
///
/// One instance is created at process start and shared (usually behind an `Arc`) by
/// every component that reads configuration and by the source that pushes updates.
///
/// ## Thread Safety
///
/// Creating an entry is atomic per name. Updates to the same name are serialized;
/// updates to different names only share the brief map lookup. Handle reads never lock.
#[derive(Default)]
pub struct Registry {
    slots: DashMap<String, Arc<Slot>>,
}

impl Registry {
    /// Create a new empty registry
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a registry with every declaration of `config` established
    pub fn from_config(config: &RegistryConfig) -> Result<Self> {
        config.validate()?;

        let registry = Self::new();
        for decl in &config.properties {
            registry.declare(&decl.name, decl.property_type, decl.default.clone())?;
        }

        info!(properties = registry.len(), "property registry initialized");
        Ok(registry)
    }

    /// Get a live handle to property `name`
    ///
    /// On first request `default` becomes the current value and `T`'s type is fixed for
    /// the name. Later requests ignore `default` and must ask for the same type.
    ///
    /// # Errors
    ///
    /// - `TypeConflict` if `name` is already registered with another type
    /// - `NullValue` if `name` is new and `default` has no JSON form (NaN, infinities)
    /// - `InvalidInput` if `name` is empty
    pub fn get_property<T: PropertyKind>(&self, name: &str, default: T) -> Result<Property<T>> {
        let slot = self.establish(name, T::TYPE, move || {
            default.into_value().ok_or_else(|| Error::null_value(name))
        })?;

        let initial = {
            let current = slot.value.lock();
            T::from_value(&current).ok_or_else(|| Error::type_mismatch(name, T::TYPE, &current))?
        };
        let property = Property::new(initial);

        // Not atomic with the read above: see the module docs.
        let target = property.clone();
        let owner = name.to_owned();
        slot.listeners.add(Box::new(move |value: &Value| {
            let value = T::from_value(value)
                .ok_or_else(|| Error::type_mismatch(owner.as_str(), T::TYPE, value))?;
            target.set(value);
            Ok(())
        }));

        Ok(property)
    }

    /// Establish `name` with a type and default without creating a handle
    ///
    /// Declaring an existing name with the same type leaves its value untouched.
    ///
    /// # Errors
    ///
    /// - `NullValue` if `default` is null
    /// - `TypeMismatch` if `default` does not match `property_type`
    /// - `TypeConflict` if `name` is already registered with another type
    pub fn declare(&self, name: &str, property_type: PropertyType, default: Value) -> Result<()> {
        if default.is_null() {
            return Err(Error::null_value(name));
        }
        if !property_type.matches(&default) {
            return Err(Error::type_mismatch(name, property_type, &default));
        }

        self.establish(name, property_type, || Ok(default))
            .map(|_| ())
    }

    /// Replace the current value of `name` and forward it to every handle
    ///
    /// A value equal to the current one is accepted without notifying anyone; so is a
    /// null for a name that has no value at all.
    /// Listeners run synchronously, in the order their handles were created; the first
    /// listener error is returned and the remaining listeners are skipped.
    ///
    /// # Errors
    ///
    /// - `NullValue` if `value` is null and `name` is registered
    /// - `Unregistered` if `name` was never requested or declared
    /// - `TypeMismatch` if `value` does not match the established type
    pub fn update_property(&self, name: &str, value: Value) -> Result<()> {
        let Some(slot) = self.slot(name) else {
            if value.is_null() {
                trace!(property = name, "null for unregistered property, ignoring");
                return Ok(());
            }
            return Err(Error::unregistered(name));
        };

        if value.is_null() {
            return Err(Error::null_value(name));
        }

        let mut current = slot.value.lock();
        if *current == value {
            trace!(property = name, "value unchanged, skipping dispatch");
            return Ok(());
        }

        if !slot.property_type.matches(&value) {
            return Err(Error::type_mismatch(name, slot.property_type, &value));
        }

        *current = value;
        trace!(
            property = name,
            listeners = slot.listeners.len(),
            "dispatching property update"
        );
        slot.listeners.dispatch(&current)
    }

    /// Apply a batch of updates pushed by an external source
    ///
    /// Every entry is applied independently with [`Registry::update_property`]. A
    /// rejected entry is logged and recorded in the report; the remaining entries are
    /// still applied. There is no atomicity across entries.
    pub fn update_properties<I, K>(&self, values: I) -> BatchReport
    where
        I: IntoIterator<Item = (K, Value)>,
        K: Into<String>,
    {
        let mut report = BatchReport::default();

        for (name, value) in values {
            let name = name.into();
            match self.update_property(&name, value) {
                Ok(()) => report.accepted.push(name),
                Err(err) => {
                    error!(property = %name, error = %err, "rejected property update");
                    report.rejected.push((name, err));
                }
            }
        }

        report
    }

    /// Decode a JSON object of `name: value` pairs and apply it as a batch
    ///
    /// # Errors
    ///
    /// Fails only if `payload` is not valid JSON or is not an object; per-entry
    /// failures are reported in the returned [`BatchReport`].
    pub fn apply_json(&self, payload: &str) -> Result<BatchReport> {
        let Value::Object(values) = serde_json::from_str::<Value>(payload)? else {
            return Err(Error::invalid_input(
                "property update payload must be a JSON object",
            ));
        };

        Ok(self.update_properties(values))
    }

    /// Names of all registered properties, in no particular order
    pub fn property_names(&self) -> Vec<String> {
        self.slots.iter().map(|entry| entry.key().clone()).collect()
    }

    /// Check if `name` has an established type
    pub fn is_registered(&self, name: &str) -> bool {
        self.slots.contains_key(name)
    }

    /// Established type of `name`
    pub fn property_type(&self, name: &str) -> Option<PropertyType> {
        self.slot(name).map(|slot| slot.property_type)
    }

    /// Current value of `name`, as stored in the registry
    pub fn current_value(&self, name: &str) -> Option<Value> {
        self.slot(name).map(|slot| slot.value.lock().clone())
    }

    /// Number of handles that receive updates for `name`
    pub fn listener_count(&self, name: &str) -> usize {
        self.slot(name).map_or(0, |slot| slot.listeners.len())
    }

    /// Number of registered properties
    pub fn len(&self) -> usize {
        self.slots.len()
    }

    /// Check if no property has been registered
    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    fn slot(&self, name: &str) -> Option<Arc<Slot>> {
        self.slots.get(name).map(|entry| Arc::clone(entry.value()))
    }

    /// Get the slot for `name`, creating it from `default` if absent, and check its type
    fn establish<F>(&self, name: &str, requested: PropertyType, default: F) -> Result<Arc<Slot>>
    where
        F: FnOnce() -> Result<Value>,
    {
        if name.is_empty() {
            return Err(Error::invalid_input("property name cannot be empty"));
        }

        let slot = match self.slot(name) {
            Some(slot) => slot,
            None => match self.slots.entry(name.to_owned()) {
                Entry::Occupied(occupied) => Arc::clone(occupied.get()),
                Entry::Vacant(vacant) => {
                    let slot = Arc::new(Slot::new(requested, default()?));
                    vacant.insert(Arc::clone(&slot));
                    debug!(property = name, property_type = %requested, "registered property");
                    slot
                }
            },
        };

        if slot.property_type != requested {
            return Err(Error::type_conflict(name, requested, slot.property_type));
        }

        Ok(slot)
    }
}

impl fmt::Debug for Registry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Registry")
            .field("properties", &self.len())
            .finish()
    }
}

/// Outcome of a batch update
#[derive(Debug, Default)]
pub struct BatchReport {
    /// Names whose update was accepted, including unchanged values
    pub accepted: Vec<String>,

    /// Names whose update was rejected, with the reason
    pub rejected: Vec<(String, Error)>,
}

impl BatchReport {
    /// Check if every entry was accepted
    pub fn is_clean(&self) -> bool {
        self.rejected.is_empty()
    }

    /// Names of the rejected entries
    pub fn rejected_names(&self) -> Vec<&str> {
        self.rejected.iter().map(|(name, _)| name.as_str()).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::{Map, json};

    #[test]
    fn test_first_request_establishes_entry() {
        let registry = Registry::new();
        assert!(registry.is_empty());

        let property = registry.get_property("timeout", 30i64).unwrap();

        assert_eq!(property.value(), 30);
        assert!(registry.is_registered("timeout"));
        assert_eq!(registry.property_type("timeout"), Some(PropertyType::Integer));
        assert_eq!(registry.current_value("timeout"), Some(json!(30)));
        assert_eq!(registry.listener_count("timeout"), 1);
        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn test_later_request_ignores_default() {
        let registry = Registry::new();
        registry.get_property("region", "eu-west".to_string()).unwrap();

        let second = registry.get_property("region", "us-east".to_string()).unwrap();

        assert_eq!(second.value(), "eu-west");
        assert_eq!(registry.listener_count("region"), 2);
    }

    #[test]
    fn test_type_conflict_does_not_touch_entry() {
        let registry = Registry::new();
        registry.get_property("timeout", 30i64).unwrap();

        let err = registry.get_property("timeout", 30.0f64).unwrap_err();

        assert!(matches!(
            err,
            Error::TypeConflict {
                requested: PropertyType::Double,
                registered: PropertyType::Integer,
                ..
            }
        ));
        assert_eq!(registry.listener_count("timeout"), 1);
        assert_eq!(registry.current_value("timeout"), Some(json!(30)));
    }

    #[test]
    fn test_empty_name_rejected() {
        let registry = Registry::new();
        let err = registry.get_property("", true).unwrap_err();
        assert!(matches!(err, Error::InvalidInput(_)));
        assert!(registry.is_empty());
    }

    #[test]
    fn test_unrepresentable_default_rejected() {
        let registry = Registry::new();
        let err = registry.get_property("ratio", f64::NAN).unwrap_err();
        assert!(matches!(err, Error::NullValue { .. }));
        assert!(!registry.is_registered("ratio"));

        // Ignored once the name exists
        registry.get_property("ratio", 0.5).unwrap();
        let property = registry.get_property("ratio", f64::INFINITY).unwrap();
        assert_eq!(property.value(), 0.5);
    }

    #[test]
    fn test_update_forwards_to_handle() {
        let registry = Registry::new();
        let property = registry.get_property("timeout", 30i64).unwrap();

        registry.update_property("timeout", json!(45)).unwrap();

        assert_eq!(property.value(), 45);
        assert_eq!(property.version(), 1);
        assert_eq!(registry.current_value("timeout"), Some(json!(45)));
    }

    #[test]
    fn test_update_rejections() {
        let registry = Registry::new();
        registry.get_property("timeout", 30i64).unwrap();

        assert!(matches!(
            registry.update_property("unset", json!(1)),
            Err(Error::Unregistered { .. })
        ));
        assert!(matches!(
            registry.update_property("timeout", Value::Null),
            Err(Error::NullValue { .. })
        ));
        assert!(matches!(
            registry.update_property("timeout", json!("45")),
            Err(Error::TypeMismatch {
                expected: PropertyType::Integer,
                ..
            })
        ));
        assert!(matches!(
            registry.update_property("timeout", json!(45.0)),
            Err(Error::TypeMismatch { .. })
        ));
        assert_eq!(registry.current_value("timeout"), Some(json!(30)));
    }

    #[test]
    fn test_unchanged_value_skips_dispatch() {
        let registry = Registry::new();
        let property = registry.get_property("enabled", true).unwrap();

        registry.update_property("enabled", json!(true)).unwrap();

        assert_eq!(property.version(), 0);
    }

    #[test]
    fn test_structured_property() {
        let registry = Registry::new();
        let mut default = Map::new();
        default.insert("retries".to_string(), json!(3));
        let property = registry.get_property("policy", default).unwrap();

        registry
            .update_property("policy", json!({"retries": 5, "backoff": "linear"}))
            .unwrap();

        assert_eq!(property.get()["retries"], json!(5));
        assert_eq!(property.get()["backoff"], json!("linear"));
        assert!(matches!(
            registry.update_property("policy", json!([1, 2])),
            Err(Error::TypeMismatch { .. })
        ));
    }

    #[test]
    fn test_declare() {
        let registry = Registry::new();
        registry
            .declare("timeout", PropertyType::Integer, json!(30))
            .unwrap();
        assert_eq!(registry.listener_count("timeout"), 0);

        // Same type again keeps the first default
        registry
            .declare("timeout", PropertyType::Integer, json!(60))
            .unwrap();
        assert_eq!(registry.get_property("timeout", 0i64).unwrap().value(), 30);

        assert!(matches!(
            registry.declare("timeout", PropertyType::Text, json!("30")),
            Err(Error::TypeConflict { .. })
        ));
        assert!(matches!(
            registry.declare("ratio", PropertyType::Double, json!(1)),
            Err(Error::TypeMismatch { .. })
        ));
        assert!(matches!(
            registry.declare("ratio", PropertyType::Double, Value::Null),
            Err(Error::NullValue { .. })
        ));
        assert!(!registry.is_registered("ratio"));
    }

    #[test]
    fn test_batch_applies_valid_entries() {
        let registry = Registry::new();
        let a = registry.get_property("a", 1i64).unwrap();
        let b = registry.get_property("b", 1i64).unwrap();
        let c = registry.get_property("c", 1i64).unwrap();

        let report = registry.update_properties(vec![
            ("a", json!(2)),
            ("b", json!("two")),
            ("c", json!(3)),
        ]);

        assert_eq!(report.accepted, vec!["a", "c"]);
        assert_eq!(report.rejected_names(), vec!["b"]);
        assert!(!report.is_clean());
        assert_eq!((a.value(), b.value(), c.value()), (2, 1, 3));
    }

    #[test]
    fn test_apply_json() {
        let registry = Registry::new();
        let timeout = registry.get_property("timeout", 30i64).unwrap();

        let report = registry
            .apply_json(r#"{"timeout": 45, "missing": true}"#)
            .unwrap();

        assert_eq!(timeout.value(), 45);
        assert_eq!(report.rejected_names(), vec!["missing"]);

        assert!(matches!(
            registry.apply_json("[1, 2]"),
            Err(Error::InvalidInput(_))
        ));
        assert!(matches!(registry.apply_json("{"), Err(Error::Json(_))));
    }

    #[test]
    fn test_property_names() {
        let registry = Registry::new();
        registry.get_property("a", 1i64).unwrap();
        registry.get_property("b", false).unwrap();

        let mut names = registry.property_names();
        names.sort();
        assert_eq!(names, vec!["a", "b"]);
        assert_eq!(registry.listener_count("missing"), 0);
        assert_eq!(registry.property_type("missing"), None);
    }
}
