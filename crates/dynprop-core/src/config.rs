//! Configuration types for the property registry
//!
//! A [`RegistryConfig`] declares properties up front so their types and defaults are
//! fixed at process start, before any component requests a handle.
//!
//! ```json
//! {
//!   "properties": [
//!     { "name": "timeout", "type": "integer", "default": 30 },
//!     { "name": "region", "type": "text", "default": "eu-west" }
//!   ]
//! }
//! ```

use crate::error::{Error, Result};
use crate::types::PropertyType;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::HashSet;
use std::path::Path;
use tracing::debug;

/// Main registry configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RegistryConfig {
    /// Properties to establish at start-up
    #[serde(default)]
    pub properties: Vec<PropertyDecl>,
}

impl RegistryConfig {
    /// Create an empty configuration
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a declaration
    pub fn with_property(mut self, decl: PropertyDecl) -> Self {
        self.properties.push(decl);
        self
    }

    /// Parse a configuration from JSON text
    pub fn from_json_str(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Read and parse a JSON configuration file
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let contents = std::fs::read_to_string(path)?;
        let config = Self::from_json_str(&contents)?;
        debug!(
            path = %path.display(),
            properties = config.properties.len(),
            "loaded registry configuration"
        );
        Ok(config)
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<()> {
        let mut seen = HashSet::new();

        for decl in &self.properties {
            decl.validate()?;
            if !seen.insert(decl.name.as_str()) {
                return Err(Error::config(format!(
                    "Property `{}` is declared more than once",
                    decl.name
                )));
            }
        }

        Ok(())
    }
}

/// Declaration of one property
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PropertyDecl {
    /// Property name
    pub name: String,

    /// Type fixed for the name
    #[serde(rename = "type")]
    pub property_type: PropertyType,

    /// Initial value
    pub default: Value,
}

impl PropertyDecl {
    /// Create a new declaration
    pub fn new(name: impl Into<String>, property_type: PropertyType, default: Value) -> Self {
        Self {
            name: name.into(),
            property_type,
            default,
        }
    }

    /// Validate the declaration
    pub fn validate(&self) -> Result<()> {
        if self.name.is_empty() {
            return Err(Error::config("Property name cannot be empty"));
        }
        if self.default.is_null() {
            return Err(Error::config(format!(
                "Property `{}` must have a non-null default",
                self.name
            )));
        }
        if !self.property_type.matches(&self.default) {
            return Err(Error::config(format!(
                "Property `{}` default {} is not of type {}",
                self.name, self.default, self.property_type
            )));
        }
        Ok(())
    }
}
