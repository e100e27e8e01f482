//! Error types for the property registry
//!
//! This module defines all error types used throughout the crate.

use crate::types::PropertyType;
use thiserror::Error;

/// Result type alias for registry operations
pub type Result<T> = std::result::Result<T, Error>;

/// Core error type for the property registry
///
/// The first four variants are contract violations raised by the registry itself;
/// they are returned synchronously to the calling component and never retried.
#[derive(Error, Debug)]
pub enum Error {
    /// A name was requested with a type different from its established one
    #[error(
        "requested property `{name}` with type {requested}, but it is already registered with type {registered}"
    )]
    TypeConflict {
        /// Property name
        name: String,
        /// Type asked for by the caller
        requested: PropertyType,
        /// Type fixed at first use
        registered: PropertyType,
    },

    /// An update targeted a name that has never been requested or declared
    #[error("property `{name}` has not been registered")]
    Unregistered {
        /// Property name
        name: String,
    },

    /// An update or default carried no value
    #[error("property `{name}` cannot be set to a null value")]
    NullValue {
        /// Property name
        name: String,
    },

    /// An update carried a value of the wrong kind
    #[error("property `{name}` requires a value of type {expected}, got: {value}")]
    TypeMismatch {
        /// Property name
        name: String,
        /// Established type of the property
        expected: PropertyType,
        /// Rejected value, rendered as JSON
        value: String,
    },

    /// Configuration errors
    #[error("Configuration error: {0}")]
    Config(String),

    /// Invalid input
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// I/O errors (configuration and table files)
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization/deserialization errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl Error {
    /// Create a type conflict error
    pub fn type_conflict(
        name: impl Into<String>,
        requested: PropertyType,
        registered: PropertyType,
    ) -> Self {
        Self::TypeConflict {
            name: name.into(),
            requested,
            registered,
        }
    }

    /// Create an "unregistered" error
    pub fn unregistered(name: impl Into<String>) -> Self {
        Self::Unregistered { name: name.into() }
    }

    /// Create a null value error
    pub fn null_value(name: impl Into<String>) -> Self {
        Self::NullValue { name: name.into() }
    }

    /// Create a type mismatch error
    pub fn type_mismatch(
        name: impl Into<String>,
        expected: PropertyType,
        value: &serde_json::Value,
    ) -> Self {
        Self::TypeMismatch {
            name: name.into(),
            expected,
            value: value.to_string(),
        }
    }

    /// Create a configuration error
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    /// Create an invalid input error
    pub fn invalid_input(msg: impl Into<String>) -> Self {
        Self::InvalidInput(msg.into())
    }

    /// Whether this error is one of the registry's contract violations
    pub fn is_contract_violation(&self) -> bool {
        matches!(
            self,
            Self::TypeConflict { .. }
                | Self::Unregistered { .. }
                | Self::NullValue { .. }
                | Self::TypeMismatch { .. }
        )
    }
}
