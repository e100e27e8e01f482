// # dynprop-core
//
// Core library for runtime-updatable configuration properties.
//
// ## Architecture Overview
//
// - **PropertyType**: Closed set of value types, with a `matches` predicate
// - **Property**: Live, lock-free handle to the latest value of one property
// - **ListenerSet**: Per-name ordered fan-out of update callbacks
// - **Registry**: Process-wide store of types, current values and fan-outs
// - **PropertyRegistry / UpdatablePropertyRegistry**: Read and write traits
//
// ## Flow
//
// 1. A component requests a property by name, default and type
// 2. The registry fixes the type on first use and returns a new handle
// 3. A configuration source pushes `name -> value` batches
// 4. The registry validates each value, stores it and forwards it to every handle
//
// Sourcing the updates (file watching, remote polling) is left to the embedding
// application.

pub mod config;
pub mod envelope;
pub mod error;
pub mod listener;
pub mod property;
pub mod registry;
pub mod traits;
pub mod types;

// Re-export core types for convenience
pub use config::{PropertyDecl, RegistryConfig};
pub use envelope::{AuctionEnvironment, Envelope};
pub use error::{Error, Result};
pub use listener::{ListenerSet, UpdateListener};
pub use property::Property;
pub use registry::{BatchReport, Registry};
pub use traits::{PropertyRegistry, UpdatablePropertyRegistry};
pub use types::{PropertyKind, PropertyType};
