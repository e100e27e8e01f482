//! Registry traits
//!
//! Components that only read configuration depend on [`PropertyRegistry`]; the source
//! that pushes changes depends on [`UpdatablePropertyRegistry`]. Both are object safe so
//! the shared registry can be passed around as `Arc<dyn ...>`.

pub mod property_registry;

pub use property_registry::{PropertyRegistry, UpdatablePropertyRegistry};
