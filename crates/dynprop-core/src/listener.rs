//! Per-property update fan-out
//!
//! Each registered name owns one [`ListenerSet`]. The registry appends a forwarding
//! closure for every handle it creates and dispatches accepted updates through it.

use crate::error::Result;
use parking_lot::RwLock;
use serde_json::Value;
use std::fmt;

/// Callback invoked with every accepted value for one property
pub type UpdateListener = Box<dyn Fn(&Value) -> Result<()> + Send + Sync>;

/// Ordered collection of update callbacks for one property name
///
/// Listeners are never removed; they live as long as the set.
#[derive(Default)]
pub struct ListenerSet {
    listeners: RwLock<Vec<UpdateListener>>,
}

impl ListenerSet {
    /// Create an empty listener set
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a listener; it runs after every listener added before it
    pub fn add(&self, listener: UpdateListener) {
        self.listeners.write().push(listener);
    }

    /// Invoke every listener with `value`, in registration order
    ///
    /// The first listener error is returned as-is and the remaining listeners are
    /// skipped for this dispatch. Listeners must not add to this set while it
    /// dispatches.
    pub fn dispatch(&self, value: &Value) -> Result<()> {
        let listeners = self.listeners.read();
        for listener in listeners.iter() {
            listener(value)?;
        }
        Ok(())
    }

    /// Number of registered listeners
    pub fn len(&self) -> usize {
        self.listeners.read().len()
    }

    /// Whether no listener has been registered
    pub fn is_empty(&self) -> bool {
        self.listeners.read().is_empty()
    }
}

impl fmt::Debug for ListenerSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ListenerSet")
            .field("listeners", &self.len())
            .finish()
    }
}
