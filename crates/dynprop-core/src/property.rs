//! Live property handles
//!
//! A [`Property`] is handed out by the registry for every request. It holds the most
//! recent value forwarded to it and can be read from any thread without locking.

use arc_swap::ArcSwap;
use std::fmt;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

/// Live view of a registered property
///
/// Cloning a handle shares its storage: both clones observe the same updates.
/// Handles obtained through separate registry requests are independent cells kept in
/// sync by the registry.
///
/// # Example
///
/// ```rust
/// use dynprop_core::Registry;
///
/// let registry = Registry::new();
/// let timeout = registry.get_property("timeout", 30i64)?;
/// assert_eq!(timeout.value(), 30);
///
/// registry.update_property("timeout", serde_json::json!(45))?;
/// assert_eq!(timeout.value(), 45);
/// # Ok::<(), dynprop_core::Error>(())
/// ```
pub struct Property<T> {
    inner: Arc<Cell<T>>,
}

struct Cell<T> {
    value: ArcSwap<T>,
    version: AtomicU64,
}

impl<T> Property<T> {
    pub(crate) fn new(initial: T) -> Self {
        Self {
            inner: Arc::new(Cell {
                value: ArcSwap::from_pointee(initial),
                version: AtomicU64::new(0),
            }),
        }
    }

    /// Latest value known to this handle
    ///
    /// Never blocks. The returned snapshot is not affected by later updates.
    pub fn get(&self) -> Arc<T> {
        self.inner.value.load_full()
    }

    /// Number of values forwarded into this handle since it was created
    pub fn version(&self) -> u64 {
        self.inner.version.load(Ordering::Acquire)
    }

    pub(crate) fn set(&self, value: T) {
        self.inner.value.store(Arc::new(value));
        self.inner.version.fetch_add(1, Ordering::AcqRel);
    }
}

impl<T: Clone> Property<T> {
    /// Clone of the latest value known to this handle
    pub fn value(&self) -> T {
        let guard = self.inner.value.load();
        T::clone(&guard)
    }
}

impl<T> Clone for Property<T> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<T: fmt::Debug> fmt::Debug for Property<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Property")
            .field("value", &*self.get())
            .field("version", &self.version())
            .finish()
    }
}
