use parking_lot::RwLock;
use std::sync::Arc;
use tracing::debug;

use crate::bus::listener::Listener;

/// Common contract for a pipeline stage: a keyed store with a single
/// ingestion point.
///
/// `get_data` on an absent key is an empty read, never an error; callers
/// must not assume presence. `on_message` is the only way a stage's store is
/// created or overwritten, keyed by a stage-specific derivation of the
/// value's identity (product id, order id).
pub trait Service<K, V> {
    /// Read the current value stored under `key`, if any.
    fn get_data(&self, key: &K) -> Option<V>;

    /// Ingest a new or updated value, overwriting any prior value stored
    /// under the same key.
    fn on_message(&self, data: V);
}

/// Ordered, append-only collection of listeners registered on a stage.
///
/// Registration is permanent for the process lifetime: there is no removal
/// and no de-duplication. `notify` dispatches to every listener in
/// registration order, synchronously and depth-first, so a listener that
/// feeds another stage fully propagates the value before the next listener
/// runs.
pub struct ListenerRegistry<V> {
    listeners: RwLock<Vec<Arc<dyn Listener<V>>>>,
}

impl<V> ListenerRegistry<V> {
    pub fn new() -> Self {
        Self {
            listeners: RwLock::new(Vec::new()),
        }
    }

    /// Append a listener to the registry.
    pub fn add(&self, listener: Arc<dyn Listener<V>>) {
        self.listeners.write().push(listener);
        debug!("listener registered, registry size now {}", self.len());
    }

    /// Number of registered listeners.
    pub fn len(&self) -> usize {
        self.listeners.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Read-only view of the registry: the registered listeners, in
    /// registration order, snapshotted at the time of the call.
    pub fn listeners(&self) -> Vec<Arc<dyn Listener<V>>> {
        self.listeners.read().iter().cloned().collect()
    }

    /// Invoke `process_add` on every registered listener, in registration
    /// order. The registry lock is released before dispatch so reentrant
    /// notify chains through downstream stages cannot deadlock.
    pub fn notify(&self, data: &V) {
        for listener in self.listeners() {
            listener.process_add(data);
        }
    }
}

impl<V> Default for ListenerRegistry<V> {
    fn default() -> Self {
        Self::new()
    }
}
