/// Callback interface invoked by a stage for every published value.
///
/// Only `process_add` carries behavior in this pipeline; all mutations are
/// modeled as adds. `process_remove` and `process_update` are part of the
/// contract so listeners stay substitutable, and default to no-ops.
pub trait Listener<V>: Send + Sync {
    /// Process a newly published value.
    fn process_add(&self, data: &V);

    /// Process a removal event. Never fired by the core stages.
    fn process_remove(&self, _data: &V) {}

    /// Process an update event. Never fired by the core stages.
    fn process_update(&self, _data: &V) {}
}

/// Any plain closure can be registered as a listener. This keeps composition
/// roots free of one-off forwarding types: egress sinks are just closures.
impl<V, F> Listener<V> for F
where
    F: Fn(&V) + Send + Sync,
{
    fn process_add(&self, data: &V) {
        self(data)
    }
}
