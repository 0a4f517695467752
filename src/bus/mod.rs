//! Typed publish/subscribe backbone
//!
//! Every pipeline stage is built from the same two abstractions: a
//! [`Service`] owning a keyed store with a single ingestion point, and any
//! number of [`Listener`]s called back synchronously on every published
//! value. Notification is depth-first: a listener may trigger the next
//! stage's own notify before the current call returns, which is how data
//! flows through the pipeline.

pub mod listener;
pub mod service;

pub use listener::Listener;
pub use service::{ListenerRegistry, Service};
