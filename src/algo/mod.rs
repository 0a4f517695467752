//! Algorithmic engines
//!
//! The execution engine turns order-book snapshots into spread-crossing
//! market orders; the streaming engine turns raw quotes into two-sided,
//! sized price streams. Both are stages on the bus; the composition root
//! wires each onto its upstream service with a forwarding closure.

pub mod execution;
pub mod streaming;

pub use execution::{AlgoExecutionEngine, ExecutionOrder, OrderType};
pub use streaming::{AlgoStreamingEngine, PriceStream, PriceStreamOrder};
