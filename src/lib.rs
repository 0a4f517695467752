//! In-process fixed-income trading pipeline.
//!
//! Stages (market data, pricing, algo execution, algo streaming) are wired
//! together through a typed publish/subscribe bus: each stage owns a keyed
//! store, ingests values through `on_message`, and pushes its output to
//! registered listeners synchronously and in registration order. The listener
//! call graph *is* the dataflow graph: there is no queue and no buffering.

pub mod algo;
pub mod bus;
pub mod market;
pub mod metrics;
pub mod pricing;
pub mod products;

pub use algo::execution::{AlgoExecutionEngine, ExecutionOrder, OrderType};
pub use algo::streaming::{AlgoStreamingEngine, PriceStream, PriceStreamOrder};
pub use bus::{Listener, ListenerRegistry, Service};
pub use market::{BidOffer, MarketDataService, Order, OrderBook, Side};
pub use metrics::PipelineMetrics;
pub use pricing::{Price, PricingService};
pub use products::{Bond, Product, ReferenceData};
