//! Market model: order-book snapshots and the market-data stage
//!
//! This module contains the order-book value types plus the best-price and
//! depth-aggregation algorithms used by the algo engines downstream.

pub mod book;
pub mod service;
pub mod types;

pub use service::MarketDataService;
pub use types::{BidOffer, Order, OrderBook, Side};
