use dashmap::DashMap;
use std::sync::Arc;
use tracing::debug;

use crate::bus::{Listener, ListenerRegistry, Service};
use crate::market::types::{BidOffer, OrderBook};
use crate::products::Product;

/// Market-data stage distributing order-book snapshots, keyed by product id.
///
/// Each inbound snapshot overwrites the stored snapshot for its product
/// (last-write-wins) and is pushed to all registered listeners.
pub struct MarketDataService<P: Product> {
    books: DashMap<String, OrderBook<P>>,
    listeners: ListenerRegistry<OrderBook<P>>,
}

impl<P: Product> MarketDataService<P> {
    pub fn new() -> Self {
        Self {
            books: DashMap::new(),
            listeners: ListenerRegistry::new(),
        }
    }

    pub fn add_listener(&self, listener: Arc<dyn Listener<OrderBook<P>>>) {
        self.listeners.add(listener);
    }

    pub fn listener_count(&self) -> usize {
        self.listeners.len()
    }

    /// Top of book for the stored snapshot of `product_id`, computed by full
    /// scan. `None` when the product is unknown or either stack is empty.
    pub fn best_bid_offer(&self, product_id: &str) -> Option<BidOffer> {
        self.books
            .get(product_id)
            .and_then(|book| book.best_bid_offer())
    }

    /// Price-level aggregation of the stored snapshot of `product_id`.
    pub fn aggregate_depth(&self, product_id: &str) -> Option<OrderBook<P>> {
        self.books.get(product_id).map(|book| book.aggregate_depth())
    }
}

impl<P: Product> Service<String, OrderBook<P>> for MarketDataService<P> {
    fn get_data(&self, key: &String) -> Option<OrderBook<P>> {
        self.books.get(key).map(|entry| entry.value().clone())
    }

    fn on_message(&self, data: OrderBook<P>) {
        debug!(
            product = data.product_id(),
            bids = data.bid_stack().len(),
            offers = data.offer_stack().len(),
            "order book snapshot received"
        );
        self.books.insert(data.product_id().to_string(), data.clone());
        self.listeners.notify(&data);
    }
}

impl<P: Product> Default for MarketDataService<P> {
    fn default() -> Self {
        Self::new()
    }
}
