//! Pricing stage: raw mid/spread quotes, keyed by product id.

use dashmap::DashMap;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::debug;

use crate::bus::{Listener, ListenerRegistry, Service};
use crate::products::Product;

/// A raw quote: mid price plus the bid/offer spread around it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Price<P: Product> {
    product: P,
    mid: f64,
    bid_offer_spread: f64,
}

impl<P: Product> Price<P> {
    pub fn new(product: P, mid: f64, bid_offer_spread: f64) -> Self {
        Self {
            product,
            mid,
            bid_offer_spread,
        }
    }

    pub fn product(&self) -> &P {
        &self.product
    }

    pub fn product_id(&self) -> &str {
        self.product.product_id()
    }

    pub fn mid(&self) -> f64 {
        self.mid
    }

    pub fn bid_offer_spread(&self) -> f64 {
        self.bid_offer_spread
    }
}

/// Stage managing the latest quote per product (last-write-wins). Every
/// inbound quote is stored and pushed to all listeners.
pub struct PricingService<P: Product> {
    prices: DashMap<String, Price<P>>,
    listeners: ListenerRegistry<Price<P>>,
}

impl<P: Product> PricingService<P> {
    pub fn new() -> Self {
        Self {
            prices: DashMap::new(),
            listeners: ListenerRegistry::new(),
        }
    }

    pub fn add_listener(&self, listener: Arc<dyn Listener<Price<P>>>) {
        self.listeners.add(listener);
    }

    pub fn listener_count(&self) -> usize {
        self.listeners.len()
    }
}

impl<P: Product> Service<String, Price<P>> for PricingService<P> {
    fn get_data(&self, key: &String) -> Option<Price<P>> {
        self.prices.get(key).map(|entry| entry.value().clone())
    }

    fn on_message(&self, data: Price<P>) {
        debug!(
            product = data.product_id(),
            mid = data.mid(),
            spread = data.bid_offer_spread(),
            "quote received"
        );
        self.prices.insert(data.product_id().to_string(), data.clone());
        self.listeners.notify(&data);
    }
}

impl<P: Product> Default for PricingService<P> {
    fn default() -> Self {
        Self::new()
    }
}
