use dashmap::DashMap;
use parking_lot::Mutex;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::debug;

use crate::bus::{Listener, ListenerRegistry, Service};
use crate::market::types::{Quantity, Side};
use crate::pricing::Price;
use crate::products::Product;

/// Inclusive range the visible size of each stream side is drawn from.
pub const VISIBLE_SIZE_MIN: Quantity = 1_000_000;
pub const VISIBLE_SIZE_MAX: Quantity = 1_999_999;

/// One side of a streamable two-way quote.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PriceStreamOrder {
    pub price: f64,
    pub visible_quantity: Quantity,
    pub hidden_quantity: Quantity,
    pub side: Side,
}

impl PriceStreamOrder {
    pub fn new(
        price: f64,
        visible_quantity: Quantity,
        hidden_quantity: Quantity,
        side: Side,
    ) -> Self {
        Self {
            price,
            visible_quantity,
            hidden_quantity,
            side,
        }
    }
}

/// A two-way market for one product, built fresh on every inbound quote.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PriceStream<P: Product> {
    product: P,
    bid_order: PriceStreamOrder,
    offer_order: PriceStreamOrder,
}

impl<P: Product> PriceStream<P> {
    pub fn new(product: P, bid_order: PriceStreamOrder, offer_order: PriceStreamOrder) -> Self {
        Self {
            product,
            bid_order,
            offer_order,
        }
    }

    pub fn product(&self) -> &P {
        &self.product
    }

    pub fn product_id(&self) -> &str {
        self.product.product_id()
    }

    pub fn bid_order(&self) -> &PriceStreamOrder {
        &self.bid_order
    }

    pub fn offer_order(&self) -> &PriceStreamOrder {
        &self.offer_order
    }
}

/// Algorithmic streaming engine.
///
/// Turns a raw mid/spread quote into a two-sided, sized stream: prices at
/// mid ± spread/2, one fresh uniform draw of visible size per inbound quote,
/// hidden size always exactly double the visible size. The stored stream per
/// product is last-write-wins. No retry, batching, or rate limiting happens
/// here; throttling belongs to downstream consumers.
pub struct AlgoStreamingEngine<P: Product> {
    streams: DashMap<String, PriceStream<P>>,
    listeners: ListenerRegistry<PriceStream<P>>,
    rng: Mutex<StdRng>,
}

impl<P: Product> AlgoStreamingEngine<P> {
    pub fn new() -> Self {
        Self {
            streams: DashMap::new(),
            listeners: ListenerRegistry::new(),
            rng: Mutex::new(StdRng::from_entropy()),
        }
    }

    /// Engine with a deterministic sizing sequence, for reproducible runs.
    pub fn with_seed(seed: u64) -> Self {
        Self {
            streams: DashMap::new(),
            listeners: ListenerRegistry::new(),
            rng: Mutex::new(StdRng::seed_from_u64(seed)),
        }
    }

    pub fn add_listener(&self, listener: Arc<dyn Listener<PriceStream<P>>>) {
        self.listeners.add(listener);
    }

    pub fn listener_count(&self) -> usize {
        self.listeners.len()
    }

    /// Synthesize and publish a two-way stream for one inbound quote.
    pub fn publish_price(&self, price: &Price<P>) {
        let bid_price = price.mid() - price.bid_offer_spread() / 2.0;
        let offer_price = price.mid() + price.bid_offer_spread() / 2.0;
        let visible_size = self
            .rng
            .lock()
            .gen_range(VISIBLE_SIZE_MIN..=VISIBLE_SIZE_MAX);

        let stream = PriceStream::new(
            price.product().clone(),
            PriceStreamOrder::new(bid_price, visible_size, 2 * visible_size, Side::Bid),
            PriceStreamOrder::new(offer_price, visible_size, 2 * visible_size, Side::Offer),
        );

        debug!(
            product = stream.product_id(),
            bid = bid_price,
            offer = offer_price,
            visible = visible_size,
            "publishing price stream"
        );
        self.streams
            .insert(stream.product_id().to_string(), stream.clone());
        self.listeners.notify(&stream);
    }
}

impl<P: Product> Service<String, PriceStream<P>> for AlgoStreamingEngine<P> {
    fn get_data(&self, key: &String) -> Option<PriceStream<P>> {
        self.streams.get(key).map(|entry| entry.value().clone())
    }

    fn on_message(&self, data: PriceStream<P>) {
        self.streams.insert(data.product_id().to_string(), data);
    }
}

impl<P: Product> Default for AlgoStreamingEngine<P> {
    fn default() -> Self {
        Self::new()
    }
}
