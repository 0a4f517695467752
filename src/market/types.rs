use serde::{Deserialize, Serialize};
use std::fmt;

use crate::products::Product;

pub type Price = f64;
pub type Quantity = i64;

/// Side of a quote or resting order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Side {
    Bid,
    Offer,
}

impl fmt::Display for Side {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Side::Bid => write!(f, "BID"),
            Side::Offer => write!(f, "OFFER"),
        }
    }
}

/// A resting order in a book snapshot. Immutable once constructed.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Order {
    pub price: Price,
    pub quantity: Quantity,
    pub side: Side,
}

impl Order {
    pub fn new(price: Price, quantity: Quantity, side: Side) -> Self {
        Self {
            price,
            quantity,
            side,
        }
    }
}

/// Top of book: the best bid and best offer of a snapshot.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BidOffer {
    pub bid: Order,
    pub offer: Order,
}

impl BidOffer {
    pub fn new(bid: Order, offer: Order) -> Self {
        Self { bid, offer }
    }

    /// Offer price minus bid price.
    pub fn spread(&self) -> Price {
        self.offer.price - self.bid.price
    }
}

/// An immutable order-book snapshot for one product.
///
/// No ordering is assumed on either stack; best prices are computed by full
/// scan, never by position.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OrderBook<P: Product> {
    product: P,
    bid_stack: Vec<Order>,
    offer_stack: Vec<Order>,
}

impl<P: Product> OrderBook<P> {
    pub fn new(product: P, bid_stack: Vec<Order>, offer_stack: Vec<Order>) -> Self {
        Self {
            product,
            bid_stack,
            offer_stack,
        }
    }

    pub fn product(&self) -> &P {
        &self.product
    }

    pub fn product_id(&self) -> &str {
        self.product.product_id()
    }

    pub fn bid_stack(&self) -> &[Order] {
        &self.bid_stack
    }

    pub fn offer_stack(&self) -> &[Order] {
        &self.offer_stack
    }
}
