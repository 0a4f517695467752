use dashmap::DashMap;
use serde::{Deserialize, Serialize};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use tracing::debug;

use crate::bus::{Listener, ListenerRegistry, Service};
use crate::market::types::{OrderBook, Quantity, Side};
use crate::products::Product;

/// Minimum offer-minus-bid gap required before the engine crosses.
pub const SPREAD_TOLERANCE: f64 = 1.0 / 128.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum OrderType {
    Fok,
    Ioc,
    Market,
    Limit,
    Stop,
}

/// An execution order ready to be placed on an exchange. Immutable after
/// creation; keyed by order id, indexable by product.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExecutionOrder<P: Product> {
    product: P,
    side: Side,
    order_id: String,
    order_type: OrderType,
    price: f64,
    visible_quantity: Quantity,
    hidden_quantity: Quantity,
    parent_order_id: String,
    is_child_order: bool,
}

impl<P: Product> ExecutionOrder<P> {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        product: P,
        side: Side,
        order_id: String,
        order_type: OrderType,
        price: f64,
        visible_quantity: Quantity,
        hidden_quantity: Quantity,
        parent_order_id: String,
        is_child_order: bool,
    ) -> Self {
        Self {
            product,
            side,
            order_id,
            order_type,
            price,
            visible_quantity,
            hidden_quantity,
            parent_order_id,
            is_child_order,
        }
    }

    pub fn product(&self) -> &P {
        &self.product
    }

    pub fn product_id(&self) -> &str {
        self.product.product_id()
    }

    pub fn side(&self) -> Side {
        self.side
    }

    pub fn order_id(&self) -> &str {
        &self.order_id
    }

    pub fn order_type(&self) -> OrderType {
        self.order_type
    }

    pub fn price(&self) -> f64 {
        self.price
    }

    pub fn visible_quantity(&self) -> Quantity {
        self.visible_quantity
    }

    pub fn hidden_quantity(&self) -> Quantity {
        self.hidden_quantity
    }

    pub fn parent_order_id(&self) -> &str {
        &self.parent_order_id
    }

    pub fn is_child_order(&self) -> bool {
        self.is_child_order
    }
}

/// Algorithmic execution engine.
///
/// Consumes order-book snapshots and crosses the spread only when the edge
/// justifies it: a single order is generated per snapshot whose top-of-book
/// gap strictly exceeds [`SPREAD_TOLERANCE`]. Successive crossings alternate
/// sides off one shared counter across all products, so the engine takes no
/// one-directional bias. The counter starts at 0 (even crossings lift the
/// bid side) and increments by one per generated order; order ids are
/// `TRADEID_<counter>` and are process-unique.
pub struct AlgoExecutionEngine<P: Product> {
    orders: DashMap<String, ExecutionOrder<P>>,
    listeners: ListenerRegistry<ExecutionOrder<P>>,
    counter: AtomicU64,
}

impl<P: Product> AlgoExecutionEngine<P> {
    pub fn new() -> Self {
        Self {
            orders: DashMap::new(),
            listeners: ListenerRegistry::new(),
            counter: AtomicU64::new(0),
        }
    }

    pub fn add_listener(&self, listener: Arc<dyn Listener<ExecutionOrder<P>>>) {
        self.listeners.add(listener);
    }

    pub fn listener_count(&self) -> usize {
        self.listeners.len()
    }

    /// Orders generated so far by this engine instance.
    pub fn orders_generated(&self) -> u64 {
        self.counter.load(Ordering::Relaxed)
    }

    /// All stored orders for one product, in no particular order.
    pub fn orders_for_product(&self, product_id: &str) -> Vec<ExecutionOrder<P>> {
        self.orders
            .iter()
            .filter(|entry| entry.value().product_id() == product_id)
            .map(|entry| entry.value().clone())
            .collect()
    }

    /// Apply the spread-crossing rule to one snapshot.
    ///
    /// An empty bid or offer stack is no action, never a fault. A gap of
    /// exactly the tolerance does not cross (strict `>`).
    pub fn on_order_book(&self, book: &OrderBook<P>) {
        let (best_bid, best_offer) = match (book.best_bid(), book.best_offer()) {
            (Some(bid), Some(offer)) => (bid, offer),
            _ => {
                debug!(product = book.product_id(), "one-sided book, no action");
                return;
            }
        };

        if best_offer.price - best_bid.price <= SPREAD_TOLERANCE {
            debug!(
                product = book.product_id(),
                spread = best_offer.price - best_bid.price,
                "spread within tolerance, no crossing"
            );
            return;
        }

        let sequence = self.counter.fetch_add(1, Ordering::Relaxed);
        let (side, price, quantity) = if sequence % 2 == 0 {
            (Side::Bid, best_bid.price, best_bid.quantity)
        } else {
            (Side::Offer, best_offer.price, best_offer.quantity)
        };

        let order = ExecutionOrder::new(
            book.product().clone(),
            side,
            format!("TRADEID_{sequence}"),
            OrderType::Market,
            price,
            quantity,
            2 * quantity,
            String::new(),
            false,
        );

        debug!(
            product = order.product_id(),
            order_id = order.order_id(),
            side = %order.side(),
            price = order.price(),
            visible = order.visible_quantity(),
            "crossing spread"
        );
        self.orders.insert(order.order_id().to_string(), order.clone());
        self.listeners.notify(&order);
    }
}

impl<P: Product> Service<String, ExecutionOrder<P>> for AlgoExecutionEngine<P> {
    fn get_data(&self, key: &String) -> Option<ExecutionOrder<P>> {
        self.orders.get(key).map(|entry| entry.value().clone())
    }

    fn on_message(&self, data: ExecutionOrder<P>) {
        self.orders.insert(data.order_id().to_string(), data);
    }
}

impl<P: Product> Default for AlgoExecutionEngine<P> {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::market::types::Order;
    use crate::products::{Bond, BondIdType};
    use chrono::NaiveDate;
    use parking_lot::Mutex;

    fn test_bond(product_id: &str) -> Bond {
        Bond::new(
            product_id,
            BondIdType::Cusip,
            "USB10Y",
            0.03125,
            NaiveDate::from_ymd_opt(2032, 12, 31).unwrap(),
        )
    }

    fn book(product_id: &str, bid: f64, offer: f64) -> OrderBook<Bond> {
        OrderBook::new(
            test_bond(product_id),
            vec![Order::new(bid, 1_000_000, Side::Bid)],
            vec![Order::new(offer, 2_000_000, Side::Offer)],
        )
    }

    fn capture(engine: &AlgoExecutionEngine<Bond>) -> Arc<Mutex<Vec<ExecutionOrder<Bond>>>> {
        let captured = Arc::new(Mutex::new(Vec::new()));
        let captured_clone = Arc::clone(&captured);
        engine.add_listener(Arc::new(move |order: &ExecutionOrder<Bond>| {
            captured_clone.lock().push(order.clone());
        }));
        captured
    }

    #[test]
    fn test_wide_spread_crosses() {
        let engine: AlgoExecutionEngine<Bond> = AlgoExecutionEngine::new();
        let captured = capture(&engine);

        // Gap of 2x tolerance (1/64) must generate an order.
        engine.on_order_book(&book("OTRUSTR_10Y", 99.50, 99.50 + 1.0 / 64.0));

        let captured = captured.lock();
        assert_eq!(captured.len(), 1);
        let order = &captured[0];
        assert_eq!(order.order_id(), "TRADEID_0");
        assert_eq!(order.side(), Side::Bid);
        assert_eq!(order.price(), 99.50);
        assert_eq!(order.order_type(), OrderType::Market);
        assert_eq!(order.visible_quantity(), 1_000_000);
        assert_eq!(order.hidden_quantity(), 2_000_000);
        assert_eq!(order.parent_order_id(), "");
        assert!(!order.is_child_order());
    }

    #[test]
    fn test_spread_at_tolerance_does_not_cross() {
        let engine: AlgoExecutionEngine<Bond> = AlgoExecutionEngine::new();
        let captured = capture(&engine);

        // Strict comparison: exactly 1/128 is within tolerance.
        engine.on_order_book(&book("OTRUSTR_10Y", 99.50, 99.50 + SPREAD_TOLERANCE));

        assert!(captured.lock().is_empty());
        assert_eq!(engine.orders_generated(), 0);
    }

    #[test]
    fn test_empty_stack_takes_no_action() {
        let engine: AlgoExecutionEngine<Bond> = AlgoExecutionEngine::new();
        let captured = capture(&engine);

        engine.on_order_book(&OrderBook::new(
            test_bond("OTRUSTR_10Y"),
            vec![],
            vec![Order::new(99.60, 1_000_000, Side::Offer)],
        ));
        engine.on_order_book(&OrderBook::new(
            test_bond("OTRUSTR_10Y"),
            vec![Order::new(99.50, 1_000_000, Side::Bid)],
            vec![],
        ));

        assert!(captured.lock().is_empty());
    }

    #[test]
    fn test_sides_alternate_across_products() {
        let engine: AlgoExecutionEngine<Bond> = AlgoExecutionEngine::new();
        let captured = capture(&engine);

        // The counter is shared per engine instance, not per product.
        engine.on_order_book(&book("OTRUSTR_02Y", 99.50, 99.55));
        engine.on_order_book(&book("OTRUSTR_10Y", 99.50, 99.55));
        engine.on_order_book(&book("OTRUSTR_02Y", 99.50, 99.55));

        let sides: Vec<Side> = captured.lock().iter().map(|o| o.side()).collect();
        assert_eq!(sides, vec![Side::Bid, Side::Offer, Side::Bid]);
        assert_eq!(engine.orders_generated(), 3);
    }

    #[test]
    fn test_offer_side_crossing_uses_best_offer() {
        let engine: AlgoExecutionEngine<Bond> = AlgoExecutionEngine::new();
        let captured = capture(&engine);

        engine.on_order_book(&book("OTRUSTR_10Y", 99.50, 99.55));
        engine.on_order_book(&book("OTRUSTR_10Y", 99.50, 99.55));

        let captured = captured.lock();
        let offer_order = &captured[1];
        assert_eq!(offer_order.order_id(), "TRADEID_1");
        assert_eq!(offer_order.side(), Side::Offer);
        assert_eq!(offer_order.price(), 99.55);
        assert_eq!(offer_order.visible_quantity(), 2_000_000);
        assert_eq!(offer_order.hidden_quantity(), 4_000_000);
    }

    #[test]
    fn test_orders_are_stored_and_indexable() {
        let engine: AlgoExecutionEngine<Bond> = AlgoExecutionEngine::new();

        engine.on_order_book(&book("OTRUSTR_02Y", 99.50, 99.55));
        engine.on_order_book(&book("OTRUSTR_10Y", 99.50, 99.55));

        let stored = engine.get_data(&"TRADEID_0".to_string()).unwrap();
        assert_eq!(stored.product_id(), "OTRUSTR_02Y");
        assert!(engine.get_data(&"TRADEID_9".to_string()).is_none());

        assert_eq!(engine.orders_for_product("OTRUSTR_10Y").len(), 1);
        assert_eq!(engine.orders_for_product("OTRUSTR_30Y").len(), 0);
    }

    #[test]
    fn test_on_message_overwrites_by_order_id() {
        let engine: AlgoExecutionEngine<Bond> = AlgoExecutionEngine::new();
        let order = ExecutionOrder::new(
            test_bond("OTRUSTR_10Y"),
            Side::Bid,
            "TRADEID_7".to_string(),
            OrderType::Market,
            99.5,
            1_000,
            2_000,
            String::new(),
            false,
        );
        engine.on_message(order.clone());
        engine.on_message(order);
        assert_eq!(engine.orders_for_product("OTRUSTR_10Y").len(), 1);
    }
}
