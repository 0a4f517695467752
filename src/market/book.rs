//! Best-price selection and depth aggregation over book snapshots.

use crate::market::types::{BidOffer, Order, OrderBook, Side};
use crate::products::Product;

impl<P: Product> OrderBook<P> {
    /// Best (maximum-price) bid, by full scan of the bid stack.
    ///
    /// Ties keep the first maximal order encountered, so the result is
    /// deterministic given stack order. `None` on an empty stack.
    pub fn best_bid(&self) -> Option<&Order> {
        let mut best: Option<&Order> = None;
        for order in self.bid_stack() {
            match best {
                Some(current) if order.price <= current.price => {}
                _ => best = Some(order),
            }
        }
        best
    }

    /// Best (minimum-price) offer, by full scan of the offer stack.
    pub fn best_offer(&self) -> Option<&Order> {
        let mut best: Option<&Order> = None;
        for order in self.offer_stack() {
            match best {
                Some(current) if order.price >= current.price => {}
                _ => best = Some(order),
            }
        }
        best
    }

    /// Top of book, by value. `None` when either stack is empty.
    pub fn best_bid_offer(&self) -> Option<BidOffer> {
        match (self.best_bid(), self.best_offer()) {
            (Some(bid), Some(offer)) => Some(BidOffer::new(*bid, *offer)),
            _ => None,
        }
    }

    /// Collapse both stacks into price-level buckets: one order per distinct
    /// price, quantity summed, in insertion order of each price's first
    /// occurrence. Pure; the snapshot itself is never mutated.
    pub fn aggregate_depth(&self) -> OrderBook<P> {
        OrderBook::new(
            self.product().clone(),
            aggregate_stack(self.bid_stack(), Side::Bid),
            aggregate_stack(self.offer_stack(), Side::Offer),
        )
    }
}

fn aggregate_stack(stack: &[Order], side: Side) -> Vec<Order> {
    let mut levels: Vec<Order> = Vec::new();
    for order in stack {
        match levels.iter_mut().find(|level| level.price == order.price) {
            Some(level) => level.quantity += order.quantity,
            None => levels.push(Order::new(order.price, order.quantity, side)),
        }
    }
    levels
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::products::{Bond, BondIdType};
    use chrono::NaiveDate;

    fn test_bond() -> Bond {
        Bond::new(
            "OTRUSTR_02Y",
            BondIdType::Cusip,
            "USB02Y",
            0.00375,
            NaiveDate::from_ymd_opt(2024, 12, 31).unwrap(),
        )
    }

    fn book(bids: Vec<(f64, i64)>, offers: Vec<(f64, i64)>) -> OrderBook<Bond> {
        OrderBook::new(
            test_bond(),
            bids.into_iter()
                .map(|(p, q)| Order::new(p, q, Side::Bid))
                .collect(),
            offers
                .into_iter()
                .map(|(p, q)| Order::new(p, q, Side::Offer))
                .collect(),
        )
    }

    #[test]
    fn test_best_prices_require_full_scan() {
        // Best prices are deliberately not at position 0.
        let book = book(
            vec![(99.40, 100), (99.55, 200), (99.50, 300)],
            vec![(99.70, 100), (99.60, 200), (99.65, 300)],
        );
        assert_eq!(book.best_bid().unwrap().price, 99.55);
        assert_eq!(book.best_offer().unwrap().price, 99.60);

        let top = book.best_bid_offer().unwrap();
        assert_eq!(top.bid.quantity, 200);
        assert_eq!(top.offer.quantity, 200);
    }

    #[test]
    fn test_best_price_tie_keeps_first_encountered() {
        let book = book(
            vec![(99.50, 100), (99.50, 200)],
            vec![(99.60, 300), (99.60, 400)],
        );
        assert_eq!(book.best_bid().unwrap().quantity, 100);
        assert_eq!(book.best_offer().unwrap().quantity, 300);
    }

    #[test]
    fn test_empty_stack_yields_none() {
        let book = book(vec![], vec![(99.60, 100)]);
        assert!(book.best_bid().is_none());
        assert!(book.best_offer().is_some());
        assert!(book.best_bid_offer().is_none());

        let empty = book.aggregate_depth();
        assert!(empty.bid_stack().is_empty());
        assert_eq!(empty.offer_stack().len(), 1);
    }

    #[test]
    fn test_aggregate_depth_sums_per_price() {
        let book = book(
            vec![(99.50, 100), (99.40, 50), (99.50, 200), (99.40, 25)],
            vec![(99.60, 10), (99.60, 20), (99.70, 30)],
        );
        let aggregated = book.aggregate_depth();

        // Insertion order of first occurrence, one entry per distinct price.
        assert_eq!(
            aggregated
                .bid_stack()
                .iter()
                .map(|o| (o.price, o.quantity))
                .collect::<Vec<_>>(),
            vec![(99.50, 300), (99.40, 75)]
        );
        assert_eq!(
            aggregated
                .offer_stack()
                .iter()
                .map(|o| (o.price, o.quantity))
                .collect::<Vec<_>>(),
            vec![(99.60, 30), (99.70, 30)]
        );
        assert!(aggregated
            .bid_stack()
            .iter()
            .all(|o| o.side == Side::Bid));
        assert!(aggregated
            .offer_stack()
            .iter()
            .all(|o| o.side == Side::Offer));
    }

    #[test]
    fn test_aggregate_depth_does_not_mutate_snapshot() {
        let book = book(vec![(99.50, 100), (99.50, 200)], vec![(99.60, 10)]);
        let _ = book.aggregate_depth();
        assert_eq!(book.bid_stack().len(), 2);
    }
}
