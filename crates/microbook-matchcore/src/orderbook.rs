//! The order book for the single instrument.
//!
//! Holds both [`BookSide`]s. The book itself never matches anything:
//! inserting a limit order that crosses the spread leaves the book
//! crossed until [`crate::resolve_cross`] is run against it.

use microbook_types::{BookSnapshot, Order, Result, Side};
use rust_decimal::Decimal;

use crate::book_side::{AskSide, BidSide};

/// Bid and ask sides together.
#[derive(Debug, Clone, Default)]
pub struct OrderBook {
    bids: BidSide,
    asks: AskSide,
}

impl OrderBook {
    /// Create a new empty order book.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    // =================================================================
    // Insertion
    // =================================================================

    /// Insert a limit order on its own side.
    pub fn insert_order(&mut self, order: Order) -> Result<()> {
        match order.side {
            Side::Bid => self.bids.insert(order),
            Side::Ask => self.asks.insert(order),
        }
    }

    // =================================================================
    // Queries
    // =================================================================

    /// Best (highest) bid, or `None` if no bids.
    #[must_use]
    pub fn best_bid(&self) -> Option<&Order> {
        self.bids.best()
    }

    /// Best (lowest) ask, or `None` if no asks.
    #[must_use]
    pub fn best_ask(&self) -> Option<&Order> {
        self.asks.best()
    }

    /// Spread = best_ask - best_bid. `None` if either side is empty.
    #[must_use]
    pub fn spread(&self) -> Option<Decimal> {
        Some(self.asks.best_price()? - self.bids.best_price()?)
    }

    /// Mid price = (best_bid + best_ask) / 2. `None` if either side is empty.
    #[must_use]
    pub fn mid_price(&self) -> Option<Decimal> {
        Some((self.bids.best_price()? + self.asks.best_price()?) / Decimal::TWO)
    }

    /// `true` when both sides are non-empty and `best_bid >= best_ask`.
    #[must_use]
    pub fn is_crossed(&self) -> bool {
        matches!(
            (self.bids.best_price(), self.asks.best_price()),
            (Some(bid), Some(ask)) if bid >= ask
        )
    }

    /// Total number of orders currently in the book.
    #[must_use]
    pub fn order_count(&self) -> usize {
        self.bids.len() + self.asks.len()
    }

    /// Returns `true` if the book has no orders on either side.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.bids.is_empty() && self.asks.is_empty()
    }

    #[must_use]
    pub fn bids(&self) -> &BidSide {
        &self.bids
    }

    #[must_use]
    pub fn asks(&self) -> &AskSide {
        &self.asks
    }

    /// Mutable access to the bid side (for the matcher).
    pub fn bids_mut(&mut self) -> &mut BidSide {
        &mut self.bids
    }

    /// Mutable access to the ask side (for the matcher).
    pub fn asks_mut(&mut self) -> &mut AskSide {
        &mut self.asks
    }

    /// Both sides as `(amount, price, id)` lists, best first.
    #[must_use]
    pub fn snapshot(&self) -> BookSnapshot {
        BookSnapshot {
            bids: self.bids.resting(),
            asks: self.asks.resting(),
        }
    }

    // =================================================================
    // Invariants
    // =================================================================

    /// Check the structural invariants: every order positive and on the
    /// right side, each side sorted by its priority key.
    ///
    /// Returns a description of the first violation found.
    pub fn check_invariants(&self) -> std::result::Result<(), String> {
        check_side(self.bids.side(), self.bids.iter())?;
        check_side(self.asks.side(), self.asks.iter())
    }
}

fn check_side<'a>(
    side: Side,
    orders: impl Iterator<Item = &'a Order>,
) -> std::result::Result<(), String> {
    let mut previous: Option<&Order> = None;
    for order in orders {
        if order.amount <= Decimal::ZERO {
            return Err(format!("{side} order {order} has non-positive amount"));
        }
        if order.side != side {
            return Err(format!("{} order {order} found on {side} side", order.side));
        }
        if let Some(prev) = previous {
            if prev.priority_cmp(order).is_ge() {
                return Err(format!("{side} side out of order: {prev} before {order}"));
            }
        }
        previous = Some(order);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use microbook_types::*;
    use rust_decimal::Decimal;

    use super::*;

    fn dec(n: i64) -> Decimal {
        Decimal::new(n, 0)
    }

    #[test]
    fn insert_and_query_best_bid_ask() {
        let mut book = OrderBook::new();

        book.insert_order(Order::dummy(1, Side::Bid, dec(100), Decimal::ONE))
            .unwrap();
        book.insert_order(Order::dummy(2, Side::Bid, dec(99), Decimal::ONE))
            .unwrap();
        book.insert_order(Order::dummy(3, Side::Ask, dec(101), Decimal::ONE))
            .unwrap();
        book.insert_order(Order::dummy(4, Side::Ask, dec(102), Decimal::ONE))
            .unwrap();

        assert_eq!(book.best_bid().unwrap().price, dec(100));
        assert_eq!(book.best_ask().unwrap().price, dec(101));
        assert_eq!(book.spread(), Some(Decimal::ONE));
        assert_eq!(book.mid_price(), Some(Decimal::new(1005, 1)));
        assert_eq!(book.order_count(), 4);
        assert!(!book.is_crossed());
        book.check_invariants().unwrap();
    }

    #[test]
    fn crossing_insert_is_left_resting() {
        let mut book = OrderBook::new();
        book.insert_order(Order::dummy(1, Side::Bid, dec(55), dec(10)))
            .unwrap();
        book.insert_order(Order::dummy(2, Side::Ask, dec(50), dec(10)))
            .unwrap();
        assert!(book.is_crossed());
        assert_eq!(book.order_count(), 2);
    }

    #[test]
    fn equal_prices_are_crossed() {
        let mut book = OrderBook::new();
        book.insert_order(Order::dummy(1, Side::Bid, dec(50), dec(1)))
            .unwrap();
        book.insert_order(Order::dummy(2, Side::Ask, dec(50), dec(1)))
            .unwrap();
        assert!(book.is_crossed());
        assert_eq!(book.spread(), Some(Decimal::ZERO));
    }

    #[test]
    fn empty_book_queries() {
        let book = OrderBook::new();
        assert!(book.is_empty());
        assert!(book.best_bid().is_none());
        assert!(book.spread().is_none());
        assert!(book.mid_price().is_none());
        assert!(!book.is_crossed());
        assert_eq!(book.snapshot(), BookSnapshot::default());
    }

    #[test]
    fn snapshot_lists_best_first() {
        let mut book = OrderBook::new();
        book.insert_order(Order::dummy(1, Side::Bid, dec(10), dec(30)))
            .unwrap();
        book.insert_order(Order::dummy(2, Side::Bid, dec(10), dec(20)))
            .unwrap();
        book.insert_order(Order::dummy(3, Side::Bid, dec(11), dec(5)))
            .unwrap();
        book.insert_order(Order::dummy(4, Side::Ask, dec(13), dec(7)))
            .unwrap();
        book.insert_order(Order::dummy(5, Side::Ask, dec(12), dec(8)))
            .unwrap();

        let snap = book.snapshot();
        let bid_ids: Vec<u64> = snap.bids.iter().map(|o| o.id.get()).collect();
        let ask_ids: Vec<u64> = snap.asks.iter().map(|o| o.id.get()).collect();
        assert_eq!(bid_ids, vec![3, 1, 2]);
        assert_eq!(ask_ids, vec![5, 4]);
    }

    #[test]
    fn snapshot_is_idempotent() {
        let mut book = OrderBook::new();
        book.insert_order(Order::dummy(1, Side::Bid, dec(10), dec(3)))
            .unwrap();
        book.insert_order(Order::dummy(2, Side::Ask, dec(12), dec(4)))
            .unwrap();
        assert_eq!(book.snapshot(), book.snapshot());
    }
}
