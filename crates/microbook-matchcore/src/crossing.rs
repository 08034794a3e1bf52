//! Crossing resolution: one step of the continuous matching loop.
//!
//! When `best_bid.price >= best_ask.price`, exactly one pair is resolved:
//!
//! | amounts            | effect                                      |
//! |--------------------|---------------------------------------------|
//! | `bid > ask`        | ask removed, bid shrunk by `ask.amount`     |
//! | `ask > bid`        | bid removed, ask shrunk by `bid.amount`     |
//! | `bid == ask`       | both removed                                |
//!
//! Shrunk orders keep their id and price, so their book position holds.

use std::fmt;

use microbook_types::RestingOrder;
use rust_decimal::Decimal;

use crate::OrderBook;

/// Which resting orders a resolution fully consumed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CrossKind {
    /// The ask was consumed; the bid keeps `bid.amount - ask.amount`.
    AskFilled,
    /// The bid was consumed; the ask keeps `ask.amount - bid.amount`.
    BidFilled,
    /// Equal amounts; both consumed.
    BothFilled,
}

/// One resolved bid/ask pair. `bid` and `ask` are the orders as they
/// stood right before the resolution.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CrossResolution {
    pub bid: RestingOrder,
    pub ask: RestingOrder,
    pub kind: CrossKind,
}

impl CrossResolution {
    /// Amount exchanged between the two orders.
    #[must_use]
    pub fn matched(&self) -> Decimal {
        self.bid.amount.min(self.ask.amount)
    }

    /// Orders fully consumed, bid before ask.
    #[must_use]
    pub fn filled(&self) -> Vec<RestingOrder> {
        match self.kind {
            CrossKind::AskFilled => vec![self.ask],
            CrossKind::BidFilled => vec![self.bid],
            CrossKind::BothFilled => vec![self.bid, self.ask],
        }
    }
}

impl fmt::Display for CrossResolution {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "bid #{} @ {} x ask #{} @ {} for {}",
            self.bid.id,
            self.bid.price,
            self.ask.id,
            self.ask.price,
            self.matched()
        )
    }
}

/// Result of one matching pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CrossStatus {
    /// Either side empty or `best_bid < best_ask`. Nothing changed.
    Idle,
    /// One pair was resolved; the book may still be crossed.
    Matched(CrossResolution),
}

impl CrossStatus {
    #[must_use]
    pub fn is_idle(&self) -> bool {
        matches!(self, Self::Idle)
    }
}

/// Resolve at most one crossed pair at the top of the book.
pub fn resolve_cross(book: &mut OrderBook) -> CrossStatus {
    let (Some(best_bid), Some(best_ask)) = (book.best_bid(), book.best_ask()) else {
        return CrossStatus::Idle;
    };
    if best_bid.price < best_ask.price {
        return CrossStatus::Idle;
    }

    let bid = RestingOrder::from(best_bid);
    let ask = RestingOrder::from(best_ask);

    let kind = match bid.amount.cmp(&ask.amount) {
        std::cmp::Ordering::Greater => {
            book.asks_mut().pop_best();
            book.bids_mut().replace_best(bid.amount - ask.amount);
            CrossKind::AskFilled
        }
        std::cmp::Ordering::Less => {
            book.bids_mut().pop_best();
            book.asks_mut().replace_best(ask.amount - bid.amount);
            CrossKind::BidFilled
        }
        std::cmp::Ordering::Equal => {
            book.bids_mut().pop_best();
            book.asks_mut().pop_best();
            CrossKind::BothFilled
        }
    };

    let resolution = CrossResolution { bid, ask, kind };
    tracing::debug!(
        bid = %bid.id,
        ask = %ask.id,
        matched = %resolution.matched(),
        kind = ?kind,
        "Crossed pair resolved"
    );
    CrossStatus::Matched(resolution)
}

#[cfg(test)]
mod tests {
    use microbook_types::*;
    use rand::rngs::StdRng;
    use rand::{Rng, SeedableRng};
    use rust_decimal::Decimal;

    use super::*;

    fn dec(n: i64) -> Decimal {
        Decimal::new(n, 0)
    }

    fn book_with(orders: &[(u64, Side, i64, i64)]) -> OrderBook {
        let mut book = OrderBook::new();
        for &(id, side, price, amount) in orders {
            book.insert_order(Order::dummy(id, side, dec(price), dec(amount)))
                .unwrap();
        }
        book
    }

    fn drain(book: &mut OrderBook) -> Vec<CrossResolution> {
        let mut out = Vec::new();
        while let CrossStatus::Matched(r) = resolve_cross(book) {
            out.push(r);
        }
        out
    }

    #[test]
    fn uncrossed_book_is_idle() {
        let mut book = book_with(&[(1, Side::Bid, 50, 100), (2, Side::Ask, 52, 75)]);
        assert!(resolve_cross(&mut book).is_idle());
        assert_eq!(book.order_count(), 2);
    }

    #[test]
    fn one_sided_book_is_idle() {
        let mut book = book_with(&[(1, Side::Bid, 50, 100)]);
        assert!(resolve_cross(&mut book).is_idle());
        assert!(resolve_cross(&mut OrderBook::new()).is_idle());
    }

    #[test]
    fn equal_amounts_remove_both() {
        let mut book = book_with(&[(1, Side::Bid, 55, 10), (2, Side::Ask, 50, 10)]);
        let CrossStatus::Matched(r) = resolve_cross(&mut book) else {
            panic!("expected a match");
        };
        assert_eq!(r.kind, CrossKind::BothFilled);
        assert_eq!(r.filled().len(), 2);
        assert_eq!(r.filled()[0].id, OrderId(1));
        assert!(book.is_empty());
    }

    #[test]
    fn larger_bid_absorbs_ask() {
        let mut book = book_with(&[(1, Side::Bid, 55, 15), (2, Side::Ask, 50, 10)]);
        let CrossStatus::Matched(r) = resolve_cross(&mut book) else {
            panic!("expected a match");
        };
        assert_eq!(r.kind, CrossKind::AskFilled);
        assert_eq!(r.matched(), dec(10));
        assert_eq!(r.filled(), vec![r.ask]);
        let bid = book.best_bid().unwrap();
        assert_eq!((bid.id, bid.amount, bid.price), (OrderId(1), dec(5), dec(55)));
        assert!(book.asks().is_empty());
    }

    #[test]
    fn larger_ask_absorbs_bid() {
        let mut book = book_with(&[(1, Side::Bid, 50, 4), (2, Side::Ask, 50, 10)]);
        let CrossStatus::Matched(r) = resolve_cross(&mut book) else {
            panic!("expected a match");
        };
        assert_eq!(r.kind, CrossKind::BidFilled);
        assert_eq!(book.best_ask().unwrap().amount, dec(6));
        assert!(book.bids().is_empty());
    }

    #[test]
    fn shrunk_order_keeps_front_of_level() {
        let mut book = book_with(&[
            (1, Side::Bid, 55, 15),
            (2, Side::Bid, 55, 8),
            (3, Side::Ask, 50, 10),
        ]);
        resolve_cross(&mut book);
        let ids: Vec<u64> = book.bids().iter().map(|o| o.id.get()).collect();
        assert_eq!(ids, vec![1, 2]);
    }

    #[test]
    fn one_pair_per_step() {
        let mut book = book_with(&[
            (1, Side::Bid, 60, 5),
            (2, Side::Ask, 50, 1),
            (3, Side::Ask, 51, 1),
        ]);
        assert!(!resolve_cross(&mut book).is_idle());
        assert_eq!(book.asks().len(), 1);
        assert!(book.is_crossed());
        let steps = drain(&mut book);
        assert_eq!(steps.len(), 1);
        assert!(!book.is_crossed());
    }

    #[test]
    fn random_books_drain_to_uncrossed() {
        let mut rng = StdRng::seed_from_u64(42);
        for _ in 0..200 {
            let mut book = OrderBook::new();
            for id in 1..=rng.gen_range(1..40u64) {
                let (side, price) = if rng.gen_bool(0.5) {
                    (Side::Bid, rng.gen_range(1..=12))
                } else {
                    (Side::Ask, rng.gen_range(8..=20))
                };
                book.insert_order(Order::dummy(id, side, dec(price), dec(rng.gen_range(1..=10))))
                    .unwrap();
            }
            let bid_total = book.bids().total_amount();
            let ask_total = book.asks().total_amount();

            let steps = drain(&mut book);

            assert!(!book.is_crossed());
            book.check_invariants().unwrap();
            let matched: Decimal = steps.iter().map(CrossResolution::matched).sum();
            assert_eq!(bid_total - book.bids().total_amount(), matched);
            assert_eq!(ask_total - book.asks().total_amount(), matched);
        }
    }
}
