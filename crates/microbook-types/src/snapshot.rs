//! Point-in-time views of the book.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::{Order, OrderId};

/// `(amount, price, id)` view of one resting order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct RestingOrder {
    pub amount: Decimal,
    pub price: Decimal,
    pub id: OrderId,
}

impl From<&Order> for RestingOrder {
    fn from(order: &Order) -> Self {
        Self {
            amount: order.amount,
            price: order.price,
            id: order.id,
        }
    }
}

/// Both sides of the book in priority order (best first).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BookSnapshot {
    pub bids: Vec<RestingOrder>,
    pub asks: Vec<RestingOrder>,
}

impl BookSnapshot {
    #[must_use]
    pub fn best_bid(&self) -> Option<&RestingOrder> {
        self.bids.first()
    }

    #[must_use]
    pub fn best_ask(&self) -> Option<&RestingOrder> {
        self.asks.first()
    }

    /// `best_ask - best_bid`, or `None` if either side is empty.
    #[must_use]
    pub fn spread(&self) -> Option<Decimal> {
        Some(self.best_ask()?.price - self.best_bid()?.price)
    }

    /// `true` when both sides are non-empty and `best_bid >= best_ask`.
    #[must_use]
    pub fn is_crossed(&self) -> bool {
        matches!(
            (self.best_bid(), self.best_ask()),
            (Some(bid), Some(ask)) if bid.price >= ask.price
        )
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.bids.is_empty() && self.asks.is_empty()
    }

    /// Total open amount on the bid side.
    #[must_use]
    pub fn bid_volume(&self) -> Decimal {
        self.bids.iter().map(|o| o.amount).sum()
    }

    /// Total open amount on the ask side.
    #[must_use]
    pub fn ask_volume(&self) -> Decimal {
        self.asks.iter().map(|o| o.amount).sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn resting(amount: i64, price: i64, id: u64) -> RestingOrder {
        RestingOrder {
            amount: Decimal::new(amount, 0),
            price: Decimal::new(price, 0),
            id: OrderId(id),
        }
    }

    #[test]
    fn empty_snapshot() {
        let snap = BookSnapshot::default();
        assert!(snap.is_empty());
        assert!(!snap.is_crossed());
        assert!(snap.spread().is_none());
    }

    #[test]
    fn crossed_detection_and_spread() {
        let snap = BookSnapshot {
            bids: vec![resting(100, 50, 1)],
            asks: vec![resting(75, 52, 2)],
        };
        assert!(!snap.is_crossed());
        assert_eq!(snap.spread(), Some(Decimal::new(2, 0)));

        let crossed = BookSnapshot {
            bids: vec![resting(10, 55, 1)],
            asks: vec![resting(10, 50, 2)],
        };
        assert!(crossed.is_crossed());
    }

    #[test]
    fn volumes() {
        let snap = BookSnapshot {
            bids: vec![resting(3, 10, 1), resting(4, 9, 2)],
            asks: vec![resting(5, 11, 3)],
        };
        assert_eq!(snap.bid_volume(), Decimal::new(7, 0));
        assert_eq!(snap.ask_volume(), Decimal::new(5, 0));
    }
}
