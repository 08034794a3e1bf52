//! A single price level in the order book.
//!
//! Orders at the same price are stored in FIFO order (time priority)
//! using a [`VecDeque`].

use std::collections::VecDeque;

use microbook_types::Order;
use rust_decimal::Decimal;

/// A single price level containing all orders at that price.
///
/// Orders are kept sorted by id -- the front of the deque has the
/// smallest id, i.e. the highest time priority, and is filled first.
#[derive(Debug, Clone)]
pub struct PriceLevel {
    /// The price at this level.
    pub price: Decimal,
    orders: VecDeque<Order>,
}

impl PriceLevel {
    /// Create a new empty price level.
    #[must_use]
    pub fn new(price: Decimal) -> Self {
        Self {
            price,
            orders: VecDeque::new(),
        }
    }

    /// Add an order at its time-priority position.
    ///
    /// Ids normally arrive in increasing order, so this is a `push_back`;
    /// an older id is slotted in front of newer ones.
    pub fn insert(&mut self, order: Order) {
        match self.orders.back() {
            Some(last) if last.id > order.id => {
                let pos = self.orders.partition_point(|o| o.id < order.id);
                self.orders.insert(pos, order);
            }
            _ => self.orders.push_back(order),
        }
    }

    /// Remove and return the front (oldest / highest priority) order.
    pub fn pop_front(&mut self) -> Option<Order> {
        self.orders.pop_front()
    }

    /// Peek at the front order without removing it.
    #[must_use]
    pub fn front(&self) -> Option<&Order> {
        self.orders.front()
    }

    /// Swap the front order for `replacement` in place.
    ///
    /// Returns the previous value. The caller guarantees `replacement`
    /// carries the same id as the front order.
    pub fn replace_front(&mut self, replacement: Order) -> Option<Order> {
        let slot = self.orders.front_mut()?;
        debug_assert_eq!(slot.id, replacement.id);
        Some(std::mem::replace(slot, replacement))
    }

    /// Total remaining amount across all orders at this level.
    #[must_use]
    pub fn total_amount(&self) -> Decimal {
        self.orders.iter().map(|o| o.amount).sum()
    }

    /// Orders in time-priority order.
    pub fn iter(&self) -> impl Iterator<Item = &Order> {
        self.orders.iter()
    }

    /// Returns `true` if there are no orders at this level.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.orders.is_empty()
    }

    /// Number of orders at this level.
    #[must_use]
    pub fn len(&self) -> usize {
        self.orders.len()
    }
}
