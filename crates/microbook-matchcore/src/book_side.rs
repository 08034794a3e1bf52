//! One side of the book.
//!
//! Price levels live in a `BTreeMap` whose key type encodes the side's
//! price ordering, so the best level is always the first entry:
//! - **Bids**: `BTreeMap<Reverse<Decimal>, PriceLevel>` -- highest price first
//! - **Asks**: `BTreeMap<Decimal, PriceLevel>` -- lowest price first
//!
//! Within a level, orders are in id order (see [`PriceLevel`]).

use std::cmp::Reverse;
use std::collections::BTreeMap;
use std::fmt;

use microbook_types::{InvalidOrderReason, MicrobookError, Order, RestingOrder, Result, Side};
use rust_decimal::Decimal;

use crate::price_level::PriceLevel;

/// Map key that orders price levels best-first for one side.
pub trait PriceKey: Ord + Copy + fmt::Debug {
    /// The side whose ordering this key implements.
    const SIDE: Side;

    fn from_price(price: Decimal) -> Self;
}

impl PriceKey for Decimal {
    const SIDE: Side = Side::Ask;

    fn from_price(price: Decimal) -> Self {
        price
    }
}

impl PriceKey for Reverse<Decimal> {
    const SIDE: Side = Side::Bid;

    fn from_price(price: Decimal) -> Self {
        Reverse(price)
    }
}

/// Bid side: highest price first.
pub type BidSide = BookSide<Reverse<Decimal>>;
/// Ask side: lowest price first.
pub type AskSide = BookSide<Decimal>;

/// Ordered multiset of resting orders for one side.
#[derive(Debug, Clone)]
pub struct BookSide<K: PriceKey> {
    levels: BTreeMap<K, PriceLevel>,
    order_count: usize,
}

impl<K: PriceKey> BookSide<K> {
    #[must_use]
    pub fn new() -> Self {
        Self {
            levels: BTreeMap::new(),
            order_count: 0,
        }
    }

    #[must_use]
    pub fn side(&self) -> Side {
        K::SIDE
    }

    // =================================================================
    // Mutation
    // =================================================================

    /// Insert an order at the position given by (price, id).
    ///
    /// # Errors
    /// - `Internal` if the order belongs to the other side
    /// - `InvalidOrder(NonPositiveAmount)` if the order has nothing left
    pub fn insert(&mut self, order: Order) -> Result<()> {
        if order.side != K::SIDE {
            return Err(MicrobookError::Internal(format!(
                "order {} is a {} but this is the {} side",
                order.id,
                order.side,
                K::SIDE
            )));
        }
        if order.is_exhausted() {
            return Err(InvalidOrderReason::NonPositiveAmount.into());
        }
        self.levels
            .entry(K::from_price(order.price))
            .or_insert_with(|| PriceLevel::new(order.price))
            .insert(order);
        self.order_count += 1;
        Ok(())
    }

    /// Remove and return the best order, dropping its level if emptied.
    pub fn pop_best(&mut self) -> Option<Order> {
        let mut entry = self.levels.first_entry()?;
        let order = entry.get_mut().pop_front();
        if entry.get().is_empty() {
            entry.remove();
        }
        if order.is_some() {
            self.order_count -= 1;
        }
        order
    }

    /// Replace the best order with a copy holding `amount` remaining.
    ///
    /// The replacement keeps the id and price, so it stays at the front.
    /// A non-positive `amount` removes the order instead: nothing with a
    /// zero balance is ever left in the book. Returns the previous value.
    pub fn replace_best(&mut self, amount: Decimal) -> Option<Order> {
        if amount <= Decimal::ZERO {
            return self.pop_best();
        }
        let mut entry = self.levels.first_entry()?;
        let level = entry.get_mut();
        let replacement = level.front()?.with_amount(amount);
        level.replace_front(replacement)
    }

    // =================================================================
    // Queries
    // =================================================================

    /// Highest-priority order, if any.
    #[must_use]
    pub fn best(&self) -> Option<&Order> {
        self.levels.values().next()?.front()
    }

    /// Best price, if any.
    #[must_use]
    pub fn best_price(&self) -> Option<Decimal> {
        self.levels.values().next().map(|level| level.price)
    }

    /// All orders in priority order (best first).
    pub fn iter(&self) -> impl Iterator<Item = &Order> {
        self.levels.values().flat_map(PriceLevel::iter)
    }

    /// `(amount, price, id)` views in priority order.
    #[must_use]
    pub fn resting(&self) -> Vec<RestingOrder> {
        self.iter().map(RestingOrder::from).collect()
    }

    /// Total open amount on this side.
    #[must_use]
    pub fn total_amount(&self) -> Decimal {
        self.levels.values().map(PriceLevel::total_amount).sum()
    }

    /// Number of resting orders.
    #[must_use]
    pub fn len(&self) -> usize {
        self.order_count
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.order_count == 0
    }

    /// Number of distinct price levels.
    #[must_use]
    pub fn depth(&self) -> usize {
        self.levels.len()
    }
}

impl<K: PriceKey> Default for BookSide<K> {
    fn default() -> Self {
        Self::new()
    }
}
