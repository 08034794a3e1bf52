//! Order types for the MicroBook matching engine.
//!
//! A resting [`Order`] is an immutable value. When a fill consumes part of
//! it, the book swaps in a fresh value built with [`Order::with_amount`]:
//! same id, same price, same side, so its place in the book is unchanged.
//! Market orders never rest and carry no price; they are [`MarketOrder`]s.

use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::{InvalidOrderReason, MicrobookError, OrderId, Result};

/// Which side of the book a limit order rests on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Ord, PartialOrd, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Side {
    Bid,
    Ask,
}

impl Side {
    /// Compare two `(price, id)` keys by this side's priority.
    ///
    /// `Ordering::Less` means `a` is matched before `b`. Bids: price
    /// descending. Asks: price ascending. Ties go to the smaller id.
    #[must_use]
    pub fn priority(self, a: (Decimal, OrderId), b: (Decimal, OrderId)) -> Ordering {
        let by_price = match self {
            Self::Bid => b.0.cmp(&a.0),
            Self::Ask => a.0.cmp(&b.0),
        };
        by_price.then(a.1.cmp(&b.1))
    }
}

impl fmt::Display for Side {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Bid => write!(f, "bid"),
            Self::Ask => write!(f, "ask"),
        }
    }
}

impl FromStr for Side {
    type Err = MicrobookError;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "bid" => Ok(Self::Bid),
            "ask" => Ok(Self::Ask),
            other => Err(InvalidOrderReason::InvalidSide {
                value: other.to_string(),
            }
            .into()),
        }
    }
}

/// Direction of a market order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Ord, PartialOrd, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    Buy,
    Sell,
}

impl Direction {
    /// The book side this direction takes liquidity from.
    #[must_use]
    pub fn consumes(self) -> Side {
        match self {
            Self::Buy => Side::Ask,
            Self::Sell => Side::Bid,
        }
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Buy => write!(f, "buy"),
            Self::Sell => write!(f, "sell"),
        }
    }
}

impl FromStr for Direction {
    type Err = MicrobookError;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "buy" => Ok(Self::Buy),
            "sell" => Ok(Self::Sell),
            other => Err(InvalidOrderReason::InvalidDirection {
                value: other.to_string(),
            }
            .into()),
        }
    }
}

/// Validated terms of a limit order, before an id is assigned.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct LimitOrder {
    pub amount: Decimal,
    pub price: Decimal,
    pub side: Side,
}

impl LimitOrder {
    /// # Errors
    /// `NonPositiveAmount` or `NonPositivePrice`, checked in that order.
    pub fn new(amount: Decimal, price: Decimal, side: Side) -> Result<Self> {
        if amount <= Decimal::ZERO {
            return Err(InvalidOrderReason::NonPositiveAmount.into());
        }
        if price <= Decimal::ZERO {
            return Err(InvalidOrderReason::NonPositivePrice.into());
        }
        Ok(Self {
            amount,
            price,
            side,
        })
    }
}

/// Validated market order. Zero amount is allowed and executes nothing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct MarketOrder {
    pub amount: Decimal,
    pub direction: Direction,
}

impl MarketOrder {
    /// # Errors
    /// `NegativeAmount` when `amount < 0`.
    pub fn new(amount: Decimal, direction: Direction) -> Result<Self> {
        if amount < Decimal::ZERO {
            return Err(InvalidOrderReason::NegativeAmount.into());
        }
        Ok(Self { amount, direction })
    }
}

/// A limit order resting in the book.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Order {
    pub id: OrderId,
    pub side: Side,
    pub price: Decimal,
    /// Remaining open amount. Always `> 0` while the order is in the book.
    pub amount: Decimal,
    pub created_at: DateTime<Utc>,
}

impl Order {
    #[must_use]
    pub fn new(id: OrderId, terms: LimitOrder) -> Self {
        Self {
            id,
            side: terms.side,
            price: terms.price,
            amount: terms.amount,
            created_at: Utc::now(),
        }
    }

    /// Replacement value with a new remaining amount; identity and price
    /// are preserved.
    #[must_use]
    pub fn with_amount(&self, amount: Decimal) -> Self {
        Self {
            amount,
            ..self.clone()
        }
    }

    /// Book priority relative to another order on the same side.
    #[must_use]
    pub fn priority_cmp(&self, other: &Self) -> Ordering {
        self.side
            .priority((self.price, self.id), (other.price, other.id))
    }

    #[must_use]
    pub fn is_exhausted(&self) -> bool {
        self.amount <= Decimal::ZERO
    }
}

impl fmt::Display for Order {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {}, {})", self.amount, self.price, self.id)
    }
}

/// Test helpers.
#[cfg(any(test, feature = "test-helpers"))]
impl Order {
    pub fn dummy(id: u64, side: Side, price: Decimal, amount: Decimal) -> Self {
        Self::new(
            OrderId(id),
            LimitOrder {
                amount,
                price,
                side,
            },
        )
    }
}
