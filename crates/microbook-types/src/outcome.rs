//! Execution results handed back to callers.
//!
//! A [`Fill`] is one leg of a market order (or one side of a crossing
//! resolution). [`MarketOutcome`] tells a complete fill apart from a
//! partial one; a partial fill is a successful outcome, not an error.

use std::fmt;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::{Direction, OrderId, Side};

/// One executed leg: `amount` traded at the resting order's `price`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Fill {
    pub amount: Decimal,
    pub price: Decimal,
    /// The resting order this leg consumed from.
    pub resting_id: OrderId,
}

impl Fill {
    /// Quote value of this leg (`amount * price`).
    #[must_use]
    pub fn notional(&self) -> Decimal {
        self.amount * self.price
    }
}

impl fmt::Display for Fill {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} @ {}", self.amount, self.price)
    }
}

/// Acknowledgment for an accepted limit order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct LimitAck {
    pub id: OrderId,
    pub side: Side,
    pub amount: Decimal,
    pub price: Decimal,
}

impl fmt::Display for LimitAck {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Order added: {} {} @ {} (id {})",
            self.side, self.amount, self.price, self.id
        )
    }
}

/// Result of a market order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum MarketOutcome {
    /// The whole requested amount executed.
    Filled { direction: Direction, legs: Vec<Fill> },
    /// The opposing side ran dry before the requested amount executed.
    PartiallyFilled {
        direction: Direction,
        executed: Decimal,
        remaining: Decimal,
        legs: Vec<Fill>,
    },
}

impl MarketOutcome {
    #[must_use]
    pub fn legs(&self) -> &[Fill] {
        match self {
            Self::Filled { legs, .. } | Self::PartiallyFilled { legs, .. } => legs,
        }
    }

    #[must_use]
    pub fn direction(&self) -> Direction {
        match self {
            Self::Filled { direction, .. } | Self::PartiallyFilled { direction, .. } => *direction,
        }
    }

    /// Sum of all leg amounts.
    #[must_use]
    pub fn executed(&self) -> Decimal {
        match self {
            Self::Filled { legs, .. } => legs.iter().map(|l| l.amount).sum(),
            Self::PartiallyFilled { executed, .. } => *executed,
        }
    }

    /// Unexecuted remainder; zero when fully filled.
    #[must_use]
    pub fn remaining(&self) -> Decimal {
        match self {
            Self::Filled { .. } => Decimal::ZERO,
            Self::PartiallyFilled { remaining, .. } => *remaining,
        }
    }

    #[must_use]
    pub fn is_filled(&self) -> bool {
        matches!(self, Self::Filled { .. })
    }
}

impl fmt::Display for MarketOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let legs: Vec<String> = self.legs().iter().map(ToString::to_string).collect();
        match self {
            Self::Filled { direction, .. } => write!(
                f,
                "Market {direction} order fully executed. Trades: [{}]",
                legs.join(", ")
            ),
            Self::PartiallyFilled {
                direction,
                executed,
                remaining,
                ..
            } => {
                let side = match direction {
                    Direction::Buy => "asks",
                    Direction::Sell => "bids",
                };
                write!(
                    f,
                    "Partially filled. {executed} executed, {remaining} remaining (no more {side} available)"
                )
            }
        }
    }
}
