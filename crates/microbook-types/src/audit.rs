//! Audit trail events.
//!
//! The engine appends one [`AuditEntry`] per book addition and per fill,
//! inside the same critical section as the book mutation. Observers read
//! them back as rendered strings.

use std::fmt;

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::{Direction, OrderId, RestingOrder, Side, constants};

/// What happened.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum AuditEvent {
    /// A limit order was accepted into the book.
    OrderAdded {
        id: OrderId,
        side: Side,
        amount: Decimal,
        price: Decimal,
    },
    /// The matching loop fully consumed a resting order. `order` is the
    /// value as it stood right before the fill.
    OrderFilled { order: RestingOrder },
    /// One leg of a market order.
    MarketExecuted {
        direction: Direction,
        amount: Decimal,
        price: Decimal,
        resting_id: OrderId,
    },
}

impl fmt::Display for AuditEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::OrderAdded {
                side,
                amount,
                price,
                ..
            } => write!(f, "{side} added for {amount} token at {price} price"),
            Self::OrderFilled { order } => write!(
                f,
                "order ({}, {}, {}) got filled.",
                order.amount, order.price, order.id
            ),
            Self::MarketExecuted {
                direction,
                amount,
                price,
                ..
            } => write!(f, "Market {direction} executed: {amount} @ {price}"),
        }
    }
}

/// A timestamped [`AuditEvent`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuditEntry {
    pub at: DateTime<Utc>,
    pub event: AuditEvent,
}

impl AuditEntry {
    #[must_use]
    pub fn now(event: AuditEvent) -> Self {
        Self {
            at: Utc::now(),
            event,
        }
    }
}

impl fmt::Display for AuditEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} {}",
            self.at.format(constants::AUDIT_TIMESTAMP_FORMAT),
            self.event
        )
    }
}

/// Order in which `recent_log` returns entries.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LogOrder {
    #[default]
    OldestFirst,
    NewestFirst,
}
