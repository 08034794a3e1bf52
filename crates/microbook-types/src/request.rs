//! Loosely-typed order requests as they arrive from a transport.
//!
//! Field names follow the wire payloads: `amount`, `price` and `type`
//! (`"bid"`/`"ask"` for limit orders, `"buy"`/`"sell"` for market orders).
//! Every field is optional so that a missing one can be reported as
//! [`InvalidOrderReason::MissingParameter`] instead of a parse failure.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::{Direction, InvalidOrderReason, LimitOrder, MarketOrder, Result, Side};

/// Raw limit order submission.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LimitOrderRequest {
    pub amount: Option<Decimal>,
    pub price: Option<Decimal>,
    #[serde(rename = "type")]
    pub side: Option<String>,
}

impl LimitOrderRequest {
    #[must_use]
    pub fn new(amount: Decimal, price: Decimal, side: impl Into<String>) -> Self {
        Self {
            amount: Some(amount),
            price: Some(price),
            side: Some(side.into()),
        }
    }

    /// Presence is checked for all fields first, then amount, price and
    /// side in that order.
    pub fn validate(&self) -> Result<LimitOrder> {
        let amount = self.amount.ok_or(missing("amount"))?;
        let price = self.price.ok_or(missing("price"))?;
        let side = self.side.as_deref().ok_or(missing("type"))?;

        if amount <= Decimal::ZERO {
            return Err(InvalidOrderReason::NonPositiveAmount.into());
        }
        if price <= Decimal::ZERO {
            return Err(InvalidOrderReason::NonPositivePrice.into());
        }
        let side: Side = side.parse()?;
        LimitOrder::new(amount, price, side)
    }
}

/// Raw market order submission.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MarketOrderRequest {
    pub amount: Option<Decimal>,
    #[serde(rename = "type")]
    pub direction: Option<String>,
}

impl MarketOrderRequest {
    #[must_use]
    pub fn new(amount: Decimal, direction: impl Into<String>) -> Self {
        Self {
            amount: Some(amount),
            direction: Some(direction.into()),
        }
    }

    pub fn validate(&self) -> Result<MarketOrder> {
        let amount = self.amount.ok_or(missing("amount"))?;
        let direction = self.direction.as_deref().ok_or(missing("type"))?;

        if amount < Decimal::ZERO {
            return Err(InvalidOrderReason::NegativeAmount.into());
        }
        let direction: Direction = direction.parse()?;
        MarketOrder::new(amount, direction)
    }
}

fn missing(field: &'static str) -> InvalidOrderReason {
    InvalidOrderReason::MissingParameter { field }
}
