//! Market order execution.
//!
//! A market order walks the opposing side best-first, trading at each
//! resting order's price, until it is exhausted or the side runs dry:
//!
//! ```text
//! while remaining > 0 and opposing side non-empty:
//!     best = opposing.best()
//!     remaining >= best.amount  -> consume best entirely
//!     remaining <  best.amount  -> shrink best in place, remaining = 0
//! ```
//!
//! Invariant: `sum(leg amounts) + remaining == requested amount`.

use microbook_types::{Fill, MarketOrder, MarketOutcome, Side};
use rust_decimal::Decimal;

use crate::OrderBook;
use crate::book_side::{BookSide, PriceKey};

/// Execute `order` against `book`, mutating the opposing side.
///
/// A zero amount executes nothing and is reported as
/// [`MarketOutcome::Filled`] with no legs.
pub fn execute_market(book: &mut OrderBook, order: MarketOrder) -> MarketOutcome {
    let (legs, remaining) = match order.direction.consumes() {
        Side::Ask => walk(book.asks_mut(), order.amount),
        Side::Bid => walk(book.bids_mut(), order.amount),
    };

    if remaining > Decimal::ZERO {
        let executed = order.amount - remaining;
        tracing::debug!(
            direction = %order.direction,
            %executed,
            %remaining,
            legs = legs.len(),
            "Market order partially filled"
        );
        MarketOutcome::PartiallyFilled {
            direction: order.direction,
            executed,
            remaining,
            legs,
        }
    } else {
        tracing::debug!(
            direction = %order.direction,
            amount = %order.amount,
            legs = legs.len(),
            "Market order filled"
        );
        MarketOutcome::Filled {
            direction: order.direction,
            legs,
        }
    }
}

fn walk<K: PriceKey>(side: &mut BookSide<K>, amount: Decimal) -> (Vec<Fill>, Decimal) {
    let mut legs = Vec::new();
    let mut remaining = amount;

    while remaining > Decimal::ZERO {
        let Some(best) = side.best() else {
            break;
        };
        let (resting_id, price, resting) = (best.id, best.price, best.amount);

        if remaining >= resting {
            side.pop_best();
            legs.push(Fill {
                amount: resting,
                price,
                resting_id,
            });
            remaining -= resting;
        } else {
            side.replace_best(resting - remaining);
            legs.push(Fill {
                amount: remaining,
                price,
                resting_id,
            });
            remaining = Decimal::ZERO;
        }
    }

    (legs, remaining)
}
