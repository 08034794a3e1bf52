//! # microbook-matchcore
//!
//! **Price-time priority book logic for MicroBook.**
//!
//! Everything here is single-threaded and lock-free by construction: the
//! caller (the engine) owns an [`OrderBook`] behind its own exclusion
//! domain and calls these functions while holding it.
//!
//! - [`PriceLevel`]: FIFO queue of orders at one price
//! - [`BookSide`]: price levels ordered by a side-specific key
//! - [`OrderBook`]: both sides together
//! - [`execute_market`]: walk the opposing side for a market order
//! - [`resolve_cross`]: resolve one crossed bid/ask pair

pub mod book_side;
pub mod crossing;
pub mod market;
pub mod orderbook;
pub mod price_level;

pub use book_side::{AskSide, BidSide, BookSide, PriceKey};
pub use crossing::{CrossKind, CrossResolution, CrossStatus, resolve_cross};
pub use market::execute_market;
pub use orderbook::OrderBook;
pub use price_level::PriceLevel;
