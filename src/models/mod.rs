//! Data models for the Alpaca API.
//!
//! This module contains the strongly-typed records produced from API
//! responses and the request types sent to it. Models are organized by
//! domain:
//!
//! - [`primitives`] - Core types like `OrderId`, `Symbol`, `Environment`
//! - [`enums`] - Enumeration types for order types, statuses, etc.
//! - [`mapper`] - The [`Entity`] trait mapping raw JSON into models
//! - [`timestamp`] - Wire format for UTC timestamps
//! - [`timeframe`] - Bar aggregation timeframes
//! - [`account`] - Account, configuration and portfolio history
//! - [`order`] - Orders and order requests
//! - [`position`] - Open positions
//! - [`asset`] - Tradable assets
//! - [`market_data`] - Bars, trades, quotes and snapshots
//! - [`activity`] - Account activities
//! - [`calendar`] - Market clock and calendar
//! - [`watchlist`] - Watchlists

pub mod primitives;
pub mod enums;
pub mod mapper;
pub mod timestamp;
pub mod timeframe;
pub mod account;
pub mod order;
pub mod position;
pub mod asset;
pub mod market_data;
pub mod activity;
pub mod calendar;
pub mod watchlist;

// Re-export commonly used types
pub use primitives::*;
pub use enums::*;
pub use mapper::{map_entity, map_list, Entity};
pub use timeframe::{TimeFrame, TimeFrameUnit};
pub use account::*;
pub use order::*;
pub use position::*;
pub use asset::*;
pub use market_data::{Bar, Quote, Snapshot, Trade};
pub use activity::*;
pub use calendar::*;
pub use watchlist::*;
