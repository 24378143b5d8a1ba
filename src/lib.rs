//! # alpaca-trade-rs
//!
//! A Rust client for the Alpaca trading and market data REST APIs.
//!
//! This crate wraps the Alpaca account, order, position, asset, activity,
//! calendar and watchlist endpoints, and streams historical bars, trades and
//! quotes across pages.
//!
//! ## Features
//!
//! - **Request dispatch**: key-pair or OAuth authentication, query/body
//!   encoding, and a fixed-wait retry policy for transient statuses
//! - **Typed models**: every response is checked against the fields its
//!   entity requires before it is mapped
//! - **Pagination**: lazy `Stream`s that follow `next_page_token` cursors,
//!   respect a total limit and merge several symbols
//! - **Configuration**: explicit builder with `APCA_*` environment fallbacks
//! - **Async-first**: built on Tokio and reqwest
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use alpaca_trade_rs::AlpacaClient;
//!
//! #[tokio::main]
//! async fn main() -> alpaca_trade_rs::Result<()> {
//!     // Reads APCA_API_KEY_ID, APCA_API_SECRET_KEY, APCA_API_BASE_URL, ...
//!     let client = AlpacaClient::from_env()?;
//!
//!     let account = client.accounts().get().await?;
//!     println!("Cash: {} {}", account.cash, account.currency);
//!
//!     for position in client.positions().list().await? {
//!         println!("{}: {}", position.symbol, position.qty);
//!     }
//!
//!     Ok(())
//! }
//! ```
//!
//! ## Historical Data
//!
//! ```rust,no_run
//! use futures_util::TryStreamExt;
//! use alpaca_trade_rs::AlpacaClient;
//! use alpaca_trade_rs::api::BarsQuery;
//! use alpaca_trade_rs::models::{TimeFrame, TimeFrameUnit};
//!
//! #[tokio::main]
//! async fn main() -> alpaca_trade_rs::Result<()> {
//!     let client = AlpacaClient::from_env()?;
//!
//!     let query = BarsQuery::new(TimeFrame::new(15, TimeFrameUnit::Minute)?).limit(2000);
//!     let mut bars = client.market_data().bars_stream(["AAPL", "MSFT"], &query)?;
//!
//!     while let Some(bar) = bars.try_next().await? {
//!         println!("{} {} o={} c={}", bar.symbol, bar.timestamp, bar.open, bar.close);
//!     }
//!
//!     Ok(())
//! }
//! ```
//!
//! ## Order Placement
//!
//! ```rust,no_run
//! use alpaca_trade_rs::{AlpacaClient, ClientConfig, Environment};
//! use alpaca_trade_rs::models::{NewOrderBuilder, OrderSide, OrderType, TimeInForce};
//! use rust_decimal_macros::dec;
//!
//! #[tokio::main]
//! async fn main() -> alpaca_trade_rs::Result<()> {
//!     let config = ClientConfig::builder()
//!         .environment(Environment::Paper)
//!         .build()?;
//!     let client = AlpacaClient::new(config)?;
//!
//!     let order = NewOrderBuilder::new("AAPL", OrderSide::Buy)
//!         .qty(dec!(10))
//!         .order_type(OrderType::Limit)
//!         .limit_price(dec!(150.00))
//!         .time_in_force(TimeInForce::Day)
//!         .build()?;
//!
//!     let placed = client.orders().submit(&order).await?;
//!     println!("Order placed: {}", placed.id);
//!
//!     Ok(())
//! }
//! ```

#![warn(missing_docs)]
#![warn(rustdoc::missing_crate_level_docs)]
#![deny(unsafe_code)]

pub mod api;
pub mod client;
pub mod error;
pub mod models;

// Re-export primary types at crate root for convenience
pub use error::{Error, Result};
pub use models::{ApiVersion, Environment, OrderId, Symbol};
pub use client::{AlpacaClient, BaseUrl, ClientConfig, ConfigBuilder, RetryConfig};

/// Prelude module for convenient imports.
///
/// ```rust
/// use alpaca_trade_rs::prelude::*;
/// ```
pub mod prelude {
    pub use crate::error::{Error, Result};
    pub use crate::models::{
        // Primitives
        ApiVersion, Environment, OrderId, Symbol,
        // Enums
        OrderClass, OrderSide, OrderStatus, OrderType, TimeInForce,
        // Timeframes
        TimeFrame, TimeFrameUnit,
        // Entities
        Account, Activity, Asset, Bar, Order, Position, Quote, Snapshot, Trade,
        // Requests
        NewOrder, NewOrderBuilder,
        // Mapping
        Entity,
    };
    pub use crate::api::{BarsQuery, OrdersQuery, TicksQuery};
    pub use crate::client::{AlpacaClient, ClientConfig, DataStream, EntityStream, Params};
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_symbol_creation() {
        let symbol = Symbol::new("AAPL");
        assert_eq!(symbol.as_str(), "AAPL");
    }

    #[test]
    fn test_environment_urls() {
        assert_eq!(
            Environment::Live.trading_base_url(),
            "https://api.alpaca.markets"
        );
        assert_eq!(
            Environment::Paper.trading_base_url(),
            "https://paper-api.alpaca.markets"
        );
    }

    #[test]
    fn test_api_version_validation() {
        assert!(ApiVersion::new("v2").is_ok());
        assert!(ApiVersion::new("2").is_err());
        assert!(ApiVersion::new("latest").is_err());
    }
}
