//! HTTP client and service layer for the Alpaca API.
//!
//! This module provides the main entry point [`AlpacaClient`] for
//! interacting with the Alpaca trading and market data APIs, the request
//! dispatcher with its retry policy, and the cursor pagination engine.
//!
//! # Example
//!
//! ```no_run
//! use alpaca_trade_rs::{AlpacaClient, ClientConfig, Environment};
//!
//! # async fn example() -> alpaca_trade_rs::Result<()> {
//! let config = ClientConfig::builder()
//!     .key_id("your-key-id")
//!     .secret_key("your-secret-key")
//!     .environment(Environment::Paper)
//!     .build()?;
//! let client = AlpacaClient::new(config)?;
//!
//! let clock = client.calendar().clock().await?;
//! println!("Market open: {}", clock.is_open);
//! # Ok(())
//! # }
//! ```

mod config;
mod http;
pub mod paginated;
mod params;
pub mod transport;

pub use config::{
    ClientConfig, ConfigBuilder, RetryConfig, ENV_API_VERSION, ENV_BASE_URL, ENV_DATA_URL,
    ENV_KEY_ID, ENV_OAUTH_TOKEN, ENV_RETRY_CODES, ENV_RETRY_MAX, ENV_RETRY_WAIT, ENV_SECRET_KEY,
};
pub use http::{AlpacaClient, BaseUrl};
pub use paginated::{
    DataEndpoint, DataStream, EntityStream, PaginationState, SymbolSet, DATA_V2_MAX_LIMIT,
};
pub use params::{format_query_timestamp, ParamValue, Params, UTC_OFFSET_SUFFIX};
pub use transport::{HttpRequest, HttpResponse, ReqwestTransport, Transport};
pub(crate) use http::ClientInner;
