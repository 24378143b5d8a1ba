//! Primitive types and newtypes for type-safe API interactions.
//!
//! This module provides strongly-typed wrappers around string identifiers
//! to prevent mixing up different types of IDs at compile time.

use serde::{Deserialize, Serialize};
use std::fmt;

/// A strongly-typed order ID (server-assigned UUID).
///
/// # Example
///
/// ```
/// use alpaca_trade_rs::OrderId;
///
/// let id = OrderId::new("61e69015-8549-4bfd-b9c3-01e75843f47d");
/// println!("Order: {}", id);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct OrderId(String);

impl OrderId {
    /// Create a new order ID.
    pub fn new(s: impl Into<String>) -> Self {
        Self(s.into())
    }

    /// Get the order ID as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for OrderId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl AsRef<str> for OrderId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl From<String> for OrderId {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl From<&str> for OrderId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

/// A trading symbol (e.g., "AAPL", "SPY").
///
/// # Example
///
/// ```
/// use alpaca_trade_rs::Symbol;
///
/// let symbol = Symbol::new("AAPL");
/// assert_eq!(symbol.as_str(), "AAPL");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Symbol(String);

impl Symbol {
    /// Create a new symbol.
    pub fn new(s: impl Into<String>) -> Self {
        Self(s.into())
    }

    /// Get the symbol as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Percent-encode the symbol for use as a URL path segment.
    ///
    /// Crypto pairs such as `BTC/USD` contain a slash.
    pub(crate) fn path_segment(&self) -> String {
        urlencoding::encode(&self.0).into_owned()
    }
}

impl fmt::Display for Symbol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl AsRef<str> for Symbol {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl From<String> for Symbol {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl From<&str> for Symbol {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

/// REST API version path segment, e.g. `v2`.
///
/// # Example
///
/// ```
/// use alpaca_trade_rs::ApiVersion;
///
/// let version = ApiVersion::new("v2").expect("valid version");
/// assert_eq!(version.as_str(), "v2");
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiVersion(String);

impl ApiVersion {
    /// Create a new API version, validating the format.
    ///
    /// # Errors
    ///
    /// Returns an error unless the version is `v` followed by digits.
    pub fn new(version: &str) -> crate::Result<Self> {
        let valid = version
            .strip_prefix('v')
            .map(|n| !n.is_empty() && n.chars().all(|c| c.is_ascii_digit()))
            .unwrap_or(false);

        if !valid {
            return Err(crate::Error::InvalidInput(format!(
                "Invalid API version: {}. Expected v<number>",
                version
            )));
        }

        Ok(ApiVersion(version.to_string()))
    }

    /// Get the version as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Default for ApiVersion {
    fn default() -> Self {
        ApiVersion("v2".to_string())
    }
}

impl fmt::Display for ApiVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Environment configuration for the Alpaca API.
///
/// Determines which trading endpoint to use - live or paper. Historical
/// market data is served from the same host for both.
///
/// # Example
///
/// ```
/// use alpaca_trade_rs::Environment;
///
/// let env = Environment::Paper;
/// println!("API URL: {}", env.trading_base_url());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Environment {
    /// Live trading with real money.
    #[default]
    Live,
    /// Paper trading account.
    Paper,
}

impl Environment {
    /// Get the base URL for trading requests.
    pub fn trading_base_url(&self) -> &'static str {
        match self {
            Environment::Live => "https://api.alpaca.markets",
            Environment::Paper => "https://paper-api.alpaca.markets",
        }
    }

    /// Get the base URL for historical market data requests.
    pub fn data_base_url(&self) -> &'static str {
        "https://data.alpaca.markets"
    }

    /// Returns `true` if this is the paper environment.
    pub fn is_paper(&self) -> bool {
        matches!(self, Environment::Paper)
    }
}

impl fmt::Display for Environment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Environment::Live => write!(f, "live"),
            Environment::Paper => write!(f, "paper"),
        }
    }
}
