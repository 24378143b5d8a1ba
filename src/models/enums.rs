//! Enumeration types for the Alpaca API.
//!
//! Wire values are lowercase snake case unless noted otherwise. Enums that
//! the API may extend carry an `Unknown` catch-all holding the raw wire
//! value, so new values neither break deserialization nor get lost when a
//! record is serialized again.

use serde::{Deserialize, Serialize};

/// Side of an order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OrderSide {
    /// Buy
    Buy,
    /// Sell
    Sell,
}

/// Order type specifying how the order should be executed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OrderType {
    /// Execute immediately at the current market price
    Market,
    /// Execute at the limit price or better
    Limit,
    /// Becomes a market order when the stop price is reached
    Stop,
    /// Becomes a limit order when the stop price is reached
    StopLimit,
    /// Stop that follows the high water mark
    TrailingStop,
}

/// How long an order remains active.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TimeInForce {
    /// Good for the trading day
    Day,
    /// Good until cancelled
    Gtc,
    /// Market on open
    Opg,
    /// Market on close
    Cls,
    /// Immediate or cancel
    Ioc,
    /// Fill or kill
    Fok,
}

/// Order class for multi-leg orders.
///
/// Order endpoints report simple orders with an empty class; both `""` and
/// `"simple"` read as [`OrderClass::Simple`], which is always written back
/// as `"simple"`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum OrderClass {
    /// Single order
    #[default]
    #[serde(alias = "")]
    Simple,
    /// Entry with take-profit and stop-loss legs
    Bracket,
    /// One-cancels-other exit pair
    Oco,
    /// One-triggers-other
    Oto,
    /// Unrecognized class, with its wire value
    #[serde(untagged)]
    Unknown(String),
}

/// Lifecycle status of an order.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OrderStatus {
    /// Accepted and routed
    New,
    /// Partially filled
    PartiallyFilled,
    /// Completely filled
    Filled,
    /// Done for the day
    DoneForDay,
    /// Cancelled
    Canceled,
    /// Expired
    Expired,
    /// Replaced by another order
    Replaced,
    /// Cancel requested, awaiting confirmation
    PendingCancel,
    /// Replace requested, awaiting confirmation
    PendingReplace,
    /// Received but not yet routed
    Accepted,
    /// Awaiting acceptance
    PendingNew,
    /// Accepted by the exchange for bidding
    AcceptedForBidding,
    /// Stopped, a fill is guaranteed
    Stopped,
    /// Rejected
    Rejected,
    /// Suspended
    Suspended,
    /// Calculated
    Calculated,
    /// Held (e.g. a bracket leg waiting on its parent)
    Held,
    /// Unrecognized status, with its wire value
    #[serde(untagged)]
    Unknown(String),
}

impl OrderStatus {
    /// Returns `true` if the order can no longer change.
    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            OrderStatus::Filled
                | OrderStatus::Canceled
                | OrderStatus::Expired
                | OrderStatus::Replaced
                | OrderStatus::Rejected
        )
    }
}

/// Status filter when listing orders.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum OrderQueryStatus {
    /// Working orders
    #[default]
    Open,
    /// Filled, cancelled, expired
    Closed,
    /// Everything
    All,
}

impl OrderQueryStatus {
    pub(crate) fn as_str(&self) -> &'static str {
        match self {
            OrderQueryStatus::Open => "open",
            OrderQueryStatus::Closed => "closed",
            OrderQueryStatus::All => "all",
        }
    }
}

/// Chronological sort direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum SortDirection {
    /// Oldest first
    Asc,
    /// Newest first
    #[default]
    Desc,
}

impl SortDirection {
    pub(crate) fn as_str(&self) -> &'static str {
        match self {
            SortDirection::Asc => "asc",
            SortDirection::Desc => "desc",
        }
    }
}

/// Asset class.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum AssetClass {
    /// US equities
    #[default]
    UsEquity,
    /// Options contracts
    UsOption,
    /// Cryptocurrency
    Crypto,
    /// Unrecognized class, with its wire value
    #[serde(untagged)]
    Unknown(String),
}

impl AssetClass {
    pub(crate) fn as_str(&self) -> &str {
        match self {
            AssetClass::UsEquity => "us_equity",
            AssetClass::UsOption => "us_option",
            AssetClass::Crypto => "crypto",
            AssetClass::Unknown(raw) => raw,
        }
    }
}

/// Whether an asset is tradable on the platform.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AssetStatus {
    /// Active
    Active,
    /// Inactive
    Inactive,
}

impl AssetStatus {
    pub(crate) fn as_str(&self) -> &'static str {
        match self {
            AssetStatus::Active => "active",
            AssetStatus::Inactive => "inactive",
        }
    }
}

/// Direction of an open position.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PositionSide {
    /// Long
    Long,
    /// Short
    Short,
}

/// Corporate action adjustment applied to bars.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum Adjustment {
    /// No adjustment
    #[default]
    Raw,
    /// Split adjusted
    Split,
    /// Dividend adjusted
    Dividend,
    /// Split and dividend adjusted
    All,
}

impl Adjustment {
    pub(crate) fn as_str(&self) -> &'static str {
        match self {
            Adjustment::Raw => "raw",
            Adjustment::Split => "split",
            Adjustment::Dividend => "dividend",
            Adjustment::All => "all",
        }
    }
}

/// Market data feed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DataFeed {
    /// Investors Exchange only
    Iex,
    /// All US exchanges
    Sip,
    /// Over-the-counter
    Otc,
}

impl DataFeed {
    pub(crate) fn as_str(&self) -> &'static str {
        match self {
            DataFeed::Iex => "iex",
            DataFeed::Sip => "sip",
            DataFeed::Otc => "otc",
        }
    }
}

/// Day trading buying power check mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DtbpCheck {
    /// Check on entry and exit
    Both,
    /// Check on entry only
    Entry,
    /// Check on exit only
    Exit,
}

/// Trade confirmation email setting.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TradeConfirmEmail {
    /// Send all confirmations
    All,
    /// Send none
    None,
}
