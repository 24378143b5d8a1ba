//! Account, account configuration and portfolio history models.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::enums::{DtbpCheck, TradeConfirmEmail};
use super::mapper::Entity;
use super::timestamp;

/// Trading account information.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Account {
    /// Account UUID
    pub id: String,
    /// Human-readable account number
    pub account_number: String,
    /// Account status (e.g. "ACTIVE")
    pub status: String,
    /// Account currency
    pub currency: String,
    /// Cash balance
    pub cash: Decimal,
    /// Current buying power
    pub buying_power: Decimal,
    /// Cash + long market value + short market value
    pub equity: Decimal,
    /// Equity as of the previous close
    #[serde(default)]
    pub last_equity: Option<Decimal>,
    /// Total portfolio value
    #[serde(default)]
    pub portfolio_value: Option<Decimal>,
    /// Buying power for day trades
    #[serde(default)]
    pub daytrading_buying_power: Option<Decimal>,
    /// Regulation T buying power
    #[serde(default)]
    pub regt_buying_power: Option<Decimal>,
    /// Non-marginable buying power
    #[serde(default)]
    pub non_marginable_buying_power: Option<Decimal>,
    /// Long positions value
    #[serde(default)]
    pub long_market_value: Option<Decimal>,
    /// Short positions value
    #[serde(default)]
    pub short_market_value: Option<Decimal>,
    /// Buying power multiplier (1, 2 or 4)
    #[serde(default)]
    pub multiplier: Option<Decimal>,
    /// Initial margin requirement
    #[serde(default)]
    pub initial_margin: Option<Decimal>,
    /// Maintenance margin requirement
    #[serde(default)]
    pub maintenance_margin: Option<Decimal>,
    /// Maintenance margin as of the previous close
    #[serde(default)]
    pub last_maintenance_margin: Option<Decimal>,
    /// Special memorandum account value
    #[serde(default)]
    pub sma: Option<Decimal>,
    /// Day trades in the last five trading days
    #[serde(default)]
    pub daytrade_count: Option<i64>,
    /// Flagged as pattern day trader
    #[serde(default)]
    pub pattern_day_trader: Option<bool>,
    /// Trading disabled by the user
    #[serde(default)]
    pub trade_suspended_by_user: Option<bool>,
    /// Trading blocked
    #[serde(default)]
    pub trading_blocked: Option<bool>,
    /// Transfers blocked
    #[serde(default)]
    pub transfers_blocked: Option<bool>,
    /// Account blocked
    #[serde(default)]
    pub account_blocked: Option<bool>,
    /// Short selling enabled
    #[serde(default)]
    pub shorting_enabled: Option<bool>,
    /// Crypto trading status
    #[serde(default)]
    pub crypto_status: Option<String>,
    /// When the account was created
    #[serde(default, with = "timestamp::option")]
    pub created_at: Option<DateTime<Utc>>,
}

impl Entity for Account {
    const NAME: &'static str = "Account";
    const REQUIRED: &'static [&'static str] = &[
        "id",
        "account_number",
        "status",
        "currency",
        "cash",
        "buying_power",
        "equity",
    ];
}

/// Account-level trading configuration.
///
/// All fields are optional so the same type can be used to send a partial
/// update; unset fields are left unchanged by the API.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AccountConfigurations {
    /// Day trading buying power check
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dtbp_check: Option<DtbpCheck>,
    /// Disable short selling
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub no_shorting: Option<bool>,
    /// Block all new orders
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub suspend_trade: Option<bool>,
    /// Trade confirmation emails
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub trade_confirm_email: Option<TradeConfirmEmail>,
    /// Pattern day trader check ("entry", "exit", "both")
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pdt_check: Option<String>,
    /// Allow fractional trading
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fractional_trading: Option<bool>,
    /// Maximum margin multiplier
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_margin_multiplier: Option<String>,
}

impl Entity for AccountConfigurations {
    const NAME: &'static str = "AccountConfigurations";
    const REQUIRED: &'static [&'static str] = &[];
}

/// Equity and profit/loss time series for the account.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PortfolioHistory {
    /// Epoch seconds of each data point
    pub timestamp: Vec<i64>,
    /// Equity at each point (null before the account existed)
    pub equity: Vec<Option<f64>>,
    /// Profit/loss since the base value
    pub profit_loss: Vec<Option<f64>>,
    /// Profit/loss percentage since the base value
    pub profit_loss_pct: Vec<Option<f64>>,
    /// Basis for profit/loss
    pub base_value: f64,
    /// Resolution of the series
    pub timeframe: String,
}

impl Entity for PortfolioHistory {
    const NAME: &'static str = "PortfolioHistory";
    const REQUIRED: &'static [&'static str] = &[
        "timestamp",
        "equity",
        "profit_loss",
        "profit_loss_pct",
        "base_value",
        "timeframe",
    ];
}
