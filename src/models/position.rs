//! Open position models.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::enums::{AssetClass, PositionSide};
use super::mapper::Entity;

/// An open position.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Position {
    /// Asset ID
    pub asset_id: String,
    /// Symbol
    pub symbol: String,
    /// Listing exchange
    #[serde(default)]
    pub exchange: Option<String>,
    /// Asset class
    #[serde(default)]
    pub asset_class: Option<AssetClass>,
    /// Average entry price
    pub avg_entry_price: Decimal,
    /// Quantity held
    pub qty: Decimal,
    /// Quantity not tied up in open orders
    #[serde(default)]
    pub qty_available: Option<Decimal>,
    /// Long or short
    pub side: PositionSide,
    /// Current market value
    #[serde(default)]
    pub market_value: Option<Decimal>,
    /// Total cost basis
    #[serde(default)]
    pub cost_basis: Option<Decimal>,
    /// Unrealized profit/loss
    #[serde(default)]
    pub unrealized_pl: Option<Decimal>,
    /// Unrealized profit/loss percent
    #[serde(default)]
    pub unrealized_plpc: Option<Decimal>,
    /// Unrealized profit/loss for the day
    #[serde(default)]
    pub unrealized_intraday_pl: Option<Decimal>,
    /// Unrealized profit/loss percent for the day
    #[serde(default)]
    pub unrealized_intraday_plpc: Option<Decimal>,
    /// Current price
    #[serde(default)]
    pub current_price: Option<Decimal>,
    /// Previous close
    #[serde(default)]
    pub lastday_price: Option<Decimal>,
    /// Percent change since previous close
    #[serde(default)]
    pub change_today: Option<Decimal>,
}

impl Entity for Position {
    const NAME: &'static str = "Position";
    const REQUIRED: &'static [&'static str] =
        &["asset_id", "symbol", "avg_entry_price", "qty", "side"];
}
