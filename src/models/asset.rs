//! Tradable asset models.

use serde::{Deserialize, Serialize};

use super::enums::{AssetClass, AssetStatus};
use super::mapper::Entity;

/// An asset known to the platform.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Asset {
    /// Asset ID
    pub id: String,
    /// Asset class
    #[serde(rename = "class")]
    pub asset_class: AssetClass,
    /// Primary exchange
    pub exchange: String,
    /// Symbol
    pub symbol: String,
    /// Full name
    #[serde(default)]
    pub name: Option<String>,
    /// Active or inactive
    pub status: AssetStatus,
    /// Tradable on the platform
    pub tradable: bool,
    /// Marginable
    #[serde(default)]
    pub marginable: Option<bool>,
    /// Shortable
    #[serde(default)]
    pub shortable: Option<bool>,
    /// Easy to borrow
    #[serde(default)]
    pub easy_to_borrow: Option<bool>,
    /// Supports fractional quantities
    #[serde(default)]
    pub fractionable: Option<bool>,
}

impl Entity for Asset {
    const NAME: &'static str = "Asset";
    const REQUIRED: &'static [&'static str] =
        &["id", "class", "exchange", "symbol", "status", "tradable"];
}
