//! Account activity models.
//!
//! Activities come in two shapes: fills (`activity_type == "FILL"`) and
//! everything else (dividends, fees, transfers, ...).

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use super::enums::OrderSide;
use super::mapper::{json_kind, require_fields, Entity};
use super::timestamp;
use crate::{Error, Result};

/// Activity type of trade fills.
pub const FILL_ACTIVITY: &str = "FILL";

/// An order fill.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TradeActivity {
    /// Activity ID (sortable, usable as a page token)
    pub id: String,
    /// Always "FILL"
    pub activity_type: String,
    /// Cumulative filled quantity of the order
    pub cum_qty: Decimal,
    /// Quantity still open on the order
    pub leaves_qty: Decimal,
    /// Fill price
    pub price: Decimal,
    /// Fill quantity
    pub qty: Decimal,
    /// Side
    pub side: OrderSide,
    /// Symbol
    pub symbol: String,
    /// Fill time
    #[serde(with = "timestamp")]
    pub transaction_time: DateTime<Utc>,
    /// Order the fill belongs to
    pub order_id: String,
    /// "fill" or "partial_fill"
    #[serde(rename = "type")]
    pub fill_type: String,
    /// Order status after the fill
    #[serde(default)]
    pub order_status: Option<String>,
}

impl Entity for TradeActivity {
    const NAME: &'static str = "TradeActivity";
    const REQUIRED: &'static [&'static str] = &[
        "id",
        "activity_type",
        "cum_qty",
        "leaves_qty",
        "price",
        "qty",
        "side",
        "symbol",
        "transaction_time",
        "order_id",
        "type",
    ];
}

/// A non-trade activity such as a dividend, fee or transfer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NonTradeActivity {
    /// Activity ID
    pub id: String,
    /// Activity type (e.g. "DIV", "FEE", "CSD")
    pub activity_type: String,
    /// Date the activity applies to
    pub date: NaiveDate,
    /// Net cash effect
    pub net_amount: Decimal,
    /// Related symbol
    #[serde(default)]
    pub symbol: Option<String>,
    /// Related quantity
    #[serde(default)]
    pub qty: Option<Decimal>,
    /// Per-share amount (dividends)
    #[serde(default)]
    pub per_share_amount: Option<Decimal>,
    /// Free-form description
    #[serde(default)]
    pub description: Option<String>,
    /// Status
    #[serde(default)]
    pub status: Option<String>,
}

impl Entity for NonTradeActivity {
    const NAME: &'static str = "NonTradeActivity";
    const REQUIRED: &'static [&'static str] = &["id", "activity_type", "date", "net_amount"];
}

/// Either kind of account activity.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Activity {
    /// Order fill
    Trade(TradeActivity),
    /// Anything else
    NonTrade(NonTradeActivity),
}

impl Activity {
    /// Activity ID.
    pub fn id(&self) -> &str {
        match self {
            Activity::Trade(a) => &a.id,
            Activity::NonTrade(a) => &a.id,
        }
    }

    /// Activity type code.
    pub fn activity_type(&self) -> &str {
        match self {
            Activity::Trade(a) => &a.activity_type,
            Activity::NonTrade(a) => &a.activity_type,
        }
    }
}

impl Entity for Activity {
    const NAME: &'static str = "Activity";
    const REQUIRED: &'static [&'static str] = &["id", "activity_type"];

    fn validate(record: &Map<String, Value>) -> Result<()> {
        require_fields(Self::NAME, Self::REQUIRED, record)?;
        if is_fill(record) {
            TradeActivity::validate(record)
        } else {
            NonTradeActivity::validate(record)
        }
    }

    fn from_value(value: Value) -> Result<Self> {
        let record = value.as_object().ok_or_else(|| {
            Error::mapping(
                Self::NAME,
                None,
                format!("expected an object, got {}", json_kind(&value)),
            )
        })?;
        Self::validate(record)?;

        if is_fill(record) {
            TradeActivity::from_value(value).map(Activity::Trade)
        } else {
            NonTradeActivity::from_value(value).map(Activity::NonTrade)
        }
    }
}

fn is_fill(record: &Map<String, Value>) -> bool {
    record.get("activity_type").and_then(Value::as_str) == Some(FILL_ACTIVITY)
}
