//! Historical market data models: bars, trades, quotes and snapshots.
//!
//! Records from the data API use single-letter keys. Paginated and latest
//! endpoints stamp every record with its symbol under `S` before mapping.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use super::mapper::{require_fields, Entity};
use super::timestamp;
use crate::Result;

/// An OHLCV bar.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Bar {
    /// Symbol
    #[serde(rename = "S")]
    pub symbol: String,
    /// Bar start time
    #[serde(rename = "t", with = "timestamp")]
    pub timestamp: DateTime<Utc>,
    /// Open
    #[serde(rename = "o")]
    pub open: f64,
    /// High
    #[serde(rename = "h")]
    pub high: f64,
    /// Low
    #[serde(rename = "l")]
    pub low: f64,
    /// Close
    #[serde(rename = "c")]
    pub close: f64,
    /// Volume
    #[serde(rename = "v")]
    pub volume: u64,
    /// Number of trades
    #[serde(rename = "n", default, skip_serializing_if = "Option::is_none")]
    pub trade_count: Option<u64>,
    /// Volume-weighted average price
    #[serde(rename = "vw", default, skip_serializing_if = "Option::is_none")]
    pub vwap: Option<f64>,
}

impl Entity for Bar {
    const NAME: &'static str = "Bar";
    const REQUIRED: &'static [&'static str] = &["S", "t", "o", "h", "l", "c", "v"];
}

/// A single trade print.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Trade {
    /// Symbol
    #[serde(rename = "S")]
    pub symbol: String,
    /// Trade time
    #[serde(rename = "t", with = "timestamp")]
    pub timestamp: DateTime<Utc>,
    /// Price
    #[serde(rename = "p")]
    pub price: f64,
    /// Size
    #[serde(rename = "s")]
    pub size: u64,
    /// Exchange code
    #[serde(rename = "x", default, skip_serializing_if = "Option::is_none")]
    pub exchange: Option<String>,
    /// Trade ID
    #[serde(rename = "i", default, skip_serializing_if = "Option::is_none")]
    pub id: Option<u64>,
    /// Condition flags
    #[serde(rename = "c", default, skip_serializing_if = "Option::is_none")]
    pub conditions: Option<Vec<String>>,
    /// Tape
    #[serde(rename = "z", default, skip_serializing_if = "Option::is_none")]
    pub tape: Option<String>,
}

impl Entity for Trade {
    const NAME: &'static str = "Trade";
    const REQUIRED: &'static [&'static str] = &["S", "t", "p", "s"];
}

/// A national best bid and offer quote.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Quote {
    /// Symbol
    #[serde(rename = "S")]
    pub symbol: String,
    /// Quote time
    #[serde(rename = "t", with = "timestamp")]
    pub timestamp: DateTime<Utc>,
    /// Ask price
    #[serde(rename = "ap")]
    pub ask_price: f64,
    /// Ask size
    #[serde(rename = "as")]
    pub ask_size: u64,
    /// Bid price
    #[serde(rename = "bp")]
    pub bid_price: f64,
    /// Bid size
    #[serde(rename = "bs")]
    pub bid_size: u64,
    /// Ask exchange
    #[serde(rename = "ax", default, skip_serializing_if = "Option::is_none")]
    pub ask_exchange: Option<String>,
    /// Bid exchange
    #[serde(rename = "bx", default, skip_serializing_if = "Option::is_none")]
    pub bid_exchange: Option<String>,
    /// Condition flags
    #[serde(rename = "c", default, skip_serializing_if = "Option::is_none")]
    pub conditions: Option<Vec<String>>,
    /// Tape
    #[serde(rename = "z", default, skip_serializing_if = "Option::is_none")]
    pub tape: Option<String>,
}

impl Quote {
    /// Ask minus bid.
    pub fn spread(&self) -> f64 {
        self.ask_price - self.bid_price
    }
}

impl Entity for Quote {
    const NAME: &'static str = "Quote";
    const REQUIRED: &'static [&'static str] = &["S", "t", "ap", "as", "bp", "bs"];
}

/// Latest trade, quote and bars for one symbol.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Snapshot {
    /// Latest trade
    #[serde(default)]
    pub latest_trade: Option<Trade>,
    /// Latest quote
    #[serde(default)]
    pub latest_quote: Option<Quote>,
    /// Current minute bar
    #[serde(default)]
    pub minute_bar: Option<Bar>,
    /// Current daily bar
    #[serde(default)]
    pub daily_bar: Option<Bar>,
    /// Previous daily bar
    #[serde(default)]
    pub prev_daily_bar: Option<Bar>,
}

impl Entity for Snapshot {
    const NAME: &'static str = "Snapshot";
    const REQUIRED: &'static [&'static str] = &[];

    fn validate(record: &Map<String, Value>) -> Result<()> {
        let nested: [(&str, &'static str, &[&str]); 5] = [
            ("latestTrade", Trade::NAME, Trade::REQUIRED),
            ("latestQuote", Quote::NAME, Quote::REQUIRED),
            ("minuteBar", Bar::NAME, Bar::REQUIRED),
            ("dailyBar", Bar::NAME, Bar::REQUIRED),
            ("prevDailyBar", Bar::NAME, Bar::REQUIRED),
        ];
        for (key, entity, required) in nested {
            if let Some(Value::Object(inner)) = record.get(key) {
                require_fields(entity, required, inner)?;
            }
        }
        Ok(())
    }
}

/// Insert `"S": symbol` into a data record.
pub(crate) fn stamp_symbol(record: &mut Value, symbol: &str) {
    if let Value::Object(map) = record {
        map.insert("S".to_string(), Value::String(symbol.to_string()));
    }
}

/// Stamp every nested record of a raw snapshot with its symbol.
pub(crate) fn stamp_snapshot(snapshot: &mut Value, symbol: &str) {
    if let Value::Object(map) = snapshot {
        for (_, nested) in map.iter_mut() {
            stamp_symbol(nested, symbol);
        }
    }
}
