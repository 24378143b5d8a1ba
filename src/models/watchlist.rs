//! Watchlist models.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use super::asset::Asset;
use super::mapper::{require_fields, Entity};
use super::timestamp;
use crate::Result;

/// A named list of assets.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Watchlist {
    /// Watchlist ID
    pub id: String,
    /// Owning account ID
    pub account_id: String,
    /// Name
    pub name: String,
    /// Creation time
    #[serde(default, with = "timestamp::option")]
    pub created_at: Option<DateTime<Utc>>,
    /// Last update
    #[serde(default, with = "timestamp::option")]
    pub updated_at: Option<DateTime<Utc>>,
    /// Assets (omitted by the list endpoint)
    #[serde(default)]
    pub assets: Option<Vec<Asset>>,
}

impl Entity for Watchlist {
    const NAME: &'static str = "Watchlist";
    const REQUIRED: &'static [&'static str] = &["id", "account_id", "name"];

    fn validate(record: &Map<String, Value>) -> Result<()> {
        require_fields(Self::NAME, Self::REQUIRED, record)?;
        if let Some(Value::Array(assets)) = record.get("assets") {
            for asset in assets.iter().filter_map(Value::as_object) {
                Asset::validate(asset)?;
            }
        }
        Ok(())
    }
}

/// Request body for creating or replacing a watchlist.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct WatchlistRequest {
    /// Name
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// Symbols
    #[serde(skip_serializing_if = "Option::is_none")]
    pub symbols: Option<Vec<String>>,
}
