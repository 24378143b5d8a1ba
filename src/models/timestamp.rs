//! Wire format for UTC timestamps.
//!
//! Timestamps are exchanged as `yyyy-mm-ddTHH:MM:SSZ`. Market data adds
//! fractional seconds (up to nanoseconds), which are accepted on input and
//! written back only when non-zero.
//!
//! Use with `#[serde(with = "timestamp")]` or
//! `#[serde(default, with = "timestamp::option")]`.

use chrono::{DateTime, NaiveDateTime, Utc};
use serde::{Deserialize, Deserializer, Serializer};

/// The canonical timestamp format.
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%dT%H:%M:%SZ";

const WIRE_FORMAT: &str = "%Y-%m-%dT%H:%M:%S%.fZ";

/// Parse a wire timestamp.
///
/// # Example
///
/// ```
/// use alpaca_trade_rs::models::timestamp;
///
/// let ts = timestamp::parse("2021-03-16T18:38:01Z").unwrap();
/// assert_eq!(timestamp::format(&ts), "2021-03-16T18:38:01Z");
/// ```
pub fn parse(s: &str) -> Option<DateTime<Utc>> {
    NaiveDateTime::parse_from_str(s, WIRE_FORMAT)
        .ok()
        .map(|naive| naive.and_utc())
}

/// Format a timestamp in wire form.
pub fn format(ts: &DateTime<Utc>) -> String {
    ts.format(WIRE_FORMAT).to_string()
}

/// Serialize a timestamp in wire form.
pub fn serialize<S>(ts: &DateTime<Utc>, serializer: S) -> Result<S::Ok, S::Error>
where
    S: Serializer,
{
    serializer.serialize_str(&format(ts))
}

/// Deserialize a wire timestamp.
pub fn deserialize<'de, D>(deserializer: D) -> Result<DateTime<Utc>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = String::deserialize(deserializer)?;
    parse(&raw).ok_or_else(|| {
        serde::de::Error::custom(format!(
            "invalid timestamp {raw:?}, expected {TIMESTAMP_FORMAT}"
        ))
    })
}

/// Optional variant; `null` and absent both map to `None`.
pub mod option {
    use super::*;

    /// Serialize an optional timestamp.
    pub fn serialize<S>(ts: &Option<DateTime<Utc>>, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        match ts {
            Some(ts) => serializer.serialize_str(&format(ts)),
            None => serializer.serialize_none(),
        }
    }

    /// Deserialize an optional timestamp.
    pub fn deserialize<'de, D>(deserializer: D) -> Result<Option<DateTime<Utc>>, D::Error>
    where
        D: Deserializer<'de>,
    {
        match Option::<String>::deserialize(deserializer)? {
            Some(raw) => parse(&raw).map(Some).ok_or_else(|| {
                serde::de::Error::custom(format!(
                    "invalid timestamp {raw:?}, expected {TIMESTAMP_FORMAT}"
                ))
            }),
            None => Ok(None),
        }
    }
}
