//! Request parameters and their wire encodings.
//!
//! Read verbs (GET, DELETE) carry parameters in the query string, write verbs
//! (POST, PUT, PATCH) in a JSON body. Both encodings skip null values.

use std::fmt;

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::Serialize;
use serde_json::{Map, Value};

use crate::models::TimeFrame;
use crate::{Error, Result};

/// Suffix appended to query timestamps, which are rendered without offset.
pub const UTC_OFFSET_SUFFIX: &str = "Z";

/// A single parameter value.
#[derive(Debug, Clone, PartialEq)]
pub enum ParamValue {
    /// Omitted from both encodings
    Null,
    /// Boolean
    Bool(bool),
    /// Integer
    Int(i64),
    /// Floating point
    Float(f64),
    /// Decimal, sent as a string
    Decimal(Decimal),
    /// String
    Str(String),
    /// Point in time
    Timestamp(DateTime<Utc>),
    /// Calendar date
    Date(NaiveDate),
    /// Bar timeframe in compact form
    TimeFrame(TimeFrame),
    /// List of strings, comma-joined in queries
    List(Vec<String>),
    /// Nested JSON (bodies only; rendered compactly in queries)
    Json(Value),
}

impl ParamValue {
    /// Query-string text, or `None` for null.
    fn query_text(&self) -> Option<String> {
        match self {
            ParamValue::Null => None,
            ParamValue::Bool(b) => Some(b.to_string()),
            ParamValue::Int(i) => Some(i.to_string()),
            ParamValue::Float(f) => Some(f.to_string()),
            ParamValue::Decimal(d) => Some(d.to_string()),
            ParamValue::Str(s) => Some(s.clone()),
            ParamValue::Timestamp(ts) => Some(format_query_timestamp(ts)),
            ParamValue::Date(d) => Some(d.format("%Y-%m-%d").to_string()),
            ParamValue::TimeFrame(tf) => Some(tf.to_string()),
            ParamValue::List(items) => Some(items.join(",")),
            ParamValue::Json(Value::Null) => None,
            ParamValue::Json(Value::String(s)) => Some(s.clone()),
            ParamValue::Json(v) => Some(v.to_string()),
        }
    }

    /// JSON body value, or `None` for null.
    fn json_value(&self) -> Option<Value> {
        match self {
            ParamValue::Null | ParamValue::Json(Value::Null) => None,
            ParamValue::Bool(b) => Some(Value::Bool(*b)),
            ParamValue::Int(i) => Some(Value::from(*i)),
            ParamValue::Float(f) => serde_json::Number::from_f64(*f).map(Value::Number),
            ParamValue::Decimal(d) => Some(Value::String(d.to_string())),
            ParamValue::Str(s) => Some(Value::String(s.clone())),
            ParamValue::Timestamp(ts) => Some(Value::String(format_query_timestamp(ts))),
            ParamValue::Date(d) => Some(Value::String(d.format("%Y-%m-%d").to_string())),
            ParamValue::TimeFrame(tf) => Some(Value::String(tf.to_string())),
            ParamValue::List(items) => Some(Value::from(items.clone())),
            ParamValue::Json(v) => Some(v.clone()),
        }
    }
}

/// Render a timestamp for a request: ISO-8601 seconds plus [`UTC_OFFSET_SUFFIX`].
pub fn format_query_timestamp(ts: &DateTime<Utc>) -> String {
    format!("{}{}", ts.format("%Y-%m-%dT%H:%M:%S"), UTC_OFFSET_SUFFIX)
}

impl From<bool> for ParamValue {
    fn from(v: bool) -> Self {
        ParamValue::Bool(v)
    }
}

impl From<i64> for ParamValue {
    fn from(v: i64) -> Self {
        ParamValue::Int(v)
    }
}

impl From<u32> for ParamValue {
    fn from(v: u32) -> Self {
        ParamValue::Int(i64::from(v))
    }
}

impl From<f64> for ParamValue {
    fn from(v: f64) -> Self {
        ParamValue::Float(v)
    }
}

impl From<Decimal> for ParamValue {
    fn from(v: Decimal) -> Self {
        ParamValue::Decimal(v)
    }
}

impl From<&str> for ParamValue {
    fn from(v: &str) -> Self {
        ParamValue::Str(v.to_string())
    }
}

impl From<String> for ParamValue {
    fn from(v: String) -> Self {
        ParamValue::Str(v)
    }
}

impl From<DateTime<Utc>> for ParamValue {
    fn from(v: DateTime<Utc>) -> Self {
        ParamValue::Timestamp(v)
    }
}

impl From<NaiveDate> for ParamValue {
    fn from(v: NaiveDate) -> Self {
        ParamValue::Date(v)
    }
}

impl From<TimeFrame> for ParamValue {
    fn from(v: TimeFrame) -> Self {
        ParamValue::TimeFrame(v)
    }
}

impl From<Vec<String>> for ParamValue {
    fn from(v: Vec<String>) -> Self {
        ParamValue::List(v)
    }
}

impl<T: Into<ParamValue>> From<Option<T>> for ParamValue {
    fn from(v: Option<T>) -> Self {
        v.map(Into::into).unwrap_or(ParamValue::Null)
    }
}

/// Ordered request parameters.
///
/// # Example
///
/// ```
/// use alpaca_trade_rs::client::Params;
///
/// let params = Params::new()
///     .with("symbols", vec!["AAPL".to_string(), "MSFT".to_string()])
///     .with("stop", "2021-01-01")
///     .with("page_token", None::<String>);
/// assert_eq!(params.to_query_string(), "symbols=AAPL%2CMSFT&end=2021-01-01");
/// ```
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Params {
    entries: Vec<(String, ParamValue)>,
}

impl Params {
    /// Create an empty parameter set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add or replace a parameter, builder style.
    pub fn with(mut self, key: impl Into<String>, value: impl Into<ParamValue>) -> Self {
        self.insert(key, value);
        self
    }

    /// Add or replace a parameter.
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<ParamValue>) {
        let key = key.into();
        let value = value.into();
        match self.entries.iter_mut().find(|(k, _)| *k == key) {
            Some((_, existing)) => *existing = value,
            None => self.entries.push((key, value)),
        }
    }

    /// Look up a parameter.
    pub fn get(&self, key: &str) -> Option<&ParamValue> {
        self.entries.iter().find(|(k, _)| k == key).map(|(_, v)| v)
    }

    /// Remove a parameter, returning its value.
    pub fn remove(&mut self, key: &str) -> Option<ParamValue> {
        let index = self.entries.iter().position(|(k, _)| k == key)?;
        Some(self.entries.remove(index).1)
    }

    /// Returns `true` if no parameters are set.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Build parameters from a serializable JSON object.
    ///
    /// Nested objects and arrays are kept as JSON.
    pub fn from_serialize<T: Serialize>(value: &T) -> Result<Self> {
        match serde_json::to_value(value)? {
            Value::Object(map) => Ok(Self {
                entries: map
                    .into_iter()
                    .map(|(k, v)| (k, json_to_param(v)))
                    .collect(),
            }),
            Value::Null => Ok(Self::new()),
            other => Err(Error::InvalidInput(format!(
                "Request parameters must be an object, got {}",
                other
            ))),
        }
    }

    /// Percent-encoded query string for read verbs.
    ///
    /// Null values are skipped and a parameter named `stop` is sent as `end`.
    pub fn to_query_string(&self) -> String {
        let mut serializer = url::form_urlencoded::Serializer::new(String::new());
        for (key, value) in &self.entries {
            if let Some(text) = value.query_text() {
                let key = if key == "stop" { "end" } else { key.as_str() };
                serializer.append_pair(key, &text);
            }
        }
        serializer.finish()
    }

    /// JSON object body for write verbs. Null values are skipped.
    pub fn to_json_body(&self) -> Value {
        let map: Map<String, Value> = self
            .entries
            .iter()
            .filter_map(|(k, v)| v.json_value().map(|json| (k.clone(), json)))
            .collect();
        Value::Object(map)
    }
}

fn json_to_param(value: Value) -> ParamValue {
    match value {
        Value::Null => ParamValue::Null,
        Value::Bool(b) => ParamValue::Bool(b),
        Value::Number(n) => match n.as_i64() {
            Some(i) => ParamValue::Int(i),
            None => ParamValue::Json(Value::Number(n)),
        },
        Value::String(s) => ParamValue::Str(s),
        other => ParamValue::Json(other),
    }
}

impl fmt::Display for Params {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_query_string())
    }
}
