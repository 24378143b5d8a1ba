//! Bar aggregation timeframes (`1Min`, `15Min`, `1Hour`, `1Day`, ...).

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::{Error, Result};

/// Unit of a [`TimeFrame`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TimeFrameUnit {
    /// Minutes (1-59)
    Minute,
    /// Hours (1-23)
    Hour,
    /// Trading days (1 only)
    Day,
    /// Weeks (1 only)
    Week,
    /// Months (1, 2, 3, 6 or 12)
    Month,
}

impl TimeFrameUnit {
    fn suffix(&self) -> &'static str {
        match self {
            TimeFrameUnit::Minute => "Min",
            TimeFrameUnit::Hour => "Hour",
            TimeFrameUnit::Day => "Day",
            TimeFrameUnit::Week => "Week",
            TimeFrameUnit::Month => "Month",
        }
    }
}

/// An amount plus a unit, serialized in compact form such as `5Min`.
///
/// # Example
///
/// ```
/// use alpaca_trade_rs::models::{TimeFrame, TimeFrameUnit};
///
/// let tf = TimeFrame::new(5, TimeFrameUnit::Minute).unwrap();
/// assert_eq!(tf.to_string(), "5Min");
/// assert_eq!("1Day".parse::<TimeFrame>().unwrap(), TimeFrame::DAY);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TimeFrame {
    amount: u32,
    unit: TimeFrameUnit,
}

impl TimeFrame {
    /// One minute.
    pub const MINUTE: TimeFrame = TimeFrame { amount: 1, unit: TimeFrameUnit::Minute };
    /// One hour.
    pub const HOUR: TimeFrame = TimeFrame { amount: 1, unit: TimeFrameUnit::Hour };
    /// One trading day.
    pub const DAY: TimeFrame = TimeFrame { amount: 1, unit: TimeFrameUnit::Day };
    /// One week.
    pub const WEEK: TimeFrame = TimeFrame { amount: 1, unit: TimeFrameUnit::Week };
    /// One month.
    pub const MONTH: TimeFrame = TimeFrame { amount: 1, unit: TimeFrameUnit::Month };

    /// Create a timeframe, validating the amount against the unit.
    pub fn new(amount: u32, unit: TimeFrameUnit) -> Result<Self> {
        let valid = match unit {
            TimeFrameUnit::Minute => (1..=59).contains(&amount),
            TimeFrameUnit::Hour => (1..=23).contains(&amount),
            TimeFrameUnit::Day | TimeFrameUnit::Week => amount == 1,
            TimeFrameUnit::Month => matches!(amount, 1 | 2 | 3 | 6 | 12),
        };
        if !valid {
            return Err(Error::InvalidInput(format!(
                "Invalid timeframe amount {} for unit {}",
                amount,
                unit.suffix()
            )));
        }
        Ok(Self { amount, unit })
    }

    /// The amount of units.
    pub fn amount(&self) -> u32 {
        self.amount
    }

    /// The unit.
    pub fn unit(&self) -> TimeFrameUnit {
        self.unit
    }
}

impl fmt::Display for TimeFrame {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.amount, self.unit.suffix())
    }
}

impl FromStr for TimeFrame {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        let split = s
            .find(|c: char| !c.is_ascii_digit())
            .ok_or_else(|| Error::InvalidInput(format!("Invalid timeframe: {}", s)))?;
        let (amount, unit) = s.split_at(split);
        let amount: u32 = amount
            .parse()
            .map_err(|_| Error::InvalidInput(format!("Invalid timeframe: {}", s)))?;
        let unit = match unit {
            "Min" | "T" => TimeFrameUnit::Minute,
            "Hour" | "H" => TimeFrameUnit::Hour,
            "Day" | "D" => TimeFrameUnit::Day,
            "Week" | "W" => TimeFrameUnit::Week,
            "Month" | "M" => TimeFrameUnit::Month,
            _ => return Err(Error::InvalidInput(format!("Invalid timeframe unit: {}", unit))),
        };
        TimeFrame::new(amount, unit)
    }
}

impl Serialize for TimeFrame {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for TimeFrame {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        raw.parse().map_err(serde::de::Error::custom)
    }
}
