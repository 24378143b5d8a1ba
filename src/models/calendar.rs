//! Market clock and trading calendar models.

use chrono::{DateTime, FixedOffset, NaiveDate};
use serde::{Deserialize, Serialize};

use super::mapper::Entity;

/// Current market status.
///
/// Clock timestamps carry the exchange's UTC offset, so they are kept as
/// offset-aware values rather than normalized.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Clock {
    /// Current time
    pub timestamp: DateTime<FixedOffset>,
    /// Whether the market is open now
    pub is_open: bool,
    /// Next open
    pub next_open: DateTime<FixedOffset>,
    /// Next close
    pub next_close: DateTime<FixedOffset>,
}

impl Entity for Clock {
    const NAME: &'static str = "Clock";
    const REQUIRED: &'static [&'static str] = &["timestamp", "is_open", "next_open", "next_close"];
}

/// One trading day of the market calendar.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CalendarDay {
    /// Date
    pub date: NaiveDate,
    /// Open time, `HH:MM` Eastern
    pub open: String,
    /// Close time, `HH:MM` Eastern
    pub close: String,
    /// Session open, `HHMM`
    #[serde(default)]
    pub session_open: Option<String>,
    /// Session close, `HHMM`
    #[serde(default)]
    pub session_close: Option<String>,
}

impl Entity for CalendarDay {
    const NAME: &'static str = "CalendarDay";
    const REQUIRED: &'static [&'static str] = &["date", "open", "close"];
}
