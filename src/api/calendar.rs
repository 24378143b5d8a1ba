//! Market clock and calendar service.

use std::sync::Arc;

use chrono::NaiveDate;

use crate::client::{ClientInner, Params};
use crate::models::{CalendarDay, Clock};
use crate::Result;

/// Service for market hours.
///
/// # Example
///
/// ```no_run
/// use chrono::NaiveDate;
///
/// # async fn example(client: alpaca_trade_rs::AlpacaClient) -> alpaca_trade_rs::Result<()> {
/// let clock = client.calendar().clock().await?;
/// if clock.is_open {
///     println!("Market closes at {}", clock.next_close);
/// }
///
/// let days = client
///     .calendar()
///     .calendar(NaiveDate::from_ymd_opt(2021, 1, 1), NaiveDate::from_ymd_opt(2021, 1, 31))
///     .await?;
/// println!("{} trading days in January", days.len());
/// # Ok(())
/// # }
/// ```
pub struct CalendarService {
    inner: Arc<ClientInner>,
}

impl CalendarService {
    pub(crate) fn new(inner: Arc<ClientInner>) -> Self {
        Self { inner }
    }

    /// Get the market clock.
    pub async fn clock(&self) -> Result<Clock> {
        self.inner.get("/clock", None).await
    }

    /// Get trading days between `start` and `end`, inclusive.
    ///
    /// Either bound may be omitted to use the API's default range.
    pub async fn calendar(
        &self,
        start: Option<NaiveDate>,
        end: Option<NaiveDate>,
    ) -> Result<Vec<CalendarDay>> {
        let params = Params::new().with("start", start).with("end", end);
        self.inner.get_list("/calendar", Some(&params)).await
    }
}
