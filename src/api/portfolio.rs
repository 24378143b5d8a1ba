//! Portfolio history service.

use std::sync::Arc;

use chrono::NaiveDate;

use crate::client::{ClientInner, Params};
use crate::models::PortfolioHistory;
use crate::Result;

/// Query parameters for portfolio history.
///
/// `period` takes values like `1D`, `1W`, `1M`, `1A`; `timeframe` takes
/// `1Min`, `5Min`, `15Min`, `1H` or `1D`.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PortfolioHistoryQuery {
    /// Length of the series
    pub period: Option<String>,
    /// Resolution of the series
    pub timeframe: Option<String>,
    /// Last day of the series
    pub date_end: Option<NaiveDate>,
    /// Include extended hours (intraday timeframes only)
    pub extended_hours: Option<bool>,
}

impl PortfolioHistoryQuery {
    fn to_params(&self) -> Params {
        Params::new()
            .with("period", self.period.clone())
            .with("timeframe", self.timeframe.clone())
            .with("date_end", self.date_end)
            .with("extended_hours", self.extended_hours)
    }
}

/// Service for portfolio history.
///
/// # Example
///
/// ```no_run
/// use alpaca_trade_rs::api::PortfolioHistoryQuery;
///
/// # async fn example(client: alpaca_trade_rs::AlpacaClient) -> alpaca_trade_rs::Result<()> {
/// let query = PortfolioHistoryQuery {
///     period: Some("1M".into()),
///     timeframe: Some("1D".into()),
///     ..Default::default()
/// };
/// let history = client.portfolio().history(&query).await?;
/// println!("{} points, base {}", history.timestamp.len(), history.base_value);
/// # Ok(())
/// # }
/// ```
pub struct PortfolioService {
    inner: Arc<ClientInner>,
}

impl PortfolioService {
    pub(crate) fn new(inner: Arc<ClientInner>) -> Self {
        Self { inner }
    }

    /// Get the account's equity and profit/loss series.
    pub async fn history(&self, query: &PortfolioHistoryQuery) -> Result<PortfolioHistory> {
        let params = query.to_params();
        self.inner
            .get("/account/portfolio/history", Some(&params))
            .await
    }
}
