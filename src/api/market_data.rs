//! Market data service for historical and latest stock data.

use std::collections::BTreeMap;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use futures_util::TryStreamExt;
use serde_json::Value;

use crate::client::{
    ClientInner, DataEndpoint, DataStream, EntityStream, Params, SymbolSet,
};
use crate::models::market_data::{stamp_snapshot, stamp_symbol};
use crate::models::{
    map_entity, Adjustment, Bar, DataFeed, Entity, Quote, Snapshot, Symbol, TimeFrame, Trade,
};
use crate::{Error, Result};

/// Query parameters for historical bars.
///
/// # Example
///
/// ```
/// use alpaca_trade_rs::api::BarsQuery;
/// use alpaca_trade_rs::models::{Adjustment, TimeFrame};
///
/// let query = BarsQuery::new(TimeFrame::DAY)
///     .limit(500)
///     .adjustment(Adjustment::All);
/// assert_eq!(query.limit, Some(500));
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct BarsQuery {
    /// Aggregation timeframe
    pub timeframe: TimeFrame,
    /// Inclusive start
    pub start: Option<DateTime<Utc>>,
    /// Inclusive end
    pub end: Option<DateTime<Utc>>,
    /// Total bars to return across all pages and symbols
    pub limit: Option<u64>,
    /// Corporate action adjustment
    pub adjustment: Option<Adjustment>,
    /// Data feed
    pub feed: Option<DataFeed>,
    /// Bars per page request
    pub page_limit: Option<u32>,
}

impl BarsQuery {
    /// Create a query for the given timeframe.
    pub fn new(timeframe: TimeFrame) -> Self {
        Self {
            timeframe,
            start: None,
            end: None,
            limit: None,
            adjustment: None,
            feed: None,
            page_limit: None,
        }
    }

    /// Set the start time.
    pub fn start(mut self, start: DateTime<Utc>) -> Self {
        self.start = Some(start);
        self
    }

    /// Set the end time.
    pub fn end(mut self, end: DateTime<Utc>) -> Self {
        self.end = Some(end);
        self
    }

    /// Cap the total number of bars.
    pub fn limit(mut self, limit: u64) -> Self {
        self.limit = Some(limit);
        self
    }

    /// Set the adjustment.
    pub fn adjustment(mut self, adjustment: Adjustment) -> Self {
        self.adjustment = Some(adjustment);
        self
    }

    /// Set the feed.
    pub fn feed(mut self, feed: DataFeed) -> Self {
        self.feed = Some(feed);
        self
    }

    /// Set the per-page size.
    pub fn page_limit(mut self, page_limit: u32) -> Self {
        self.page_limit = Some(page_limit);
        self
    }

    fn to_params(&self) -> Params {
        Params::new()
            .with("timeframe", self.timeframe)
            .with("start", self.start)
            .with("end", self.end)
            .with("adjustment", self.adjustment.map(|a| a.as_str()))
            .with("feed", self.feed.map(|f| f.as_str()))
    }
}

/// Query parameters for historical trades and quotes.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TicksQuery {
    /// Inclusive start
    pub start: Option<DateTime<Utc>>,
    /// Inclusive end
    pub end: Option<DateTime<Utc>>,
    /// Total records to return across all pages and symbols
    pub limit: Option<u64>,
    /// Data feed
    pub feed: Option<DataFeed>,
    /// Records per page request
    pub page_limit: Option<u32>,
}

impl TicksQuery {
    /// Query the given time range.
    pub fn between(start: DateTime<Utc>, end: DateTime<Utc>) -> Self {
        Self {
            start: Some(start),
            end: Some(end),
            ..Default::default()
        }
    }

    /// Cap the total number of records.
    pub fn limit(mut self, limit: u64) -> Self {
        self.limit = Some(limit);
        self
    }

    fn to_params(&self) -> Params {
        Params::new()
            .with("start", self.start)
            .with("end", self.end)
            .with("feed", self.feed.map(|f| f.as_str()))
    }
}

/// Service for historical and latest market data.
///
/// Historical endpoints return lazily paginated streams; the non-stream
/// variants collect every page.
///
/// # Example
///
/// ```no_run
/// use futures_util::TryStreamExt;
/// use alpaca_trade_rs::api::BarsQuery;
/// use alpaca_trade_rs::models::TimeFrame;
/// use chrono::{TimeZone, Utc};
///
/// # async fn example(client: alpaca_trade_rs::AlpacaClient) -> alpaca_trade_rs::Result<()> {
/// let query = BarsQuery::new(TimeFrame::DAY)
///     .start(Utc.with_ymd_and_hms(2021, 1, 4, 0, 0, 0).unwrap())
///     .limit(1000);
///
/// let mut bars = client.market_data().bars_stream(["AAPL", "MSFT"], &query)?;
/// while let Some(bar) = bars.try_next().await? {
///     println!("{} {} close={}", bar.symbol, bar.timestamp, bar.close);
/// }
///
/// let quote = client.market_data().latest_quote(&"AAPL".into()).await?;
/// println!("AAPL spread: {:.2}", quote.spread());
/// # Ok(())
/// # }
/// ```
pub struct MarketDataService {
    inner: Arc<ClientInner>,
}

impl MarketDataService {
    pub(crate) fn new(inner: Arc<ClientInner>) -> Self {
        Self { inner }
    }

    /// Stream raw records of any paginated data endpoint.
    pub fn raw_stream(
        &self,
        endpoint: DataEndpoint,
        symbols: impl Into<SymbolSet>,
        params: Params,
        limit: Option<u64>,
    ) -> Result<DataStream> {
        DataStream::new(self.inner.clone(), endpoint, symbols.into(), params, limit)
    }

    fn typed_stream<T: Entity>(
        &self,
        endpoint: DataEndpoint,
        symbols: SymbolSet,
        params: Params,
        limit: Option<u64>,
        page_limit: Option<u32>,
    ) -> Result<EntityStream<T>> {
        let mut stream = DataStream::new(self.inner.clone(), endpoint, symbols, params, limit)?;
        if let Some(page_limit) = page_limit {
            stream = stream.with_page_limit(page_limit);
        }
        Ok(stream.entities())
    }

    /// Stream bars for one or more symbols.
    pub fn bars_stream(
        &self,
        symbols: impl Into<SymbolSet>,
        query: &BarsQuery,
    ) -> Result<EntityStream<Bar>> {
        self.typed_stream(
            DataEndpoint::Bars,
            symbols.into(),
            query.to_params(),
            query.limit,
            query.page_limit,
        )
    }

    /// Fetch all bars for one or more symbols.
    pub async fn bars(&self, symbols: impl Into<SymbolSet>, query: &BarsQuery) -> Result<Vec<Bar>> {
        self.bars_stream(symbols, query)?.try_collect().await
    }

    /// Stream trades for one or more symbols.
    pub fn trades_stream(
        &self,
        symbols: impl Into<SymbolSet>,
        query: &TicksQuery,
    ) -> Result<EntityStream<Trade>> {
        self.typed_stream(
            DataEndpoint::Trades,
            symbols.into(),
            query.to_params(),
            query.limit,
            query.page_limit,
        )
    }

    /// Fetch all trades for one or more symbols.
    pub async fn trades(
        &self,
        symbols: impl Into<SymbolSet>,
        query: &TicksQuery,
    ) -> Result<Vec<Trade>> {
        self.trades_stream(symbols, query)?.try_collect().await
    }

    /// Stream quotes for one or more symbols.
    pub fn quotes_stream(
        &self,
        symbols: impl Into<SymbolSet>,
        query: &TicksQuery,
    ) -> Result<EntityStream<Quote>> {
        self.typed_stream(
            DataEndpoint::Quotes,
            symbols.into(),
            query.to_params(),
            query.limit,
            query.page_limit,
        )
    }

    /// Fetch all quotes for one or more symbols.
    pub async fn quotes(
        &self,
        symbols: impl Into<SymbolSet>,
        query: &TicksQuery,
    ) -> Result<Vec<Quote>> {
        self.quotes_stream(symbols, query)?.try_collect().await
    }

    /// Get the latest trade for a symbol.
    pub async fn latest_trade(&self, symbol: &Symbol) -> Result<Trade> {
        let path = format!("/stocks/{}/trades/latest", symbol.path_segment());
        let response = self.inner.data_get(&path, None).await?;
        map_entity(latest_record(response, "trade", symbol)?)
    }

    /// Get the latest quote for a symbol.
    pub async fn latest_quote(&self, symbol: &Symbol) -> Result<Quote> {
        let path = format!("/stocks/{}/quotes/latest", symbol.path_segment());
        let response = self.inner.data_get(&path, None).await?;
        map_entity(latest_record(response, "quote", symbol)?)
    }

    /// Get the snapshot of a symbol.
    pub async fn snapshot(&self, symbol: &Symbol) -> Result<Snapshot> {
        let path = format!("/stocks/{}/snapshot", symbol.path_segment());
        let mut response = self.inner.data_get(&path, None).await?;
        stamp_snapshot(&mut response, symbol.as_str());
        map_entity(response)
    }

    /// Get snapshots of several symbols, keyed by symbol.
    ///
    /// Symbols the API knows nothing about are left out.
    pub async fn snapshots(&self, symbols: &[&str]) -> Result<BTreeMap<String, Snapshot>> {
        if symbols.is_empty() {
            return Err(Error::InvalidInput(
                "At least one symbol is required".to_string(),
            ));
        }
        let params = Params::new().with(
            "symbols",
            symbols.iter().map(|s| s.to_string()).collect::<Vec<_>>(),
        );
        let response = self
            .inner
            .data_get("/stocks/snapshots", Some(&params))
            .await?;

        let Value::Object(by_symbol) = response else {
            return Err(Error::mapping(
                Snapshot::NAME,
                None,
                "expected an object keyed by symbol",
            ));
        };

        let mut snapshots = BTreeMap::new();
        for (symbol, mut raw) in by_symbol {
            if raw.is_null() {
                continue;
            }
            stamp_snapshot(&mut raw, &symbol);
            snapshots.insert(symbol, map_entity(raw)?);
        }
        Ok(snapshots)
    }
}

/// Pull the record out of a `{"symbol": ..., "<key>": {...}}` envelope and stamp it.
fn latest_record(mut response: Value, key: &str, symbol: &Symbol) -> Result<Value> {
    let mut record = response
        .get_mut(key)
        .map(Value::take)
        .filter(|record| !record.is_null())
        .ok_or_else(|| Error::mapping("Latest", Some(key), "required field is missing"))?;
    stamp_symbol(&mut record, symbol.as_str());
    Ok(record)
}
