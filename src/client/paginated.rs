//! Cursor-paginated stream over historical market data.
//!
//! This module provides a [`DataStream`] that implements the `Stream` trait,
//! following `next_page_token` cursors lazily. Pages are fetched one at a
//! time, only when the previous page has been fully consumed.

use std::collections::VecDeque;
use std::future::Future;
use std::marker::PhantomData;
use std::pin::Pin;
use std::sync::Arc;
use std::task::{ready, Context, Poll};

use futures_util::Stream;
use serde_json::Value;
use tracing::warn;

use super::http::ClientInner;
use super::params::{ParamValue, Params};
use crate::models::mapper::json_kind;
use crate::models::market_data::stamp_symbol;
use crate::models::{Entity, Symbol};
use crate::{Error, Result};

/// Largest page the data API serves.
pub const DATA_V2_MAX_LIMIT: u32 = 10_000;

/// Paginated market data collections.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DataEndpoint {
    /// Aggregated bars
    Bars,
    /// Trades
    Trades,
    /// Quotes
    Quotes,
}

impl DataEndpoint {
    /// Path segment, which is also the key of the page's item collection.
    pub fn as_str(&self) -> &'static str {
        match self {
            DataEndpoint::Bars => "bars",
            DataEndpoint::Trades => "trades",
            DataEndpoint::Quotes => "quotes",
        }
    }
}

/// Symbols a stream covers.
///
/// A single symbol is addressed in the path and its pages hold a flat list.
/// Several symbols go in the `symbols` parameter and pages hold a map keyed
/// by symbol, even when the set has only one member.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SymbolSet {
    /// One symbol
    Single(Symbol),
    /// Several symbols
    Multi(Vec<Symbol>),
}

impl From<Symbol> for SymbolSet {
    fn from(symbol: Symbol) -> Self {
        SymbolSet::Single(symbol)
    }
}

impl From<&Symbol> for SymbolSet {
    fn from(symbol: &Symbol) -> Self {
        SymbolSet::Single(symbol.clone())
    }
}

impl From<&str> for SymbolSet {
    fn from(symbol: &str) -> Self {
        SymbolSet::Single(Symbol::new(symbol))
    }
}

impl From<Vec<Symbol>> for SymbolSet {
    fn from(symbols: Vec<Symbol>) -> Self {
        SymbolSet::Multi(symbols)
    }
}

impl From<&[&str]> for SymbolSet {
    fn from(symbols: &[&str]) -> Self {
        SymbolSet::Multi(symbols.iter().map(|s| Symbol::new(*s)).collect())
    }
}

impl<const N: usize> From<[&str; N]> for SymbolSet {
    fn from(symbols: [&str; N]) -> Self {
        SymbolSet::Multi(symbols.iter().map(|s| Symbol::new(*s)).collect())
    }
}

/// Cursor and budget of one pagination run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PaginationState {
    /// Cursor for the next page, `None` before the first page
    pub page_token: Option<String>,
    /// Items still allowed under the caller's limit
    pub remaining: Option<u64>,
    /// Items yielded so far
    pub emitted: u64,
    /// Pages requested so far
    pub pages: u32,
    /// No further pages will be requested
    pub exhausted: bool,
}

/// Type alias for a boxed future used internally.
type BoxFuture<'a, T> = Pin<Box<dyn Future<Output = T> + Send + 'a>>;

/// A stream of raw market data records across all pages.
///
/// Every record is stamped with its symbol under the `"S"` key.
///
/// # Example
///
/// ```no_run
/// use futures_util::StreamExt;
/// use alpaca_trade_rs::client::{DataEndpoint, Params};
///
/// # async fn example(client: alpaca_trade_rs::AlpacaClient) -> alpaca_trade_rs::Result<()> {
/// let params = Params::new().with("timeframe", "1Day").with("start", "2021-01-04");
/// let mut stream = client
///     .market_data()
///     .raw_stream(DataEndpoint::Bars, ["AAPL", "MSFT"], params, Some(500))?;
///
/// while let Some(record) = stream.next().await {
///     println!("{}", record?);
/// }
/// # Ok(())
/// # }
/// ```
pub struct DataStream {
    inner: Arc<ClientInner>,
    endpoint: DataEndpoint,
    symbols: SymbolSet,
    path: String,
    params: Params,
    page_limit: u32,
    state: PaginationState,
    buffer: VecDeque<Value>,
    pending_fetch: Option<BoxFuture<'static, Result<Value>>>,
}

impl DataStream {
    /// Create a stream.
    ///
    /// `limit` caps the total number of records yielded. `params` must not
    /// carry `limit` or `page_token`; the stream manages both.
    pub(crate) fn new(
        inner: Arc<ClientInner>,
        endpoint: DataEndpoint,
        symbols: SymbolSet,
        mut params: Params,
        limit: Option<u64>,
    ) -> Result<Self> {
        let path = match &symbols {
            SymbolSet::Single(symbol) => {
                if symbol.as_str().is_empty() {
                    return Err(Error::InvalidInput("Symbol must not be empty".to_string()));
                }
                format!("/stocks/{}/{}", symbol.path_segment(), endpoint.as_str())
            }
            SymbolSet::Multi(list) => {
                if list.is_empty() {
                    return Err(Error::InvalidInput(
                        "At least one symbol is required".to_string(),
                    ));
                }
                params.insert(
                    "symbols",
                    ParamValue::List(list.iter().map(|s| s.as_str().to_string()).collect()),
                );
                format!("/stocks/{}", endpoint.as_str())
            }
        };
        params.remove("limit");
        params.remove("page_token");

        Ok(Self {
            inner,
            endpoint,
            symbols,
            path,
            params,
            page_limit: DATA_V2_MAX_LIMIT,
            state: PaginationState {
                remaining: limit,
                ..Default::default()
            },
            buffer: VecDeque::new(),
            pending_fetch: None,
        })
    }

    /// Override the per-page size.
    pub fn with_page_limit(mut self, page_limit: u32) -> Self {
        self.page_limit = page_limit.clamp(1, DATA_V2_MAX_LIMIT);
        self
    }

    /// Current cursor and budget.
    pub fn state(&self) -> &PaginationState {
        &self.state
    }

    /// Map each record into `T`.
    pub fn entities<T: Entity>(self) -> EntityStream<T> {
        EntityStream {
            raw: self,
            _marker: PhantomData,
        }
    }

    /// Page size for the next request, `None` once the budget is spent.
    fn next_page_limit(&self) -> Option<u32> {
        match self.state.remaining {
            None => Some(self.page_limit),
            Some(0) => None,
            Some(remaining) => {
                Some(u32::try_from(remaining).map_or(self.page_limit, |r| r.min(self.page_limit)))
            }
        }
    }

    fn start_fetch(&mut self, limit: u32) {
        let inner = self.inner.clone();
        let path = self.path.clone();
        let params = self
            .params
            .clone()
            .with("limit", limit)
            .with("page_token", self.state.page_token.clone());
        self.state.pages += 1;

        self.pending_fetch = Some(Box::pin(async move {
            inner.data_get(&path, Some(&params)).await
        }));
    }

    /// Buffer the records of one page and advance the cursor.
    fn absorb_page(&mut self, mut page: Value) -> Result<()> {
        let key = self.endpoint.as_str();
        let data = page.get_mut(key).map(Value::take).unwrap_or(Value::Null);

        let mut records = Vec::new();
        match (&self.symbols, data) {
            (_, Value::Null) => {}
            (SymbolSet::Single(symbol), Value::Array(items)) => {
                for mut item in items {
                    stamp_symbol(&mut item, symbol.as_str());
                    records.push(item);
                }
            }
            (SymbolSet::Multi(_), Value::Object(by_symbol)) => {
                let mut groups: Vec<(String, Value)> = by_symbol.into_iter().collect();
                groups.sort_by(|a, b| a.0.cmp(&b.0));
                for (symbol, items) in groups {
                    match items {
                        Value::Array(items) => {
                            for mut item in items {
                                stamp_symbol(&mut item, &symbol);
                                records.push(item);
                            }
                        }
                        Value::Null => {}
                        other => {
                            return Err(Error::mapping(
                                "Page",
                                Some(key),
                                format!("expected an array for {symbol}, got {}", json_kind(&other)),
                            ))
                        }
                    }
                }
            }
            (_, other) => {
                return Err(Error::mapping(
                    "Page",
                    Some(key),
                    format!("unexpected {}", json_kind(&other)),
                ))
            }
        }

        if let Some(remaining) = self.state.remaining.as_mut() {
            let allowed = usize::try_from(*remaining).unwrap_or(usize::MAX);
            records.truncate(allowed);
            *remaining -= records.len() as u64;
        }

        let next_token = page
            .get("next_page_token")
            .and_then(Value::as_str)
            .filter(|token| !token.is_empty())
            .map(String::from);
        if next_token.is_some() && next_token == self.state.page_token {
            // Following the same cursor again would loop forever.
            warn!(
                path = %self.path,
                pages = self.state.pages,
                "next_page_token repeated the cursor just sent, ending pagination"
            );
            self.state.exhausted = true;
        } else if next_token.is_none() {
            self.state.exhausted = true;
        }
        self.state.page_token = next_token;

        self.buffer.extend(records);
        Ok(())
    }
}

impl Stream for DataStream {
    type Item = Result<Value>;

    fn poll_next(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<Self::Item>> {
        let this = &mut *self;

        loop {
            if let Some(record) = this.buffer.pop_front() {
                this.state.emitted += 1;
                return Poll::Ready(Some(Ok(record)));
            }

            if let Some(fut) = this.pending_fetch.as_mut() {
                let page = ready!(fut.as_mut().poll(cx));
                this.pending_fetch = None;
                match page.and_then(|page| this.absorb_page(page)) {
                    Ok(()) => continue,
                    Err(e) => {
                        this.state.exhausted = true;
                        return Poll::Ready(Some(Err(e)));
                    }
                }
            }

            if this.state.exhausted {
                return Poll::Ready(None);
            }

            match this.next_page_limit() {
                Some(limit) => this.start_fetch(limit),
                None => {
                    this.state.exhausted = true;
                    return Poll::Ready(None);
                }
            }
        }
    }
}

impl std::fmt::Debug for DataStream {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DataStream")
            .field("path", &self.path)
            .field("page_limit", &self.page_limit)
            .field("state", &self.state)
            .field("buffered", &self.buffer.len())
            .finish()
    }
}

/// A [`DataStream`] whose records are mapped into typed entities.
pub struct EntityStream<T> {
    raw: DataStream,
    _marker: PhantomData<fn() -> T>,
}

impl<T> EntityStream<T> {
    /// Current cursor and budget.
    pub fn state(&self) -> &PaginationState {
        self.raw.state()
    }
}

impl<T> std::fmt::Debug for EntityStream<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EntityStream").field("raw", &self.raw).finish()
    }
}

impl<T: Entity> Stream for EntityStream<T> {
    type Item = Result<T>;

    fn poll_next(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<Self::Item>> {
        let next = ready!(Pin::new(&mut self.raw).poll_next(cx));
        Poll::Ready(next.map(|record| record.and_then(T::from_value)))
    }
}
