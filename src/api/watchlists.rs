//! Watchlists service.

use std::sync::Arc;

use crate::client::ClientInner;
use crate::models::{Symbol, Watchlist, WatchlistRequest};
use crate::Result;

/// Service for watchlist operations.
///
/// # Example
///
/// ```no_run
/// # async fn example(client: alpaca_trade_rs::AlpacaClient) -> alpaca_trade_rs::Result<()> {
/// let list = client
///     .watchlists()
///     .create("tech", &["AAPL", "MSFT"])
///     .await?;
///
/// client.watchlists().add_symbol(&list.id, &"NVDA".into()).await?;
///
/// for watchlist in client.watchlists().list().await? {
///     println!("{}: {}", watchlist.id, watchlist.name);
/// }
/// # Ok(())
/// # }
/// ```
pub struct WatchlistsService {
    inner: Arc<ClientInner>,
}

impl WatchlistsService {
    pub(crate) fn new(inner: Arc<ClientInner>) -> Self {
        Self { inner }
    }

    /// Get the account's watchlists. Assets are not included.
    pub async fn list(&self) -> Result<Vec<Watchlist>> {
        self.inner.get_list("/watchlists", None).await
    }

    /// Get a watchlist with its assets.
    pub async fn get(&self, watchlist_id: &str) -> Result<Watchlist> {
        self.inner
            .get(&format!("/watchlists/{}", urlencoding::encode(watchlist_id)), None)
            .await
    }

    /// Create a watchlist.
    pub async fn create(&self, name: &str, symbols: &[&str]) -> Result<Watchlist> {
        let request = WatchlistRequest {
            name: Some(name.to_string()),
            symbols: Some(symbols.iter().map(|s| s.to_string()).collect()),
        };
        self.inner.post("/watchlists", &request).await
    }

    /// Replace a watchlist's name and/or symbols.
    pub async fn update(&self, watchlist_id: &str, request: &WatchlistRequest) -> Result<Watchlist> {
        self.inner
            .put(
                &format!("/watchlists/{}", urlencoding::encode(watchlist_id)),
                request,
            )
            .await
    }

    /// Append a symbol to a watchlist.
    pub async fn add_symbol(&self, watchlist_id: &str, symbol: &Symbol) -> Result<Watchlist> {
        #[derive(serde::Serialize)]
        struct Request<'a> {
            symbol: &'a str,
        }

        self.inner
            .post(
                &format!("/watchlists/{}", urlencoding::encode(watchlist_id)),
                &Request {
                    symbol: symbol.as_str(),
                },
            )
            .await
    }

    /// Remove a symbol from a watchlist.
    pub async fn remove_symbol(&self, watchlist_id: &str, symbol: &Symbol) -> Result<()> {
        self.inner
            .delete(
                &format!(
                    "/watchlists/{}/{}",
                    urlencoding::encode(watchlist_id),
                    symbol.path_segment()
                ),
                None,
            )
            .await?;
        Ok(())
    }

    /// Delete a watchlist.
    pub async fn delete(&self, watchlist_id: &str) -> Result<()> {
        self.inner
            .delete(&format!("/watchlists/{}", urlencoding::encode(watchlist_id)), None)
            .await?;
        Ok(())
    }
}
