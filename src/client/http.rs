//! HTTP client implementation for the Alpaca API.

use std::sync::Arc;

use reqwest::Method;
use serde::Serialize;
use serde_json::Value;
use tracing::{debug, warn};

use crate::api::{
    AccountsService, ActivitiesService, AssetsService, CalendarService, MarketDataService,
    OrdersService, PortfolioService, PositionsService, WatchlistsService,
};
use crate::models::{map_list, Entity};
use crate::{Error, Result};

use super::config::{expose, ClientConfig};
use super::params::Params;
use super::transport::{HttpRequest, ReqwestTransport, Transport};

/// Which API host a request goes to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BaseUrl {
    /// Trading API (account, orders, positions, ...)
    Trading,
    /// Market data API (bars, trades, quotes, ...)
    Data,
}

/// The main client for interacting with the Alpaca API.
///
/// This client provides access to all API services through method calls
/// that return service structs. The client owns the configuration and the
/// transport; cloning it is cheap.
///
/// # Example
///
/// ```no_run
/// use alpaca_trade_rs::AlpacaClient;
///
/// # async fn example() -> alpaca_trade_rs::Result<()> {
/// // Credentials come from APCA_API_KEY_ID / APCA_API_SECRET_KEY
/// let client = AlpacaClient::from_env()?;
///
/// let account = client.accounts().get().await?;
/// println!("Buying power: {}", account.buying_power);
///
/// let orders = client.orders().list(&Default::default()).await?;
/// println!("{} open orders", orders.len());
/// # Ok(())
/// # }
/// ```
pub struct AlpacaClient {
    pub(crate) inner: Arc<ClientInner>,
}

pub(crate) struct ClientInner {
    pub(crate) transport: Arc<dyn Transport>,
    pub(crate) config: ClientConfig,
}

impl AlpacaClient {
    /// Create a client that talks HTTP through `reqwest`.
    pub fn new(config: ClientConfig) -> Result<Self> {
        let transport = ReqwestTransport::new(&config)?;
        Ok(Self::with_transport(config, Arc::new(transport)))
    }

    /// Create a client configured entirely from `APCA_*` environment variables.
    pub fn from_env() -> Result<Self> {
        Self::new(ClientConfig::from_env()?)
    }

    /// Create a client with a custom transport.
    pub fn with_transport(config: ClientConfig, transport: Arc<dyn Transport>) -> Self {
        Self {
            inner: Arc::new(ClientInner { transport, config }),
        }
    }

    /// Get the account service.
    pub fn accounts(&self) -> AccountsService {
        AccountsService::new(self.inner.clone())
    }

    /// Get the orders service.
    pub fn orders(&self) -> OrdersService {
        OrdersService::new(self.inner.clone())
    }

    /// Get the positions service.
    pub fn positions(&self) -> PositionsService {
        PositionsService::new(self.inner.clone())
    }

    /// Get the assets service.
    pub fn assets(&self) -> AssetsService {
        AssetsService::new(self.inner.clone())
    }

    /// Get the account activities service.
    pub fn activities(&self) -> ActivitiesService {
        ActivitiesService::new(self.inner.clone())
    }

    /// Get the market clock and calendar service.
    pub fn calendar(&self) -> CalendarService {
        CalendarService::new(self.inner.clone())
    }

    /// Get the watchlists service.
    pub fn watchlists(&self) -> WatchlistsService {
        WatchlistsService::new(self.inner.clone())
    }

    /// Get the portfolio history service.
    pub fn portfolio(&self) -> PortfolioService {
        PortfolioService::new(self.inner.clone())
    }

    /// Get the historical market data service.
    pub fn market_data(&self) -> MarketDataService {
        MarketDataService::new(self.inner.clone())
    }

    /// Send a raw request and return the decoded JSON body.
    ///
    /// Useful for endpoints without a dedicated wrapper. Retries and
    /// parameter encoding behave exactly as for the typed services.
    pub async fn request(
        &self,
        method: Method,
        path: &str,
        params: Option<&Params>,
        base: BaseUrl,
    ) -> Result<Value> {
        self.inner.dispatch(method, path, params, base).await
    }

    /// Get the client configuration.
    pub fn config(&self) -> &ClientConfig {
        &self.inner.config
    }
}

impl ClientInner {
    fn base_url(&self, base: BaseUrl) -> &str {
        match base {
            BaseUrl::Trading => &self.config.base_url,
            BaseUrl::Data => &self.config.data_url,
        }
    }

    /// Build request headers with authentication.
    fn build_headers(&self, request: HttpRequest) -> HttpRequest {
        match &self.config.oauth_token {
            Some(token) => request.with_header("Authorization", format!("Bearer {}", expose(token))),
            None => request
                .with_header("APCA-API-KEY-ID", self.config.key_id.as_str())
                .with_header("APCA-API-SECRET-KEY", expose(&self.config.secret_key)),
        }
    }

    /// Resolve URL, headers and body for one call.
    pub(crate) fn build_request(
        &self,
        method: Method,
        path: &str,
        params: Option<&Params>,
        base: BaseUrl,
    ) -> Result<HttpRequest> {
        let separator = if path.starts_with('/') { "" } else { "/" };
        let mut url = format!(
            "{}/{}{}{}",
            self.base_url(base),
            self.config.api_version,
            separator,
            path
        );
        let mut body = None;

        if let Some(params) = params {
            if method == Method::POST || method == Method::PUT || method == Method::PATCH {
                body = Some(serde_json::to_string(&params.to_json_body())?);
            } else {
                let query = params.to_query_string();
                if !query.is_empty() {
                    url.push('?');
                    url.push_str(&query);
                }
            }
        }

        // Reject malformed base URLs before they reach the transport.
        url::Url::parse(&url)?;

        let mut request = self.build_headers(HttpRequest::new(method, url));
        if let Some(body) = body {
            request = request
                .with_header("Content-Type", "application/json")
                .with_body(body);
        }
        Ok(request)
    }

    /// Send a request, retrying configured statuses, and decode the body.
    pub(crate) async fn dispatch(
        &self,
        method: Method,
        path: &str,
        params: Option<&Params>,
        base: BaseUrl,
    ) -> Result<Value> {
        let request = self.build_request(method, path, params, base)?;
        let retry = &self.config.retry;
        let mut remaining = retry.max_retries;
        let mut attempts: u32 = 0;

        loop {
            attempts += 1;
            debug!(
                method = %request.method,
                url = %request.url,
                body = request.body.as_deref().unwrap_or(""),
                attempt = attempts,
                "Sending request"
            );

            let response = self.transport.send(request.clone()).await?;

            if response.is_success() {
                return response.json();
            }

            if retry.should_retry_status(response.status) {
                if remaining == 0 {
                    return Err(Error::RetriesExhausted {
                        status: response.status,
                        attempts,
                        body: response.error_body(),
                    });
                }
                warn!(
                    status = response.status,
                    "sleep {:.1} seconds and retrying {} {} more time(s)",
                    retry.wait.as_secs_f64(),
                    request.url,
                    remaining
                );
                tokio::time::sleep(retry.wait).await;
                remaining -= 1;
                continue;
            }

            return Err(Error::from_api_response(response.status, response.error_body()));
        }
    }

    /// Make a GET request against the trading API.
    pub(crate) async fn get<T: Entity>(&self, path: &str, params: Option<&Params>) -> Result<T> {
        let value = self.dispatch(Method::GET, path, params, BaseUrl::Trading).await?;
        T::from_value(value)
    }

    /// Make a GET request against the trading API returning a list.
    pub(crate) async fn get_list<T: Entity>(
        &self,
        path: &str,
        params: Option<&Params>,
    ) -> Result<Vec<T>> {
        let value = self.dispatch(Method::GET, path, params, BaseUrl::Trading).await?;
        map_list(value)
    }

    /// Make a POST request.
    pub(crate) async fn post<T: Entity, B: Serialize>(&self, path: &str, body: &B) -> Result<T> {
        let params = Params::from_serialize(body)?;
        let value = self
            .dispatch(Method::POST, path, Some(&params), BaseUrl::Trading)
            .await?;
        T::from_value(value)
    }

    /// Make a PUT request.
    pub(crate) async fn put<T: Entity, B: Serialize>(&self, path: &str, body: &B) -> Result<T> {
        let params = Params::from_serialize(body)?;
        let value = self
            .dispatch(Method::PUT, path, Some(&params), BaseUrl::Trading)
            .await?;
        T::from_value(value)
    }

    /// Make a PATCH request.
    pub(crate) async fn patch<T: Entity, B: Serialize>(&self, path: &str, body: &B) -> Result<T> {
        let params = Params::from_serialize(body)?;
        let value = self
            .dispatch(Method::PATCH, path, Some(&params), BaseUrl::Trading)
            .await?;
        T::from_value(value)
    }

    /// Make a DELETE request, returning the raw body (often empty).
    pub(crate) async fn delete(&self, path: &str, params: Option<&Params>) -> Result<Value> {
        self.dispatch(Method::DELETE, path, params, BaseUrl::Trading)
            .await
    }

    /// Make a GET request against the market data API.
    pub(crate) async fn data_get(&self, path: &str, params: Option<&Params>) -> Result<Value> {
        self.dispatch(Method::GET, path, params, BaseUrl::Data).await
    }
}

impl Clone for AlpacaClient {
    fn clone(&self) -> Self {
        Self {
            inner: self.inner.clone(),
        }
    }
}

impl std::fmt::Debug for AlpacaClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AlpacaClient")
            .field("config", &self.inner.config)
            .finish()
    }
}
