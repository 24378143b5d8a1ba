//! Account service for account state and configuration.

use std::sync::Arc;

use crate::client::ClientInner;
use crate::models::{Account, AccountConfigurations};
use crate::Result;

/// Service for account-related operations.
///
/// # Example
///
/// ```no_run
/// # async fn example(client: alpaca_trade_rs::AlpacaClient) -> alpaca_trade_rs::Result<()> {
/// let account = client.accounts().get().await?;
/// println!("Equity: {} {}", account.equity, account.currency);
///
/// let config = client.accounts().configurations().await?;
/// println!("Shorting disabled: {:?}", config.no_shorting);
/// # Ok(())
/// # }
/// ```
pub struct AccountsService {
    inner: Arc<ClientInner>,
}

impl AccountsService {
    pub(crate) fn new(inner: Arc<ClientInner>) -> Self {
        Self { inner }
    }

    /// Get the trading account.
    pub async fn get(&self) -> Result<Account> {
        self.inner.get("/account", None).await
    }

    /// Get the account's trading configuration.
    pub async fn configurations(&self) -> Result<AccountConfigurations> {
        self.inner.get("/account/configurations", None).await
    }

    /// Update the account's trading configuration.
    ///
    /// Only the fields set in `update` are changed. Returns the full
    /// configuration after the update.
    pub async fn update_configurations(
        &self,
        update: &AccountConfigurations,
    ) -> Result<AccountConfigurations> {
        self.inner.patch("/account/configurations", update).await
    }
}
