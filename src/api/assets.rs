//! Assets service.

use std::sync::Arc;

use crate::client::{ClientInner, Params};
use crate::models::{Asset, AssetClass, AssetStatus, Symbol};
use crate::Result;

/// Service for the asset master.
///
/// # Example
///
/// ```no_run
/// use alpaca_trade_rs::models::{AssetClass, AssetStatus};
///
/// # async fn example(client: alpaca_trade_rs::AlpacaClient) -> alpaca_trade_rs::Result<()> {
/// let assets = client
///     .assets()
///     .list(Some(AssetStatus::Active), Some(AssetClass::UsEquity))
///     .await?;
/// let shortable = assets.iter().filter(|a| a.shortable == Some(true)).count();
/// println!("{shortable} of {} active equities are shortable", assets.len());
/// # Ok(())
/// # }
/// ```
pub struct AssetsService {
    inner: Arc<ClientInner>,
}

impl AssetsService {
    pub(crate) fn new(inner: Arc<ClientInner>) -> Self {
        Self { inner }
    }

    /// List assets, optionally filtered by status and class.
    pub async fn list(
        &self,
        status: Option<AssetStatus>,
        asset_class: Option<AssetClass>,
    ) -> Result<Vec<Asset>> {
        let params = Params::new()
            .with("status", status.map(|s| s.as_str()))
            .with("asset_class", asset_class.as_ref().map(AssetClass::as_str));
        self.inner.get_list("/assets", Some(&params)).await
    }

    /// Get an asset by symbol or asset ID.
    pub async fn get(&self, symbol: &Symbol) -> Result<Asset> {
        self.inner
            .get(&format!("/assets/{}", symbol.path_segment()), None)
            .await
    }
}
