//! Positions service.

use std::sync::Arc;

use rust_decimal::Decimal;

use crate::client::{ClientInner, Params};
use crate::models::{map_entity, map_list, BulkOrderResponse, Order, Position, Symbol};
use crate::{Error, Result};

/// How much of a position to close.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum CloseAmount {
    /// The whole position
    #[default]
    All,
    /// A number of shares
    Qty(Decimal),
    /// A percentage of the position, 0 to 100
    Percentage(Decimal),
}

impl CloseAmount {
    fn to_params(self) -> Result<Params> {
        match self {
            CloseAmount::All => Ok(Params::new()),
            CloseAmount::Qty(qty) if qty > Decimal::ZERO => Ok(Params::new().with("qty", qty)),
            CloseAmount::Percentage(pct) if pct > Decimal::ZERO && pct <= Decimal::ONE_HUNDRED => {
                Ok(Params::new().with("percentage", pct))
            }
            CloseAmount::Qty(qty) => Err(Error::InvalidInput(format!(
                "Close quantity must be positive, got {qty}"
            ))),
            CloseAmount::Percentage(pct) => Err(Error::InvalidInput(format!(
                "Close percentage must be in (0, 100], got {pct}"
            ))),
        }
    }
}

/// Service for open positions.
///
/// # Example
///
/// ```no_run
/// use alpaca_trade_rs::api::CloseAmount;
/// use rust_decimal_macros::dec;
///
/// # async fn example(client: alpaca_trade_rs::AlpacaClient) -> alpaca_trade_rs::Result<()> {
/// for position in client.positions().list().await? {
///     println!("{} {} @ {}", position.symbol, position.qty, position.avg_entry_price);
/// }
///
/// // Sell half of the AAPL position
/// client
///     .positions()
///     .close(&"AAPL".into(), CloseAmount::Percentage(dec!(50)))
///     .await?;
/// # Ok(())
/// # }
/// ```
pub struct PositionsService {
    inner: Arc<ClientInner>,
}

impl PositionsService {
    pub(crate) fn new(inner: Arc<ClientInner>) -> Self {
        Self { inner }
    }

    /// List open positions.
    pub async fn list(&self) -> Result<Vec<Position>> {
        self.inner.get_list("/positions", None).await
    }

    /// Get the open position in `symbol`.
    pub async fn get(&self, symbol: &Symbol) -> Result<Position> {
        self.inner
            .get(&format!("/positions/{}", symbol.path_segment()), None)
            .await
    }

    /// Close all or part of a position with a market order.
    pub async fn close(&self, symbol: &Symbol, amount: CloseAmount) -> Result<Order> {
        let params = amount.to_params()?;
        let value = self
            .inner
            .delete(
                &format!("/positions/{}", symbol.path_segment()),
                Some(&params),
            )
            .await?;
        map_entity(value)
    }

    /// Close every open position, optionally cancelling open orders first.
    pub async fn close_all(&self, cancel_orders: bool) -> Result<Vec<BulkOrderResponse>> {
        let params = Params::new().with("cancel_orders", cancel_orders);
        let value = self.inner.delete("/positions", Some(&params)).await?;
        map_list(value)
    }
}
