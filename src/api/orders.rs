//! Orders service for order placement and management.

use std::sync::Arc;

use chrono::{DateTime, Utc};

use crate::client::{ClientInner, Params};
use crate::models::{
    map_list, BulkOrderResponse, NewOrder, Order, OrderId, OrderQueryStatus,
    ReplaceOrder, SortDirection,
};
use crate::Result;

/// Service for order operations.
///
/// # Example
///
/// ```no_run
/// use alpaca_trade_rs::models::{NewOrderBuilder, OrderClass, OrderSide, OrderType, TimeInForce};
/// use rust_decimal_macros::dec;
///
/// # async fn example(client: alpaca_trade_rs::AlpacaClient) -> alpaca_trade_rs::Result<()> {
/// // Build a bracket order
/// let order = NewOrderBuilder::new("AAPL", OrderSide::Buy)
///     .qty(dec!(10))
///     .order_type(OrderType::Limit)
///     .limit_price(dec!(150.00))
///     .time_in_force(TimeInForce::Gtc)
///     .order_class(OrderClass::Bracket)
///     .take_profit(dec!(170.00))
///     .stop_loss(dec!(140.00), None)
///     .build()?;
///
/// let placed = client.orders().submit(&order).await?;
/// println!("Order {} is {:?}", placed.id, placed.status);
///
/// client.orders().cancel(&placed.id.as_str().into()).await?;
/// # Ok(())
/// # }
/// ```
pub struct OrdersService {
    inner: Arc<ClientInner>,
}

/// Query parameters for listing orders.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct OrdersQuery {
    /// Filter by status (API default: open)
    pub status: Option<OrderQueryStatus>,
    /// Maximum number of orders (API default 50, max 500)
    pub limit: Option<u32>,
    /// Only orders submitted after this time
    pub after: Option<DateTime<Utc>>,
    /// Only orders submitted until this time
    pub until: Option<DateTime<Utc>>,
    /// Chronological order of the results
    pub direction: Option<SortDirection>,
    /// Roll up multi-leg orders under their parent
    pub nested: Option<bool>,
    /// Only orders for these symbols
    pub symbols: Option<Vec<String>>,
}

impl OrdersQuery {
    fn to_params(&self) -> Params {
        Params::new()
            .with("status", self.status.map(|s| s.as_str()))
            .with("limit", self.limit)
            .with("after", self.after)
            .with("until", self.until)
            .with("direction", self.direction.map(|d| d.as_str()))
            .with("nested", self.nested)
            .with("symbols", self.symbols.clone())
    }
}

impl OrdersService {
    pub(crate) fn new(inner: Arc<ClientInner>) -> Self {
        Self { inner }
    }

    /// List orders with optional filters.
    pub async fn list(&self, query: &OrdersQuery) -> Result<Vec<Order>> {
        let params = query.to_params();
        self.inner.get_list("/orders", Some(&params)).await
    }

    /// Submit a new order.
    ///
    /// Bracket, OCO and OTO orders are sent as a single request carrying
    /// their take-profit and stop-loss legs.
    pub async fn submit(&self, order: &NewOrder) -> Result<Order> {
        self.inner.post("/orders", order).await
    }

    /// Get a specific order by ID.
    pub async fn get(&self, order_id: &OrderId) -> Result<Order> {
        self.inner
            .get(&format!("/orders/{}", urlencoding::encode(order_id.as_str())), None)
            .await
    }

    /// Get an order by the identifier the client assigned at submission.
    pub async fn get_by_client_order_id(&self, client_order_id: &str) -> Result<Order> {
        let params = Params::new().with("client_order_id", client_order_id);
        self.inner
            .get("/orders:by_client_order_id", Some(&params))
            .await
    }

    /// Replace a working order.
    ///
    /// The API creates a new order and cancels the old one; the returned
    /// order carries the new ID.
    pub async fn replace(&self, order_id: &OrderId, changes: &ReplaceOrder) -> Result<Order> {
        self.inner
            .patch(
                &format!("/orders/{}", urlencoding::encode(order_id.as_str())),
                changes,
            )
            .await
    }

    /// Cancel an order.
    pub async fn cancel(&self, order_id: &OrderId) -> Result<()> {
        self.inner
            .delete(
                &format!("/orders/{}", urlencoding::encode(order_id.as_str())),
                None,
            )
            .await?;
        Ok(())
    }

    /// Cancel all open orders.
    ///
    /// Each entry of the result reports the outcome for one order.
    pub async fn cancel_all(&self) -> Result<Vec<BulkOrderResponse>> {
        let value = self.inner.delete("/orders", None).await?;
        map_list(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_orders_query_params() {
        let query = OrdersQuery {
            status: Some(OrderQueryStatus::All),
            limit: Some(100),
            after: Some(Utc.with_ymd_and_hms(2021, 1, 1, 0, 0, 0).unwrap()),
            direction: Some(SortDirection::Asc),
            symbols: Some(vec!["AAPL".into(), "TSLA".into()]),
            ..Default::default()
        };
        assert_eq!(
            query.to_params().to_query_string(),
            "status=all&limit=100&after=2021-01-01T00%3A00%3A00Z&direction=asc&symbols=AAPL%2CTSLA"
        );
        assert!(OrdersQuery::default().to_params().to_query_string().is_empty());
    }
}
