//! Order models for placing and managing trades.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use super::enums::*;
use super::mapper::{json_kind, require_fields, Entity};
use super::timestamp;
use crate::{Error, Result};

/// An order as reported by the API.
///
/// Bracket, OCO and OTO orders carry their child orders in [`legs`](Order::legs),
/// each mapped with the same rules as the parent.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Order {
    /// Server-assigned order ID
    pub id: String,
    /// Client-assigned order ID
    pub client_order_id: String,
    /// When the order was created
    #[serde(with = "timestamp")]
    pub created_at: DateTime<Utc>,
    /// Last update
    #[serde(default, with = "timestamp::option")]
    pub updated_at: Option<DateTime<Utc>>,
    /// When the order was submitted
    #[serde(default, with = "timestamp::option")]
    pub submitted_at: Option<DateTime<Utc>>,
    /// When the order was filled
    #[serde(default, with = "timestamp::option")]
    pub filled_at: Option<DateTime<Utc>>,
    /// When the order expired
    #[serde(default, with = "timestamp::option")]
    pub expired_at: Option<DateTime<Utc>>,
    /// When the order was cancelled
    #[serde(default, with = "timestamp::option")]
    pub canceled_at: Option<DateTime<Utc>>,
    /// When the order failed
    #[serde(default, with = "timestamp::option")]
    pub failed_at: Option<DateTime<Utc>>,
    /// When the order was replaced
    #[serde(default, with = "timestamp::option")]
    pub replaced_at: Option<DateTime<Utc>>,
    /// ID of the order that replaced this one
    #[serde(default)]
    pub replaced_by: Option<String>,
    /// ID of the order this one replaced
    #[serde(default)]
    pub replaces: Option<String>,
    /// Asset ID
    #[serde(default)]
    pub asset_id: Option<String>,
    /// Symbol
    pub symbol: String,
    /// Asset class
    #[serde(default)]
    pub asset_class: Option<AssetClass>,
    /// Dollar amount for notional orders
    #[serde(default)]
    pub notional: Option<Decimal>,
    /// Share quantity (absent for notional orders)
    #[serde(default)]
    pub qty: Option<Decimal>,
    /// Filled quantity
    #[serde(default)]
    pub filled_qty: Option<Decimal>,
    /// Average fill price
    #[serde(default)]
    pub filled_avg_price: Option<Decimal>,
    /// Order class
    #[serde(default)]
    pub order_class: Option<OrderClass>,
    /// Order type
    #[serde(rename = "type")]
    pub order_type: OrderType,
    /// Side
    pub side: OrderSide,
    /// Time in force
    pub time_in_force: TimeInForce,
    /// Limit price
    #[serde(default)]
    pub limit_price: Option<Decimal>,
    /// Stop price
    #[serde(default)]
    pub stop_price: Option<Decimal>,
    /// Trailing stop distance in dollars
    #[serde(default)]
    pub trail_price: Option<Decimal>,
    /// Trailing stop distance in percent
    #[serde(default)]
    pub trail_percent: Option<Decimal>,
    /// High water mark for trailing stops
    #[serde(default)]
    pub hwm: Option<Decimal>,
    /// Status
    pub status: OrderStatus,
    /// Eligible for pre/post market
    #[serde(default)]
    pub extended_hours: Option<bool>,
    /// Child orders
    #[serde(default)]
    pub legs: Option<Vec<Order>>,
}

impl Entity for Order {
    const NAME: &'static str = "Order";
    const REQUIRED: &'static [&'static str] = &[
        "id",
        "client_order_id",
        "created_at",
        "symbol",
        "type",
        "side",
        "time_in_force",
        "status",
    ];

    fn validate(record: &Map<String, Value>) -> Result<()> {
        require_fields(Self::NAME, Self::REQUIRED, record)?;

        match record.get("legs") {
            None | Some(Value::Null) => Ok(()),
            Some(Value::Array(legs)) => legs.iter().try_for_each(|leg| {
                let leg = leg.as_object().ok_or_else(|| {
                    Error::mapping(
                        Self::NAME,
                        Some("legs"),
                        format!("expected an object, got {}", json_kind(leg)),
                    )
                })?;
                Self::validate(leg)
            }),
            Some(other) => Err(Error::mapping(
                Self::NAME,
                Some("legs"),
                format!("expected an array, got {}", json_kind(other)),
            )),
        }
    }
}

impl Order {
    /// Iterate over the child orders, if any.
    pub fn legs(&self) -> impl Iterator<Item = &Order> {
        self.legs.iter().flatten()
    }
}

/// Take-profit leg of a bracket or OCO order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TakeProfit {
    /// Limit price of the exit
    pub limit_price: Decimal,
}

/// Stop-loss leg of a bracket, OCO or OTO order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StopLoss {
    /// Stop trigger price
    pub stop_price: Decimal,
    /// Optional limit price, making it a stop-limit
    #[serde(skip_serializing_if = "Option::is_none")]
    pub limit_price: Option<Decimal>,
}

/// A new order to be submitted.
///
/// Use [`NewOrderBuilder`] to construct and validate one.
///
/// # Example
///
/// ```
/// use alpaca_trade_rs::models::{NewOrderBuilder, OrderSide, OrderType, TimeInForce};
/// use rust_decimal_macros::dec;
///
/// let order = NewOrderBuilder::new("AAPL", OrderSide::Buy)
///     .qty(dec!(10))
///     .order_type(OrderType::Limit)
///     .limit_price(dec!(150.00))
///     .time_in_force(TimeInForce::Day)
///     .build()
///     .unwrap();
/// assert_eq!(order.symbol, "AAPL");
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewOrder {
    /// Symbol to trade
    pub symbol: String,
    /// Share quantity
    #[serde(skip_serializing_if = "Option::is_none")]
    pub qty: Option<Decimal>,
    /// Dollar amount (market day orders only)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notional: Option<Decimal>,
    /// Side
    pub side: OrderSide,
    /// Order type
    #[serde(rename = "type")]
    pub order_type: OrderType,
    /// Time in force
    pub time_in_force: TimeInForce,
    /// Limit price
    #[serde(skip_serializing_if = "Option::is_none")]
    pub limit_price: Option<Decimal>,
    /// Stop price
    #[serde(skip_serializing_if = "Option::is_none")]
    pub stop_price: Option<Decimal>,
    /// Trailing stop distance in dollars
    #[serde(skip_serializing_if = "Option::is_none")]
    pub trail_price: Option<Decimal>,
    /// Trailing stop distance in percent
    #[serde(skip_serializing_if = "Option::is_none")]
    pub trail_percent: Option<Decimal>,
    /// Eligible for pre/post market
    #[serde(skip_serializing_if = "Option::is_none")]
    pub extended_hours: Option<bool>,
    /// Client-assigned identifier
    #[serde(skip_serializing_if = "Option::is_none")]
    pub client_order_id: Option<String>,
    /// Order class
    #[serde(skip_serializing_if = "Option::is_none")]
    pub order_class: Option<OrderClass>,
    /// Take-profit leg
    #[serde(skip_serializing_if = "Option::is_none")]
    pub take_profit: Option<TakeProfit>,
    /// Stop-loss leg
    #[serde(skip_serializing_if = "Option::is_none")]
    pub stop_loss: Option<StopLoss>,
}

/// Builder for creating new orders with validation.
#[derive(Debug, Clone)]
pub struct NewOrderBuilder {
    symbol: String,
    side: OrderSide,
    qty: Option<Decimal>,
    notional: Option<Decimal>,
    order_type: OrderType,
    time_in_force: TimeInForce,
    limit_price: Option<Decimal>,
    stop_price: Option<Decimal>,
    trail_price: Option<Decimal>,
    trail_percent: Option<Decimal>,
    extended_hours: Option<bool>,
    client_order_id: Option<String>,
    order_class: Option<OrderClass>,
    take_profit: Option<TakeProfit>,
    stop_loss: Option<StopLoss>,
}

impl NewOrderBuilder {
    /// Start a market day order.
    pub fn new(symbol: impl Into<String>, side: OrderSide) -> Self {
        Self {
            symbol: symbol.into(),
            side,
            qty: None,
            notional: None,
            order_type: OrderType::Market,
            time_in_force: TimeInForce::Day,
            limit_price: None,
            stop_price: None,
            trail_price: None,
            trail_percent: None,
            extended_hours: None,
            client_order_id: None,
            order_class: None,
            take_profit: None,
            stop_loss: None,
        }
    }

    /// Set the share quantity.
    pub fn qty(mut self, qty: Decimal) -> Self {
        self.qty = Some(qty);
        self
    }

    /// Set a dollar amount instead of a quantity.
    pub fn notional(mut self, notional: Decimal) -> Self {
        self.notional = Some(notional);
        self
    }

    /// Set the order type.
    pub fn order_type(mut self, order_type: OrderType) -> Self {
        self.order_type = order_type;
        self
    }

    /// Set the time in force.
    pub fn time_in_force(mut self, tif: TimeInForce) -> Self {
        self.time_in_force = tif;
        self
    }

    /// Set the limit price.
    pub fn limit_price(mut self, price: Decimal) -> Self {
        self.limit_price = Some(price);
        self
    }

    /// Set the stop price.
    pub fn stop_price(mut self, price: Decimal) -> Self {
        self.stop_price = Some(price);
        self
    }

    /// Set a trailing distance in dollars.
    pub fn trail_price(mut self, price: Decimal) -> Self {
        self.trail_price = Some(price);
        self
    }

    /// Set a trailing distance in percent.
    pub fn trail_percent(mut self, percent: Decimal) -> Self {
        self.trail_percent = Some(percent);
        self
    }

    /// Allow execution in pre/post market.
    pub fn extended_hours(mut self, enabled: bool) -> Self {
        self.extended_hours = Some(enabled);
        self
    }

    /// Set a client-assigned identifier.
    pub fn client_order_id(mut self, id: impl Into<String>) -> Self {
        self.client_order_id = Some(id.into());
        self
    }

    /// Set the order class explicitly.
    pub fn order_class(mut self, class: OrderClass) -> Self {
        self.order_class = Some(class);
        self
    }

    /// Attach a take-profit leg.
    pub fn take_profit(mut self, limit_price: Decimal) -> Self {
        self.take_profit = Some(TakeProfit { limit_price });
        self
    }

    /// Attach a stop-loss leg.
    pub fn stop_loss(mut self, stop_price: Decimal, limit_price: Option<Decimal>) -> Self {
        self.stop_loss = Some(StopLoss {
            stop_price,
            limit_price,
        });
        self
    }

    /// Build the order.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - neither or both of `qty` and `notional` are set
    /// - the prices required by the order type are missing
    /// - a bracket order lacks either exit leg
    pub fn build(self) -> Result<NewOrder> {
        if self.qty.is_some() == self.notional.is_some() {
            return Err(Error::InvalidInput(
                "Exactly one of qty or notional is required".to_string(),
            ));
        }

        match self.order_type {
            OrderType::Limit if self.limit_price.is_none() => {
                return Err(Error::InvalidInput(
                    "Limit orders require a limit price".to_string(),
                ))
            }
            OrderType::Stop if self.stop_price.is_none() => {
                return Err(Error::InvalidInput(
                    "Stop orders require a stop price".to_string(),
                ))
            }
            OrderType::StopLimit if self.stop_price.is_none() || self.limit_price.is_none() => {
                return Err(Error::InvalidInput(
                    "Stop limit orders require stop and limit prices".to_string(),
                ))
            }
            OrderType::TrailingStop
                if self.trail_price.is_some() == self.trail_percent.is_some() =>
            {
                return Err(Error::InvalidInput(
                    "Trailing stop orders require exactly one of trail_price or trail_percent"
                        .to_string(),
                ))
            }
            _ => {}
        }

        if self.order_class == Some(OrderClass::Bracket)
            && (self.take_profit.is_none() || self.stop_loss.is_none())
        {
            return Err(Error::InvalidInput(
                "Bracket orders require take_profit and stop_loss".to_string(),
            ));
        }

        Ok(NewOrder {
            symbol: self.symbol,
            qty: self.qty,
            notional: self.notional,
            side: self.side,
            order_type: self.order_type,
            time_in_force: self.time_in_force,
            limit_price: self.limit_price,
            stop_price: self.stop_price,
            trail_price: self.trail_price,
            trail_percent: self.trail_percent,
            extended_hours: self.extended_hours,
            client_order_id: self.client_order_id,
            order_class: self.order_class,
            take_profit: self.take_profit,
            stop_loss: self.stop_loss,
        })
    }
}

/// Changes to apply to a working order.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ReplaceOrder {
    /// New quantity
    #[serde(skip_serializing_if = "Option::is_none")]
    pub qty: Option<Decimal>,
    /// New time in force
    #[serde(skip_serializing_if = "Option::is_none")]
    pub time_in_force: Option<TimeInForce>,
    /// New limit price
    #[serde(skip_serializing_if = "Option::is_none")]
    pub limit_price: Option<Decimal>,
    /// New stop price
    #[serde(skip_serializing_if = "Option::is_none")]
    pub stop_price: Option<Decimal>,
    /// New trailing distance
    #[serde(skip_serializing_if = "Option::is_none")]
    pub trail: Option<Decimal>,
    /// New client-assigned identifier
    #[serde(skip_serializing_if = "Option::is_none")]
    pub client_order_id: Option<String>,
}

/// One entry of a bulk cancel or bulk close response.
///
/// Each entry carries its own HTTP status; `body` holds the affected order
/// on success or an error message otherwise.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BulkOrderResponse {
    /// Order ID (bulk cancel)
    #[serde(default)]
    pub id: Option<String>,
    /// Symbol (bulk close)
    #[serde(default)]
    pub symbol: Option<String>,
    /// Per-entry HTTP status
    pub status: u16,
    /// Order or error payload
    #[serde(default)]
    pub body: Value,
}

impl BulkOrderResponse {
    /// Returns `true` if this entry succeeded.
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }

    /// Map the body as an [`Order`], if it is one.
    pub fn order(&self) -> Option<Order> {
        Order::from_value(self.body.clone()).ok()
    }
}

impl Entity for BulkOrderResponse {
    const NAME: &'static str = "BulkOrderResponse";
    const REQUIRED: &'static [&'static str] = &["status"];
}
