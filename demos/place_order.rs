//! Order placement example.
//!
//! This example places a bracket order on the paper trading environment,
//! looks it up again by client order ID, and cancels it.
//!
//! Run with: cargo run --example place_order

use alpaca_trade_rs::models::{NewOrderBuilder, OrderClass, OrderSide, OrderType, TimeInForce};
use alpaca_trade_rs::{AlpacaClient, ClientConfig, Environment};
use rust_decimal_macros::dec;

#[tokio::main]
async fn main() -> alpaca_trade_rs::Result<()> {
    // Initialize logging
    tracing_subscriber::fmt::init();

    // Credentials come from APCA_API_KEY_ID / APCA_API_SECRET_KEY.
    // Always use the paper environment for examples!
    let config = ClientConfig::builder()
        .environment(Environment::Paper)
        .build()?;
    let client = AlpacaClient::new(config)?;

    let clock = client.calendar().clock().await?;
    if !clock.is_open {
        println!("Market is closed, next open at {}", clock.next_open);
    }

    // Buy 1 share of SPY with a take-profit and a stop-loss exit
    let order = NewOrderBuilder::new("SPY", OrderSide::Buy)
        .qty(dec!(1))
        .order_type(OrderType::Limit)
        .limit_price(dec!(400.00))
        .time_in_force(TimeInForce::Gtc)
        .order_class(OrderClass::Bracket)
        .take_profit(dec!(440.00))
        .stop_loss(dec!(380.00), None)
        .client_order_id("demo-bracket-1")
        .build()?;

    println!("Submitting order...");
    let placed = client.orders().submit(&order).await?;
    println!("  ID: {}", placed.id);
    println!("  Status: {:?}", placed.status);
    for leg in placed.legs() {
        println!("  Leg {} {:?} {:?}", leg.id, leg.order_type, leg.status);
    }

    let fetched = client
        .orders()
        .get_by_client_order_id("demo-bracket-1")
        .await?;
    println!("Fetched by client ID: {} ({:?})", fetched.id, fetched.status);

    println!("Cancelling...");
    client.orders().cancel(&placed.id.as_str().into()).await?;

    println!("Done!");
    Ok(())
}
