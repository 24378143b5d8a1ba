//! Account overview example.
//!
//! Prints the account balances, open positions, open orders and the most
//! recent fills.
//!
//! Run with: cargo run --example account_overview

use alpaca_trade_rs::api::{ActivitiesQuery, OrdersQuery};
use alpaca_trade_rs::models::{Activity, OrderQueryStatus};
use alpaca_trade_rs::AlpacaClient;

#[tokio::main]
async fn main() -> alpaca_trade_rs::Result<()> {
    // Initialize logging
    tracing_subscriber::fmt::init();

    let client = AlpacaClient::from_env()?;

    let account = client.accounts().get().await?;
    println!("Account {} ({})", account.account_number, account.status);
    println!("  Cash:         {} {}", account.cash, account.currency);
    println!("  Equity:       {}", account.equity);
    println!("  Buying power: {}", account.buying_power);

    let positions = client.positions().list().await?;
    println!("\n{} position(s)", positions.len());
    for position in &positions {
        println!(
            "  {:<6} {:>8} @ {:<10} P/L {}",
            position.symbol,
            position.qty,
            position.avg_entry_price,
            position.unrealized_pl.unwrap_or_default()
        );
    }

    let open = client
        .orders()
        .list(&OrdersQuery {
            status: Some(OrderQueryStatus::Open),
            ..Default::default()
        })
        .await?;
    println!("\n{} open order(s)", open.len());
    for order in &open {
        println!("  {} {:?} {} {:?}", order.id, order.side, order.symbol, order.status);
    }

    let fills = client
        .activities()
        .list(&ActivitiesQuery {
            page_size: Some(10),
            ..ActivitiesQuery::of_type("FILL")
        })
        .await?;
    println!("\nRecent fills");
    for activity in fills {
        if let Activity::Trade(fill) = activity {
            println!(
                "  {} {:?} {} {} @ {}",
                fill.transaction_time, fill.side, fill.qty, fill.symbol, fill.price
            );
        }
    }

    Ok(())
}
