//! Historical market data example.
//!
//! This example streams daily bars for several symbols across pages, then
//! prints the latest quote and a snapshot.
//!
//! Run with: cargo run --example fetch_bars

use chrono::{Duration, Utc};
use futures_util::TryStreamExt;

use alpaca_trade_rs::api::BarsQuery;
use alpaca_trade_rs::models::{Adjustment, TimeFrame};
use alpaca_trade_rs::AlpacaClient;

#[tokio::main]
async fn main() -> alpaca_trade_rs::Result<()> {
    // Initialize logging
    tracing_subscriber::fmt::init();

    let client = AlpacaClient::from_env()?;
    let market_data = client.market_data();

    let query = BarsQuery::new(TimeFrame::DAY)
        .start(Utc::now() - Duration::days(90))
        .adjustment(Adjustment::All)
        .limit(500)
        .page_limit(100);

    println!("Fetching daily bars...");
    let mut bars = market_data.bars_stream(["AAPL", "MSFT", "SPY"], &query)?;
    let mut count = 0;
    while let Some(bar) = bars.try_next().await? {
        count += 1;
        if count <= 5 {
            println!(
                "  {} {} o={:.2} h={:.2} l={:.2} c={:.2} v={}",
                bar.symbol,
                bar.timestamp.date_naive(),
                bar.open,
                bar.high,
                bar.low,
                bar.close,
                bar.volume
            );
        }
    }
    let state = bars.state();
    println!("Received {} bars in {} page(s)", state.emitted, state.pages);

    let quote = market_data.latest_quote(&"AAPL".into()).await?;
    println!(
        "\nAAPL quote: bid {:.2} x {} / ask {:.2} x {}",
        quote.bid_price, quote.bid_size, quote.ask_price, quote.ask_size
    );

    let snapshot = market_data.snapshot(&"SPY".into()).await?;
    if let Some(daily) = snapshot.daily_bar {
        println!("SPY today: open {:.2}, close {:.2}", daily.open, daily.close);
    }

    Ok(())
}
