//! Integration tests for paginated market data and the latest/snapshot
//! endpoints.
//!
//! Run with: cargo test --test pagination_tests

mod common;

use futures_util::{StreamExt, TryStreamExt};
use serde_json::{json, Value};

use alpaca_trade_rs::api::{BarsQuery, TicksQuery};
use alpaca_trade_rs::client::{DataEndpoint, Params};
use alpaca_trade_rs::models::TimeFrame;
use alpaca_trade_rs::prelude::*;

use common::{bar_json, client_with, query_value, split_url, MockTransport};

fn bars_page(bars: Vec<Value>, token: Option<&str>) -> Value {
    json!({"bars": bars, "symbol": "AAPL", "next_page_token": token})
}

// =============================================================================
// Cursor following
// =============================================================================

mod cursors {
    use super::*;

    #[tokio::test]
    async fn test_follows_tokens_until_null() {
        let mock = MockTransport::new()
            .respond_json(
                200,
                bars_page(
                    vec![
                        bar_json("2021-02-01T16:01:00Z", 133.0),
                        bar_json("2021-02-01T16:02:00Z", 134.0),
                    ],
                    Some("tok1"),
                ),
            )
            .respond_json(
                200,
                bars_page(vec![bar_json("2021-02-01T16:03:00Z", 135.0)], Some("tok2")),
            )
            .respond_json(
                200,
                bars_page(vec![bar_json("2021-02-01T16:04:00Z", 136.0)], None),
            );
        let (client, mock) = client_with(mock, 0);

        let bars = client
            .market_data()
            .bars("AAPL", &BarsQuery::new(TimeFrame::MINUTE))
            .await
            .unwrap();

        let closes: Vec<f64> = bars.iter().map(|b| b.close).collect();
        assert_eq!(closes, vec![133.0, 134.0, 135.0, 136.0]);
        assert!(bars.iter().all(|b| b.symbol == "AAPL"));

        let requests = mock.requests();
        assert_eq!(requests.len(), 3);
        let (path, _) = split_url(&requests[0].url);
        assert_eq!(path, "/v2/stocks/AAPL/bars");
        assert!(requests[0].url.starts_with("https://data.test/"));
        assert_eq!(query_value(&requests[0].url, "page_token"), None);
        assert_eq!(query_value(&requests[0].url, "timeframe").as_deref(), Some("1Min"));
        assert_eq!(
            query_value(&requests[1].url, "page_token").as_deref(),
            Some("tok1")
        );
        assert_eq!(
            query_value(&requests[2].url, "page_token").as_deref(),
            Some("tok2")
        );
    }

    #[tokio::test]
    async fn test_empty_token_ends_stream() {
        let mock = MockTransport::new().respond_json(
            200,
            bars_page(vec![bar_json("2021-02-01T16:01:00Z", 133.0)], Some("")),
        );
        let (client, mock) = client_with(mock, 0);

        let bars = client
            .market_data()
            .bars("AAPL", &BarsQuery::new(TimeFrame::MINUTE))
            .await
            .unwrap();

        assert_eq!(bars.len(), 1);
        assert_eq!(mock.request_count(), 1);
    }

    #[tokio::test]
    async fn test_repeated_token_ends_stream() {
        let mock = MockTransport::new()
            .respond_json(
                200,
                bars_page(vec![bar_json("2021-02-01T16:01:00Z", 133.0)], Some("tok1")),
            )
            .respond_json(
                200,
                bars_page(vec![bar_json("2021-02-01T16:02:00Z", 134.0)], Some("tok1")),
            )
            .respond_json(
                200,
                bars_page(vec![bar_json("2021-02-01T16:02:00Z", 134.0)], Some("tok1")),
            );
        let (client, mock) = client_with(mock, 0);

        let bars = client
            .market_data()
            .bars("AAPL", &BarsQuery::new(TimeFrame::MINUTE))
            .await
            .unwrap();

        let closes: Vec<f64> = bars.iter().map(|b| b.close).collect();
        assert_eq!(closes, vec![133.0, 134.0]);
        assert_eq!(mock.request_count(), 2);
    }

    #[tokio::test]
    async fn test_null_page_data_yields_nothing() {
        let mock = MockTransport::new()
            .respond_json(200, json!({"bars": null, "symbol": "AAPL", "next_page_token": null}));
        let (client, _) = client_with(mock, 0);

        let bars = client
            .market_data()
            .bars("AAPL", &BarsQuery::new(TimeFrame::DAY))
            .await
            .unwrap();

        assert!(bars.is_empty());
    }

    #[tokio::test]
    async fn test_stream_is_lazy() {
        let mock = MockTransport::new()
            .respond_json(
                200,
                bars_page(vec![bar_json("2021-02-01T16:01:00Z", 133.0)], Some("tok1")),
            )
            .respond_json(
                200,
                bars_page(vec![bar_json("2021-02-01T16:02:00Z", 134.0)], None),
            );
        let (client, mock) = client_with(mock, 0);

        let mut stream = client
            .market_data()
            .bars_stream("AAPL", &BarsQuery::new(TimeFrame::MINUTE))
            .unwrap();
        assert_eq!(mock.request_count(), 0);

        let first = stream.try_next().await.unwrap().unwrap();
        assert_eq!(first.close, 133.0);
        assert_eq!(mock.request_count(), 1);
        assert_eq!(stream.state().page_token.as_deref(), Some("tok1"));

        let second = stream.try_next().await.unwrap().unwrap();
        assert_eq!(second.close, 134.0);
        assert_eq!(mock.request_count(), 2);

        assert!(stream.try_next().await.unwrap().is_none());
        assert!(stream.state().exhausted);
        assert_eq!(stream.state().pages, 2);
        assert_eq!(stream.state().emitted, 2);
    }

    #[tokio::test]
    async fn test_retry_inside_pagination() {
        let mock = MockTransport::new()
            .respond_json(
                200,
                bars_page(vec![bar_json("2021-02-01T16:01:00Z", 133.0)], Some("tok1")),
            )
            .respond(429, "")
            .respond_json(
                200,
                bars_page(vec![bar_json("2021-02-01T16:02:00Z", 134.0)], None),
            );
        let (client, mock) = client_with(mock, 2);

        let bars = client
            .market_data()
            .bars("AAPL", &BarsQuery::new(TimeFrame::MINUTE))
            .await
            .unwrap();

        assert_eq!(bars.len(), 2);
        assert_eq!(mock.request_count(), 3);
        assert_eq!(
            query_value(&mock.requests()[2].url, "page_token").as_deref(),
            Some("tok1")
        );
    }
}

// =============================================================================
// Limits
// =============================================================================

mod limits {
    use super::*;

    fn numbered_bars(count: usize) -> Vec<Value> {
        (0..count)
            .map(|i| bar_json(&format!("2021-02-01T16:{:02}:00Z", i % 60), 100.0 + i as f64))
            .collect()
    }

    #[tokio::test]
    async fn test_limit_spans_pages() {
        let mock = MockTransport::new()
            .respond_json(200, bars_page(numbered_bars(10), Some("tok1")))
            .respond_json(200, bars_page(numbered_bars(5), Some("tok2")));
        let (client, mock) = client_with(mock, 0);

        let query = BarsQuery::new(TimeFrame::MINUTE).limit(15).page_limit(10);
        let bars = client.market_data().bars("AAPL", &query).await.unwrap();

        assert_eq!(bars.len(), 15);
        let requests = mock.requests();
        assert_eq!(requests.len(), 2);
        assert_eq!(query_value(&requests[0].url, "limit").as_deref(), Some("10"));
        assert_eq!(query_value(&requests[1].url, "limit").as_deref(), Some("5"));
    }

    #[tokio::test]
    async fn test_oversized_page_is_truncated() {
        let mock = MockTransport::new()
            .respond_json(200, bars_page(numbered_bars(8), Some("tok1")));
        let (client, mock) = client_with(mock, 0);

        let query = BarsQuery::new(TimeFrame::MINUTE).limit(3);
        let bars = client.market_data().bars("AAPL", &query).await.unwrap();

        assert_eq!(bars.len(), 3);
        assert_eq!(bars[2].close, 102.0);
        assert_eq!(mock.request_count(), 1);
        assert_eq!(
            query_value(&mock.requests()[0].url, "limit").as_deref(),
            Some("3")
        );
    }

    #[tokio::test]
    async fn test_zero_limit_makes_no_requests() {
        let (client, mock) = client_with(MockTransport::new(), 0);

        let query = BarsQuery::new(TimeFrame::MINUTE).limit(0);
        let bars = client.market_data().bars("AAPL", &query).await.unwrap();

        assert!(bars.is_empty());
        assert_eq!(mock.request_count(), 0);
    }

    #[tokio::test]
    async fn test_unbounded_stream_requests_page_limit() {
        let mock = MockTransport::new().respond_json(200, bars_page(numbered_bars(2), None));
        let (client, mock) = client_with(mock, 0);

        client
            .market_data()
            .bars("AAPL", &BarsQuery::new(TimeFrame::MINUTE))
            .await
            .unwrap();

        assert_eq!(
            query_value(&mock.requests()[0].url, "limit").as_deref(),
            Some("10000")
        );
    }
}

// =============================================================================
// Multiple symbols
// =============================================================================

mod multi_symbol {
    use super::*;

    #[tokio::test]
    async fn test_pages_are_sorted_and_stamped() {
        let mock = MockTransport::new()
            .respond_json(
                200,
                json!({
                    "trades": {
                        "MSFT": [{"t": "2021-02-06T13:04:56Z", "p": 242.0, "s": 10}],
                        "AAPL": [
                            {"t": "2021-02-06T13:04:56Z", "p": 387.62, "s": 100},
                            {"t": "2021-02-06T13:04:57Z", "p": 387.64, "s": 50}
                        ]
                    },
                    "next_page_token": "tok1"
                }),
            )
            .respond_json(
                200,
                json!({
                    "trades": {
                        "MSFT": [{"t": "2021-02-06T13:05:00Z", "p": 242.5, "s": 5}]
                    },
                    "next_page_token": null
                }),
            );
        let (client, mock) = client_with(mock, 0);

        let query = TicksQuery::default();
        let trades = client
            .market_data()
            .trades(["MSFT", "AAPL"], &query)
            .await
            .unwrap();

        let symbols: Vec<&str> = trades.iter().map(|t| t.symbol.as_str()).collect();
        assert_eq!(symbols, vec!["AAPL", "AAPL", "MSFT", "MSFT"]);
        assert_eq!(trades[1].price, 387.64);
        assert_eq!(trades[3].size, 5);

        let (path, _) = split_url(&mock.requests()[0].url);
        assert_eq!(path, "/v2/stocks/trades");
        assert_eq!(
            query_value(&mock.requests()[0].url, "symbols").as_deref(),
            Some("MSFT,AAPL")
        );
    }

    #[tokio::test]
    async fn test_quotes_stream() {
        let mock = MockTransport::new().respond_json(
            200,
            json!({
                "quotes": {
                    "SPY": [{"t": "2021-02-06T13:04:56Z", "ap": 387.70, "as": 1, "bp": 387.67, "bs": 3}]
                },
                "next_page_token": null
            }),
        );
        let (client, _) = client_with(mock, 0);

        let quotes: Vec<Quote> = client
            .market_data()
            .quotes_stream(vec![Symbol::new("SPY")], &TicksQuery::default())
            .unwrap()
            .try_collect()
            .await
            .unwrap();

        assert_eq!(quotes.len(), 1);
        assert_eq!(quotes[0].symbol, "SPY");
        assert!(quotes[0].spread() > 0.0);
    }

    #[tokio::test]
    async fn test_empty_symbol_list_rejected() {
        let (client, mock) = client_with(MockTransport::new(), 0);
        let empty: &[&str] = &[];

        let err = client
            .market_data()
            .trades_stream(empty, &TicksQuery::default())
            .unwrap_err();

        assert!(matches!(err, Error::InvalidInput(_)));
        assert_eq!(mock.request_count(), 0);
    }
}

// =============================================================================
// Errors
// =============================================================================

mod errors {
    use super::*;

    #[tokio::test]
    async fn test_error_is_yielded_once() {
        let mock = MockTransport::new()
            .respond_json(
                200,
                bars_page(
                    vec![
                        bar_json("2021-02-01T16:01:00Z", 133.0),
                        bar_json("2021-02-01T16:02:00Z", 134.0),
                    ],
                    Some("tok1"),
                ),
            )
            .respond(422, r#"{"code": 42210000, "message": "invalid page token"}"#);
        let (client, mock) = client_with(mock, 0);

        let items: Vec<Result<Bar>> = client
            .market_data()
            .bars_stream("AAPL", &BarsQuery::new(TimeFrame::MINUTE))
            .unwrap()
            .collect()
            .await;

        assert_eq!(items.len(), 3);
        assert!(items[0].is_ok());
        assert!(items[1].is_ok());
        assert!(matches!(items[2], Err(Error::Api { status: 422, .. })));
        assert_eq!(mock.request_count(), 2);
    }

    #[tokio::test]
    async fn test_bad_record_surfaces_mapping_error() {
        let mock = MockTransport::new().respond_json(
            200,
            bars_page(vec![json!({"t": "2021-02-01T16:01:00Z", "o": 1.0})], None),
        );
        let (client, _) = client_with(mock, 0);

        let err = client
            .market_data()
            .bars("AAPL", &BarsQuery::new(TimeFrame::MINUTE))
            .await
            .unwrap_err();

        assert!(err.to_string().contains("Bar.h"), "{err}");
    }

    #[tokio::test]
    async fn test_raw_stream_keeps_records_untyped() {
        let mock = MockTransport::new().respond_json(
            200,
            json!({"bars": [{"t": "2021-02-01T16:01:00Z", "c": 1.5}], "next_page_token": null}),
        );
        let (client, mock) = client_with(mock, 0);

        let records: Vec<Value> = client
            .market_data()
            .raw_stream(
                DataEndpoint::Bars,
                "AAPL",
                Params::new().with("timeframe", TimeFrame::DAY).with("limit", 7u32),
                None,
            )
            .unwrap()
            .try_collect()
            .await
            .unwrap();

        assert_eq!(records, vec![json!({"t": "2021-02-01T16:01:00Z", "c": 1.5, "S": "AAPL"})]);
        assert_eq!(
            query_value(&mock.requests()[0].url, "limit").as_deref(),
            Some("10000")
        );
    }
}

// =============================================================================
// Latest and snapshots
// =============================================================================

mod latest {
    use super::*;

    #[tokio::test]
    async fn test_latest_trade() {
        let mock = MockTransport::new().respond_json(
            200,
            json!({
                "symbol": "AAPL",
                "trade": {"t": "2021-02-06T13:04:56.334320128Z", "x": "C", "p": 387.62, "s": 100, "i": 52983525029461u64}
            }),
        );
        let (client, mock) = client_with(mock, 0);

        let trade = client.market_data().latest_trade(&"AAPL".into()).await.unwrap();

        assert_eq!(trade.symbol, "AAPL");
        assert_eq!(trade.price, 387.62);
        assert_eq!(trade.exchange.as_deref(), Some("C"));
        assert_eq!(
            mock.requests()[0].url,
            "https://data.test/v2/stocks/AAPL/trades/latest"
        );
    }

    #[tokio::test]
    async fn test_snapshots_skip_unknown_symbols() {
        let mock = MockTransport::new().respond_json(
            200,
            json!({
                "AAPL": {
                    "latestTrade": {"t": "2021-05-11T20:00:00.435997104Z", "p": 125.91, "s": 5589631},
                    "dailyBar": {"t": "2021-05-11T04:00:00Z", "o": 123.5, "h": 126.27, "l": 122.77, "c": 125.91, "v": 125863164}
                },
                "NOPE": null
            }),
        );
        let (client, mock) = client_with(mock, 0);

        let snapshots = client
            .market_data()
            .snapshots(&["AAPL", "NOPE"])
            .await
            .unwrap();

        assert_eq!(snapshots.len(), 1);
        let aapl = &snapshots["AAPL"];
        assert_eq!(aapl.latest_trade.as_ref().map(|t| t.symbol.as_str()), Some("AAPL"));
        assert_eq!(aapl.daily_bar.as_ref().map(|b| b.close), Some(125.91));
        assert!(aapl.latest_quote.is_none());
        assert_eq!(
            query_value(&mock.requests()[0].url, "symbols").as_deref(),
            Some("AAPL,NOPE")
        );
    }
}
