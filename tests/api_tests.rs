//! Integration tests for the dispatcher and the trading services.
//!
//! Every test runs against a scripted in-memory transport; no network
//! access or credentials are needed.
//!
//! Run with: cargo test --test api_tests

mod common;

use reqwest::Method;
use rust_decimal_macros::dec;
use serde_json::{json, Value};

use alpaca_trade_rs::api::{ActivitiesQuery, CloseAmount, OrdersQuery, PortfolioHistoryQuery};
use alpaca_trade_rs::client::{BaseUrl, Params};
use alpaca_trade_rs::models::{
    AccountConfigurations, Activity, AssetClass, AssetStatus, OrderClass, OrderQueryStatus,
    OrderSide, OrderStatus, OrderType, ReplaceOrder, TimeInForce,
};
use alpaca_trade_rs::prelude::*;

use common::{client_with, order_json, query_value, split_url, MockTransport};

// =============================================================================
// Dispatcher
// =============================================================================

mod dispatcher {
    use super::*;

    #[tokio::test]
    async fn test_retryable_status_exhausts_retries() {
        let (client, mock) = client_with(MockTransport::always(429, r#"{"message":"rate limit"}"#), 3);

        let err = client.accounts().get().await.unwrap_err();

        assert_eq!(mock.request_count(), 4);
        match err {
            Error::RetriesExhausted {
                status, attempts, ..
            } => {
                assert_eq!(status, 429);
                assert_eq!(attempts, 4);
            }
            other => panic!("Expected RetriesExhausted, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_zero_retries_makes_one_attempt() {
        let (client, mock) = client_with(MockTransport::always(504, ""), 0);

        let err = client.calendar().clock().await.unwrap_err();

        assert_eq!(mock.request_count(), 1);
        assert!(matches!(err, Error::RetriesExhausted { attempts: 1, .. }));
        assert!(err.is_retryable());
    }

    #[tokio::test]
    async fn test_retry_then_success() {
        let mock = MockTransport::new()
            .respond(504, "gateway timeout")
            .respond(429, "")
            .respond_json(
                200,
                json!({
                    "timestamp": "2021-04-01T12:00:00.123-04:00",
                    "is_open": true,
                    "next_open": "2021-04-02T09:30:00-04:00",
                    "next_close": "2021-04-01T16:00:00-04:00"
                }),
            );
        let (client, mock) = client_with(mock, 3);

        let clock = client.calendar().clock().await.unwrap();

        assert!(clock.is_open);
        assert_eq!(mock.request_count(), 3);
    }

    #[tokio::test]
    async fn test_fatal_status_is_not_retried() {
        let (client, mock) = client_with(
            MockTransport::always(403, r#"{"code": 40310000, "message": "insufficient buying power"}"#),
            3,
        );

        let err = client.accounts().get().await.unwrap_err();

        assert_eq!(mock.request_count(), 1);
        match &err {
            Error::Api {
                status,
                code,
                message,
                ..
            } => {
                assert_eq!(*status, 403);
                assert_eq!(*code, Some(40310000));
                assert_eq!(message, "insufficient buying power");
            }
            other => panic!("Expected Api error, got {other:?}"),
        }
        assert!(err.is_client_error());
        assert!(!err.is_retryable());
    }

    #[tokio::test]
    async fn test_not_found() {
        let (client, _) = client_with(MockTransport::always(404, r#"{"code":40410000,"message":"position does not exist"}"#), 3);
        let err = client.positions().get(&"AAPL".into()).await.unwrap_err();
        assert!(err.is_not_found());
    }

    #[tokio::test]
    async fn test_transport_failure_is_not_retried() {
        let mock = MockTransport::new()
            .fail(Error::InvalidInput("connection refused".into()))
            .respond(200, "{}");
        let (client, mock) = client_with(mock, 3);

        let err = client.accounts().configurations().await.unwrap_err();

        assert!(matches!(err, Error::InvalidInput(_)));
        assert_eq!(mock.request_count(), 1);
    }

    #[tokio::test]
    async fn test_auth_headers_on_every_request() {
        let mock = MockTransport::new().respond(429, "").respond(200, "[]");
        let (client, mock) = client_with(mock, 1);

        client.positions().list().await.unwrap();

        let requests = mock.requests();
        assert_eq!(requests.len(), 2);
        for request in requests {
            assert_eq!(request.header("APCA-API-KEY-ID"), Some("test-key"));
            assert_eq!(request.header("APCA-API-SECRET-KEY"), Some("test-secret"));
            assert_eq!(request.url, "https://paper-api.test/v2/positions");
        }
    }

    #[tokio::test]
    async fn test_raw_request_query_encoding() {
        let (client, mock) = client_with(MockTransport::always(200, r#"{"ok": true}"#), 0);
        let params = Params::new()
            .with("start", "2021-01-01")
            .with("stop", "2021-02-01")
            .with("feed", None::<String>)
            .with("symbols", vec!["AAPL".to_string(), "MSFT".to_string()]);

        let value = client
            .request(Method::GET, "/stocks/bars", Some(&params), BaseUrl::Data)
            .await
            .unwrap();

        assert_eq!(value, json!({"ok": true}));
        let url = &mock.requests()[0].url;
        let (path, pairs) = split_url(url);
        assert_eq!(path, "/v2/stocks/bars");
        assert_eq!(
            pairs,
            vec![
                ("start".to_string(), "2021-01-01".to_string()),
                ("end".to_string(), "2021-02-01".to_string()),
                ("symbols".to_string(), "AAPL,MSFT".to_string()),
            ]
        );
        assert!(mock.requests()[0].body.is_none());
    }

    #[tokio::test]
    async fn test_raw_request_body_encoding() {
        let (client, mock) = client_with(MockTransport::always(200, ""), 0);
        let params = Params::new().with("symbol", "AAPL").with("note", None::<String>);

        let value = client
            .request(Method::POST, "/watchlists/abc", Some(&params), BaseUrl::Trading)
            .await
            .unwrap();

        assert_eq!(value, Value::Null);
        let request = &mock.requests()[0];
        assert_eq!(request.url, "https://paper-api.test/v2/watchlists/abc");
        let body: Value = serde_json::from_str(request.body.as_deref().unwrap()).unwrap();
        assert_eq!(body, json!({"symbol": "AAPL"}));
    }
}

// =============================================================================
// Account
// =============================================================================

mod account {
    use super::*;

    fn account_json() -> Value {
        json!({
            "id": "904837e3-3b76-47ec-b432-046db621571b",
            "account_number": "010203ABCD",
            "status": "ACTIVE",
            "currency": "USD",
            "cash": "-23140.2",
            "portfolio_value": "103820.56",
            "pattern_day_trader": false,
            "trade_suspended_by_user": false,
            "trading_blocked": false,
            "transfers_blocked": false,
            "account_blocked": false,
            "created_at": "2019-06-12T22:47:07.99658Z",
            "shorting_enabled": true,
            "long_market_value": "126960.76",
            "short_market_value": "0",
            "equity": "103820.56",
            "last_equity": "103529.24",
            "multiplier": "4",
            "buying_power": "413282.24",
            "initial_margin": "63480.38",
            "maintenance_margin": "38088.23",
            "sma": "0",
            "daytrade_count": 0
        })
    }

    #[tokio::test]
    async fn test_get_account() {
        let (client, mock) = client_with(MockTransport::new().respond_json(200, account_json()), 3);

        let account = client.accounts().get().await.unwrap();

        assert_eq!(account.account_number, "010203ABCD");
        assert_eq!(account.cash, dec!(-23140.2));
        assert_eq!(account.buying_power, dec!(413282.24));
        assert_eq!(account.multiplier, Some(dec!(4)));
        assert_eq!(account.shorting_enabled, Some(true));
        assert_eq!(mock.requests()[0].method, Method::GET);
        assert_eq!(mock.requests()[0].url, "https://paper-api.test/v2/account");
    }

    #[tokio::test]
    async fn test_account_missing_required_field() {
        let mut raw = account_json();
        raw.as_object_mut().unwrap().remove("equity");
        let (client, _) = client_with(MockTransport::new().respond_json(200, raw), 3);

        let err = client.accounts().get().await.unwrap_err();

        match err {
            Error::Mapping { entity, field, .. } => {
                assert_eq!(entity, "Account");
                assert_eq!(field.as_deref(), Some("equity"));
            }
            other => panic!("Expected Mapping error, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_update_configurations() {
        let mock = MockTransport::new().respond_json(
            200,
            json!({
                "dtbp_check": "entry",
                "no_shorting": true,
                "suspend_trade": false,
                "trade_confirm_email": "all"
            }),
        );
        let (client, mock) = client_with(mock, 3);

        let update = AccountConfigurations {
            no_shorting: Some(true),
            ..Default::default()
        };
        let config = client.accounts().update_configurations(&update).await.unwrap();

        assert_eq!(config.no_shorting, Some(true));
        let request = &mock.requests()[0];
        assert_eq!(request.method, Method::PATCH);
        assert_eq!(request.url, "https://paper-api.test/v2/account/configurations");
        let body: Value = serde_json::from_str(request.body.as_deref().unwrap()).unwrap();
        assert_eq!(body, json!({"no_shorting": true}));
    }

    #[tokio::test]
    async fn test_portfolio_history() {
        let mock = MockTransport::new().respond_json(
            200,
            json!({
                "timestamp": [1580826600, 1580827500],
                "equity": [27423.73, null],
                "profit_loss": [11.8, 0],
                "profit_loss_pct": [0.000430469507254688, 0],
                "base_value": 27411.93,
                "timeframe": "15Min"
            }),
        );
        let (client, mock) = client_with(mock, 3);

        let query = PortfolioHistoryQuery {
            period: Some("1D".into()),
            timeframe: Some("15Min".into()),
            ..Default::default()
        };
        let history = client.portfolio().history(&query).await.unwrap();

        assert_eq!(history.timestamp.len(), 2);
        assert_eq!(history.equity[1], None);
        assert_eq!(
            query_value(&mock.requests()[0].url, "timeframe").as_deref(),
            Some("15Min")
        );
    }
}

// =============================================================================
// Orders
// =============================================================================

mod orders {
    use super::*;

    #[tokio::test]
    async fn test_list_orders_query() {
        let mock = MockTransport::new()
            .respond_json(200, json!([order_json("a"), order_json("b")]));
        let (client, mock) = client_with(mock, 3);

        let query = OrdersQuery {
            status: Some(OrderQueryStatus::Closed),
            limit: Some(2),
            nested: Some(true),
            ..Default::default()
        };
        let orders = client.orders().list(&query).await.unwrap();

        assert_eq!(orders.len(), 2);
        assert_eq!(orders[0].id, "a");
        assert_eq!(orders[0].order_class, Some(OrderClass::Simple));
        assert_eq!(orders[1].limit_price, Some(dec!(150.25)));

        let (path, pairs) = split_url(&mock.requests()[0].url);
        assert_eq!(path, "/v2/orders");
        assert_eq!(
            pairs,
            vec![
                ("status".to_string(), "closed".to_string()),
                ("limit".to_string(), "2".to_string()),
                ("nested".to_string(), "true".to_string()),
            ]
        );
    }

    #[tokio::test]
    async fn test_submit_bracket_order() {
        let mut placed = order_json("parent");
        placed["order_class"] = json!("bracket");
        placed["legs"] = json!([order_json("tp"), order_json("sl")]);
        let (client, mock) = client_with(MockTransport::new().respond_json(200, placed), 3);

        let order = NewOrderBuilder::new("AAPL", OrderSide::Buy)
            .qty(dec!(10))
            .order_type(OrderType::Limit)
            .limit_price(dec!(150.25))
            .time_in_force(TimeInForce::Gtc)
            .order_class(OrderClass::Bracket)
            .take_profit(dec!(170))
            .stop_loss(dec!(140), None)
            .client_order_id("my-order")
            .build()
            .unwrap();
        let result = client.orders().submit(&order).await.unwrap();

        assert_eq!(result.legs().count(), 2);
        assert_eq!(result.status, OrderStatus::Accepted);

        let request = &mock.requests()[0];
        assert_eq!(request.method, Method::POST);
        assert_eq!(request.url, "https://paper-api.test/v2/orders");
        let body: Value = serde_json::from_str(request.body.as_deref().unwrap()).unwrap();
        assert_eq!(body["symbol"], "AAPL");
        assert_eq!(body["qty"], "10");
        assert_eq!(body["type"], "limit");
        assert_eq!(body["side"], "buy");
        assert_eq!(body["time_in_force"], "gtc");
        assert_eq!(body["order_class"], "bracket");
        assert_eq!(body["take_profit"], json!({"limit_price": "170"}));
        assert_eq!(body["stop_loss"]["stop_price"], "140");
        assert_eq!(body["client_order_id"], "my-order");
        assert!(body.get("notional").is_none());
    }

    #[tokio::test]
    async fn test_leg_missing_required_field() {
        let mut placed = order_json("parent");
        let mut leg = order_json("leg");
        leg.as_object_mut().unwrap().remove("side");
        placed["legs"] = json!([leg]);
        let (client, _) = client_with(MockTransport::new().respond_json(200, placed), 3);

        let err = client.orders().get(&"parent".into()).await.unwrap_err();

        assert!(err.to_string().contains("Order.side"), "{err}");
    }

    #[tokio::test]
    async fn test_get_by_client_order_id() {
        let (client, mock) =
            client_with(MockTransport::new().respond_json(200, order_json("x")), 3);

        let order = client.orders().get_by_client_order_id("client-x").await.unwrap();

        assert_eq!(order.client_order_id, "client-x");
        assert_eq!(
            mock.requests()[0].url,
            "https://paper-api.test/v2/orders:by_client_order_id?client_order_id=client-x"
        );
    }

    #[tokio::test]
    async fn test_replace_order() {
        let (client, mock) =
            client_with(MockTransport::new().respond_json(200, order_json("new")), 3);

        let changes = ReplaceOrder {
            qty: Some(dec!(5)),
            limit_price: Some(dec!(151)),
            ..Default::default()
        };
        let order = client.orders().replace(&"old".into(), &changes).await.unwrap();

        assert_eq!(order.id, "new");
        let request = &mock.requests()[0];
        assert_eq!(request.method, Method::PATCH);
        assert_eq!(request.url, "https://paper-api.test/v2/orders/old");
        let body: Value = serde_json::from_str(request.body.as_deref().unwrap()).unwrap();
        assert_eq!(body, json!({"qty": "5", "limit_price": "151"}));
    }

    #[tokio::test]
    async fn test_cancel_order_empty_body() {
        let (client, mock) = client_with(MockTransport::new().respond(204, ""), 3);

        client.orders().cancel(&"abc".into()).await.unwrap();

        let request = &mock.requests()[0];
        assert_eq!(request.method, Method::DELETE);
        assert_eq!(request.url, "https://paper-api.test/v2/orders/abc");
        assert!(request.header("Content-Type").is_none());
        assert!(request.body.is_none());
    }

    #[tokio::test]
    async fn test_cancel_all() {
        let mock = MockTransport::new().respond_json(
            207,
            json!([
                {"id": "a", "status": 200, "body": order_json("a")},
                {"id": "b", "status": 500, "body": {"code": 50010000, "message": "internal error"}}
            ]),
        );
        let (client, _) = client_with(mock, 3);

        let results = client.orders().cancel_all().await.unwrap();

        assert_eq!(results.len(), 2);
        assert!(results[0].is_success());
        assert_eq!(results[0].order().map(|o| o.id), Some("a".to_string()));
        assert!(!results[1].is_success());
        assert!(results[1].order().is_none());
    }
}

// =============================================================================
// Positions, assets, activities, calendar, watchlists
// =============================================================================

mod portfolio {
    use super::*;

    fn position_json() -> Value {
        json!({
            "asset_id": "904837e3-3b76-47ec-b432-046db621571b",
            "symbol": "AAPL",
            "exchange": "NASDAQ",
            "asset_class": "us_equity",
            "avg_entry_price": "100.0",
            "qty": "5",
            "side": "long",
            "market_value": "600.0",
            "cost_basis": "500.0",
            "unrealized_pl": "100.0",
            "unrealized_plpc": "0.20",
            "current_price": "120.0",
            "lastday_price": "119.0",
            "change_today": "0.0084"
        })
    }

    #[tokio::test]
    async fn test_list_positions() {
        let (client, _) =
            client_with(MockTransport::new().respond_json(200, json!([position_json()])), 3);

        let positions = client.positions().list().await.unwrap();

        assert_eq!(positions.len(), 1);
        assert_eq!(positions[0].qty, dec!(5));
        assert_eq!(positions[0].unrealized_pl, Some(dec!(100.0)));
    }

    #[tokio::test]
    async fn test_close_position_percentage() {
        let (client, mock) =
            client_with(MockTransport::new().respond_json(200, order_json("close")), 3);

        let order = client
            .positions()
            .close(&"AAPL".into(), CloseAmount::Percentage(dec!(50)))
            .await
            .unwrap();

        assert_eq!(order.id, "close");
        let request = &mock.requests()[0];
        assert_eq!(request.method, Method::DELETE);
        assert_eq!(
            request.url,
            "https://paper-api.test/v2/positions/AAPL?percentage=50"
        );
    }

    #[tokio::test]
    async fn test_close_all_positions() {
        let mock = MockTransport::new().respond_json(
            207,
            json!([{"symbol": "AAPL", "status": 200, "body": order_json("c1")}]),
        );
        let (client, mock) = client_with(mock, 3);

        let results = client.positions().close_all(true).await.unwrap();

        assert_eq!(results[0].symbol.as_deref(), Some("AAPL"));
        assert_eq!(
            mock.requests()[0].url,
            "https://paper-api.test/v2/positions?cancel_orders=true"
        );
    }

    #[tokio::test]
    async fn test_list_assets() {
        let mock = MockTransport::new().respond_json(
            200,
            json!([{
                "id": "b0b6dd9d-8b9b-48a9-ba46-b9d54906e415",
                "class": "us_equity",
                "exchange": "NASDAQ",
                "symbol": "AAPL",
                "name": "Apple Inc. Common Stock",
                "status": "active",
                "tradable": true,
                "marginable": true,
                "shortable": true,
                "easy_to_borrow": true,
                "fractionable": true
            }]),
        );
        let (client, mock) = client_with(mock, 3);

        let assets = client
            .assets()
            .list(Some(AssetStatus::Active), Some(AssetClass::UsEquity))
            .await
            .unwrap();

        assert_eq!(assets[0].asset_class, AssetClass::UsEquity);
        assert!(assets[0].tradable);
        assert_eq!(
            mock.requests()[0].url,
            "https://paper-api.test/v2/assets?status=active&asset_class=us_equity"
        );
    }

    #[tokio::test]
    async fn test_mixed_activities() {
        let mock = MockTransport::new().respond_json(
            200,
            json!([
                {
                    "activity_type": "FILL",
                    "cum_qty": "1",
                    "id": "20190524113406977::8efc7b9a-8b2b-4000-9955-d36e7db0df74",
                    "leaves_qty": "0",
                    "price": "1.63",
                    "qty": "1",
                    "side": "buy",
                    "symbol": "LPCN",
                    "transaction_time": "2019-05-24T15:34:06.977Z",
                    "order_id": "904837e3-3b76-47ec-b432-046db621571b",
                    "type": "fill"
                },
                {
                    "activity_type": "DIV",
                    "id": "20190801011955195::5f596936-6f23-4cef-bdf1-3806aae57dbf",
                    "date": "2019-08-01",
                    "net_amount": "1.02",
                    "symbol": "T",
                    "qty": "2",
                    "per_share_amount": "0.51"
                }
            ]),
        );
        let (client, mock) = client_with(mock, 3);

        let query = ActivitiesQuery {
            activity_types: vec!["FILL".into(), "DIV".into()],
            ..Default::default()
        };
        let activities = client.activities().list(&query).await.unwrap();

        assert!(matches!(&activities[0], Activity::Trade(fill) if fill.price == dec!(1.63)));
        assert!(matches!(&activities[1], Activity::NonTrade(div) if div.net_amount == dec!(1.02)));
        assert_eq!(activities[1].activity_type(), "DIV");
        assert_eq!(
            query_value(&mock.requests()[0].url, "activity_types").as_deref(),
            Some("FILL,DIV")
        );
    }

    #[tokio::test]
    async fn test_calendar_range() {
        let mock = MockTransport::new().respond_json(
            200,
            json!([
                {"date": "2021-01-04", "open": "09:30", "close": "16:00", "session_open": "0400", "session_close": "2000"},
                {"date": "2021-01-05", "open": "09:30", "close": "16:00"}
            ]),
        );
        let (client, mock) = client_with(mock, 3);

        let days = client
            .calendar()
            .calendar(
                chrono::NaiveDate::from_ymd_opt(2021, 1, 4),
                chrono::NaiveDate::from_ymd_opt(2021, 1, 5),
            )
            .await
            .unwrap();

        assert_eq!(days.len(), 2);
        assert_eq!(days[1].session_open, None);
        assert_eq!(
            mock.requests()[0].url,
            "https://paper-api.test/v2/calendar?start=2021-01-04&end=2021-01-05"
        );
    }

    #[tokio::test]
    async fn test_watchlist_lifecycle() {
        let watchlist = json!({
            "id": "3174d6df-7726-44b4-a5bd-7fda5ae6e009",
            "account_id": "abc",
            "name": "tech",
            "created_at": "2021-04-01T12:00:00Z",
            "updated_at": "2021-04-01T12:00:00Z",
            "assets": []
        });
        let mock = MockTransport::new()
            .respond_json(200, watchlist.clone())
            .respond_json(200, watchlist)
            .respond(204, "");
        let (client, mock) = client_with(mock, 3);

        let created = client
            .watchlists()
            .create("tech", &["AAPL", "MSFT"])
            .await
            .unwrap();
        client
            .watchlists()
            .add_symbol(&created.id, &"NVDA".into())
            .await
            .unwrap();
        client
            .watchlists()
            .remove_symbol(&created.id, &"NVDA".into())
            .await
            .unwrap();

        let requests = mock.requests();
        let create_body: Value = serde_json::from_str(requests[0].body.as_deref().unwrap()).unwrap();
        assert_eq!(create_body, json!({"name": "tech", "symbols": ["AAPL", "MSFT"]}));
        assert_eq!(requests[1].method, Method::POST);
        assert_eq!(
            requests[2].url,
            "https://paper-api.test/v2/watchlists/3174d6df-7726-44b4-a5bd-7fda5ae6e009/NVDA"
        );
        assert_eq!(requests[2].method, Method::DELETE);
    }
}
