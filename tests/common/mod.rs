//! Scripted transport shared by the integration tests.

#![allow(dead_code)]

use std::collections::VecDeque;
use std::sync::{Arc, Mutex, Once};
use std::time::Duration;

use async_trait::async_trait;
use serde_json::Value;
use tracing_subscriber::EnvFilter;

use alpaca_trade_rs::client::{HttpRequest, HttpResponse, Transport};
use alpaca_trade_rs::{AlpacaClient, ClientConfig, Error, Result};

static INIT: Once = Once::new();

/// Initialize logging for tests
pub fn init_logging() {
    INIT.call_once(|| {
        tracing_subscriber::fmt()
            .with_env_filter(EnvFilter::from_default_env())
            .with_test_writer()
            .try_init()
            .ok();
    });
}

/// Replays queued responses and records every request.
///
/// Once the queue is empty the fallback response is returned, if any.
#[derive(Default)]
pub struct MockTransport {
    responses: Mutex<VecDeque<Result<HttpResponse>>>,
    fallback: Option<HttpResponse>,
    requests: Mutex<Vec<HttpRequest>>,
}

impl MockTransport {
    pub fn new() -> Self {
        Self::default()
    }

    /// Answer every request with the same response.
    pub fn always(status: u16, body: &str) -> Self {
        Self {
            fallback: Some(HttpResponse::new(status, body)),
            ..Default::default()
        }
    }

    pub fn respond(self, status: u16, body: impl Into<String>) -> Self {
        self.responses
            .lock()
            .unwrap()
            .push_back(Ok(HttpResponse::new(status, body)));
        self
    }

    pub fn respond_json(self, status: u16, body: Value) -> Self {
        self.respond(status, body.to_string())
    }

    pub fn fail(self, error: Error) -> Self {
        self.responses.lock().unwrap().push_back(Err(error));
        self
    }

    pub fn requests(&self) -> Vec<HttpRequest> {
        self.requests.lock().unwrap().clone()
    }

    pub fn request_count(&self) -> usize {
        self.requests.lock().unwrap().len()
    }
}

#[async_trait]
impl Transport for MockTransport {
    async fn send(&self, request: HttpRequest) -> Result<HttpResponse> {
        self.requests.lock().unwrap().push(request);
        let next = self.responses.lock().unwrap().pop_front();
        match (next, &self.fallback) {
            (Some(response), _) => response,
            (None, Some(fallback)) => Ok(fallback.clone()),
            (None, None) => panic!("MockTransport ran out of responses"),
        }
    }
}

/// Test configuration: fixed hosts, no wait between retries.
pub fn test_config(retry_max: u32) -> ClientConfig {
    ClientConfig::builder()
        .key_id("test-key")
        .secret_key("test-secret")
        .base_url("https://paper-api.test")
        .data_url("https://data.test")
        .retry_max(retry_max)
        .retry_wait(Duration::ZERO)
        .retry_codes(vec![429, 504])
        .build_with(|_| None)
        .expect("valid test config")
}

pub fn client_with(mock: MockTransport, retry_max: u32) -> (AlpacaClient, Arc<MockTransport>) {
    init_logging();
    let mock = Arc::new(mock);
    let client = AlpacaClient::with_transport(test_config(retry_max), mock.clone());
    (client, mock)
}

/// Split a request URL into path and decoded query pairs.
pub fn split_url(url: &str) -> (String, Vec<(String, String)>) {
    let parsed = url::Url::parse(url).expect("valid url");
    let pairs = parsed
        .query_pairs()
        .map(|(k, v)| (k.into_owned(), v.into_owned()))
        .collect();
    (parsed.path().to_string(), pairs)
}

pub fn query_value(url: &str, key: &str) -> Option<String> {
    split_url(url)
        .1
        .into_iter()
        .find(|(k, _)| k == key)
        .map(|(_, v)| v)
}

pub fn order_json(id: &str) -> Value {
    serde_json::json!({
        "id": id,
        "client_order_id": format!("client-{id}"),
        "created_at": "2021-03-16T18:38:01.942282Z",
        "updated_at": "2021-03-16T18:38:01.942282Z",
        "submitted_at": "2021-03-16T18:38:01.937734Z",
        "asset_id": "b0b6dd9d-8b9b-48a9-ba46-b9d54906e415",
        "symbol": "AAPL",
        "asset_class": "us_equity",
        "qty": "10",
        "filled_qty": "0",
        "order_class": "",
        "type": "limit",
        "side": "buy",
        "time_in_force": "day",
        "limit_price": "150.25",
        "status": "accepted",
        "extended_hours": false,
        "legs": null
    })
}

pub fn bar_json(t: &str, close: f64) -> Value {
    serde_json::json!({
        "t": t,
        "o": close - 1.0,
        "h": close + 1.0,
        "l": close - 2.0,
        "c": close,
        "v": 1000,
        "n": 12,
        "vw": close
    })
}
