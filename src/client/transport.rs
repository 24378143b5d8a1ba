//! Pluggable HTTP transport.
//!
//! The dispatcher builds a fully-resolved [`HttpRequest`] and hands it to a
//! [`Transport`]. [`ReqwestTransport`] is the production implementation;
//! tests substitute a scripted one.

use std::collections::BTreeMap;

use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderName, HeaderValue};
use reqwest::Method;
use serde_json::Value;

use super::config::ClientConfig;
use crate::{Error, Result};

/// A resolved HTTP request.
#[derive(Debug, Clone, PartialEq)]
pub struct HttpRequest {
    /// HTTP verb
    pub method: Method,
    /// Absolute URL, query string included
    pub url: String,
    /// Header name to value, lowercased names
    pub headers: BTreeMap<String, String>,
    /// JSON body for write verbs
    pub body: Option<String>,
}

impl HttpRequest {
    /// Create a request without headers or body.
    pub fn new(method: Method, url: impl Into<String>) -> Self {
        Self {
            method,
            url: url.into(),
            headers: BTreeMap::new(),
            body: None,
        }
    }

    /// Add a header.
    pub fn with_header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers
            .insert(name.into().to_ascii_lowercase(), value.into());
        self
    }

    /// Set the body.
    pub fn with_body(mut self, body: impl Into<String>) -> Self {
        self.body = Some(body.into());
        self
    }

    /// Look up a header by case-insensitive name.
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .get(&name.to_ascii_lowercase())
            .map(String::as_str)
    }
}

/// A raw HTTP response.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpResponse {
    /// Status code
    pub status: u16,
    /// Body text
    pub body: String,
}

impl HttpResponse {
    /// Create a response.
    pub fn new(status: u16, body: impl Into<String>) -> Self {
        Self {
            status,
            body: body.into(),
        }
    }

    /// Returns `true` for 2xx statuses.
    pub const fn is_success(&self) -> bool {
        self.status >= 200 && self.status < 300
    }

    /// Decode a success body. An empty body decodes to `null`.
    pub fn json(&self) -> Result<Value> {
        if self.body.trim().is_empty() {
            return Ok(Value::Null);
        }
        Ok(serde_json::from_str(&self.body)?)
    }

    /// Decode an error body, keeping non-JSON text as a string.
    pub fn error_body(&self) -> Value {
        serde_json::from_str(&self.body).unwrap_or_else(|_| Value::String(self.body.clone()))
    }
}

/// Sends requests over the wire.
#[async_trait]
pub trait Transport: Send + Sync {
    /// Send one request and return the raw response, whatever its status.
    ///
    /// Errors are reserved for requests that produced no response at all.
    async fn send(&self, request: HttpRequest) -> Result<HttpResponse>;
}

/// [`Transport`] backed by a pooled `reqwest` client.
#[derive(Debug, Clone)]
pub struct ReqwestTransport {
    http: reqwest::Client,
}

impl ReqwestTransport {
    /// Build a transport honoring the configured timeout and user agent.
    pub fn new(config: &ClientConfig) -> Result<Self> {
        let http = reqwest::Client::builder()
            .timeout(config.timeout)
            .user_agent(&config.user_agent)
            .build()?;
        Ok(Self { http })
    }

    /// Wrap an existing `reqwest` client.
    pub fn from_client(http: reqwest::Client) -> Self {
        Self { http }
    }
}

#[async_trait]
impl Transport for ReqwestTransport {
    async fn send(&self, request: HttpRequest) -> Result<HttpResponse> {
        let mut headers = HeaderMap::new();
        for (name, value) in &request.headers {
            let name = HeaderName::from_bytes(name.as_bytes())
                .map_err(|_| Error::InvalidInput(format!("Invalid header name: {name}")))?;
            let value = HeaderValue::from_str(value)
                .map_err(|_| Error::InvalidInput(format!("Invalid value for header {name}")))?;
            headers.insert(name, value);
        }

        let mut builder = self
            .http
            .request(request.method, &request.url)
            .headers(headers);
        if let Some(body) = request.body {
            builder = builder.body(body);
        }

        let response = builder.send().await?;
        let status = response.status().as_u16();
        let body = response.text().await?;

        Ok(HttpResponse { status, body })
    }
}
