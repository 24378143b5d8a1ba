//! Error types for the Alpaca API client.
//!
//! This module provides a single error type covering every failure mode of
//! the client: transport failures, fatal API responses, transient statuses
//! that kept failing after all retries, and records that could not be mapped
//! into typed entities.

use serde_json::Value;
use thiserror::Error;

/// A specialized `Result` type for Alpaca operations.
pub type Result<T> = std::result::Result<T, Error>;

/// The main error type for all Alpaca API operations.
#[derive(Error, Debug)]
pub enum Error {
    /// HTTP transport failed (connection, TLS, timeout)
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// JSON serialization/deserialization failed
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// API returned a non-retryable error response
    #[error("API error: status={status}, code={code:?}, message={message}")]
    Api {
        /// HTTP status code
        status: u16,
        /// Optional numeric error code from the API
        code: Option<i64>,
        /// Human-readable error message
        message: String,
        /// Raw response body for debugging
        body: Value,
    },

    /// A retryable status kept coming back until the retry budget ran out
    #[error("Retries exhausted after {attempts} attempts: last status={status}")]
    RetriesExhausted {
        /// Status of the final attempt
        status: u16,
        /// Total number of attempts made
        attempts: u32,
        /// Raw body of the final response
        body: Value,
    },

    /// A response record did not match the shape of the target entity
    #[error("Cannot map {entity}{}: {message}", .field.as_deref().map(|f| format!(".{f}")).unwrap_or_default())]
    Mapping {
        /// Entity being constructed
        entity: &'static str,
        /// Offending field, when known
        field: Option<String>,
        /// What went wrong
        message: String,
    },

    /// Invalid input provided to a function
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// URL parsing error
    #[error("URL parse error: {0}")]
    UrlParse(#[from] url::ParseError),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),
}

impl Error {
    /// Returns `true` if this error is potentially transient and the
    /// operation could be re-invoked by the caller.
    ///
    /// # Example
    ///
    /// ```
    /// use alpaca_trade_rs::Error;
    ///
    /// fn handle_error(err: Error) {
    ///     if err.is_retryable() {
    ///         println!("Re-invoking later...");
    ///     }
    /// }
    /// ```
    pub fn is_retryable(&self) -> bool {
        matches!(self, Error::Http(_) | Error::RetriesExhausted { .. })
    }

    /// Returns the HTTP status carried by this error, if any.
    pub fn status(&self) -> Option<u16> {
        match self {
            Error::Api { status, .. } | Error::RetriesExhausted { status, .. } => Some(*status),
            Error::Http(e) => e.status().map(|s| s.as_u16()),
            _ => None,
        }
    }

    /// Returns `true` if this error indicates a client-side issue
    /// (invalid input, bad request, etc.).
    pub fn is_client_error(&self) -> bool {
        match self {
            Error::Api { status, .. } => *status >= 400 && *status < 500,
            Error::InvalidInput(_) | Error::Config(_) => true,
            _ => false,
        }
    }

    /// Returns `true` if this error indicates a server-side issue.
    pub fn is_server_error(&self) -> bool {
        match self {
            Error::Api { status, .. } => *status >= 500,
            _ => false,
        }
    }

    /// Returns `true` if the API answered 404.
    pub fn is_not_found(&self) -> bool {
        matches!(self, Error::Api { status: 404, .. })
    }

    /// Create an API error from a response.
    ///
    /// Alpaca error bodies look like `{"code": 40010001, "message": "..."}`.
    pub(crate) fn from_api_response(status: u16, body: Value) -> Self {
        let code = body.get("code").and_then(|c| c.as_i64());

        let message = body
            .get("message")
            .and_then(|m| m.as_str())
            .map(String::from)
            .or_else(|| body.as_str().filter(|s| !s.is_empty()).map(String::from))
            .unwrap_or_else(|| "Unknown API error".to_string());

        Error::Api {
            status,
            code,
            message,
            body,
        }
    }

    pub(crate) fn mapping(
        entity: &'static str,
        field: Option<&str>,
        message: impl Into<String>,
    ) -> Self {
        Error::Mapping {
            entity,
            field: field.map(String::from),
            message: message.into(),
        }
    }
}
