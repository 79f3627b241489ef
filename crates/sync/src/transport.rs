// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Transport abstraction for outbound mutations.
//!
//! Provides a trait-based transport layer that enables:
//! - Real HTTP(S) calls against the warehouse API for production
//! - Mock transports for unit testing
//!
//! A transport only reports what happened on the wire. Any response, whatever
//! its status, is `Ok`; an `Err` always means no response was received.

use std::future::Future;
use std::pin::Pin;
use std::time::Duration;

use serde_json::Value;
use wh_core::Method;

use crate::config::SyncConfig;
use crate::error::{Error, Result};

/// Error type for transport operations.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TransportError {
    /// The request timed out before a response arrived.
    #[error("request timed out: {0}")]
    Timeout(String),

    /// The connection could not be established.
    #[error("connection failed: {0}")]
    Connect(String),

    /// The request failed in flight.
    #[error("request failed: {0}")]
    Request(String),

    /// The request could not be built (bad URL, bad header value).
    #[error("invalid request: {0}")]
    InvalidRequest(String),
}

impl TransportError {
    /// Returns true if retrying the same request could succeed.
    pub fn is_transient(&self) -> bool {
        !matches!(self, TransportError::InvalidRequest(_))
    }
}

/// Result type for transport operations.
pub type TransportResult<T> = std::result::Result<T, TransportError>;

/// One outbound mutation as it goes on the wire.
#[derive(Debug, Clone, PartialEq)]
pub struct ApiRequest {
    pub method: Method,
    /// Path relative to the API base URL, or an absolute URL.
    pub target: String,
    /// JSON body; `Value::Null` sends no body.
    pub payload: Value,
    /// Bearer credential for the `Authorization` header.
    pub bearer: Option<String>,
}

/// A response received from the API.
#[derive(Debug, Clone, PartialEq)]
pub struct ApiResponse {
    pub status: u16,
    /// Parsed JSON body, a string for non-JSON bodies, `Null` when empty.
    pub body: Value,
}

impl ApiResponse {
    pub fn new(status: u16, body: Value) -> Self {
        ApiResponse { status, body }
    }

    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }

    /// Returns the server-supplied error message, if the body carries one.
    ///
    /// Looks at `message`, then `error`, and finally a plain-text body.
    pub fn server_message(&self) -> Option<String> {
        let text = match &self.body {
            Value::Object(map) => ["message", "error"]
                .iter()
                .find_map(|key| map.get(*key).and_then(Value::as_str)),
            Value::String(s) => Some(s.as_str()),
            _ => None,
        }?;
        let text = text.trim();
        (!text.is_empty()).then(|| text.to_string())
    }
}

/// Transport trait for request/response communication with the API.
///
/// This trait abstracts over the actual transport mechanism, allowing
/// for easy testing with mock implementations.
pub trait Transport: Send + Sync {
    /// Sends one request and waits for its response.
    fn send<'a>(
        &'a self,
        request: &'a ApiRequest,
    ) -> Pin<Box<dyn Future<Output = TransportResult<ApiResponse>> + Send + 'a>>;
}

/// HTTP transport implementation using reqwest.
#[derive(Debug, Clone)]
pub struct HttpTransport {
    client: reqwest::Client,
    base_url: String,
}

impl HttpTransport {
    /// Creates a transport for the configured base URL and timeouts.
    pub fn new(config: &SyncConfig) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.request_timeout_secs))
            .connect_timeout(Duration::from_secs(config.connect_timeout_secs))
            .build()
            .map_err(|e| Error::Transport(TransportError::InvalidRequest(e.to_string())))?;

        Ok(HttpTransport { client, base_url: config.base_url.trim_end_matches('/').to_string() })
    }

    /// Resolves a target against the base URL.
    ///
    /// Absolute `http(s)://` targets are used as-is.
    pub fn url_for(&self, target: &str) -> String {
        if target.starts_with("http://") || target.starts_with("https://") {
            return target.to_string();
        }
        format!("{}/{}", self.base_url, target.trim_start_matches('/'))
    }
}

fn to_reqwest(method: Method) -> reqwest::Method {
    match method {
        Method::Post => reqwest::Method::POST,
        Method::Put => reqwest::Method::PUT,
        Method::Patch => reqwest::Method::PATCH,
        Method::Delete => reqwest::Method::DELETE,
    }
}

fn classify(err: reqwest::Error) -> TransportError {
    if err.is_builder() {
        TransportError::InvalidRequest(err.to_string())
    } else if err.is_timeout() {
        TransportError::Timeout(err.to_string())
    } else if err.is_connect() {
        TransportError::Connect(err.to_string())
    } else {
        TransportError::Request(err.to_string())
    }
}

fn parse_body(bytes: &[u8]) -> Value {
    if bytes.iter().all(u8::is_ascii_whitespace) {
        return Value::Null;
    }
    serde_json::from_slice(bytes)
        .unwrap_or_else(|_| Value::String(String::from_utf8_lossy(bytes).into_owned()))
}

impl Transport for HttpTransport {
    fn send<'a>(
        &'a self,
        request: &'a ApiRequest,
    ) -> Pin<Box<dyn Future<Output = TransportResult<ApiResponse>> + Send + 'a>> {
        Box::pin(async move {
            let url = self.url_for(&request.target);
            let mut builder = self.client.request(to_reqwest(request.method), &url);
            if !request.payload.is_null() {
                builder = builder.json(&request.payload);
            }
            if let Some(token) = &request.bearer {
                builder = builder.bearer_auth(token);
            }

            let response = builder.send().await.map_err(classify)?;
            let status = response.status().as_u16();
            // A body that fails mid-read still counts as a received response.
            let body = match response.bytes().await {
                Ok(bytes) => parse_body(&bytes),
                Err(e) => {
                    tracing::debug!(status, error = %e, "failed to read response body");
                    Value::Null
                }
            };

            Ok(ApiResponse { status, body })
        })
    }
}

#[cfg(test)]
#[path = "transport_tests.rs"]
mod tests;
