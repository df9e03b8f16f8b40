//! Minimal blocking client for the AnkiConnect JSON-over-HTTP API.
//!
//! [`AnkiConnect::invoke`] performs exactly one round trip per call: it wraps
//! the action in an [`ActionRequest`], posts it through a [`Transport`], and
//! validates the [`ActionResponse`] envelope before handing back `result`.

use reqwest::blocking::Client;
use reqwest::header::CONTENT_TYPE;
use serde_json::{Map, Value};

use crate::{ActionRequest, ActionResponse, AnkiError, ConnectorConfig, Result};

/// Sends one request body to a URL and returns the response body.
///
/// Implementations must not retry and must not keep per-call state; a failed
/// send is reported as [`AnkiError::Connection`].
pub trait Transport {
    fn post(&self, url: &str, body: String) -> Result<String>;
}

/// Production [`Transport`] backed by `reqwest::blocking`.
#[derive(Debug, Clone)]
pub struct HttpTransport {
    client: Client,
}

impl HttpTransport {
    /// Creates a transport whose requests are bounded by `timeout`.
    ///
    /// # Errors
    ///
    /// Returns [`AnkiError::Connection`] if the HTTP client cannot be built
    /// (for example when no TLS backend is available).
    pub fn new(timeout: std::time::Duration) -> Result<Self> {
        let client = Client::builder()
            .timeout(timeout)
            .connect_timeout(timeout)
            .build()
            .map_err(|e| AnkiError::Connection(format!("failed to build HTTP client: {e}")))?;
        Ok(Self { client })
    }
}

impl Transport for HttpTransport {
    fn post(&self, url: &str, body: String) -> Result<String> {
        let response = self
            .client
            .post(url)
            .header(CONTENT_TYPE, "application/json")
            .body(body)
            .send()
            .map_err(|e| AnkiError::unreachable(url, e))?;

        let status = response.status();
        let text = response
            .text()
            .map_err(|e| AnkiError::unreachable(url, e))?;

        if !status.is_success() {
            return Err(AnkiError::MalformedResponse(format!(
                "HTTP {status}: {}",
                text.trim()
            )));
        }
        Ok(text)
    }
}

/// Client for a running AnkiConnect instance.
///
/// The client holds only its configuration and transport; every call is
/// independent of the previous one.
#[derive(Debug, Clone)]
pub struct AnkiConnect<T: Transport = HttpTransport> {
    config: ConnectorConfig,
    transport: T,
}

impl AnkiConnect<HttpTransport> {
    /// Creates a client that talks HTTP to the endpoint described by `config`.
    ///
    /// # Errors
    ///
    /// Returns [`AnkiError::Connection`] if the HTTP client cannot be built.
    pub fn new(config: ConnectorConfig) -> Result<Self> {
        let transport = HttpTransport::new(config.timeout)?;
        Ok(Self { config, transport })
    }
}

impl<T: Transport> AnkiConnect<T> {
    /// Creates a client over a custom transport.
    pub fn with_transport(config: ConnectorConfig, transport: T) -> Self {
        Self { config, transport }
    }

    pub fn config(&self) -> &ConnectorConfig {
        &self.config
    }

    /// Invokes `action` with `params` and returns the `result` payload.
    ///
    /// `params` must be a JSON object (or `null`, treated as `{}`).
    ///
    /// # Errors
    ///
    /// - [`AnkiError::Validation`] for an empty action or non-object params;
    ///   nothing is sent in that case.
    /// - [`AnkiError::Connection`] if AnkiConnect cannot be reached.
    /// - [`AnkiError::MalformedResponse`] if the envelope is not `{result, error}`.
    /// - [`AnkiError::RemoteAction`] if AnkiConnect reported an error.
    pub fn invoke(&self, action: &str, params: Value) -> Result<Value> {
        let params = match params {
            Value::Object(map) => map,
            Value::Null => Map::new(),
            other => {
                return Err(AnkiError::Validation(format!(
                    "params for `{action}` must be a JSON object, got {other}"
                )))
            }
        };
        let request = ActionRequest::new(action, self.config.api_version, params)?;
        let body = serde_json::to_string(&request)?;

        log::debug!("AnkiConnect -> {action}");
        let raw = self.transport.post(&self.config.url(), body)?;
        let response = ActionResponse::parse(&raw)?;
        if let Some(msg) = &response.error {
            log::debug!("AnkiConnect <- {action} failed: {msg}");
        }
        response.into_result()
    }
}
