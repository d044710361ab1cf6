//! The HTTP transport seam.
//!
//! The dispatcher describes each call as a [`WireRequest`] and hands it to
//! a [`Transport`]. Production uses [`ReqwestTransport`]; tests swap in a
//! mock to count calls and inject transport failures.

use crate::core::domain::error::{PveError, PveResult};
use async_trait::async_trait;
use std::time::Duration;

/// The four logical operations, mapped 1:1 onto HTTP verbs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HttpMethod {
    Get,
    Post,
    Put,
    Delete,
}

impl HttpMethod {
    /// True for verbs that require the CSRF-prevention token.
    #[must_use]
    pub fn is_mutating(&self) -> bool {
        !matches!(self, HttpMethod::Get)
    }

    pub(crate) fn as_reqwest(&self) -> reqwest::Method {
        match self {
            HttpMethod::Get => reqwest::Method::GET,
            HttpMethod::Post => reqwest::Method::POST,
            HttpMethod::Put => reqwest::Method::PUT,
            HttpMethod::Delete => reqwest::Method::DELETE,
        }
    }
}

impl std::fmt::Display for HttpMethod {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            HttpMethod::Get => "GET",
            HttpMethod::Post => "POST",
            HttpMethod::Put => "PUT",
            HttpMethod::Delete => "DELETE",
        };
        f.write_str(name)
    }
}

/// One fully described HTTP exchange, ready to send.
#[derive(Debug, Clone, PartialEq)]
pub struct WireRequest {
    pub method: HttpMethod,
    /// Absolute URL without the query string.
    pub url: String,
    pub headers: Vec<(String, String)>,
    /// Query-string pairs (populated for GET).
    pub query: Vec<(String, String)>,
    /// Form-body pairs (populated for mutating verbs).
    pub form: Option<Vec<(String, String)>>,
}

/// The raw response the transport hands back.
#[derive(Debug, Clone, PartialEq)]
pub struct WireResponse {
    pub status: u16,
    pub body: String,
}

/// Something that can perform one HTTP exchange.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait Transport: Send + Sync {
    /// Sends the request and returns the raw response.
    ///
    /// # Errors
    ///
    /// [`PveError::Timeout`] when the configured deadline elapsed;
    /// [`PveError::Connection`] for every other transport failure. HTTP
    /// error statuses are not transport failures and come back as a normal
    /// [`WireResponse`].
    async fn execute(&self, request: WireRequest) -> PveResult<WireResponse>;
}

/// The production transport, backed by a shared `reqwest::Client`.
#[derive(Debug)]
pub struct ReqwestTransport {
    client: reqwest::Client,
}

impl ReqwestTransport {
    /// Builds the underlying HTTP client.
    ///
    /// # Errors
    ///
    /// Returns [`PveError::Connection`] if the TLS backend cannot be
    /// initialized.
    pub fn new(accept_invalid_certs: bool, timeout: Duration) -> PveResult<Self> {
        let client = reqwest::Client::builder()
            .danger_accept_invalid_certs(accept_invalid_certs)
            .timeout(timeout)
            .build()
            .map_err(|e| PveError::Connection(e.to_string()))?;
        Ok(Self { client })
    }
}

#[async_trait]
impl Transport for ReqwestTransport {
    async fn execute(&self, request: WireRequest) -> PveResult<WireResponse> {
        let mut builder = self.client.request(request.method.as_reqwest(), &request.url);
        for (name, value) in &request.headers {
            builder = builder.header(name.as_str(), value.as_str());
        }
        if !request.query.is_empty() {
            builder = builder.query(&request.query);
        }
        if let Some(form) = &request.form {
            builder = builder.form(form);
        }

        let response = builder.send().await.map_err(classify_send_error)?;
        let status = response.status().as_u16();
        let body = response
            .text()
            .await
            .map_err(|e| PveError::Connection(format!("failed to read response body: {e}")))?;
        Ok(WireResponse { status, body })
    }
}

fn classify_send_error(error: reqwest::Error) -> PveError {
    if error.is_timeout() {
        PveError::Timeout(error.to_string())
    } else {
        PveError::Connection(error.to_string())
    }
}
