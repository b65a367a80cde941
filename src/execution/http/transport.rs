//! HTTP transport abstraction.
//!
//! Adapters never talk to `reqwest` directly; they hand a fully built
//! [`HttpTransportRequest`] to an injectable [`HttpTransport`]. Tests swap in
//! a recording transport that observes the final URL/headers/body and returns
//! a synthetic response.

use crate::error::PushError;
use crate::types::Provider;
use async_trait::async_trait;
use reqwest::Method;
use reqwest::header::HeaderMap;
use std::time::{Duration, Instant};

/// Per-request budget used when nothing else is configured.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// Body of a vendor request, before encoding.
#[derive(Debug, Clone, PartialEq)]
pub enum RequestBody {
    /// URL-encoded form fields, in insertion order.
    Form(Vec<(String, String)>),
    Json(serde_json::Value),
}

impl RequestBody {
    pub fn form<I, K, V>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        Self::Form(
            pairs
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        )
    }

    /// Look up a form field; `None` for JSON bodies.
    pub fn form_value(&self, key: &str) -> Option<&str> {
        match self {
            Self::Form(pairs) => pairs
                .iter()
                .find(|(k, _)| k == key)
                .map(|(_, v)| v.as_str()),
            Self::Json(_) => None,
        }
    }

    pub fn encode(&self) -> Result<Vec<u8>, PushError> {
        match self {
            Self::Form(pairs) => Ok(encode_form(pairs).into_bytes()),
            Self::Json(value) => serde_json::to_vec(value).map_err(|e| {
                PushError::ConfigurationError(format!("Failed to serialize request body: {e}"))
            }),
        }
    }
}

/// `k1=v1&k2=v2` with both sides percent-encoded.
pub fn encode_form(pairs: &[(String, String)]) -> String {
    pairs
        .iter()
        .map(|(k, v)| format!("{}={}", urlencoding::encode(k), urlencoding::encode(v)))
        .collect::<Vec<_>>()
        .join("&")
}

/// Transport-level request data.
#[derive(Debug, Clone)]
pub struct HttpTransportRequest {
    pub provider: Provider,
    pub method: Method,
    pub url: String,
    pub headers: HeaderMap,
    pub body: Vec<u8>,
}

impl HttpTransportRequest {
    pub fn post(provider: Provider, url: impl Into<String>, headers: HeaderMap, body: Vec<u8>) -> Self {
        Self {
            provider,
            method: Method::POST,
            url: url.into(),
            headers,
            body,
        }
    }

    /// Body as text, for logging and test assertions.
    pub fn body_text(&self) -> String {
        String::from_utf8_lossy(&self.body).into_owned()
    }
}

/// Transport-level response data.
#[derive(Debug, Clone)]
pub struct HttpTransportResponse {
    pub status: u16,
    pub headers: HeaderMap,
    pub body: Vec<u8>,
}

impl HttpTransportResponse {
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }

    pub fn text(&self) -> String {
        String::from_utf8_lossy(&self.body).into_owned()
    }
}

/// One HTTP request/response cycle.
///
/// Implementations return the response for every HTTP status; only
/// connection failures and timeouts are errors here.
#[async_trait]
pub trait HttpTransport: Send + Sync {
    async fn execute(
        &self,
        request: HttpTransportRequest,
    ) -> Result<HttpTransportResponse, PushError>;
}

/// Production transport backed by a shared `reqwest::Client`.
#[derive(Debug, Clone)]
pub struct ReqwestTransport {
    client: reqwest::Client,
    timeout: Duration,
}

impl ReqwestTransport {
    pub fn new(timeout: Duration) -> Result<Self, PushError> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| PushError::ConfigurationError(format!("Failed to build HTTP client: {e}")))?;
        Ok(Self { client, timeout })
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }
}

#[async_trait]
impl HttpTransport for ReqwestTransport {
    async fn execute(
        &self,
        request: HttpTransportRequest,
    ) -> Result<HttpTransportResponse, PushError> {
        let provider = request.provider;
        let started = Instant::now();
        let response = self
            .client
            .request(request.method, &request.url)
            .headers(request.headers)
            .timeout(self.timeout)
            .body(request.body)
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    PushError::transport(
                        provider,
                        None,
                        format!("request timed out after {:?}", self.timeout),
                    )
                } else {
                    PushError::from(e).with_provider(provider)
                }
            })?;

        let status = response.status().as_u16();
        let headers = response.headers().clone();
        let body = response
            .bytes()
            .await
            .map_err(|e| PushError::from(e).with_provider(provider))?
            .to_vec();

        tracing::debug!(
            provider = %provider,
            status,
            elapsed_ms = started.elapsed().as_millis() as u64,
            "vendor response received"
        );
        Ok(HttpTransportResponse {
            status,
            headers,
            body,
        })
    }
}
