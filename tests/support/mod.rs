//! Shared helpers for integration tests.
//!
//! - `RecordingTransport`: in-memory transport that records every request
//!   and answers from a caller-supplied responder
//! - form/JSON body helpers for asserting on recorded requests

#![allow(dead_code)]

pub mod mockito;

use app_push::PushError;
use app_push::execution::http::{HttpTransport, HttpTransportRequest, HttpTransportResponse};
use async_trait::async_trait;
use serde_json::Value;
use std::sync::Mutex;

type Responder =
    Box<dyn Fn(&HttpTransportRequest, usize) -> Result<HttpTransportResponse, PushError> + Send + Sync>;

/// Records requests; the responder sees each request and its zero-based
/// position in the call sequence.
pub struct RecordingTransport {
    requests: Mutex<Vec<HttpTransportRequest>>,
    responder: Responder,
}

impl RecordingTransport {
    pub fn new<F>(responder: F) -> Self
    where
        F: Fn(&HttpTransportRequest, usize) -> Result<HttpTransportResponse, PushError>
            + Send
            + Sync
            + 'static,
    {
        Self {
            requests: Mutex::new(Vec::new()),
            responder: Box::new(responder),
        }
    }

    /// Every request answered with the same JSON body and status 200.
    pub fn always(body: Value) -> Self {
        Self::new(move |_, _| Ok(json_response(200, &body)))
    }

    pub fn requests(&self) -> Vec<HttpTransportRequest> {
        self.requests.lock().unwrap().clone()
    }

    pub fn urls(&self) -> Vec<String> {
        self.requests().into_iter().map(|r| r.url).collect()
    }

    pub fn count_matching(&self, needle: &str) -> usize {
        self.urls().iter().filter(|u| u.contains(needle)).count()
    }
}

#[async_trait]
impl HttpTransport for RecordingTransport {
    async fn execute(
        &self,
        request: HttpTransportRequest,
    ) -> Result<HttpTransportResponse, PushError> {
        let position = {
            let mut requests = self.requests.lock().unwrap();
            requests.push(request.clone());
            requests.len() - 1
        };
        (self.responder)(&request, position)
    }
}

pub fn json_response(status: u16, body: &Value) -> HttpTransportResponse {
    HttpTransportResponse {
        status,
        headers: Default::default(),
        body: body.to_string().into_bytes(),
    }
}

/// Decode an URL-encoded form body into ordered pairs.
pub fn form_pairs(request: &HttpTransportRequest) -> Vec<(String, String)> {
    request
        .body_text()
        .split('&')
        .filter(|pair| !pair.is_empty())
        .map(|pair| {
            let (k, v) = pair.split_once('=').unwrap_or((pair, ""));
            (
                urlencoding::decode(k).unwrap().into_owned(),
                urlencoding::decode(v).unwrap().into_owned(),
            )
        })
        .collect()
}

pub fn form_field(request: &HttpTransportRequest, key: &str) -> Option<String> {
    form_pairs(request)
        .into_iter()
        .find(|(k, _)| k == key)
        .map(|(_, v)| v)
}

pub fn json_body(request: &HttpTransportRequest) -> Value {
    serde_json::from_slice(&request.body).unwrap()
}

pub fn recipients(count: usize) -> Vec<String> {
    (0..count).map(|i| format!("alias-{i}")).collect()
}
