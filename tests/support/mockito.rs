//! mockito helpers.
//!
//! - async server start and base URL
//! - JSON answers for vendor endpoints
//! - form-body matching for signed vendor requests

#![allow(dead_code)]

use app_push::execution::http::FORM_CONTENT_TYPE;
use mockito::{Matcher, Mock, ServerGuard};

/// Start an async mockito server.
pub async fn start() -> ServerGuard {
    mockito::Server::new_async().await
}

pub fn url(server: &ServerGuard) -> String {
    server.url()
}

pub fn regex(re: &str) -> Matcher {
    Matcher::Regex(re.to_string())
}

/// POST `path` answering `status` with a JSON body.
pub async fn json_mock(server: &mut ServerGuard, path: &str, status: u16, body_json: &str) -> Mock {
    server
        .mock("POST", path)
        .with_status(status as usize)
        .with_header("content-type", "application/json")
        .with_body(body_json)
        .create_async()
        .await
}

/// POST `path` with a form body matching every regex in `body_patterns`.
pub async fn form_mock(
    server: &mut ServerGuard,
    path: &str,
    body_patterns: &[&str],
    body_json: &str,
) -> Mock {
    let body = Matcher::AllOf(body_patterns.iter().map(|re| regex(re)).collect());
    server
        .mock("POST", path)
        .match_header("content-type", FORM_CONTENT_TYPE)
        .match_body(body)
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(body_json)
        .create_async()
        .await
}
