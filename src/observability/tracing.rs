//! Tracing helpers for vendor requests.

use crate::error::PushError;
use crate::types::Provider;
use reqwest::header::HeaderMap;
use std::collections::BTreeMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Instant;
use tracing::{debug, info, warn};
use tracing_subscriber::EnvFilter;

/// Header and field names whose values never reach a log line unmasked.
const SENSITIVE_NAMES: &[&str] = &[
    "authorization",
    "auth_token",
    "authtoken",
    "access_token",
    "sign",
    "client_secret",
    "app_secret",
    "appsecret",
    "master_key",
];

static MASK_SENSITIVE_VALUES: AtomicBool = AtomicBool::new(true);

pub fn set_mask_sensitive_values(mask: bool) {
    MASK_SENSITIVE_VALUES.store(mask, Ordering::Relaxed);
}

pub fn get_mask_sensitive_values() -> bool {
    MASK_SENSITIVE_VALUES.load(Ordering::Relaxed)
}

fn is_sensitive(name: &str) -> bool {
    let name = name.to_ascii_lowercase();
    SENSITIVE_NAMES.contains(&name.as_str())
}

/// Keep a short prefix and suffix of long secrets; hide short ones entirely.
pub fn mask_sensitive_value(value: &str) -> String {
    if !get_mask_sensitive_values() {
        return value.to_string();
    }
    if let Some(secret) = value.strip_prefix("key=") {
        return format!("key={}", mask_sensitive_value(secret));
    }
    let chars: Vec<char> = value.chars().collect();
    if chars.len() > 12 {
        let head: String = chars[..4].iter().collect();
        let tail: String = chars[chars.len() - 4..].iter().collect();
        format!("{head}...{tail}")
    } else {
        "***".to_string()
    }
}

pub fn format_headers_for_logging(headers: &HeaderMap) -> String {
    let map: BTreeMap<&str, String> = headers
        .iter()
        .map(|(k, v)| {
            let value = v.to_str().unwrap_or("<invalid>");
            let shown = if is_sensitive(k.as_str()) {
                mask_sensitive_value(value)
            } else {
                value.to_string()
            };
            (k.as_str(), shown)
        })
        .collect();
    serde_json::to_string(&map).unwrap_or_else(|_| format!("{map:?}"))
}

/// Render a JSON or form-encoded body with credential fields masked.
pub fn format_body_for_logging(body: &[u8]) -> String {
    if let Ok(mut value) = serde_json::from_slice::<serde_json::Value>(body) {
        mask_json(&mut value);
        return value.to_string();
    }
    let text = String::from_utf8_lossy(body);
    text.split('&')
        .map(|pair| match pair.split_once('=') {
            Some((k, v)) if is_sensitive(k) => format!("{k}={}", mask_sensitive_value(v)),
            _ => pair.to_string(),
        })
        .collect::<Vec<_>>()
        .join("&")
}

fn mask_json(value: &mut serde_json::Value) {
    match value {
        serde_json::Value::Object(map) => {
            for (k, v) in map.iter_mut() {
                if is_sensitive(k)
                    && let Some(s) = v.as_str()
                {
                    *v = serde_json::Value::String(mask_sensitive_value(s));
                } else {
                    mask_json(v);
                }
            }
        }
        serde_json::Value::Array(items) => items.iter_mut().for_each(mask_json),
        _ => {}
    }
}

/// Install a `fmt` subscriber. `filter` wins over `RUST_LOG`; with neither,
/// `info` is used. Calling twice is harmless.
pub fn init_tracing(filter: Option<&str>) {
    let filter = match filter {
        Some(directives) => EnvFilter::new(directives),
        None => EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
    };
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .try_init();
}

/// Per-vendor request tracing.
#[derive(Debug, Clone, Copy)]
pub struct ProviderTracer {
    provider: Provider,
}

impl ProviderTracer {
    pub fn new(provider: Provider) -> Self {
        Self { provider }
    }

    pub fn trace_request_start(&self, method: &str, url: &str) {
        info!(provider = %self.provider, method = %method, url = %url, "Request started");
    }

    pub fn trace_request_details(&self, headers: &HeaderMap, body: &[u8]) {
        debug!(
            provider = %self.provider,
            request_headers = %format_headers_for_logging(headers),
            request_body = %format_body_for_logging(body),
            "Request details"
        );
    }

    pub fn trace_response(&self, status_code: u16, started: Instant, body: &[u8]) {
        debug!(
            provider = %self.provider,
            status_code,
            duration_ms = started.elapsed().as_millis() as u64,
            response_body = %format_body_for_logging(body),
            "Response received"
        );
    }

    pub fn trace_request_error(&self, error: &PushError, started: Instant) {
        warn!(
            provider = %self.provider,
            kind = ?error.kind(),
            status_code = ?error.status_code(),
            duration_ms = started.elapsed().as_millis() as u64,
            error = %error,
            "Request failed"
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use reqwest::header::HeaderValue;
    use std::io::Write;
    use std::sync::{Arc, Mutex};
    use tracing_subscriber::fmt::MakeWriter;

    #[derive(Clone, Default)]
    struct CapturedLogs(Arc<Mutex<Vec<u8>>>);

    impl CapturedLogs {
        fn text(&self) -> String {
            String::from_utf8_lossy(&self.0.lock().unwrap()).into_owned()
        }
    }

    impl Write for CapturedLogs {
        fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
            self.0.lock().unwrap().extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> std::io::Result<()> {
            Ok(())
        }
    }

    impl<'a> MakeWriter<'a> for CapturedLogs {
        type Writer = CapturedLogs;

        fn make_writer(&'a self) -> Self::Writer {
            self.clone()
        }
    }

    #[test]
    fn token_responses_are_logged_masked() {
        let bodies: [(Provider, &[u8], &str); 3] = [
            (
                Provider::Huawei,
                br#"{"access_token":"CgB6e3x9HuaweiLiveToken0001","expires_in":3600}"#.as_slice(),
                "CgB6e3x9HuaweiLiveToken0001",
            ),
            (
                Provider::Oppo,
                br#"{"code":0,"message":"Success","data":{"auth_token":"oppo-live-token-0002"}}"#.as_slice(),
                "oppo-live-token-0002",
            ),
            (
                Provider::Vivo,
                br#"{"result":0,"desc":"ok","authToken":"vivo-live-token-0003"}"#.as_slice(),
                "vivo-live-token-0003",
            ),
        ];

        for (provider, body, token) in bodies {
            let logs = CapturedLogs::default();
            let subscriber = tracing_subscriber::fmt()
                .with_max_level(tracing::Level::DEBUG)
                .with_ansi(false)
                .with_writer(logs.clone())
                .finish();
            tracing::subscriber::with_default(subscriber, || {
                ProviderTracer::new(provider).trace_response(200, Instant::now(), body);
            });

            let text = logs.text();
            assert!(text.contains("Response received"), "{provider}: {text}");
            assert!(!text.contains(token), "{provider} token leaked: {text}");
        }
    }

    #[test]
    fn masks_credential_headers_only() {
        let mut headers = HeaderMap::new();
        headers.insert("authorization", HeaderValue::from_static("key=abcdefghijklmnopqrstuvwxyz"));
        headers.insert("auth_token", HeaderValue::from_static("short"));
        headers.insert("content-type", HeaderValue::from_static("application/json"));
        let shown = format_headers_for_logging(&headers);
        assert!(shown.contains("key=abcd...wxyz"));
        assert!(shown.contains(r#""auth_token":"***""#));
        assert!(shown.contains("application/json"));
        assert!(!shown.contains("short"));
    }

    #[test]
    fn masks_form_and_json_bodies() {
        let form = format_body_for_logging(b"appId=1&sign=0123456789abcdef0123&messageJson=x");
        assert_eq!(form, "appId=1&sign=0123...0123&messageJson=x");

        let json = format_body_for_logging(br#"{"appId":1,"sign":"s","nested":{"authToken":"t"}}"#);
        assert!(json.contains(r#""sign":"***""#));
        assert!(json.contains(r#""authToken":"***""#));
        assert!(json.contains(r#""appId":1"#));
    }
}
