//! Vendor response envelope normalization.

use crate::error::PushError;
use crate::execution::http::HttpTransportResponse;
use crate::types::Provider;
use serde::de::DeserializeOwned;

/// Longest slice of a response body quoted in an error message.
const MAX_BODY_IN_ERROR: usize = 512;

/// The fields of a vendor response that decide success.
pub trait ResponseEnvelope: DeserializeOwned {
    fn is_success(&self) -> bool;

    /// Vendor status code, as text.
    fn code(&self) -> String;

    /// Human-readable text accompanying the status code.
    fn message(&self) -> String;

    /// Vendor-assigned message or task id.
    fn message_id(&self) -> Option<String> {
        None
    }
}

/// Turn a raw transport response into a successful envelope or an error.
///
/// - non-2xx status: `TransportError` with the status and body
/// - body that is not the expected JSON shape: `TransportError`
/// - envelope signalling failure: `VendorRejection` with the vendor text
pub fn normalize<E: ResponseEnvelope>(
    provider: Provider,
    response: &HttpTransportResponse,
) -> Result<E, PushError> {
    if !response.is_success() {
        return Err(PushError::transport(
            provider,
            Some(response.status),
            truncate(&response.text()),
        ));
    }

    let envelope: E = serde_json::from_slice(&response.body)
        .map_err(|e| PushError::from(e).with_provider(provider))?;
    if envelope.is_success() {
        return Ok(envelope);
    }

    let message = envelope.message();
    let message = if message.trim().is_empty() {
        truncate(&response.text())
    } else {
        message
    };
    Err(PushError::rejected(provider, envelope.code(), message))
}

fn truncate(text: &str) -> String {
    if text.len() <= MAX_BODY_IN_ERROR {
        return text.to_string();
    }
    let mut end = MAX_BODY_IN_ERROR;
    while !text.is_char_boundary(end) {
        end -= 1;
    }
    format!("{}...", &text[..end])
}

/// Accepts a JSON string or number and keeps it as text.
pub(crate) fn de_code_as_string<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: serde::Deserializer<'de>,
{
    use serde::Deserialize;
    Ok(match serde_json::Value::deserialize(deserializer)? {
        serde_json::Value::String(s) => s,
        serde_json::Value::Null => String::new(),
        other => other.to_string(),
    })
}
