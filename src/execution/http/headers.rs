//! HTTP Headers Utility
//!
//! Builds the header maps attached to vendor requests.

use crate::error::PushError;
use reqwest::header::{
    AUTHORIZATION, CONTENT_TYPE, HeaderMap, HeaderName, HeaderValue,
};

pub const FORM_CONTENT_TYPE: &str = "application/x-www-form-urlencoded;charset=UTF-8";
pub const JSON_CONTENT_TYPE: &str = "application/json";

/// HTTP header builder for vendor requests
pub struct HttpHeaderBuilder {
    headers: HeaderMap,
}

impl HttpHeaderBuilder {
    pub fn new() -> Self {
        Self {
            headers: HeaderMap::new(),
        }
    }

    /// `Authorization: key=<secret>` as used by Xiaomi.
    pub fn with_key_auth(mut self, secret: &str) -> Result<Self, PushError> {
        let value = HeaderValue::from_str(&format!("key={secret}")).map_err(|e| {
            PushError::ConfigurationError(format!("Invalid app secret format: {e}"))
        })?;
        self.headers.insert(AUTHORIZATION, value);
        Ok(self)
    }

    /// Put a token under a vendor-specific header name (`auth_token`, `authToken`).
    pub fn with_custom_auth(mut self, header_name: &str, value: &str) -> Result<Self, PushError> {
        let name = HeaderName::from_bytes(header_name.as_bytes()).map_err(|e| {
            PushError::ConfigurationError(format!("Invalid header name '{header_name}': {e}"))
        })?;
        self.headers.insert(
            name,
            HeaderValue::from_str(value)
                .map_err(|e| PushError::ConfigurationError(format!("Invalid token value: {e}")))?,
        );
        Ok(self)
    }

    pub fn with_json_content_type(mut self) -> Self {
        self.headers
            .insert(CONTENT_TYPE, HeaderValue::from_static(JSON_CONTENT_TYPE));
        self
    }

    pub fn with_form_content_type(mut self) -> Self {
        self.headers
            .insert(CONTENT_TYPE, HeaderValue::from_static(FORM_CONTENT_TYPE));
        self
    }

    pub fn build(self) -> HeaderMap {
        self.headers
    }
}

impl Default for HttpHeaderBuilder {
    fn default() -> Self {
        Self::new()
    }
}
