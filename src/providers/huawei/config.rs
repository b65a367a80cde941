//! Huawei Configuration

use crate::config::default_capacity;
use crate::error::PushError;
use crate::types::Provider;
use secrecy::{ExposeSecret, SecretString};
use serde::Deserialize;

/// Huawei credentials and endpoints.
#[derive(Debug, Clone, Deserialize)]
pub struct HuaweiConfig {
    pub client_id: String,
    pub client_secret: SecretString,
    /// Falls back to the shared package name when empty.
    #[serde(default)]
    pub app_pkg_name: String,
    #[serde(default = "default_token_url")]
    pub token_url: String,
    #[serde(default = "default_push_url")]
    pub push_url: String,
    #[serde(default = "default_capacity")]
    pub capacity: usize,
}

fn default_token_url() -> String {
    HuaweiConfig::DEFAULT_TOKEN_URL.to_string()
}

fn default_push_url() -> String {
    HuaweiConfig::DEFAULT_PUSH_URL.to_string()
}

impl HuaweiConfig {
    pub const DEFAULT_TOKEN_URL: &'static str = "https://login.cloud.huawei.com/oauth2/v2/token";
    pub const DEFAULT_PUSH_URL: &'static str = "https://api.push.hicloud.com/pushsend.do";

    pub fn new(client_id: impl Into<String>, client_secret: SecretString) -> Self {
        Self {
            client_id: client_id.into(),
            client_secret,
            app_pkg_name: String::new(),
            token_url: default_token_url(),
            push_url: default_push_url(),
            capacity: default_capacity(),
        }
    }

    pub fn with_app_pkg_name(mut self, app_pkg_name: impl Into<String>) -> Self {
        self.app_pkg_name = app_pkg_name.into();
        self
    }

    /// Point both endpoints at one host, keeping their paths.
    pub fn with_base_url(mut self, base_url: &str) -> Self {
        let base = base_url.trim_end_matches('/');
        self.token_url = format!("{base}/oauth2/v2/token");
        self.push_url = format!("{base}/pushsend.do");
        self
    }

    pub fn with_capacity(mut self, capacity: usize) -> Self {
        self.capacity = capacity;
        self
    }

    pub fn validate(&self) -> Result<(), PushError> {
        if self.app_pkg_name.trim().is_empty() {
            return Err(PushError::missing(Provider::Huawei, "app_pkg_name"));
        }
        if self.client_id.trim().is_empty() {
            return Err(PushError::missing(Provider::Huawei, "client_id"));
        }
        if self.client_secret.expose_secret().is_empty() {
            return Err(PushError::missing(Provider::Huawei, "client_secret"));
        }
        crate::providers::check_capacity(Provider::Huawei, self.capacity)
    }
}
