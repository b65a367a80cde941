//! Xiaomi Configuration

use crate::config::default_capacity;
use crate::error::PushError;
use crate::types::Provider;
use secrecy::{ExposeSecret, SecretString};
use serde::Deserialize;

#[derive(Debug, Clone, Deserialize)]
pub struct XiaomiConfig {
    pub app_secret: SecretString,
    /// Falls back to the shared package name when empty.
    #[serde(default)]
    pub app_pkg_name: String,
    #[serde(default = "default_base_url")]
    pub base_url: String,
    #[serde(default = "default_capacity")]
    pub capacity: usize,
}

fn default_base_url() -> String {
    XiaomiConfig::DEFAULT_BASE_URL.to_string()
}

impl XiaomiConfig {
    pub const DEFAULT_BASE_URL: &'static str = "https://api.xmpush.xiaomi.com";

    pub fn new(app_secret: SecretString) -> Self {
        Self {
            app_secret,
            app_pkg_name: String::new(),
            base_url: default_base_url(),
            capacity: default_capacity(),
        }
    }

    pub fn with_app_pkg_name(mut self, app_pkg_name: impl Into<String>) -> Self {
        self.app_pkg_name = app_pkg_name.into();
        self
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    pub fn with_capacity(mut self, capacity: usize) -> Self {
        self.capacity = capacity;
        self
    }

    pub fn validate(&self) -> Result<(), PushError> {
        if self.app_secret.expose_secret().is_empty() {
            return Err(PushError::missing(Provider::Xiaomi, "app_secret"));
        }
        if self.app_pkg_name.trim().is_empty() {
            return Err(PushError::missing(Provider::Xiaomi, "app_pkg_name"));
        }
        crate::providers::check_capacity(Provider::Xiaomi, self.capacity)
    }
}
