//! Meizu Configuration

use crate::config::default_capacity;
use crate::error::PushError;
use crate::types::Provider;
use secrecy::{ExposeSecret, SecretString};
use serde::Deserialize;

#[derive(Debug, Clone, Deserialize)]
pub struct MeizuConfig {
    pub app_id: u64,
    pub app_secret: SecretString,
    #[serde(default = "default_base_url")]
    pub base_url: String,
    #[serde(default = "default_capacity")]
    pub capacity: usize,
}

fn default_base_url() -> String {
    MeizuConfig::DEFAULT_BASE_URL.to_string()
}

impl MeizuConfig {
    pub const DEFAULT_BASE_URL: &'static str = "http://server-api-mzups.meizu.com";

    pub fn new(app_id: u64, app_secret: SecretString) -> Self {
        Self {
            app_id,
            app_secret,
            base_url: default_base_url(),
            capacity: default_capacity(),
        }
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
        if self.app_id == 0 {
            return Err(PushError::missing(Provider::Meizu, "app_id"));
        }
        if self.app_secret.expose_secret().is_empty() {
            return Err(PushError::missing(Provider::Meizu, "app_secret"));
        }
        crate::providers::check_capacity(Provider::Meizu, self.capacity)
    }
}
