//! vivo Configuration

use crate::config::default_capacity;
use crate::error::PushError;
use crate::types::Provider;
use secrecy::{ExposeSecret, SecretString};
use serde::Deserialize;
use std::str::FromStr;

/// What the recipient identifiers of a unicast/batch-cast are.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum VivoTargetType {
    #[default]
    Alias,
    RegId,
}

impl VivoTargetType {
    /// Field name for one recipient.
    pub fn single_field(&self) -> &'static str {
        match self {
            Self::Alias => "alias",
            Self::RegId => "regId",
        }
    }

    /// Field name for a recipient list.
    pub fn list_field(&self) -> &'static str {
        match self {
            Self::Alias => "aliases",
            Self::RegId => "regIds",
        }
    }
}

impl FromStr for VivoTargetType {
    type Err = PushError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "alias" => Ok(Self::Alias),
            "reg_id" | "regid" | "registration_id" => Ok(Self::RegId),
            other => Err(PushError::ConfigurationError(format!(
                "unknown vivo target type '{other}'"
            ))),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct VivoConfig {
    pub app_id: u64,
    pub app_key: String,
    pub app_secret: SecretString,
    #[serde(default)]
    pub target_type: VivoTargetType,
    /// 1 none, 2 sound, 3 vibrate, 4 sound and vibrate.
    #[serde(default = "default_notify_type")]
    pub notify_type: u8,
    /// 1 opens the app home page.
    #[serde(default = "default_skip_type")]
    pub skip_type: u8,
    #[serde(default = "default_base_url")]
    pub base_url: String,
    #[serde(default = "default_capacity")]
    pub capacity: usize,
}

fn default_notify_type() -> u8 {
    4
}

fn default_skip_type() -> u8 {
    1
}

fn default_base_url() -> String {
    VivoConfig::DEFAULT_BASE_URL.to_string()
}

impl VivoConfig {
    pub const DEFAULT_BASE_URL: &'static str = "https://api-push.vivo.com.cn";

    pub fn new(app_id: u64, app_key: impl Into<String>, app_secret: SecretString) -> Self {
        Self {
            app_id,
            app_key: app_key.into(),
            app_secret,
            target_type: VivoTargetType::default(),
            notify_type: default_notify_type(),
            skip_type: default_skip_type(),
            base_url: default_base_url(),
            capacity: default_capacity(),
        }
    }

    pub fn with_target_type(mut self, target_type: VivoTargetType) -> Self {
        self.target_type = target_type;
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
        if self.app_id == 0 {
            return Err(PushError::missing(Provider::Vivo, "app_id"));
        }
        if self.app_key.trim().is_empty() {
            return Err(PushError::missing(Provider::Vivo, "app_key"));
        }
        if self.app_secret.expose_secret().is_empty() {
            return Err(PushError::missing(Provider::Vivo, "app_secret"));
        }
        crate::providers::check_capacity(Provider::Vivo, self.capacity)
    }
}
