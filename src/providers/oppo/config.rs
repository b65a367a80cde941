//! OPPO Configuration

use crate::config::default_capacity;
use crate::error::PushError;
use crate::types::Provider;
use secrecy::{ExposeSecret, SecretString};
use serde::Deserialize;
use std::str::FromStr;

/// What the recipient identifiers of a unicast/batch-cast are.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OppoTargetType {
    RegistrationId,
    #[default]
    Alias,
}

impl OppoTargetType {
    /// Value of the `target_type` field.
    pub fn code(&self) -> u8 {
        match self {
            Self::RegistrationId => 2,
            Self::Alias => 3,
        }
    }
}

impl FromStr for OppoTargetType {
    type Err = PushError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "alias" => Ok(Self::Alias),
            "registration_id" | "reg_id" | "regid" => Ok(Self::RegistrationId),
            other => Err(PushError::ConfigurationError(format!(
                "unknown oppo target type '{other}'"
            ))),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct OppoConfig {
    pub app_key: String,
    pub master_key: SecretString,
    #[serde(default)]
    pub target_type: OppoTargetType,
    #[serde(default = "default_base_url")]
    pub base_url: String,
    #[serde(default = "default_capacity")]
    pub capacity: usize,
}

fn default_base_url() -> String {
    OppoConfig::DEFAULT_BASE_URL.to_string()
}

impl OppoConfig {
    pub const DEFAULT_BASE_URL: &'static str = "https://api.push.oppomobile.com/server/v1";

    pub fn new(app_key: impl Into<String>, master_key: SecretString) -> Self {
        Self {
            app_key: app_key.into(),
            master_key,
            target_type: OppoTargetType::default(),
            base_url: default_base_url(),
            capacity: default_capacity(),
        }
    }

    pub fn with_target_type(mut self, target_type: OppoTargetType) -> Self {
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
        if self.app_key.trim().is_empty() {
            return Err(PushError::missing(Provider::Oppo, "app_key"));
        }
        if self.master_key.expose_secret().is_empty() {
            return Err(PushError::missing(Provider::Oppo, "master_key"));
        }
        crate::providers::check_capacity(Provider::Oppo, self.capacity)
    }
}
