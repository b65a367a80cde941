//! Process configuration.
//!
//! A [`PushConfig`] carries the shared application settings plus one
//! optional section per vendor. It can be deserialized from JSON or read
//! from `APP_PUSH_*` environment variables.

use crate::error::PushError;
use crate::execution::DEFAULT_CAPACITY;
use crate::execution::http::DEFAULT_TIMEOUT;
use crate::providers::{
    HuaweiConfig, MeizuConfig, OppoConfig, OppoTargetType, VivoConfig, VivoTargetType,
    XiaomiConfig,
};
use crate::types::{BatchFailurePolicy, DeviceType, Provider};
use secrecy::SecretString;
use serde::Deserialize;
use std::time::Duration;

/// Prefix of every environment variable read by [`PushConfig::from_env`].
pub const ENV_PREFIX: &str = "APP_PUSH_";

/// HTTP settings shared by every adapter.
#[derive(Debug, Clone, Deserialize)]
pub struct HttpConfig {
    /// Per-request timeout in seconds.
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

impl HttpConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            timeout_secs: default_timeout_secs(),
        }
    }
}

/// Top-level configuration.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct PushConfig {
    /// Application package name, used by vendors that need one unless their
    /// own section sets it.
    #[serde(default)]
    pub app_pkg_name: String,
    #[serde(default)]
    pub device_type: DeviceType,
    /// Provider used by `Dispatcher::send_default`.
    #[serde(default)]
    pub default_provider: Option<Provider>,
    #[serde(default)]
    pub batch_failure_policy: BatchFailurePolicy,
    #[serde(default)]
    pub http: HttpConfig,
    #[serde(default)]
    pub huawei: Option<HuaweiConfig>,
    #[serde(default)]
    pub xiaomi: Option<XiaomiConfig>,
    #[serde(default)]
    pub oppo: Option<OppoConfig>,
    #[serde(default)]
    pub vivo: Option<VivoConfig>,
    #[serde(default)]
    pub meizu: Option<MeizuConfig>,
}

impl PushConfig {
    pub fn from_json_str(json: &str) -> Result<Self, PushError> {
        serde_json::from_str(json)
            .map_err(|e| PushError::ConfigurationError(format!("Invalid push configuration: {e}")))
    }

    /// Read `APP_PUSH_*` variables from the process environment.
    pub fn from_env() -> Result<Self, PushError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build from any key lookup; keys are full variable names such as
    /// `APP_PUSH_OPPO_APP_KEY`. A vendor section exists when any of its
    /// credential variables is set.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, PushError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |name: &str| {
            lookup(&format!("{ENV_PREFIX}{name}"))
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
        };
        let secret = |name: &str| SecretString::from(get(name).unwrap_or_default());
        let any = |names: &[&str]| names.iter().any(|n| get(n).is_some());

        let mut config = PushConfig {
            app_pkg_name: get("APP_PKG_NAME").unwrap_or_default(),
            ..Default::default()
        };
        if let Some(device) = get("DEVICE_TYPE") {
            config.device_type = device.parse()?;
        }
        if let Some(provider) = get("DEFAULT_PROVIDER") {
            config.default_provider = Some(provider.parse()?);
        }
        if let Some(policy) = get("BATCH_FAILURE_POLICY") {
            config.batch_failure_policy = parse_policy(&policy)?;
        }
        if let Some(timeout) = get("HTTP_TIMEOUT_SECS") {
            config.http.timeout_secs = parse_number(&timeout, "HTTP_TIMEOUT_SECS")?;
        }

        if any(&["HUAWEI_CLIENT_ID", "HUAWEI_CLIENT_SECRET"]) {
            config.huawei = Some(HuaweiConfig::new(
                get("HUAWEI_CLIENT_ID").unwrap_or_default(),
                secret("HUAWEI_CLIENT_SECRET"),
            ));
        }
        if any(&["XIAOMI_APP_SECRET"]) {
            config.xiaomi = Some(XiaomiConfig::new(secret("XIAOMI_APP_SECRET")));
        }
        if any(&["OPPO_APP_KEY", "OPPO_MASTER_KEY"]) {
            let mut oppo = OppoConfig::new(
                get("OPPO_APP_KEY").unwrap_or_default(),
                secret("OPPO_MASTER_KEY"),
            );
            if let Some(target) = get("OPPO_TARGET_TYPE") {
                oppo.target_type = target.parse::<OppoTargetType>()?;
            }
            config.oppo = Some(oppo);
        }
        if any(&["VIVO_APP_ID", "VIVO_APP_KEY", "VIVO_APP_SECRET"]) {
            let app_id = match get("VIVO_APP_ID") {
                Some(id) => parse_number(&id, "VIVO_APP_ID")?,
                None => 0,
            };
            let mut vivo = VivoConfig::new(
                app_id,
                get("VIVO_APP_KEY").unwrap_or_default(),
                secret("VIVO_APP_SECRET"),
            );
            if let Some(target) = get("VIVO_TARGET_TYPE") {
                vivo.target_type = target.parse::<VivoTargetType>()?;
            }
            config.vivo = Some(vivo);
        }
        if any(&["MEIZU_APP_ID", "MEIZU_APP_SECRET"]) {
            let app_id = match get("MEIZU_APP_ID") {
                Some(id) => parse_number(&id, "MEIZU_APP_ID")?,
                None => 0,
            };
            config.meizu = Some(MeizuConfig::new(app_id, secret("MEIZU_APP_SECRET")));
        }
        Ok(config)
    }

    /// Providers with a configured section, in [`Provider::ALL`] order.
    pub fn configured_providers(&self) -> Vec<Provider> {
        Provider::ALL
            .into_iter()
            .filter(|p| match p {
                Provider::Huawei => self.huawei.is_some(),
                Provider::Oppo => self.oppo.is_some(),
                Provider::Vivo => self.vivo.is_some(),
                Provider::Xiaomi => self.xiaomi.is_some(),
                Provider::Meizu => self.meizu.is_some(),
            })
            .collect()
    }
}

fn parse_policy(value: &str) -> Result<BatchFailurePolicy, PushError> {
    match value.to_ascii_lowercase().as_str() {
        "accumulate" => Ok(BatchFailurePolicy::Accumulate),
        "last_batch_wins" | "last-batch-wins" => Ok(BatchFailurePolicy::LastBatchWins),
        other => Err(PushError::ConfigurationError(format!(
            "unknown batch failure policy '{other}'"
        ))),
    }
}

fn parse_number<T: std::str::FromStr>(value: &str, name: &str) -> Result<T, PushError> {
    value.parse().map_err(|_| {
        PushError::ConfigurationError(format!("{ENV_PREFIX}{name} must be a number, got '{value}'"))
    })
}

fn default_timeout_secs() -> u64 {
    DEFAULT_TIMEOUT.as_secs()
}

pub(crate) fn default_capacity() -> usize {
    DEFAULT_CAPACITY
}
