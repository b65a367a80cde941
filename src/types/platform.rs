//! Provider and device identifiers.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// The push services this crate dispatches through.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Provider {
    Huawei,
    Oppo,
    Vivo,
    Xiaomi,
    Meizu,
}

impl Provider {
    pub const ALL: [Provider; 5] = [
        Provider::Huawei,
        Provider::Oppo,
        Provider::Vivo,
        Provider::Xiaomi,
        Provider::Meizu,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Provider::Huawei => "huawei",
            Provider::Oppo => "oppo",
            Provider::Vivo => "vivo",
            Provider::Xiaomi => "xiaomi",
            Provider::Meizu => "meizu",
        }
    }
}

impl fmt::Display for Provider {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Provider {
    type Err = crate::error::PushError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "huawei" | "hw" => Ok(Provider::Huawei),
            "oppo" => Ok(Provider::Oppo),
            "vivo" => Ok(Provider::Vivo),
            "xiaomi" | "mi" | "xm" => Ok(Provider::Xiaomi),
            "meizu" | "mz" => Ok(Provider::Meizu),
            other => Err(crate::error::PushError::ConfigurationError(format!(
                "unknown push provider '{other}'"
            ))),
        }
    }
}

/// Platform of the registered devices an application targets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DeviceType {
    #[default]
    Android,
    Ios,
}

impl FromStr for DeviceType {
    type Err = crate::error::PushError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "android" => Ok(DeviceType::Android),
            "ios" => Ok(DeviceType::Ios),
            other => Err(crate::error::PushError::ConfigurationError(format!(
                "unknown device type '{other}'"
            ))),
        }
    }
}
