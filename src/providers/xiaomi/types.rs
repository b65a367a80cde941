//! Xiaomi wire types and form building.

use crate::execution::ResponseEnvelope;
use crate::execution::response::de_code_as_string;
use crate::types::{DeviceType, PushRequest};
use once_cell::sync::Lazy;
use regex::Regex;
use serde::Deserialize;

pub const SUCCESS_CODE: &str = "0";

/// Prefix Xiaomi expects on custom key/value fields.
pub const EXTRA_PREFIX: &str = "extra.";

/// Characters of content kept in the notification description.
const DESCRIPTION_CHARS: usize = 25;

static HTML_TAG: Lazy<Option<Regex>> = Lazy::new(|| Regex::new(r"<[^>]*>").ok());

/// Platform-specific fields added when a request carries extras.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlatformExtras {
    Android { notify_foreground: bool },
    Ios { badge: u32 },
}

impl PlatformExtras {
    pub fn for_device(device: DeviceType) -> Self {
        match device {
            DeviceType::Android => Self::Android {
                notify_foreground: true,
            },
            DeviceType::Ios => Self::Ios { badge: 1 },
        }
    }

    fn fields(&self, request: &PushRequest) -> Vec<(String, String)> {
        if request.extras().is_empty() {
            return Vec::new();
        }
        match self {
            Self::Android { notify_foreground } => vec![(
                "extra.notify_foreground".to_string(),
                if *notify_foreground { "1" } else { "0" }.to_string(),
            )],
            Self::Ios { badge } => vec![
                (
                    "extra.payload".to_string(),
                    crate::providers::extras_json(request),
                ),
                ("extra.badge".to_string(), badge.to_string()),
            ],
        }
    }
}

/// Content with HTML tags removed, cut to the description length.
pub(crate) fn description(content: &str) -> String {
    let stripped = match HTML_TAG.as_ref() {
        Some(re) => re.replace_all(content, "").into_owned(),
        None => content.to_string(),
    };
    stripped.chars().take(DESCRIPTION_CHARS).collect()
}

/// Form fields shared by every Xiaomi send; the caller appends the target.
pub(crate) fn message_fields(
    app_pkg_name: &str,
    platform: PlatformExtras,
    request: &PushRequest,
) -> Vec<(String, String)> {
    let mut fields = vec![
        ("title".to_string(), request.title().to_string()),
        ("description".to_string(), description(request.content())),
        ("payload".to_string(), request.content().to_string()),
        ("restricted_package_name".to_string(), app_pkg_name.to_string()),
        ("pass_through".to_string(), "0".to_string()),
        ("notify_type".to_string(), "-1".to_string()),
    ];
    fields.extend(
        request
            .extras()
            .iter()
            .map(|(k, v)| (format!("{EXTRA_PREFIX}{k}"), v.clone())),
    );
    fields.extend(platform.fields(request));
    fields
}

#[derive(Debug, Clone, Deserialize)]
pub struct XiaomiResponse {
    #[serde(default)]
    pub result: String,
    /// Absent when the body is not a Xiaomi envelope; never read as success.
    #[serde(default, deserialize_with = "de_code_as_string")]
    pub code: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub reason: String,
    #[serde(default)]
    pub info: String,
    #[serde(default)]
    pub data: Option<serde_json::Value>,
}

impl ResponseEnvelope for XiaomiResponse {
    fn is_success(&self) -> bool {
        self.code == SUCCESS_CODE
    }

    fn code(&self) -> String {
        self.code.clone()
    }

    fn message(&self) -> String {
        [&self.description, &self.reason, &self.info]
            .into_iter()
            .find(|text| !text.is_empty())
            .cloned()
            .unwrap_or_default()
    }

    fn message_id(&self) -> Option<String> {
        self.data.as_ref()?.get("id")?.as_str().map(str::to_string)
    }
}
