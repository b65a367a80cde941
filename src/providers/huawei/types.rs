//! Huawei wire types.

use crate::execution::ResponseEnvelope;
use crate::types::PushRequest;
use serde::Deserialize;
use serde_json::{Value, json};

/// Success code of a `pushsend.do` call.
pub const SUCCESS_CODE: &str = "80000000";

/// Notification shown by the system tray.
const MSG_TYPE_NOTIFICATION: u8 = 3;
/// Open the application on tap.
const ACTION_TYPE_OPEN_APP: u8 = 3;

#[derive(Debug, Clone, Deserialize)]
pub struct HuaweiTokenResponse {
    #[serde(default)]
    pub access_token: String,
    /// Seconds.
    #[serde(default)]
    pub expires_in: u64,
    #[serde(default)]
    pub error: Option<Value>,
    #[serde(default)]
    pub error_description: String,
}

impl ResponseEnvelope for HuaweiTokenResponse {
    fn is_success(&self) -> bool {
        self.error.is_none() && !self.access_token.is_empty()
    }

    fn code(&self) -> String {
        match &self.error {
            Some(Value::String(s)) => s.clone(),
            Some(other) => other.to_string(),
            None => String::new(),
        }
    }

    fn message(&self) -> String {
        if self.error_description.is_empty() && self.access_token.is_empty() {
            return "token response carried no access_token".to_string();
        }
        self.error_description.clone()
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct HuaweiSendResponse {
    #[serde(default, deserialize_with = "crate::execution::response::de_code_as_string")]
    pub code: String,
    #[serde(default)]
    pub msg: String,
    #[serde(default, rename = "requestId")]
    pub request_id: Option<String>,
}

impl ResponseEnvelope for HuaweiSendResponse {
    fn is_success(&self) -> bool {
        self.code == SUCCESS_CODE
    }

    fn code(&self) -> String {
        self.code.clone()
    }

    fn message(&self) -> String {
        self.msg.clone()
    }

    fn message_id(&self) -> Option<String> {
        self.request_id.clone().filter(|id| !id.is_empty())
    }
}

/// The `payload` form field: a system notification that opens the app,
/// with extras as a list of single-entry maps.
pub(crate) fn notification_payload(app_pkg_name: &str, request: &PushRequest) -> Value {
    let mut hps = json!({
        "msg": {
            "type": MSG_TYPE_NOTIFICATION,
            "action": {
                "type": ACTION_TYPE_OPEN_APP,
                "param": { "appPkgName": app_pkg_name }
            },
            "body": {
                "content": request.content(),
                "title": request.title()
            }
        }
    });
    if !request.extras().is_empty() {
        let customize: Vec<Value> = request
            .extras()
            .iter()
            .map(|(k, v)| {
                let mut entry = serde_json::Map::new();
                entry.insert(k.clone(), Value::String(v.clone()));
                Value::Object(entry)
            })
            .collect();
        hps["ext"] = json!({ "customize": customize });
    }
    json!({ "hps": hps })
}
