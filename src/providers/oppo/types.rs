//! OPPO wire types.

use crate::execution::ResponseEnvelope;
use crate::execution::response::de_code_as_string;
use crate::types::PushRequest;
use serde::Deserialize;
use serde_json::{Value, json};

/// `target_type` of a broadcast to every device.
pub const TARGET_ALL: u8 = 1;

/// Common OPPO envelope: `{code, message, data}`.
#[derive(Debug, Clone, Deserialize)]
pub struct OppoResponse {
    #[serde(default, deserialize_with = "de_code_as_string")]
    pub code: String,
    #[serde(default)]
    pub message: String,
    #[serde(default)]
    pub data: Option<Value>,
}

impl OppoResponse {
    pub fn data_str(&self, key: &str) -> Option<String> {
        match self.data.as_ref()?.get(key)? {
            Value::String(s) if !s.is_empty() => Some(s.clone()),
            Value::Number(n) => Some(n.to_string()),
            _ => None,
        }
    }
}

impl ResponseEnvelope for OppoResponse {
    fn is_success(&self) -> bool {
        self.code == "0"
    }

    fn code(&self) -> String {
        self.code.clone()
    }

    fn message(&self) -> String {
        self.message.clone()
    }

    fn message_id(&self) -> Option<String> {
        self.data_str("messageId")
            .or_else(|| self.data_str("message_id"))
            .or_else(|| self.data_str("task_id"))
    }
}

/// Form fields of `save_message_content`; extras travel as JSON text.
pub(crate) fn content_fields(request: &PushRequest) -> Vec<(String, String)> {
    let mut fields = vec![
        ("title".to_string(), request.title().to_string()),
        ("sub_title".to_string(), String::new()),
        ("content".to_string(), request.content().to_string()),
    ];
    if !request.extras().is_empty() {
        fields.push((
            "action_parameters".to_string(),
            crate::providers::extras_json(request),
        ));
    }
    fields
}

/// One addressed notification as used by `unicast` and `unicast_batch`;
/// extras are embedded as a JSON object.
pub(crate) fn targeted_message(request: &PushRequest, target_type: u8, target: &str) -> Value {
    let mut notification = json!({
        "title": request.title(),
        "sub_title": "",
        "content": request.content(),
    });
    if !request.extras().is_empty() {
        notification["action_parameters"] = json!(request.extras());
    }
    json!({
        "target_type": target_type,
        "target_value": target,
        "notification": notification,
    })
}
