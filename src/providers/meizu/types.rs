//! Meizu wire types.

use crate::execution::ResponseEnvelope;
use crate::execution::response::de_code_as_string;
use crate::types::PushRequest;
use serde::Deserialize;
use serde_json::{Value, json};

pub const SUCCESS_CODE: &str = "200";

/// Hours an undelivered notification stays queued.
const VALID_HOURS: u32 = 24;

#[derive(Debug, Clone, Deserialize)]
pub struct MeizuResponse {
    #[serde(default, deserialize_with = "de_code_as_string")]
    pub code: String,
    #[serde(default)]
    pub message: String,
    #[serde(default)]
    pub value: Option<Value>,
}

impl ResponseEnvelope for MeizuResponse {
    fn is_success(&self) -> bool {
        self.code == SUCCESS_CODE
    }

    fn code(&self) -> String {
        self.code.clone()
    }

    fn message(&self) -> String {
        self.message.clone()
    }

    fn message_id(&self) -> Option<String> {
        let value = self.value.as_ref()?;
        ["msgId", "taskId"].iter().find_map(|key| match value.get(key)? {
            Value::String(s) if !s.is_empty() => Some(s.clone()),
            Value::Number(n) => Some(n.to_string()),
            _ => None,
        })
    }
}

/// The `messageJson` form field: a notice-bar message that opens the app,
/// with extras as JSON text in `clickTypeInfo.parameters`.
pub(crate) fn message_json(request: &PushRequest) -> Value {
    let mut click = json!({ "clickType": 0 });
    if !request.extras().is_empty() {
        click["parameters"] = json!(crate::providers::extras_json(request));
    }
    json!({
        "noticeBarInfo": {
            "title": request.title(),
            "content": request.content(),
        },
        "clickTypeInfo": click,
        "pushTimeInfo": {
            "offLine": 1,
            "validTime": VALID_HOURS,
        },
    })
}
