//! vivo wire types.

use crate::execution::ResponseEnvelope;
use crate::execution::response::de_code_as_string;
use crate::types::PushRequest;
use serde::Deserialize;
use serde_json::{Map, Value, json};

#[derive(Debug, Clone, Deserialize)]
pub struct VivoResponse {
    #[serde(default, deserialize_with = "de_code_as_string")]
    pub result: String,
    #[serde(default)]
    pub desc: String,
    #[serde(default, rename = "authToken")]
    pub auth_token: Option<String>,
    #[serde(default, rename = "taskId")]
    pub task_id: Option<String>,
}

impl ResponseEnvelope for VivoResponse {
    fn is_success(&self) -> bool {
        self.result == "0"
    }

    fn code(&self) -> String {
        self.result.clone()
    }

    fn message(&self) -> String {
        self.desc.clone()
    }

    fn message_id(&self) -> Option<String> {
        self.task_id.clone().filter(|id| !id.is_empty())
    }
}

/// Notification fields shared by every send, with a fresh `requestId`.
pub(crate) fn notification(
    request: &PushRequest,
    notify_type: u8,
    skip_type: u8,
    request_id: &str,
) -> Map<String, Value> {
    let mut body = Map::new();
    body.insert("requestId".into(), json!(request_id));
    body.insert("title".into(), json!(request.title()));
    body.insert("content".into(), json!(request.content()));
    body.insert("notifyType".into(), json!(notify_type));
    body.insert("skipType".into(), json!(skip_type));
    if !request.extras().is_empty() {
        body.insert("clientCustomMap".into(), json!(request.extras()));
    }
    body
}
