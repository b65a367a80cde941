use super::config::VivoConfig;
use super::types::{VivoResponse, notification};
use crate::auth::{Clock, DEFAULT_TOKEN_VALIDITY, SystemClock, TokenCache, TokenGrant};
use crate::error::PushError;
use crate::execution::http::{HttpHeaderBuilder, HttpTransport, HttpTransportRequest, RequestBody};
use crate::execution::{RequestExecutor, ResponseEnvelope};
use crate::providers::signing::md5_hex;
use crate::providers::{PushAdapter, endpoint, require_recipient, require_recipients};
use crate::types::{Provider, PushRequest};
use async_trait::async_trait;
use secrecy::ExposeSecret;
use serde_json::{Map, Value, json};
use std::sync::Arc;
use uuid::Uuid;

const AUTH_PATH: &str = "/message/auth";
const BROADCAST_PATH: &str = "/message/all";
const UNICAST_PATH: &str = "/message/send";
const SAVE_LIST_PATH: &str = "/message/saveListPayload";
const PUSH_TO_LIST_PATH: &str = "/message/pushToList";

/// vivo adapter.
pub struct VivoAdapter {
    config: VivoConfig,
    executor: RequestExecutor,
    tokens: TokenCache,
}

impl VivoAdapter {
    pub fn new(config: VivoConfig, transport: Arc<dyn HttpTransport>) -> Result<Self, PushError> {
        Self::with_clock(config, transport, Arc::new(SystemClock))
    }

    pub fn with_clock(
        config: VivoConfig,
        transport: Arc<dyn HttpTransport>,
        clock: Arc<dyn Clock>,
    ) -> Result<Self, PushError> {
        config.validate()?;
        Ok(Self {
            config,
            executor: RequestExecutor::new(Provider::Vivo, transport),
            tokens: TokenCache::new(Provider::Vivo, DEFAULT_TOKEN_VALIDITY, clock),
        })
    }

    pub fn token_cache(&self) -> &TokenCache {
        &self.tokens
    }

    /// `md5(appId + appKey + timestamp + appSecret)`
    fn sign(&self, timestamp_millis: i64) -> String {
        md5_hex(&format!(
            "{}{}{}{}",
            self.config.app_id,
            self.config.app_key,
            timestamp_millis,
            self.config.app_secret.expose_secret()
        ))
    }

    async fn auth_token(&self) -> Result<String, PushError> {
        self.tokens.get_or_refresh(|| self.request_token()).await
    }

    async fn request_token(&self) -> Result<TokenGrant, PushError> {
        let timestamp = self.tokens.clock().now_millis();
        let body = RequestBody::Json(json!({
            "appId": self.config.app_id,
            "appKey": self.config.app_key,
            "timestamp": timestamp,
            "sign": self.sign(timestamp),
        }));
        let headers = HttpHeaderBuilder::new().with_json_content_type().build();
        let request = HttpTransportRequest::post(
            Provider::Vivo,
            endpoint(&self.config.base_url, AUTH_PATH),
            headers,
            body.encode()?,
        );
        let response: VivoResponse = self
            .executor
            .execute(request)
            .await
            .map_err(|e| e.into_auth(Provider::Vivo))?;
        let token = response
            .auth_token
            .filter(|t| !t.is_empty())
            .ok_or_else(|| PushError::auth(Provider::Vivo, "auth response carried no authToken"))?;
        Ok(TokenGrant::new(token))
    }

    fn notification(&self, request: &PushRequest) -> Map<String, Value> {
        notification(
            request,
            self.config.notify_type,
            self.config.skip_type,
            &new_request_id(),
        )
    }

    async fn call(&self, path: &str, body: Map<String, Value>) -> Result<VivoResponse, PushError> {
        let url = endpoint(&self.config.base_url, path);
        let signed = self
            .build_signed_request(&url, RequestBody::Json(Value::Object(body)))
            .await?;
        self.executor.execute(signed).await
    }
}

fn new_request_id() -> String {
    Uuid::new_v4().simple().to_string()
}

#[async_trait]
impl PushAdapter for VivoAdapter {
    fn provider(&self) -> Provider {
        Provider::Vivo
    }

    fn capacity(&self) -> usize {
        self.config.capacity
    }

    async fn ensure_valid_auth(&self) -> Result<(), PushError> {
        self.auth_token().await.map(|_| ())
    }

    async fn build_signed_request(
        &self,
        endpoint: &str,
        body: RequestBody,
    ) -> Result<HttpTransportRequest, PushError> {
        let token = self.auth_token().await?;
        let headers = HttpHeaderBuilder::new()
            .with_custom_auth("authToken", &token)?
            .with_json_content_type()
            .build();
        Ok(HttpTransportRequest::post(
            Provider::Vivo,
            endpoint,
            headers,
            body.encode()?,
        ))
    }

    async fn broadcast(&self, request: &PushRequest) -> Result<Option<String>, PushError> {
        let response = self.call(BROADCAST_PATH, self.notification(request)).await?;
        Ok(response.message_id())
    }

    async fn unicast(
        &self,
        request: &PushRequest,
        recipient: &str,
    ) -> Result<Option<String>, PushError> {
        require_recipient(recipient)?;
        let mut body = self.notification(request);
        body.insert(
            self.config.target_type.single_field().into(),
            json!(recipient),
        );
        let response = self.call(UNICAST_PATH, body).await?;
        Ok(response.message_id())
    }

    /// Save the payload once, then push its task id to this batch.
    async fn batch_cast(
        &self,
        request: &PushRequest,
        recipients: &[String],
    ) -> Result<Option<String>, PushError> {
        require_recipients(recipients)?;
        let saved = self.call(SAVE_LIST_PATH, self.notification(request)).await?;
        let task_id = saved.message_id().ok_or_else(|| {
            PushError::rejected(Provider::Vivo, saved.code(), "saveListPayload returned no taskId")
        })?;

        let mut body = Map::new();
        body.insert(
            self.config.target_type.list_field().into(),
            json!(recipients),
        );
        body.insert("taskId".into(), json!(task_id));
        body.insert("requestId".into(), json!(new_request_id()));
        self.call(PUSH_TO_LIST_PATH, body).await?;
        Ok(Some(task_id))
    }
}
