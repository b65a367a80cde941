use super::config::OppoConfig;
use super::types::{OppoResponse, TARGET_ALL, content_fields, targeted_message};
use crate::auth::{Clock, DEFAULT_TOKEN_VALIDITY, SystemClock, TokenCache, TokenGrant};
use crate::error::PushError;
use crate::execution::http::{HttpHeaderBuilder, HttpTransport, HttpTransportRequest, RequestBody};
use crate::execution::{RequestExecutor, ResponseEnvelope};
use crate::providers::signing::sha256_hex;
use crate::providers::{PushAdapter, endpoint, require_recipient, require_recipients};
use crate::types::{Provider, PushRequest};
use async_trait::async_trait;
use secrecy::ExposeSecret;
use serde_json::Value;
use std::sync::Arc;

const AUTH_PATH: &str = "/auth";
const SAVE_PATH: &str = "/message/notification/save_message_content";
const BROADCAST_PATH: &str = "/message/notification/broadcast";
const UNICAST_PATH: &str = "/message/notification/unicast";
const UNICAST_BATCH_PATH: &str = "/message/notification/unicast_batch";

/// OPPO adapter.
pub struct OppoAdapter {
    config: OppoConfig,
    executor: RequestExecutor,
    tokens: TokenCache,
}

impl OppoAdapter {
    pub fn new(config: OppoConfig, transport: Arc<dyn HttpTransport>) -> Result<Self, PushError> {
        Self::with_clock(config, transport, Arc::new(SystemClock))
    }

    pub fn with_clock(
        config: OppoConfig,
        transport: Arc<dyn HttpTransport>,
        clock: Arc<dyn Clock>,
    ) -> Result<Self, PushError> {
        config.validate()?;
        Ok(Self {
            config,
            executor: RequestExecutor::new(Provider::Oppo, transport),
            tokens: TokenCache::new(Provider::Oppo, DEFAULT_TOKEN_VALIDITY, clock),
        })
    }

    pub fn token_cache(&self) -> &TokenCache {
        &self.tokens
    }

    /// `sha256(app_key + timestamp + master_key)`
    fn sign(&self, timestamp_millis: i64) -> String {
        sha256_hex(&format!(
            "{}{}{}",
            self.config.app_key,
            timestamp_millis,
            self.config.master_key.expose_secret()
        ))
    }

    async fn auth_token(&self) -> Result<String, PushError> {
        self.tokens.get_or_refresh(|| self.request_token()).await
    }

    /// The token is kept for the local validity window; OPPO's
    /// `create_time` is not used.
    async fn request_token(&self) -> Result<TokenGrant, PushError> {
        let timestamp = self.tokens.clock().now_millis();
        let body = RequestBody::form([
            ("app_key", self.config.app_key.clone()),
            ("timestamp", timestamp.to_string()),
            ("sign", self.sign(timestamp)),
        ]);
        let headers = HttpHeaderBuilder::new().with_form_content_type().build();
        let request = HttpTransportRequest::post(
            Provider::Oppo,
            endpoint(&self.config.base_url, AUTH_PATH),
            headers,
            body.encode()?,
        );
        let response: OppoResponse = self
            .executor
            .execute(request)
            .await
            .map_err(|e| e.into_auth(Provider::Oppo))?;
        let token = response.data_str("auth_token").ok_or_else(|| {
            PushError::auth(Provider::Oppo, "auth response carried no auth_token")
        })?;
        Ok(TokenGrant::new(token))
    }

    async fn call(&self, path: &str, fields: Vec<(String, String)>) -> Result<OppoResponse, PushError> {
        let url = endpoint(&self.config.base_url, path);
        let signed = self
            .build_signed_request(&url, RequestBody::Form(fields))
            .await?;
        self.executor.execute(signed).await
    }
}

#[async_trait]
impl PushAdapter for OppoAdapter {
    fn provider(&self) -> Provider {
        Provider::Oppo
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
            .with_custom_auth("auth_token", &token)?
            .with_form_content_type()
            .build();
        Ok(HttpTransportRequest::post(
            Provider::Oppo,
            endpoint,
            headers,
            body.encode()?,
        ))
    }

    /// Save the content, then broadcast the saved message id.
    async fn broadcast(&self, request: &PushRequest) -> Result<Option<String>, PushError> {
        let saved = self.call(SAVE_PATH, content_fields(request)).await?;
        let message_id = saved.data_str("message_id").ok_or_else(|| {
            PushError::rejected(
                Provider::Oppo,
                saved.code(),
                "save_message_content returned no message_id",
            )
        })?;

        let fields = vec![
            ("message_id".to_string(), message_id.clone()),
            ("target_type".to_string(), TARGET_ALL.to_string()),
        ];
        let response = self.call(BROADCAST_PATH, fields).await?;
        Ok(response
            .data_str("task_id")
            .or_else(|| response.message_id())
            .or(Some(message_id)))
    }

    async fn unicast(
        &self,
        request: &PushRequest,
        recipient: &str,
    ) -> Result<Option<String>, PushError> {
        require_recipient(recipient)?;
        let message = targeted_message(request, self.config.target_type.code(), recipient);
        let response = self
            .call(UNICAST_PATH, vec![("message".to_string(), message.to_string())])
            .await?;
        Ok(response.message_id())
    }

    async fn batch_cast(
        &self,
        request: &PushRequest,
        recipients: &[String],
    ) -> Result<Option<String>, PushError> {
        require_recipients(recipients)?;
        let target_type = self.config.target_type.code();
        let messages: Vec<Value> = recipients
            .iter()
            .map(|r| targeted_message(request, target_type, r))
            .collect();
        let response = self
            .call(
                UNICAST_BATCH_PATH,
                vec![("messages".to_string(), Value::Array(messages).to_string())],
            )
            .await?;
        Ok(response.message_id())
    }
}
