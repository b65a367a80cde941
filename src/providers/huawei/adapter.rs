use super::config::HuaweiConfig;
use super::types::{HuaweiSendResponse, HuaweiTokenResponse, notification_payload};
use crate::auth::{Clock, DEFAULT_TOKEN_VALIDITY, SystemClock, TokenCache, TokenGrant};
use crate::error::PushError;
use crate::execution::http::{HttpHeaderBuilder, HttpTransport, HttpTransportRequest, RequestBody};
use crate::execution::{RequestExecutor, ResponseEnvelope};
use crate::providers::{PushAdapter, require_recipient, require_recipients};
use crate::types::{Provider, PushRequest};
use async_trait::async_trait;
use secrecy::ExposeSecret;
use serde_json::{Value, json};
use std::sync::Arc;
use std::time::Duration;

const NSP_SVC: &str = "openpush.message.api.send";

/// Huawei adapter.
pub struct HuaweiAdapter {
    config: HuaweiConfig,
    executor: RequestExecutor,
    tokens: TokenCache,
}

impl HuaweiAdapter {
    pub fn new(config: HuaweiConfig, transport: Arc<dyn HttpTransport>) -> Result<Self, PushError> {
        Self::with_clock(config, transport, Arc::new(SystemClock))
    }

    pub fn with_clock(
        config: HuaweiConfig,
        transport: Arc<dyn HttpTransport>,
        clock: Arc<dyn Clock>,
    ) -> Result<Self, PushError> {
        config.validate()?;
        Ok(Self {
            config,
            executor: RequestExecutor::new(Provider::Huawei, transport),
            tokens: TokenCache::new(Provider::Huawei, DEFAULT_TOKEN_VALIDITY, clock),
        })
    }

    pub fn token_cache(&self) -> &TokenCache {
        &self.tokens
    }

    async fn access_token(&self) -> Result<String, PushError> {
        self.tokens.get_or_refresh(|| self.request_token()).await
    }

    async fn request_token(&self) -> Result<TokenGrant, PushError> {
        let body = RequestBody::form([
            ("grant_type", "client_credentials"),
            ("client_id", self.config.client_id.as_str()),
            ("client_secret", self.config.client_secret.expose_secret()),
        ]);
        let headers = HttpHeaderBuilder::new().with_form_content_type().build();
        let request = HttpTransportRequest::post(
            Provider::Huawei,
            &self.config.token_url,
            headers,
            body.encode()?,
        );
        let response: HuaweiTokenResponse = self
            .executor
            .execute(request)
            .await
            .map_err(|e| e.into_auth(Provider::Huawei))?;

        let grant = TokenGrant::new(response.access_token);
        Ok(if response.expires_in > 0 {
            grant.expiring_in(Duration::from_secs(response.expires_in))
        } else {
            grant
        })
    }

    /// `pushsend.do?nsp_ctx={"ver":"1","appId":"<client id>"}`
    fn send_url(&self) -> String {
        let ctx = json!({ "ver": "1", "appId": self.config.client_id }).to_string();
        format!("{}?nsp_ctx={}", self.config.push_url, urlencoding::encode(&ctx))
    }

    /// `device_tokens == None` addresses every device.
    async fn send(
        &self,
        request: &PushRequest,
        device_tokens: Option<&[String]>,
    ) -> Result<Option<String>, PushError> {
        let payload = notification_payload(&self.config.app_pkg_name, request);
        let now_secs = self.tokens.clock().now_millis() / 1000;
        let mut fields = vec![
            ("nsp_svc".to_string(), NSP_SVC.to_string()),
            ("nsp_ts".to_string(), now_secs.to_string()),
        ];
        if let Some(tokens) = device_tokens {
            let list = Value::from(tokens.to_vec()).to_string();
            fields.push(("device_token_list".to_string(), list));
        }
        fields.push(("payload".to_string(), payload.to_string()));

        let signed = self
            .build_signed_request(&self.send_url(), RequestBody::Form(fields))
            .await?;
        let response: HuaweiSendResponse = self.executor.execute(signed).await?;
        Ok(response.message_id())
    }
}

#[async_trait]
impl PushAdapter for HuaweiAdapter {
    fn provider(&self) -> Provider {
        Provider::Huawei
    }

    fn capacity(&self) -> usize {
        self.config.capacity
    }

    async fn ensure_valid_auth(&self) -> Result<(), PushError> {
        self.access_token().await.map(|_| ())
    }

    /// The access token travels as the first form field.
    async fn build_signed_request(
        &self,
        endpoint: &str,
        body: RequestBody,
    ) -> Result<HttpTransportRequest, PushError> {
        let RequestBody::Form(mut fields) = body else {
            return Err(PushError::ConfigurationError(
                "huawei requests must be form-encoded".to_string(),
            ));
        };
        let token = self.access_token().await?;
        fields.insert(0, ("access_token".to_string(), token));
        let headers = HttpHeaderBuilder::new().with_form_content_type().build();
        Ok(HttpTransportRequest::post(
            Provider::Huawei,
            endpoint,
            headers,
            RequestBody::Form(fields).encode()?,
        ))
    }

    async fn broadcast(&self, request: &PushRequest) -> Result<Option<String>, PushError> {
        self.send(request, None).await
    }

    async fn unicast(
        &self,
        request: &PushRequest,
        recipient: &str,
    ) -> Result<Option<String>, PushError> {
        require_recipient(recipient)?;
        let one = [recipient.to_string()];
        self.send(request, Some(&one[..])).await
    }

    async fn batch_cast(
        &self,
        request: &PushRequest,
        recipients: &[String],
    ) -> Result<Option<String>, PushError> {
        require_recipients(recipients)?;
        self.send(request, Some(recipients)).await
    }
}
