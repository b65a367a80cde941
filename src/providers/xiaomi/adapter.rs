use super::config::XiaomiConfig;
use super::types::{PlatformExtras, XiaomiResponse, message_fields};
use crate::error::PushError;
use crate::execution::http::{HttpHeaderBuilder, HttpTransport, HttpTransportRequest, RequestBody};
use crate::execution::{RequestExecutor, ResponseEnvelope};
use crate::providers::{PushAdapter, endpoint, require_recipient, require_recipients};
use crate::types::{DeviceType, Provider, PushRequest};
use async_trait::async_trait;
use secrecy::ExposeSecret;
use std::sync::Arc;

const BROADCAST_PATH: &str = "/v3/message/all";
const ALIAS_PATH: &str = "/v3/message/alias";

/// Xiaomi adapter.
pub struct XiaomiAdapter {
    config: XiaomiConfig,
    platform: PlatformExtras,
    executor: RequestExecutor,
}

impl XiaomiAdapter {
    pub fn new(
        config: XiaomiConfig,
        device_type: DeviceType,
        transport: Arc<dyn HttpTransport>,
    ) -> Result<Self, PushError> {
        config.validate()?;
        Ok(Self {
            config,
            platform: PlatformExtras::for_device(device_type),
            executor: RequestExecutor::new(Provider::Xiaomi, transport),
        })
    }

    pub fn platform(&self) -> PlatformExtras {
        self.platform
    }

    async fn send(
        &self,
        path: &str,
        request: &PushRequest,
        aliases: Option<&[String]>,
    ) -> Result<Option<String>, PushError> {
        let mut fields = message_fields(&self.config.app_pkg_name, self.platform, request);
        if let Some(aliases) = aliases {
            fields.push(("alias".to_string(), aliases.join(",")));
        }
        let url = endpoint(&self.config.base_url, path);
        let signed = self
            .build_signed_request(&url, RequestBody::Form(fields))
            .await?;
        let response: XiaomiResponse = self.executor.execute(signed).await?;
        Ok(response.message_id())
    }
}

#[async_trait]
impl PushAdapter for XiaomiAdapter {
    fn provider(&self) -> Provider {
        Provider::Xiaomi
    }

    fn capacity(&self) -> usize {
        self.config.capacity
    }

    async fn build_signed_request(
        &self,
        endpoint: &str,
        body: RequestBody,
    ) -> Result<HttpTransportRequest, PushError> {
        let headers = HttpHeaderBuilder::new()
            .with_key_auth(self.config.app_secret.expose_secret())?
            .with_form_content_type()
            .build();
        Ok(HttpTransportRequest::post(
            Provider::Xiaomi,
            endpoint,
            headers,
            body.encode()?,
        ))
    }

    async fn broadcast(&self, request: &PushRequest) -> Result<Option<String>, PushError> {
        self.send(BROADCAST_PATH, request, None).await
    }

    async fn unicast(
        &self,
        request: &PushRequest,
        recipient: &str,
    ) -> Result<Option<String>, PushError> {
        require_recipient(recipient)?;
        let one = [recipient.to_string()];
        self.send(ALIAS_PATH, request, Some(&one[..])).await
    }

    async fn batch_cast(
        &self,
        request: &PushRequest,
        recipients: &[String],
    ) -> Result<Option<String>, PushError> {
        require_recipients(recipients)?;
        self.send(ALIAS_PATH, request, Some(recipients)).await
    }
}
