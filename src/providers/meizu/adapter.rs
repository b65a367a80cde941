use super::config::MeizuConfig;
use super::types::{MeizuResponse, message_json};
use crate::error::PushError;
use crate::execution::http::{HttpHeaderBuilder, HttpTransport, HttpTransportRequest, RequestBody};
use crate::execution::{RequestExecutor, ResponseEnvelope};
use crate::providers::signing::sorted_params_md5;
use crate::providers::{PushAdapter, endpoint, require_recipient, require_recipients};
use crate::types::{Provider, PushRequest};
use async_trait::async_trait;
use secrecy::ExposeSecret;
use std::collections::BTreeMap;
use std::sync::Arc;

const BROADCAST_PATH: &str = "/ups/api/server/push/pushTask/pushToApp";
const ALIAS_PATH: &str = "/ups/api/server/push/varnished/pushByAlias";

/// Meizu adapter.
pub struct MeizuAdapter {
    config: MeizuConfig,
    executor: RequestExecutor,
}

impl MeizuAdapter {
    pub fn new(config: MeizuConfig, transport: Arc<dyn HttpTransport>) -> Result<Self, PushError> {
        config.validate()?;
        Ok(Self {
            config,
            executor: RequestExecutor::new(Provider::Meizu, transport),
        })
    }

    async fn send(
        &self,
        path: &str,
        request: &PushRequest,
        target: (&str, String),
    ) -> Result<Option<String>, PushError> {
        let fields = vec![
            ("appId".to_string(), self.config.app_id.to_string()),
            ("messageJson".to_string(), message_json(request).to_string()),
            (target.0.to_string(), target.1),
        ];
        let url = endpoint(&self.config.base_url, path);
        let signed = self
            .build_signed_request(&url, RequestBody::Form(fields))
            .await?;
        let response: MeizuResponse = self.executor.execute(signed).await?;
        Ok(response.message_id())
    }
}

#[async_trait]
impl PushAdapter for MeizuAdapter {
    fn provider(&self) -> Provider {
        Provider::Meizu
    }

    fn capacity(&self) -> usize {
        self.config.capacity
    }

    /// Appends `sign` computed over every other field.
    async fn build_signed_request(
        &self,
        endpoint: &str,
        body: RequestBody,
    ) -> Result<HttpTransportRequest, PushError> {
        let RequestBody::Form(mut fields) = body else {
            return Err(PushError::ConfigurationError(
                "meizu requests must be form-encoded".to_string(),
            ));
        };
        fields.retain(|(k, _)| k != "sign");
        let params: BTreeMap<String, String> = fields.iter().cloned().collect();
        let sign = sorted_params_md5(&params, self.config.app_secret.expose_secret());
        fields.push(("sign".to_string(), sign));

        let headers = HttpHeaderBuilder::new().with_form_content_type().build();
        Ok(HttpTransportRequest::post(
            Provider::Meizu,
            endpoint,
            headers,
            RequestBody::Form(fields).encode()?,
        ))
    }

    async fn broadcast(&self, request: &PushRequest) -> Result<Option<String>, PushError> {
        self.send(BROADCAST_PATH, request, ("pushType", "0".to_string()))
            .await
    }

    async fn unicast(
        &self,
        request: &PushRequest,
        recipient: &str,
    ) -> Result<Option<String>, PushError> {
        require_recipient(recipient)?;
        self.send(ALIAS_PATH, request, ("alias", recipient.to_string()))
            .await
    }

    async fn batch_cast(
        &self,
        request: &PushRequest,
        recipients: &[String],
    ) -> Result<Option<String>, PushError> {
        require_recipients(recipients)?;
        self.send(ALIAS_PATH, request, ("alias", recipients.join(",")))
            .await
    }
}
