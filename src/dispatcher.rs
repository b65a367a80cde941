//! Provider selection.
//!
//! A [`Dispatcher`] owns one adapter per provider, bound once at
//! construction, and forwards each request to the adapter named by the
//! caller.

use crate::config::PushConfig;
use crate::error::PushError;
use crate::execution::http::{HttpTransport, ReqwestTransport};
use crate::providers::{
    HuaweiAdapter, MeizuAdapter, OppoAdapter, PushAdapter, VivoAdapter, XiaomiAdapter,
};
use crate::types::{BatchFailurePolicy, DispatchReport, Provider, PushRequest};
use std::collections::HashMap;
use std::sync::Arc;

/// Routes push requests to the adapter bound to a provider.
pub struct Dispatcher {
    adapters: HashMap<Provider, Arc<dyn PushAdapter>>,
    policy: BatchFailurePolicy,
    default_provider: Option<Provider>,
}

impl std::fmt::Debug for Dispatcher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Dispatcher")
            .field("providers", &self.providers())
            .field("policy", &self.policy)
            .field("default_provider", &self.default_provider)
            .finish()
    }
}

impl Dispatcher {
    pub fn builder() -> DispatcherBuilder {
        DispatcherBuilder::default()
    }

    /// Build one adapter per configured vendor over a shared HTTP client.
    pub fn from_config(config: &PushConfig) -> Result<Self, PushError> {
        let transport: Arc<dyn HttpTransport> =
            Arc::new(ReqwestTransport::new(config.http.timeout())?);
        Self::from_config_with_transport(config, transport)
    }

    /// Same as [`Dispatcher::from_config`] with a caller-supplied transport.
    pub fn from_config_with_transport(
        config: &PushConfig,
        transport: Arc<dyn HttpTransport>,
    ) -> Result<Self, PushError> {
        let mut builder = Self::builder().policy(config.batch_failure_policy);
        if let Some(provider) = config.default_provider {
            builder = builder.default_provider(provider);
        }

        if let Some(huawei) = &config.huawei {
            let mut huawei = huawei.clone();
            if huawei.app_pkg_name.is_empty() {
                huawei.app_pkg_name = config.app_pkg_name.clone();
            }
            builder = builder.adapter(HuaweiAdapter::new(huawei, transport.clone())?);
        }
        if let Some(xiaomi) = &config.xiaomi {
            let mut xiaomi = xiaomi.clone();
            if xiaomi.app_pkg_name.is_empty() {
                xiaomi.app_pkg_name = config.app_pkg_name.clone();
            }
            builder = builder.adapter(XiaomiAdapter::new(
                xiaomi,
                config.device_type,
                transport.clone(),
            )?);
        }
        if let Some(oppo) = &config.oppo {
            builder = builder.adapter(OppoAdapter::new(oppo.clone(), transport.clone())?);
        }
        if let Some(vivo) = &config.vivo {
            builder = builder.adapter(VivoAdapter::new(vivo.clone(), transport.clone())?);
        }
        if let Some(meizu) = &config.meizu {
            builder = builder.adapter(MeizuAdapter::new(meizu.clone(), transport)?);
        }
        builder.build()
    }

    /// Send `request` through the adapter bound to `provider`.
    pub async fn send(
        &self,
        provider: Provider,
        request: &PushRequest,
    ) -> Result<DispatchReport, PushError> {
        let adapter = self.adapters.get(&provider).ok_or_else(|| {
            PushError::ConfigurationError(format!("no adapter configured for provider {provider}"))
        })?;

        let result = adapter.push(request, self.policy).await;
        match &result {
            Ok(report) => tracing::info!(
                provider = %provider,
                requests = report.outcomes.len(),
                failed = report.failed_count(),
                "push dispatched"
            ),
            Err(err) => tracing::error!(
                provider = %provider,
                kind = ?err.kind(),
                error = %err,
                "push failed"
            ),
        }
        result
    }

    /// Send through the configured default provider.
    pub async fn send_default(&self, request: &PushRequest) -> Result<DispatchReport, PushError> {
        let provider = self.default_provider.ok_or_else(|| {
            PushError::ConfigurationError("no default provider configured".to_string())
        })?;
        self.send(provider, request).await
    }

    /// Bound providers, sorted.
    pub fn providers(&self) -> Vec<Provider> {
        let mut providers: Vec<_> = self.adapters.keys().copied().collect();
        providers.sort();
        providers
    }

    pub fn adapter(&self, provider: Provider) -> Option<&Arc<dyn PushAdapter>> {
        self.adapters.get(&provider)
    }

    pub fn policy(&self) -> BatchFailurePolicy {
        self.policy
    }

    pub fn default_provider(&self) -> Option<Provider> {
        self.default_provider
    }
}

/// Builder for [`Dispatcher`].
#[derive(Default)]
pub struct DispatcherBuilder {
    adapters: HashMap<Provider, Arc<dyn PushAdapter>>,
    policy: BatchFailurePolicy,
    default_provider: Option<Provider>,
}

impl DispatcherBuilder {
    /// Bind an adapter to the provider it reports. A later adapter for the
    /// same provider replaces the earlier one.
    pub fn adapter<A: PushAdapter + 'static>(self, adapter: A) -> Self {
        self.shared_adapter(Arc::new(adapter))
    }

    pub fn shared_adapter(mut self, adapter: Arc<dyn PushAdapter>) -> Self {
        self.adapters.insert(adapter.provider(), adapter);
        self
    }

    pub fn policy(mut self, policy: BatchFailurePolicy) -> Self {
        self.policy = policy;
        self
    }

    pub fn default_provider(mut self, provider: Provider) -> Self {
        self.default_provider = Some(provider);
        self
    }

    pub fn build(self) -> Result<Dispatcher, PushError> {
        if let Some(provider) = self.default_provider {
            if !self.adapters.contains_key(&provider) {
                return Err(PushError::ConfigurationError(format!(
                    "default provider {provider} has no configured adapter"
                )));
            }
        }
        Ok(Dispatcher {
            adapters: self.adapters,
            policy: self.policy,
            default_provider: self.default_provider,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::execution::http::{HttpTransportRequest, RequestBody};
    use async_trait::async_trait;
    use std::sync::Mutex;

    struct Recorder {
        provider: Provider,
        calls: Mutex<Vec<String>>,
    }

    impl Recorder {
        fn for_provider(provider: Provider) -> Self {
            Self {
                provider,
                calls: Mutex::default(),
            }
        }
    }

    #[async_trait]
    impl PushAdapter for Recorder {
        fn provider(&self) -> Provider {
            self.provider
        }

        async fn build_signed_request(
            &self,
            endpoint: &str,
            body: RequestBody,
        ) -> Result<HttpTransportRequest, PushError> {
            Ok(HttpTransportRequest::post(
                self.provider(),
                endpoint,
                Default::default(),
                body.encode()?,
            ))
        }

        async fn broadcast(&self, request: &PushRequest) -> Result<Option<String>, PushError> {
            self.calls
                .lock()
                .unwrap()
                .push(format!("broadcast:{}", request.title()));
            Ok(Some("b-1".to_string()))
        }

        async fn unicast(
            &self,
            _request: &PushRequest,
            recipient: &str,
        ) -> Result<Option<String>, PushError> {
            self.calls.lock().unwrap().push(format!("unicast:{recipient}"));
            Ok(None)
        }

        async fn batch_cast(
            &self,
            _request: &PushRequest,
            recipients: &[String],
        ) -> Result<Option<String>, PushError> {
            self.calls
                .lock()
                .unwrap()
                .push(format!("batch:{}", recipients.len()));
            Ok(None)
        }
    }

    #[tokio::test]
    async fn routes_to_the_bound_adapter() {
        let oppo = Arc::new(Recorder::for_provider(Provider::Oppo));
        let vivo = Arc::new(Recorder::for_provider(Provider::Vivo));
        let dispatcher = Dispatcher::builder()
            .shared_adapter(oppo.clone())
            .shared_adapter(vivo.clone())
            .build()
            .unwrap();

        let report = dispatcher
            .send(Provider::Vivo, &PushRequest::new("hello", "world"))
            .await
            .unwrap();
        assert_eq!(report.provider, Provider::Vivo);
        assert_eq!(report.message_ids(), vec!["b-1"]);
        assert_eq!(*vivo.calls.lock().unwrap(), vec!["broadcast:hello"]);
        assert!(oppo.calls.lock().unwrap().is_empty());
        assert_eq!(dispatcher.providers(), vec![Provider::Oppo, Provider::Vivo]);
    }

    #[tokio::test]
    async fn unbound_provider_is_configuration_error() {
        let dispatcher = Dispatcher::builder()
            .adapter(Recorder::for_provider(Provider::Oppo))
            .build()
            .unwrap();
        let err = dispatcher
            .send(Provider::Meizu, &PushRequest::new("t", "c"))
            .await
            .unwrap_err();
        assert!(matches!(err, PushError::ConfigurationError(_)));

        let err = dispatcher
            .send_default(&PushRequest::new("t", "c"))
            .await
            .unwrap_err();
        assert!(err.to_string().contains("default provider"));
    }

    #[tokio::test]
    async fn send_default_uses_configured_provider() {
        let xiaomi = Arc::new(Recorder::for_provider(Provider::Xiaomi));
        let dispatcher = Dispatcher::builder()
            .shared_adapter(xiaomi.clone())
            .default_provider(Provider::Xiaomi)
            .build()
            .unwrap();
        dispatcher
            .send_default(&PushRequest::new("t", "c").to("alias-1"))
            .await
            .unwrap();
        assert_eq!(*xiaomi.calls.lock().unwrap(), vec!["unicast:alias-1"]);
    }

    #[test]
    fn default_provider_must_be_bound() {
        let err = Dispatcher::builder()
            .default_provider(Provider::Huawei)
            .build()
            .unwrap_err();
        assert!(matches!(err, PushError::ConfigurationError(_)));
    }

    #[test]
    fn from_config_binds_configured_vendors() {
        let config = PushConfig::from_json_str(
            r#"{
                "app_pkg_name": "com.example.app",
                "default_provider": "xiaomi",
                "xiaomi": { "app_secret": "xm" },
                "huawei": { "client_id": "10001", "client_secret": "hs" },
                "meizu": { "app_id": 110, "app_secret": "ms" }
            }"#,
        )
        .unwrap();
        let dispatcher = Dispatcher::from_config(&config).unwrap();
        assert_eq!(
            dispatcher.providers(),
            vec![Provider::Huawei, Provider::Xiaomi, Provider::Meizu]
        );
        assert_eq!(dispatcher.default_provider(), Some(Provider::Xiaomi));
    }

    #[test]
    fn from_config_rejects_incomplete_credentials() {
        let config = PushConfig::from_json_str(
            r#"{ "vivo": { "app_id": 0, "app_key": "k", "app_secret": "s" } }"#,
        )
        .unwrap();
        let err = Dispatcher::from_config(&config).unwrap_err();
        assert!(err.to_string().contains("app_id"));
    }
}
