//! Vendor adapters.
//!
//! Each vendor implements [`PushAdapter`]: credential handling, request
//! signing and the three cast endpoints. The routing between broadcast,
//! unicast and batch-cast lives in [`crate::execution::dispatch`] and is the
//! same for every vendor.

pub mod huawei;
pub mod meizu;
pub mod oppo;
pub mod signing;
pub mod vivo;
pub mod xiaomi;

pub use huawei::{HuaweiAdapter, HuaweiConfig};
pub use meizu::{MeizuAdapter, MeizuConfig};
pub use oppo::{OppoAdapter, OppoConfig, OppoTargetType};
pub use vivo::{VivoAdapter, VivoConfig, VivoTargetType};
pub use xiaomi::{PlatformExtras, XiaomiAdapter, XiaomiConfig};

use crate::error::PushError;
use crate::execution::DEFAULT_CAPACITY;
use crate::execution::dispatch::dispatch;
use crate::execution::http::{HttpTransportRequest, RequestBody};
use crate::types::{BatchFailurePolicy, DispatchReport, Provider, PushRequest};
use async_trait::async_trait;

/// The contract every vendor integration fulfils.
#[async_trait]
pub trait PushAdapter: Send + Sync {
    fn provider(&self) -> Provider;

    /// Largest recipient list accepted by one batch-cast request.
    fn capacity(&self) -> usize {
        DEFAULT_CAPACITY
    }

    /// Make sure a usable credential is held. Signing vendors have nothing
    /// to do; token vendors refresh an absent or expired token.
    async fn ensure_valid_auth(&self) -> Result<(), PushError> {
        Ok(())
    }

    /// Encode `body` for `endpoint` and attach the vendor's credentials.
    async fn build_signed_request(
        &self,
        endpoint: &str,
        body: RequestBody,
    ) -> Result<HttpTransportRequest, PushError>;

    /// Push to every registered device. Returns the vendor message id.
    async fn broadcast(&self, request: &PushRequest) -> Result<Option<String>, PushError>;

    /// Push to exactly one recipient.
    async fn unicast(
        &self,
        request: &PushRequest,
        recipient: &str,
    ) -> Result<Option<String>, PushError>;

    /// Push to one batch of at most [`PushAdapter::capacity`] recipients.
    async fn batch_cast(
        &self,
        request: &PushRequest,
        recipients: &[String],
    ) -> Result<Option<String>, PushError>;

    /// Route `request` by its recipient list and send it.
    async fn push(
        &self,
        request: &PushRequest,
        policy: BatchFailurePolicy,
    ) -> Result<DispatchReport, PushError> {
        dispatch(self, request, policy).await
    }
}

pub(crate) fn require_recipient(recipient: &str) -> Result<(), PushError> {
    if recipient.trim().is_empty() {
        return Err(PushError::ValidationError(
            "unicast requires a non-blank recipient".to_string(),
        ));
    }
    Ok(())
}

pub(crate) fn require_recipients(recipients: &[String]) -> Result<(), PushError> {
    if recipients.is_empty() {
        return Err(PushError::ValidationError(
            "batch-cast requires at least one recipient".to_string(),
        ));
    }
    Ok(())
}

/// Reject a zero capacity before any request is built.
pub(crate) fn check_capacity(provider: Provider, capacity: usize) -> Result<(), PushError> {
    if capacity == 0 {
        return Err(PushError::ConfigurationError(format!(
            "{provider} batch capacity must be at least 1"
        )));
    }
    Ok(())
}

/// Extras as a JSON object text, as several vendors want them.
pub(crate) fn extras_json(request: &PushRequest) -> String {
    serde_json::Value::Object(
        request
            .extras()
            .iter()
            .map(|(k, v)| (k.clone(), serde_json::Value::String(v.clone())))
            .collect(),
    )
    .to_string()
}

/// Join a base URL and a path without doubling or dropping the slash.
pub(crate) fn endpoint(base: &str, path: &str) -> String {
    format!("{}/{}", base.trim_end_matches('/'), path.trim_start_matches('/'))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn endpoint_joins_cleanly() {
        assert_eq!(endpoint("http://h/", "/a/b"), "http://h/a/b");
        assert_eq!(endpoint("http://h/v1", "auth"), "http://h/v1/auth");
    }

    #[test]
    fn extras_render_as_object() {
        let req = PushRequest::new("t", "c").with_extra("k", "v");
        assert_eq!(extras_json(&req), r#"{"k":"v"}"#);
        assert_eq!(extras_json(&PushRequest::new("t", "c")), "{}");
    }

    #[test]
    fn recipient_preconditions() {
        assert!(require_recipient(" ").is_err());
        assert!(require_recipient("a").is_ok());
        assert!(require_recipients(&[]).is_err());
        assert!(check_capacity(Provider::Oppo, 0).is_err());
    }
}
