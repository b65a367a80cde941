//! Per-adapter bearer token cache.

use super::clock::Clock;
use crate::error::PushError;
use crate::types::Provider;
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::Mutex;

/// Validity window applied to tokens when the vendor does not say otherwise.
pub const DEFAULT_TOKEN_VALIDITY: Duration = Duration::from_secs(24 * 60 * 60);

/// Derived state of a cache slot; never stored.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenState {
    Absent,
    Valid,
    Expired,
}

/// A bearer token and the moment it was issued.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthToken {
    pub value: String,
    pub issued_at_millis: i64,
    pub lifetime_millis: i64,
}

impl AuthToken {
    pub fn new(value: impl Into<String>, issued_at_millis: i64, lifetime: Duration) -> Self {
        Self {
            value: value.into(),
            issued_at_millis,
            lifetime_millis: lifetime.as_millis() as i64,
        }
    }

    pub fn expires_at_millis(&self) -> i64 {
        self.issued_at_millis.saturating_add(self.lifetime_millis)
    }

    /// A token is expired once `issued_at + lifetime < now`.
    pub fn state_at(&self, now_millis: i64) -> TokenState {
        if self.expires_at_millis() < now_millis {
            TokenState::Expired
        } else {
            TokenState::Valid
        }
    }
}

/// A freshly exchanged token as reported by the vendor.
#[derive(Debug, Clone)]
pub struct TokenGrant {
    pub value: String,
    /// Vendor-reported lifetime; the shorter of this and the cache window wins.
    pub expires_in: Option<Duration>,
}

impl TokenGrant {
    pub fn new(value: impl Into<String>) -> Self {
        Self {
            value: value.into(),
            expires_in: None,
        }
    }

    pub fn expiring_in(mut self, expires_in: Duration) -> Self {
        self.expires_in = Some(expires_in);
        self
    }
}

/// Holds one adapter's current token and refreshes it when stale.
///
/// The slot stays locked for the whole read-check-refresh sequence, so two
/// concurrent sends through the same adapter trigger a single exchange.
/// A vendor-side rejection of a cached token does not clear the slot; the
/// next expiry check is the only way a token is replaced.
pub struct TokenCache {
    provider: Provider,
    validity: Duration,
    clock: Arc<dyn Clock>,
    slot: Mutex<Option<AuthToken>>,
}

impl TokenCache {
    pub fn new(provider: Provider, validity: Duration, clock: Arc<dyn Clock>) -> Self {
        Self {
            provider,
            validity,
            clock,
            slot: Mutex::new(None),
        }
    }

    pub fn clock(&self) -> &Arc<dyn Clock> {
        &self.clock
    }

    pub async fn state(&self) -> TokenState {
        let now = self.clock.now_millis();
        match self.slot.lock().await.as_ref() {
            Some(token) => token.state_at(now),
            None => TokenState::Absent,
        }
    }

    /// Snapshot of the cached token, whatever its state.
    pub async fn current(&self) -> Option<AuthToken> {
        self.slot.lock().await.clone()
    }

    /// Replace the cached token.
    pub async fn store(&self, token: AuthToken) {
        *self.slot.lock().await = Some(token);
    }

    /// Return the cached token if still valid, otherwise run `refresh` and
    /// cache its result. A failed refresh leaves the slot untouched.
    pub async fn get_or_refresh<F, Fut>(&self, refresh: F) -> Result<String, PushError>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<TokenGrant, PushError>>,
    {
        let mut slot = self.slot.lock().await;
        let now = self.clock.now_millis();
        let state = match slot.as_ref() {
            Some(token) => token.state_at(now),
            None => TokenState::Absent,
        };
        if state == TokenState::Valid
            && let Some(token) = slot.as_ref()
        {
            return Ok(token.value.clone());
        }

        tracing::debug!(provider = %self.provider, ?state, "refreshing auth token");
        let grant = refresh().await?;
        if grant.value.is_empty() {
            return Err(PushError::auth(
                self.provider,
                "token endpoint returned an empty token",
            ));
        }
        let lifetime = grant
            .expires_in
            .map(|d| d.min(self.validity))
            .unwrap_or(self.validity);
        let token = AuthToken::new(grant.value, self.clock.now_millis(), lifetime);
        tracing::info!(
            provider = %self.provider,
            expires_at_millis = token.expires_at_millis(),
            "auth token refreshed"
        );
        let value = token.value.clone();
        *slot = Some(token);
        Ok(value)
    }
}
