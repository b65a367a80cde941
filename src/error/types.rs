//! Error type definitions.

use crate::types::Provider;
use thiserror::Error;

/// Coarse classification of a [`PushError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    Configuration,
    Authentication,
    Transport,
    VendorRejection,
    Validation,
    /// Several batches of one batch-cast failed.
    Composite,
}

/// A single failed batch inside a [`PushError::BatchFailures`].
#[derive(Debug, Clone)]
pub struct BatchFailure {
    /// Zero-based position of the batch in send order.
    pub index: usize,
    /// Number of recipients carried by the batch.
    pub size: usize,
    pub error: PushError,
}

/// Errors produced while dispatching a push.
#[derive(Error, Debug, Clone)]
pub enum PushError {
    /// A required credential or setting is missing or malformed.
    #[error("Configuration error: {0}")]
    ConfigurationError(String),

    /// The vendor's token or signature exchange failed.
    #[error("Authentication error ({provider}): {message}")]
    AuthenticationError { provider: Provider, message: String },

    /// The network call failed, timed out, returned a non-2xx status, or
    /// produced a body that could not be parsed.
    #[error("Transport error{}: {message}", fmt_status(.status))]
    TransportError {
        provider: Option<Provider>,
        status: Option<u16>,
        message: String,
    },

    /// The vendor answered, but its envelope signals failure.
    #[error("{provider} rejected the push (code {code}): {message}")]
    VendorRejection {
        provider: Provider,
        code: String,
        message: String,
    },

    /// The request violates a vendor precondition.
    #[error("Validation error: {0}")]
    ValidationError(String),

    /// One or more batches of a batch-cast failed.
    #[error("{} of {total} batches failed for {provider}{}", .failures.len(), fmt_first(.failures))]
    BatchFailures {
        provider: Provider,
        total: usize,
        failures: Vec<BatchFailure>,
    },
}

fn fmt_status(status: &Option<u16>) -> String {
    status.map(|s| format!(" (HTTP {s})")).unwrap_or_default()
}

fn fmt_first(failures: &[BatchFailure]) -> String {
    failures
        .first()
        .map(|f| format!("; batch {}: {}", f.index, f.error))
        .unwrap_or_default()
}

impl PushError {
    /// Create a transport error attributed to a provider.
    pub fn transport(provider: Provider, status: Option<u16>, message: impl Into<String>) -> Self {
        Self::TransportError {
            provider: Some(provider),
            status,
            message: message.into(),
        }
    }

    /// Create an authentication error.
    pub fn auth(provider: Provider, message: impl Into<String>) -> Self {
        Self::AuthenticationError {
            provider,
            message: message.into(),
        }
    }

    /// Create a vendor rejection carrying the vendor's message text.
    pub fn rejected(
        provider: Provider,
        code: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        Self::VendorRejection {
            provider,
            code: code.into(),
            message: message.into(),
        }
    }

    /// Create a configuration error for a missing credential field.
    pub fn missing(provider: Provider, field: &str) -> Self {
        Self::ConfigurationError(format!("missing {provider} {field}"))
    }

    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::ConfigurationError(_) => ErrorKind::Configuration,
            Self::AuthenticationError { .. } => ErrorKind::Authentication,
            Self::TransportError { .. } => ErrorKind::Transport,
            Self::VendorRejection { .. } => ErrorKind::VendorRejection,
            Self::ValidationError(_) => ErrorKind::Validation,
            Self::BatchFailures { .. } => ErrorKind::Composite,
        }
    }

    /// HTTP status associated with the error, if any.
    pub fn status_code(&self) -> Option<u16> {
        match self {
            Self::TransportError { status, .. } => *status,
            _ => None,
        }
    }

    /// Attach a provider to a transport error that was raised without one.
    pub(crate) fn with_provider(self, provider: Provider) -> Self {
        match self {
            Self::TransportError {
                provider: None,
                status,
                message,
            } => Self::TransportError {
                provider: Some(provider),
                status,
                message,
            },
            other => other,
        }
    }

    /// Re-classify any failure during a token exchange as an authentication error.
    pub(crate) fn into_auth(self, provider: Provider) -> Self {
        match self {
            Self::AuthenticationError { .. } | Self::ConfigurationError(_) => self,
            Self::VendorRejection { message, .. } => Self::auth(provider, message),
            other => Self::auth(provider, format!("token request failed: {other}")),
        }
    }
}
