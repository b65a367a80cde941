//! Type Conversions for PushError
//!
//! This module contains From trait implementations for converting
//! common error types into PushError.

use super::types::PushError;

impl From<reqwest::Error> for PushError {
    fn from(err: reqwest::Error) -> Self {
        Self::TransportError {
            provider: None,
            status: err.status().map(|s| s.as_u16()),
            message: err.to_string(),
        }
    }
}

impl From<serde_json::Error> for PushError {
    fn from(err: serde_json::Error) -> Self {
        Self::TransportError {
            provider: None,
            status: None,
            message: format!("malformed response body: {err}"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;

    #[test]
    fn test_from_serde_json_error() {
        let json_err = serde_json::from_str::<serde_json::Value>("invalid json").unwrap_err();
        let push_err: PushError = json_err.into();
        assert_eq!(push_err.kind(), ErrorKind::Transport);
        assert!(push_err.to_string().contains("malformed response body"));
    }
}
