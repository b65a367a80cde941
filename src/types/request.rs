//! The logical push request handed to the dispatcher.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// A provider-neutral push request.
///
/// The recipient list decides how the request is routed:
/// - empty: broadcast to every registered device
/// - one identifier: unicast
/// - more than one: batch-cast, split into capacity-bounded chunks
///
/// Fields are read-only once the request is built.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PushRequest {
    title: String,
    content: String,
    #[serde(default)]
    extras: BTreeMap<String, String>,
    #[serde(default)]
    recipients: Vec<String>,
}

impl PushRequest {
    /// Create a broadcast request with no extras.
    pub fn new(title: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            content: content.into(),
            extras: BTreeMap::new(),
            recipients: Vec::new(),
        }
    }

    /// Add one extra key/value pair delivered with the notification.
    pub fn with_extra(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.extras.insert(key.into(), value.into());
        self
    }

    /// Replace the extra data map.
    pub fn with_extras<I, K, V>(mut self, extras: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        self.extras = extras
            .into_iter()
            .map(|(k, v)| (k.into(), v.into()))
            .collect();
        self
    }

    /// Address the request to a single device/alias identifier.
    pub fn to(mut self, recipient: impl Into<String>) -> Self {
        self.recipients = vec![recipient.into()];
        self
    }

    /// Address the request to an ordered list of identifiers.
    pub fn with_recipients<I, S>(mut self, recipients: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.recipients = recipients.into_iter().map(Into::into).collect();
        self
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn content(&self) -> &str {
        &self.content
    }

    pub fn extras(&self) -> &BTreeMap<String, String> {
        &self.extras
    }

    pub fn recipients(&self) -> &[String] {
        &self.recipients
    }

    pub fn is_broadcast(&self) -> bool {
        self.recipients.is_empty()
    }
}
