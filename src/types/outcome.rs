//! Per-batch outcomes and their aggregation.

use crate::error::{BatchFailure, PushError};
use crate::types::Provider;
use serde::{Deserialize, Serialize};

/// How a single vendor request was addressed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CastKind {
    Broadcast,
    Unicast,
    BatchCast,
}

/// How failures of individual batches fold into the overall result.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BatchFailurePolicy {
    /// Report every failed batch in one composite error.
    #[default]
    Accumulate,
    /// Return only the outcome of the last batch sent; earlier failures are
    /// logged but not returned.
    LastBatchWins,
}

/// Result of one vendor request.
#[derive(Debug, Clone)]
pub struct DispatchOutcome {
    pub cast: CastKind,
    /// Zero-based position in send order.
    pub index: usize,
    /// Recipients addressed by this request; 0 for broadcast.
    pub recipients: usize,
    /// Vendor-assigned message or task id, when the vendor returns one.
    pub message_id: Option<String>,
    pub error: Option<PushError>,
}

impl DispatchOutcome {
    pub fn success(cast: CastKind, index: usize, recipients: usize, message_id: Option<String>) -> Self {
        Self {
            cast,
            index,
            recipients,
            message_id,
            error: None,
        }
    }

    pub fn failure(cast: CastKind, index: usize, recipients: usize, error: PushError) -> Self {
        Self {
            cast,
            index,
            recipients,
            message_id: None,
            error: Some(error),
        }
    }

    pub fn succeeded(&self) -> bool {
        self.error.is_none()
    }
}

/// Every outcome produced by one `send` call, in send order.
#[derive(Debug, Clone)]
pub struct DispatchReport {
    pub provider: Provider,
    pub outcomes: Vec<DispatchOutcome>,
}

impl DispatchReport {
    pub fn new(provider: Provider) -> Self {
        Self {
            provider,
            outcomes: Vec::new(),
        }
    }

    pub fn push(&mut self, outcome: DispatchOutcome) {
        self.outcomes.push(outcome);
    }

    pub fn succeeded(&self) -> bool {
        self.outcomes.iter().all(DispatchOutcome::succeeded)
    }

    pub fn failed_count(&self) -> usize {
        self.outcomes.iter().filter(|o| !o.succeeded()).count()
    }

    /// Vendor ids of the successful requests, in send order.
    pub fn message_ids(&self) -> Vec<&str> {
        self.outcomes
            .iter()
            .filter_map(|o| o.message_id.as_deref())
            .collect()
    }

    /// Fold the per-request outcomes into the caller-facing result.
    pub fn into_result(self, policy: BatchFailurePolicy) -> Result<Self, PushError> {
        if self.succeeded() {
            return Ok(self);
        }

        match policy {
            BatchFailurePolicy::LastBatchWins => match self.outcomes.last() {
                Some(DispatchOutcome {
                    error: Some(err), ..
                }) => Err(err.clone()),
                _ => Ok(self),
            },
            BatchFailurePolicy::Accumulate => {
                if self.outcomes.len() == 1 {
                    let err = self
                        .outcomes
                        .into_iter()
                        .next()
                        .and_then(|o| o.error)
                        .unwrap_or_else(|| {
                            PushError::ValidationError("dispatch produced no outcome".to_string())
                        });
                    return Err(err);
                }
                let total = self.outcomes.len();
                let failures = self
                    .outcomes
                    .into_iter()
                    .filter_map(|o| {
                        o.error.map(|error| BatchFailure {
                            index: o.index,
                            size: o.recipients,
                            error,
                        })
                    })
                    .collect();
                Err(PushError::BatchFailures {
                    provider: self.provider,
                    total,
                    failures,
                })
            }
        }
    }
}
