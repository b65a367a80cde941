//! Recipient partitioning and cast selection.

use crate::error::PushError;
use crate::types::CastKind;

/// Per-request recipient limit shared by every supported vendor.
pub const DEFAULT_CAPACITY: usize = 1000;

/// Partition `recipients` into ordered, disjoint chunks of at most `capacity`.
///
/// A list that fits is returned as one chunk; otherwise full chunks come
/// first and a shorter remainder chunk, if any, comes last.
pub fn split<T>(recipients: &[T], capacity: usize) -> Result<Vec<&[T]>, PushError> {
    if capacity == 0 {
        return Err(PushError::ConfigurationError(
            "batch capacity must be at least 1".to_string(),
        ));
    }
    if recipients.len() <= capacity {
        return Ok(vec![recipients]);
    }
    Ok(recipients.chunks(capacity).collect())
}

/// How a request will be sent, decided from the recipient list alone.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CastPlan<'a> {
    Broadcast,
    Unicast(&'a str),
    BatchCast(Vec<&'a [String]>),
}

impl<'a> CastPlan<'a> {
    /// Empty list broadcasts, one identifier unicasts, more batch-cast.
    pub fn for_recipients(recipients: &'a [String], capacity: usize) -> Result<Self, PushError> {
        match recipients {
            [] => Ok(Self::Broadcast),
            [only] => {
                if only.trim().is_empty() {
                    return Err(PushError::ValidationError(
                        "unicast requires a non-blank recipient".to_string(),
                    ));
                }
                Ok(Self::Unicast(only.as_str()))
            }
            many => Ok(Self::BatchCast(split(many, capacity)?)),
        }
    }

    pub fn kind(&self) -> CastKind {
        match self {
            Self::Broadcast => CastKind::Broadcast,
            Self::Unicast(_) => CastKind::Unicast,
            Self::BatchCast(_) => CastKind::BatchCast,
        }
    }

    /// Number of vendor requests the plan will issue.
    pub fn request_count(&self) -> usize {
        match self {
            Self::BatchCast(batches) => batches.len(),
            _ => 1,
        }
    }
}
