//! Error handling types for app-push.
//!
//! Every failure surfaced by an adapter or the dispatcher is a [`PushError`].
//! Nothing is retried or suppressed; callers receive the vendor's own text
//! whenever the vendor produced one.

mod conversions;
pub mod types;

pub use types::*;
