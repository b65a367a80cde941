//! # app-push
//!
//! Provider-agnostic push dispatch for Huawei, Xiaomi, OPPO, vivo and Meizu.
//!
#![deny(unsafe_code)]

//! A [`Dispatcher`] binds one adapter per vendor at construction time. Each
//! [`PushRequest`] is routed by its recipient list:
//!
//! - no recipients: one broadcast request
//! - one recipient: one unicast request
//! - more: batch-cast requests of at most the vendor's capacity (1000 by
//!   default), sent in order, with a failed batch not stopping the rest
//!
//! Token vendors (Huawei, OPPO, vivo) cache their access token for a 24 hour
//! window and refresh it once, under a lock, before the first request that
//! finds it absent or expired. Xiaomi and Meizu sign every request instead.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use app_push::prelude::*;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), PushError> {
//!     app_push::observability::init_tracing(None);
//!
//!     let config = PushConfig::from_env()?;
//!     let dispatcher = Dispatcher::from_config(&config)?;
//!
//!     let request = PushRequest::new("Order shipped", "Your parcel is on its way")
//!         .with_extra("order_id", "A-1024")
//!         .with_recipients(["alias-1", "alias-2"]);
//!     let report = dispatcher.send(Provider::Xiaomi, &request).await?;
//!     println!("sent {} request(s)", report.outcomes.len());
//!     Ok(())
//! }
//! ```

pub mod auth;
pub mod config;
pub mod dispatcher;
pub mod error;
pub mod execution;
pub mod observability;
pub mod providers;
pub mod types;

pub use config::PushConfig;
pub use dispatcher::{Dispatcher, DispatcherBuilder};
pub use error::{BatchFailure, ErrorKind, PushError};
pub use providers::PushAdapter;
pub use types::{
    BatchFailurePolicy, CastKind, DeviceType, DispatchOutcome, DispatchReport, Provider,
    PushRequest,
};

/// Common imports.
pub mod prelude {
    pub use crate::config::PushConfig;
    pub use crate::dispatcher::Dispatcher;
    pub use crate::error::{ErrorKind, PushError};
    pub use crate::providers::PushAdapter;
    pub use crate::types::{
        BatchFailurePolicy, DeviceType, DispatchReport, Provider, PushRequest,
    };
}
