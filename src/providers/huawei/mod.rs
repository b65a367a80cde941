//! Huawei Push Kit (legacy `pushsend.do` API).
//!
//! OAuth2 client-credentials token, form-encoded sends. Broadcast, unicast
//! and batch-cast share one endpoint; only the device token list differs.

mod adapter;
mod config;
mod types;

pub use adapter::HuaweiAdapter;
pub use config::HuaweiConfig;
pub use types::{HuaweiSendResponse, HuaweiTokenResponse};
