//! Xiaomi MiPush server API.
//!
//! No token: every request carries `Authorization: key=<app secret>`.
//! Unicast and batch-cast both address aliases, comma-joined.

mod adapter;
mod config;
mod types;

pub use adapter::XiaomiAdapter;
pub use config::XiaomiConfig;
pub use types::{PlatformExtras, XiaomiResponse};
