//! Meizu UPS push API.
//!
//! No token: every form carries `sign`, an MD5 over the sorted parameters
//! plus the app secret.

mod adapter;
mod config;
mod types;

pub use adapter::MeizuAdapter;
pub use config::MeizuConfig;
pub use types::MeizuResponse;
