//! OPPO Push server API (v1).
//!
//! `/auth` token signed with SHA-256, sent back in the `auth_token` header.
//! Broadcast is two calls: save the message content, then broadcast its id.

mod adapter;
mod config;
mod types;

pub use adapter::OppoAdapter;
pub use config::{OppoConfig, OppoTargetType};
pub use types::OppoResponse;
