//! vivo Push server API.
//!
//! `/message/auth` token signed with MD5, sent back in the `authToken`
//! header. JSON bodies throughout; batch-cast saves the payload first and
//! then pushes the returned task id to the recipient list.

mod adapter;
mod config;
mod types;

pub use adapter::VivoAdapter;
pub use config::{VivoConfig, VivoTargetType};
pub use types::VivoResponse;
