//! Authentication helpers and token caching.
//!
//! Token-based vendors (Huawei, OPPO, vivo) exchange their credentials for a
//! short-lived bearer token and keep it in a [`TokenCache`]. Signing vendors
//! (Xiaomi, Meizu) compute credentials per request and hold no token.

mod clock;
mod token;

pub use clock::{Clock, ManualClock, SystemClock};
pub use token::{AuthToken, DEFAULT_TOKEN_VALIDITY, TokenCache, TokenGrant, TokenState};
