//! Core data types shared by every adapter.

mod outcome;
mod platform;
mod request;

pub use outcome::{BatchFailurePolicy, CastKind, DispatchOutcome, DispatchReport};
pub use platform::{DeviceType, Provider};
pub use request::PushRequest;
