//! HTTP Utilities
//!
//! This module contains HTTP-related utilities:
//! - the injectable transport and its `reqwest` implementation
//! - header building for vendor requests

pub mod headers;
pub mod transport;

pub use headers::*;
pub use transport::*;
