//! Observability
//!
//! Structured logging for vendor calls. Credentials are masked before any
//! header or body value reaches a log line.

pub mod tracing;

pub use self::tracing::{
    ProviderTracer, format_body_for_logging, format_headers_for_logging, get_mask_sensitive_values,
    init_tracing, mask_sensitive_value, set_mask_sensitive_values,
};
