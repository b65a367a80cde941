//! Execution layer: transport, request execution, response normalization,
//! batching and the shared dispatch algorithm.

pub mod batch;
pub mod dispatch;
pub mod executor;
pub mod http;
pub mod response;

pub use batch::{CastPlan, DEFAULT_CAPACITY, split};
pub use dispatch::dispatch;
pub use executor::RequestExecutor;
pub use response::{ResponseEnvelope, normalize};
