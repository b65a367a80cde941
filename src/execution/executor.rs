//! Sends one signed vendor request and normalizes the answer.

use crate::error::PushError;
use crate::execution::http::{HttpTransport, HttpTransportRequest};
use crate::execution::response::{ResponseEnvelope, normalize};
use crate::observability::ProviderTracer;
use crate::types::Provider;
use std::sync::Arc;
use std::time::Instant;

/// Transport plus tracing for one vendor.
#[derive(Clone)]
pub struct RequestExecutor {
    provider: Provider,
    transport: Arc<dyn HttpTransport>,
    tracer: ProviderTracer,
}

impl RequestExecutor {
    pub fn new(provider: Provider, transport: Arc<dyn HttpTransport>) -> Self {
        Self {
            provider,
            transport,
            tracer: ProviderTracer::new(provider),
        }
    }

    pub fn provider(&self) -> Provider {
        self.provider
    }

    /// Execute `request` and parse the body as `E`.
    ///
    /// Errors are logged here once, then returned unchanged.
    pub async fn execute<E: ResponseEnvelope>(
        &self,
        request: HttpTransportRequest,
    ) -> Result<E, PushError> {
        let started = Instant::now();
        self.tracer
            .trace_request_start(request.method.as_str(), &request.url);
        self.tracer
            .trace_request_details(&request.headers, &request.body);

        let result = match self.transport.execute(request).await {
            Ok(response) => {
                self.tracer
                    .trace_response(response.status, started, &response.body);
                normalize::<E>(self.provider, &response)
            }
            Err(err) => Err(err.with_provider(self.provider)),
        };
        if let Err(err) = &result {
            self.tracer.trace_request_error(err, started);
        }
        result
    }
}
