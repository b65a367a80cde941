//! The broadcast / unicast / batch-cast algorithm shared by every adapter.

use crate::error::PushError;
use crate::execution::batch::CastPlan;
use crate::providers::PushAdapter;
use crate::types::{BatchFailurePolicy, CastKind, DispatchOutcome, DispatchReport, PushRequest};

/// Send `request` through `adapter`.
///
/// Authentication is settled before the first vendor call and a failure
/// there stops the dispatch. Batches go out strictly in order; a failed batch
/// is recorded and the next one is still attempted. `policy` decides how the
/// recorded outcomes fold into the returned result.
pub async fn dispatch<A>(
    adapter: &A,
    request: &PushRequest,
    policy: BatchFailurePolicy,
) -> Result<DispatchReport, PushError>
where
    A: PushAdapter + ?Sized,
{
    let provider = adapter.provider();
    let plan = CastPlan::for_recipients(request.recipients(), adapter.capacity())?;
    tracing::info!(
        provider = %provider,
        cast = ?plan.kind(),
        recipients = request.recipients().len(),
        requests = plan.request_count(),
        "dispatch started"
    );

    adapter.ensure_valid_auth().await?;

    let mut report = DispatchReport::new(provider);
    match plan {
        CastPlan::Broadcast => {
            let result = adapter.broadcast(request).await;
            report.push(outcome(CastKind::Broadcast, 0, 0, result));
        }
        CastPlan::Unicast(recipient) => {
            let result = adapter.unicast(request, recipient).await;
            report.push(outcome(CastKind::Unicast, 0, 1, result));
        }
        CastPlan::BatchCast(batches) => {
            let total = batches.len();
            for (index, batch) in batches.into_iter().enumerate() {
                let result = adapter.batch_cast(request, batch).await;
                if let Err(err) = &result {
                    tracing::warn!(
                        provider = %provider,
                        batch = index + 1,
                        total,
                        size = batch.len(),
                        error = %err,
                        "batch failed, continuing with the next batch"
                    );
                }
                report.push(outcome(CastKind::BatchCast, index, batch.len(), result));
            }
        }
    }

    tracing::info!(
        provider = %provider,
        requests = report.outcomes.len(),
        failed = report.failed_count(),
        "dispatch finished"
    );
    report.into_result(policy)
}

fn outcome(
    cast: CastKind,
    index: usize,
    recipients: usize,
    result: Result<Option<String>, PushError>,
) -> DispatchOutcome {
    match result {
        Ok(message_id) => DispatchOutcome::success(cast, index, recipients, message_id),
        Err(err) => DispatchOutcome::failure(cast, index, recipients, err),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;
    use crate::execution::http::{HttpTransportRequest, RequestBody};
    use crate::types::Provider;
    use async_trait::async_trait;
    use std::sync::Mutex;

    /// Records every call; fails the batches whose index is listed.
    #[derive(Default)]
    struct FakeAdapter {
        capacity: usize,
        fail_auth: bool,
        failing_batches: Vec<usize>,
        calls: Mutex<Vec<String>>,
    }

    impl FakeAdapter {
        fn calls(&self) -> Vec<String> {
            self.calls.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl PushAdapter for FakeAdapter {
        fn provider(&self) -> Provider {
            Provider::Vivo
        }

        fn capacity(&self) -> usize {
            self.capacity
        }

        async fn ensure_valid_auth(&self) -> Result<(), PushError> {
            self.calls.lock().unwrap().push("auth".into());
            if self.fail_auth {
                return Err(PushError::auth(Provider::Vivo, "bad sign"));
            }
            Ok(())
        }

        async fn build_signed_request(
            &self,
            endpoint: &str,
            body: RequestBody,
        ) -> Result<HttpTransportRequest, PushError> {
            Ok(HttpTransportRequest::post(
                Provider::Vivo,
                endpoint,
                Default::default(),
                body.encode()?,
            ))
        }

        async fn broadcast(&self, _request: &PushRequest) -> Result<Option<String>, PushError> {
            self.calls.lock().unwrap().push("broadcast".into());
            Ok(Some("all".into()))
        }

        async fn unicast(
            &self,
            _request: &PushRequest,
            recipient: &str,
        ) -> Result<Option<String>, PushError> {
            self.calls.lock().unwrap().push(format!("unicast:{recipient}"));
            Ok(None)
        }

        async fn batch_cast(
            &self,
            _request: &PushRequest,
            recipients: &[String],
        ) -> Result<Option<String>, PushError> {
            let index = {
                let mut calls = self.calls.lock().unwrap();
                let index = calls.iter().filter(|c| c.starts_with("batch")).count();
                calls.push(format!("batch:{}", recipients.len()));
                index
            };
            if self.failing_batches.contains(&index) {
                return Err(PushError::transport(Provider::Vivo, Some(500), format!("batch {index} down")));
            }
            Ok(Some(format!("task-{index}")))
        }
    }

    fn request(n: usize) -> PushRequest {
        PushRequest::new("t", "c").with_recipients((0..n).map(|i| format!("r{i}")))
    }

    #[tokio::test]
    async fn routes_by_recipient_count() {
        let adapter = FakeAdapter { capacity: 1000, ..Default::default() };
        dispatch(&adapter, &request(0), BatchFailurePolicy::Accumulate).await.unwrap();
        dispatch(&adapter, &request(1), BatchFailurePolicy::Accumulate).await.unwrap();
        dispatch(&adapter, &request(2), BatchFailurePolicy::Accumulate).await.unwrap();
        assert_eq!(
            adapter.calls(),
            vec!["auth", "broadcast", "auth", "unicast:r0", "auth", "batch:2"]
        );
    }

    #[tokio::test]
    async fn auth_failure_stops_before_any_send() {
        let adapter = FakeAdapter { capacity: 1000, fail_auth: true, ..Default::default() };
        let err = dispatch(&adapter, &request(5), BatchFailurePolicy::Accumulate)
            .await
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Authentication);
        assert_eq!(adapter.calls(), vec!["auth"]);
    }

    #[tokio::test]
    async fn failed_middle_batch_does_not_stop_the_last() {
        let adapter = FakeAdapter {
            capacity: 1000,
            failing_batches: vec![1],
            ..Default::default()
        };
        let err = dispatch(&adapter, &request(2500), BatchFailurePolicy::Accumulate)
            .await
            .unwrap_err();
        assert_eq!(adapter.calls(), vec!["auth", "batch:1000", "batch:1000", "batch:500"]);
        match err {
            PushError::BatchFailures { total, failures, .. } => {
                assert_eq!(total, 3);
                assert_eq!(failures.len(), 1);
                assert_eq!(failures[0].index, 1);
                assert_eq!(failures[0].size, 1000);
            }
            other => panic!("unexpected error: {other:?}"),
        }

        let adapter = FakeAdapter {
            capacity: 1000,
            failing_batches: vec![1],
            ..Default::default()
        };
        let report = dispatch(&adapter, &request(2500), BatchFailurePolicy::LastBatchWins)
            .await
            .unwrap();
        assert_eq!(report.failed_count(), 1);
        assert_eq!(report.message_ids(), vec!["task-0", "task-2"]);
    }
}
