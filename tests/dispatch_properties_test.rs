//! Routing and batching properties, exercised through real adapters over an
//! in-memory transport.

mod support;

use app_push::auth::{ManualClock, TokenState};
use app_push::providers::{OppoAdapter, OppoConfig, XiaomiAdapter, XiaomiConfig};
use app_push::{
    BatchFailurePolicy, CastKind, DeviceType, Dispatcher, ErrorKind, Provider, PushAdapter,
    PushError, PushRequest,
};
use secrecy::SecretString;
use serde_json::json;
use std::sync::Arc;
use support::{RecordingTransport, form_field, json_response, recipients};

fn xiaomi_ok() -> serde_json::Value {
    json!({ "result": "ok", "code": 0, "description": "成功", "data": { "id": "scm-1" } })
}

fn xiaomi(transport: Arc<RecordingTransport>) -> XiaomiAdapter {
    let config = XiaomiConfig::new(SecretString::from("xm-secret".to_string()))
        .with_app_pkg_name("com.example.app");
    XiaomiAdapter::new(config, DeviceType::Android, transport).unwrap()
}

#[tokio::test]
async fn empty_recipient_list_broadcasts_once() {
    let transport = Arc::new(RecordingTransport::always(xiaomi_ok()));
    let report = xiaomi(transport.clone())
        .push(&PushRequest::new("t", "c"), BatchFailurePolicy::Accumulate)
        .await
        .unwrap();

    let requests = transport.requests();
    assert_eq!(requests.len(), 1);
    assert!(requests[0].url.ends_with("/v3/message/all"));
    assert_eq!(form_field(&requests[0], "alias"), None);
    assert_eq!(report.outcomes[0].cast, CastKind::Broadcast);
    assert_eq!(report.message_ids(), vec!["scm-1"]);
}

#[tokio::test]
async fn single_recipient_unicasts() {
    let transport = Arc::new(RecordingTransport::always(xiaomi_ok()));
    xiaomi(transport.clone())
        .push(&PushRequest::new("t", "c").to("alias-7"), BatchFailurePolicy::Accumulate)
        .await
        .unwrap();

    let requests = transport.requests();
    assert_eq!(requests.len(), 1);
    assert!(requests[0].url.ends_with("/v3/message/alias"));
    assert_eq!(form_field(&requests[0], "alias").as_deref(), Some("alias-7"));
}

#[tokio::test]
async fn batches_cover_every_recipient_in_order() {
    let transport = Arc::new(RecordingTransport::always(xiaomi_ok()));
    let all = recipients(2500);
    let report = xiaomi(transport.clone())
        .push(
            &PushRequest::new("t", "c").with_recipients(all.clone()),
            BatchFailurePolicy::Accumulate,
        )
        .await
        .unwrap();

    let batches: Vec<Vec<String>> = transport
        .requests()
        .iter()
        .map(|r| {
            form_field(r, "alias")
                .unwrap()
                .split(',')
                .map(str::to_string)
                .collect()
        })
        .collect();
    let sizes: Vec<usize> = batches.iter().map(Vec::len).collect();
    assert_eq!(sizes, vec![1000, 1000, 500]);
    assert_eq!(batches.concat(), all);
    assert!(report.outcomes.iter().all(|o| o.cast == CastKind::BatchCast));
}

#[tokio::test]
async fn exactly_capacity_is_one_batch() {
    let transport = Arc::new(RecordingTransport::always(xiaomi_ok()));
    xiaomi(transport.clone())
        .push(
            &PushRequest::new("t", "c").with_recipients(recipients(1000)),
            BatchFailurePolicy::Accumulate,
        )
        .await
        .unwrap();
    assert_eq!(transport.requests().len(), 1);
}

fn failing_second_batch() -> RecordingTransport {
    RecordingTransport::new(|_, position| {
        if position == 1 {
            Ok(json_response(500, &json!({ "error": "internal" })))
        } else {
            Ok(json_response(200, &xiaomi_ok()))
        }
    })
}

#[tokio::test]
async fn failed_batch_does_not_stop_later_batches() {
    let transport = Arc::new(failing_second_batch());
    let err = xiaomi(transport.clone())
        .push(
            &PushRequest::new("t", "c").with_recipients(recipients(2500)),
            BatchFailurePolicy::Accumulate,
        )
        .await
        .unwrap_err();

    assert_eq!(transport.requests().len(), 3);
    assert_eq!(err.kind(), ErrorKind::Composite);
    match err {
        PushError::BatchFailures {
            provider,
            total,
            failures,
        } => {
            assert_eq!(provider, Provider::Xiaomi);
            assert_eq!(total, 3);
            assert_eq!(failures.len(), 1);
            assert_eq!(failures[0].index, 1);
            assert_eq!(failures[0].size, 1000);
            assert_eq!(failures[0].error.status_code(), Some(500));
        }
        other => panic!("unexpected error: {other:?}"),
    }
}

#[tokio::test]
async fn last_batch_wins_reports_only_the_final_batch() {
    let transport = Arc::new(failing_second_batch());
    let report = xiaomi(transport.clone())
        .push(
            &PushRequest::new("t", "c").with_recipients(recipients(2500)),
            BatchFailurePolicy::LastBatchWins,
        )
        .await
        .unwrap();
    assert_eq!(transport.requests().len(), 3);
    assert_eq!(report.failed_count(), 1);
}

fn oppo_transport() -> RecordingTransport {
    RecordingTransport::new(|request, _| {
        let body = if request.url.ends_with("/auth") {
            json!({ "code": 0, "message": "Success", "data": { "auth_token": "oppo-token" } })
        } else {
            json!({ "code": 0, "message": "Success", "data": { "messageId": "m-1" } })
        };
        Ok(json_response(200, &body))
    })
}

fn oppo(transport: Arc<RecordingTransport>, clock: Arc<ManualClock>) -> OppoAdapter {
    let config = OppoConfig::new("app-key", SecretString::from("master".to_string()));
    OppoAdapter::with_clock(config, transport, clock).unwrap()
}

#[tokio::test]
async fn token_is_fetched_once_and_reused_until_expiry() {
    let transport = Arc::new(oppo_transport());
    let clock = Arc::new(ManualClock::new(1_700_000_000_000));
    let adapter = oppo(transport.clone(), clock.clone());
    assert_eq!(adapter.token_cache().state().await, TokenState::Absent);

    let request = PushRequest::new("t", "c").to("alias-1");
    adapter.push(&request, BatchFailurePolicy::Accumulate).await.unwrap();
    adapter.push(&request, BatchFailurePolicy::Accumulate).await.unwrap();
    assert_eq!(transport.count_matching("/auth"), 1);
    assert_eq!(transport.count_matching("/unicast"), 2);

    // Still valid at exactly issued_at + 24h.
    clock.advance(24 * 60 * 60 * 1000);
    adapter.push(&request, BatchFailurePolicy::Accumulate).await.unwrap();
    assert_eq!(transport.count_matching("/auth"), 1);

    clock.advance(1);
    assert_eq!(adapter.token_cache().state().await, TokenState::Expired);
    adapter.push(&request, BatchFailurePolicy::Accumulate).await.unwrap();
    assert_eq!(transport.count_matching("/auth"), 2);

    for sent in transport.requests().iter().filter(|r| r.url.ends_with("/unicast")) {
        assert_eq!(sent.headers.get("auth_token").unwrap(), "oppo-token");
    }
}

#[tokio::test]
async fn one_refresh_serves_every_batch() {
    let transport = Arc::new(oppo_transport());
    let adapter = oppo(transport.clone(), Arc::new(ManualClock::new(0)));
    adapter
        .push(
            &PushRequest::new("t", "c").with_recipients(recipients(2001)),
            BatchFailurePolicy::Accumulate,
        )
        .await
        .unwrap();

    let urls = transport.urls();
    assert_eq!(urls.len(), 4);
    assert!(urls[0].ends_with("/auth"));
    assert!(urls[1..].iter().all(|u| u.ends_with("/unicast_batch")));
}

#[tokio::test]
async fn auth_failure_sends_nothing() {
    let transport = Arc::new(RecordingTransport::always(
        json!({ "code": 11, "message": "Invalid AppKey" }),
    ));
    let adapter = oppo(transport.clone(), Arc::new(ManualClock::new(0)));
    let err = adapter
        .push(
            &PushRequest::new("t", "c").with_recipients(recipients(3)),
            BatchFailurePolicy::Accumulate,
        )
        .await
        .unwrap_err();

    assert_eq!(err.kind(), ErrorKind::Authentication);
    assert!(err.to_string().contains("Invalid AppKey"));
    assert_eq!(transport.urls().len(), 1);
    assert_eq!(adapter.token_cache().state().await, TokenState::Absent);
}

#[tokio::test]
async fn dispatcher_forwards_to_the_selected_vendor_only() {
    let xiaomi_transport = Arc::new(RecordingTransport::always(xiaomi_ok()));
    let oppo_transport = Arc::new(oppo_transport());
    let dispatcher = Dispatcher::builder()
        .adapter(xiaomi(xiaomi_transport.clone()))
        .adapter(oppo(oppo_transport.clone(), Arc::new(ManualClock::new(0))))
        .build()
        .unwrap();

    dispatcher
        .send(Provider::Xiaomi, &PushRequest::new("t", "c"))
        .await
        .unwrap();
    assert_eq!(xiaomi_transport.requests().len(), 1);
    assert!(oppo_transport.requests().is_empty());
}

#[tokio::test]
async fn blank_unicast_recipient_is_rejected_before_sending() {
    let transport = Arc::new(RecordingTransport::always(xiaomi_ok()));
    let err = xiaomi(transport.clone())
        .push(&PushRequest::new("t", "c").to("  "), BatchFailurePolicy::Accumulate)
        .await
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Validation);
    assert!(transport.requests().is_empty());
}

#[tokio::test]
async fn xiaomi_body_without_code_is_rejected() {
    let transport = Arc::new(RecordingTransport::always(
        json!({ "result": "error", "reason": "boom" }),
    ));
    let err = xiaomi(transport)
        .push(&PushRequest::new("t", "c").to("alias-1"), BatchFailurePolicy::Accumulate)
        .await
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::VendorRejection);
    assert!(err.to_string().contains("boom"));
}
