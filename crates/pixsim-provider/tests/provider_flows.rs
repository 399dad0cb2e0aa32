//! Provider API flows.
//!
//! Drives the axum router with a capturing webhook dispatcher, with latency
//! and finalization delays squeezed down so the async paths settle quickly.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use axum::{
    body::Body,
    http::{Request, StatusCode},
    Router,
};
use parking_lot::Mutex;
use serde_json::{json, Value};
use tower::ServiceExt;

use pixsim_core::WebhookEvent;
use pixsim_provider::{
    create_router, AppState, DispatchError, FaultConfig, WebhookDispatcher,
};

#[derive(Default)]
struct CapturingDispatcher {
    events: Mutex<Vec<WebhookEvent>>,
}

#[async_trait]
impl WebhookDispatcher for CapturingDispatcher {
    async fn dispatch(&self, event: &WebhookEvent) -> Result<u16, DispatchError> {
        self.events.lock().push(event.clone());
        Ok(204)
    }
}

fn fast_config() -> FaultConfig {
    FaultConfig {
        p_http500: 0.0,
        p_timeout: 0.0,
        p_duplicate_event: 0.0,
        p_out_of_order_event: 0.0,
        min_latency_ms: 0,
        max_latency_ms: 1,
        finalize_min_ms: 1,
        finalize_max_ms: 2,
        ..FaultConfig::default()
    }
}

fn app(config: FaultConfig) -> (Router, Arc<CapturingDispatcher>) {
    let dispatcher = Arc::new(CapturingDispatcher::default());
    let router = create_router(Arc::new(AppState::new(config, dispatcher.clone())));
    (router, dispatcher)
}

async fn request(app: &Router, req: Request<Body>) -> (StatusCode, Value) {
    let response = app.clone().oneshot(req).await.unwrap();
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let body = serde_json::from_slice(&bytes).unwrap_or(json!(null));
    (status, body)
}

fn send_request(idempotency_key: &str, scenario: Option<&str>) -> Request<Body> {
    let mut builder = Request::builder()
        .method("POST")
        .uri("/provider/pix/send")
        .header("Content-Type", "application/json")
        .header("X-Correlation-Id", "pay_corr");
    if let Some(scenario) = scenario {
        builder = builder.header("X-Mock-Scenario", scenario);
    }
    builder
        .body(Body::from(
            json!({
                "idempotency_key": idempotency_key,
                "txid": "tx-1",
                "amount": 1000,
                "receiver_key": "alice@pix",
                "description": "test",
                "client_reference": "ref-1"
            })
            .to_string(),
        ))
        .unwrap()
}

async fn await_events(dispatcher: &CapturingDispatcher, count: usize) -> Vec<WebhookEvent> {
    for _ in 0..400 {
        if dispatcher.events.lock().len() >= count {
            return dispatcher.events.lock().clone();
        }
        tokio::time::sleep(Duration::from_millis(5)).await;
    }
    panic!(
        "expected {count} webhook events, saw {}",
        dispatcher.events.lock().len()
    );
}

#[tokio::test]
async fn intake_accepts_and_finalizes_through_webhooks() {
    let (app, dispatcher) = app(fast_config());

    let (status, body) = request(&app, send_request("k1", None)).await;
    assert_eq!(status, StatusCode::ACCEPTED);
    assert_eq!(body["status"], "PENDING");
    let provider_id = body["provider_payment_id"].as_str().unwrap().to_string();
    assert!(provider_id.starts_with("prov_"));

    let events = await_events(&dispatcher, 2).await;
    assert_eq!(events[0].kind, "PENDING");
    assert_eq!(events[1].kind, "CONFIRMED");
    for event in &events {
        assert_eq!(event.correlation_id, "pay_corr");
        assert_eq!(event.provider_payment_id, provider_id);
    }

    // The stored payment has reached its terminal status.
    let (status, snapshot) = request(
        &app,
        Request::builder()
            .method("GET")
            .uri(format!("/provider/pix/payments/{provider_id}"))
            .body(Body::empty())
            .unwrap(),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(snapshot["status"], "CONFIRMED");
    assert_eq!(snapshot["amount"], 1000);
    assert_eq!(snapshot["txid"], "tx-1");
}

#[tokio::test]
async fn intake_requires_an_idempotency_key() {
    let (app, _) = app(fast_config());
    let (status, _) = request(&app, send_request("", None)).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn replays_return_the_same_payment_without_a_second_finalization() {
    let (app, dispatcher) = app(fast_config());

    let (_, first) = request(&app, send_request("k1", None)).await;
    await_events(&dispatcher, 2).await;

    let (status, second) = request(&app, send_request("k1", None)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(second["provider_payment_id"], first["provider_payment_id"]);
    assert_eq!(second["status"], "CONFIRMED");

    // Give a stray finalization time to fire, then confirm there was none.
    tokio::time::sleep(Duration::from_millis(50)).await;
    assert_eq!(dispatcher.events.lock().len(), 2);
}

#[tokio::test]
async fn forced_rejection_scenario_rejects() {
    let (app, dispatcher) = app(fast_config());

    let (status, _) = request(&app, send_request("k1", Some("accept_then_reject"))).await;
    assert_eq!(status, StatusCode::ACCEPTED);

    let events = await_events(&dispatcher, 2).await;
    assert_eq!(events[1].kind, "REJECTED");
}

#[tokio::test]
async fn http500_scenario_persists_the_payment_but_never_finalizes() {
    let (app, dispatcher) = app(fast_config());

    let (status, _) = request(&app, send_request("k1", Some("http500"))).await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);

    tokio::time::sleep(Duration::from_millis(50)).await;
    assert!(dispatcher.events.lock().is_empty());

    // The payment exists: a replay of the same key returns it.
    let (status, body) = request(&app, send_request("k1", None)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "PENDING");
}

#[tokio::test]
async fn unknown_scenario_header_behaves_as_accept_then_confirm() {
    let (app, dispatcher) = app(fast_config());

    let (status, _) = request(&app, send_request("k1", Some("not_a_scenario"))).await;
    assert_eq!(status, StatusCode::ACCEPTED);

    let events = await_events(&dispatcher, 2).await;
    assert_eq!(events[1].kind, "CONFIRMED");
}

#[tokio::test]
async fn admin_lists_the_scenario_tokens() {
    let (app, _) = app(fast_config());
    let (status, body) = request(
        &app,
        Request::builder()
            .method("GET")
            .uri("/admin/scenarios")
            .body(Body::empty())
            .unwrap(),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["header"], "X-Mock-Scenario");
    let scenarios = body["scenarios"].as_array().unwrap();
    for token in [
        "success",
        "timeout_then_confirm",
        "timeout_then_reject",
        "http500",
        "accept_then_confirm",
        "accept_then_reject",
    ] {
        assert!(scenarios.iter().any(|s| s == token), "missing {token}");
    }
}

#[tokio::test]
async fn unknown_payment_is_404() {
    let (app, _) = app(fast_config());
    let (status, _) = request(
        &app,
        Request::builder()
            .method("GET")
            .uri("/provider/pix/payments/prov_missing")
            .body(Body::empty())
            .unwrap(),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn health_answers_ok() {
    let (app, _) = app(fast_config());
    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .method("GET")
                .uri("/health")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    assert_eq!(&bytes[..], b"ok");
}
