//! End-to-end: both nodes on real sockets, wired at each other.
//!
//! The participant dispatches orders to the provider over HTTP and the
//! provider delivers webhooks back over HTTP, exactly as the deployed pair
//! does; only the delays are squeezed so quiescence arrives quickly.

use std::sync::Arc;
use std::time::Duration;

use serde_json::{json, Value};

use pixsim_participant::HttpProviderGateway;
use pixsim_provider::{FaultConfig, HttpWebhookDispatcher};

/// Binds both services on ephemeral ports, cross-wires their URLs, and
/// serves them on background tasks. Returns the two base URLs.
async fn spawn_pair(faults: FaultConfig) -> (String, String) {
    let participant_listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .unwrap();
    let participant_addr = participant_listener.local_addr().unwrap();
    let provider_listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let provider_addr = provider_listener.local_addr().unwrap();

    let dispatcher = Arc::new(HttpWebhookDispatcher::new(format!(
        "http://{participant_addr}/webhooks/pix"
    )));
    let provider_app =
        pixsim_provider::create_router(Arc::new(pixsim_provider::AppState::new(faults, dispatcher)));

    let gateway = Arc::new(HttpProviderGateway::new(format!("http://{provider_addr}")));
    let participant_app =
        pixsim_participant::create_router(Arc::new(pixsim_participant::AppState::new(gateway)));

    tokio::spawn(async move {
        axum::serve(participant_listener, participant_app).await.unwrap();
    });
    tokio::spawn(async move {
        axum::serve(provider_listener, provider_app).await.unwrap();
    });

    (
        format!("http://{participant_addr}"),
        format!("http://{provider_addr}"),
    )
}

fn fast_faults() -> FaultConfig {
    FaultConfig {
        p_http500: 0.0,
        p_timeout: 0.0,
        p_duplicate_event: 0.0,
        p_out_of_order_event: 0.0,
        min_latency_ms: 0,
        max_latency_ms: 1,
        finalize_min_ms: 1,
        finalize_max_ms: 10,
        ..FaultConfig::default()
    }
}

async fn submit(
    client: &reqwest::Client,
    participant: &str,
    key: &str,
    amount: i64,
    scenario: Option<&str>,
) -> Value {
    let mut request = client
        .post(format!("{participant}/pix/send"))
        .header("Idempotency-Key", key)
        .json(&json!({
            "txid": format!("tx-{key}"),
            "amount": amount,
            "receiver_key": "alice@pix",
            "description": "e2e",
            "client_reference": key
        }));
    if let Some(scenario) = scenario {
        request = request.header("X-Mock-Scenario", scenario);
    }
    let response = request.send().await.unwrap();
    assert_eq!(response.status().as_u16(), 202);
    response.json().await.unwrap()
}

async fn await_terminal(client: &reqwest::Client, participant: &str, payment_id: &str) -> Value {
    for _ in 0..500 {
        let snapshot: Value = client
            .get(format!("{participant}/pix/send/{payment_id}"))
            .send()
            .await
            .unwrap()
            .json()
            .await
            .unwrap();
        let status = snapshot["status"].as_str().unwrap_or_default().to_string();
        if status == "CONFIRMED" || status == "REJECTED" {
            return snapshot;
        }
        tokio::time::sleep(Duration::from_millis(10)).await;
    }
    panic!("payment {payment_id} never reached a terminal status");
}

async fn entry_kinds_for(client: &reqwest::Client, participant: &str, payment_id: &str) -> Vec<String> {
    let body: Value = client
        .get(format!("{participant}/ledger/entries"))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    body["entries"]
        .as_array()
        .unwrap()
        .iter()
        .filter(|e| e["payment_id"] == payment_id)
        .map(|e| e["kind"].as_str().unwrap().to_string())
        .collect()
}

async fn balance_of(client: &reqwest::Client, participant: &str, account: &str) -> i64 {
    let body: Value = client
        .get(format!("{participant}/ledger/balances"))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    body["balances"]
        .as_array()
        .unwrap()
        .iter()
        .find(|b| b["account"] == account)
        .and_then(|b| b["amount"].as_i64())
        .unwrap_or(0)
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn happy_path_settles_across_both_nodes() {
    let (participant, provider) = spawn_pair(fast_faults()).await;
    let client = reqwest::Client::new();

    // Both nodes are up.
    for base in [&participant, &provider] {
        let response = client.get(format!("{base}/health")).send().await.unwrap();
        assert_eq!(response.status().as_u16(), 200);
        assert_eq!(response.text().await.unwrap(), "ok");
    }

    let accepted = submit(&client, &participant, "e2e-happy", 1000, None).await;
    assert_eq!(accepted["status"], "CREATED");
    let payment_id = accepted["payment_id"].as_str().unwrap().to_string();

    let snapshot = await_terminal(&client, &participant, &payment_id).await;
    assert_eq!(snapshot["status"], "CONFIRMED");
    assert!(snapshot["provider_payment_id"]
        .as_str()
        .unwrap()
        .starts_with("prov_"));

    assert_eq!(
        entry_kinds_for(&client, &participant, &payment_id).await,
        vec!["HOLD", "SETTLE"]
    );
    assert_eq!(balance_of(&client, &participant, "CUSTOMER_AVAILABLE").await, -1000);
    assert_eq!(balance_of(&client, &participant, "CUSTOMER_HELD").await, 0);
    assert_eq!(balance_of(&client, &participant, "PIX_CLEARING").await, 1000);

    // The provider agrees on the outcome.
    let provider_payment_id = snapshot["provider_payment_id"].as_str().unwrap();
    let provider_view: Value = client
        .get(format!("{provider}/provider/pix/payments/{provider_payment_id}"))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(provider_view["status"], "CONFIRMED");
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn forced_rejection_releases_the_hold() {
    let (participant, _provider) = spawn_pair(fast_faults()).await;
    let client = reqwest::Client::new();

    let accepted = submit(
        &client,
        &participant,
        "e2e-reject",
        500,
        Some("accept_then_reject"),
    )
    .await;
    let payment_id = accepted["payment_id"].as_str().unwrap().to_string();

    let snapshot = await_terminal(&client, &participant, &payment_id).await;
    assert_eq!(snapshot["status"], "REJECTED");

    assert_eq!(
        entry_kinds_for(&client, &participant, &payment_id).await,
        vec!["HOLD", "RELEASE"]
    );
    for account in ["CUSTOMER_AVAILABLE", "CUSTOMER_HELD", "PIX_CLEARING"] {
        assert_eq!(balance_of(&client, &participant, account).await, 0);
    }
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn certain_faults_still_converge() {
    // Every finalization duplicated and reordered: the participant must end
    // up exactly where the happy path does.
    let faults = FaultConfig {
        p_duplicate_event: 1.0,
        p_out_of_order_event: 1.0,
        ..fast_faults()
    };
    let (participant, _provider) = spawn_pair(faults).await;
    let client = reqwest::Client::new();

    let accepted = submit(&client, &participant, "e2e-faulty", 1000, None).await;
    let payment_id = accepted["payment_id"].as_str().unwrap().to_string();

    let snapshot = await_terminal(&client, &participant, &payment_id).await;
    assert_eq!(snapshot["status"], "CONFIRMED");

    // Wait out the duplicated final delivery, then check nothing doubled.
    tokio::time::sleep(Duration::from_millis(300)).await;
    assert_eq!(
        entry_kinds_for(&client, &participant, &payment_id).await,
        vec!["HOLD", "SETTLE"]
    );
    assert_eq!(balance_of(&client, &participant, "PIX_CLEARING").await, 1000);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn resubmission_is_idempotent_across_the_pair() {
    let (participant, _provider) = spawn_pair(fast_faults()).await;
    let client = reqwest::Client::new();

    let first = submit(&client, &participant, "e2e-idem", 700, None).await;
    let payment_id = first["payment_id"].as_str().unwrap().to_string();
    await_terminal(&client, &participant, &payment_id).await;

    // Replay after the payment already settled.
    let replay = submit(&client, &participant, "e2e-idem", 700, None).await;
    assert_eq!(replay["payment_id"], first["payment_id"]);
    assert_eq!(replay["status"], "CONFIRMED");

    assert_eq!(
        entry_kinds_for(&client, &participant, &payment_id).await,
        vec!["HOLD", "SETTLE"]
    );
}
