#![allow(clippy::unwrap_used)]
// Poller behavior against a mock device: snapshot retention, single-flight
// coalescing, listener fan-out, and teardown.

use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use secrecy::SecretString;
use serde_json::json;
use url::Url;
use wiremock::matchers::{method, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

use kioskly_api::DeviceClient;
use kioskly_core::entity::Sensor;
use kioskly_core::{CoreError, Entity, EntityState, Poller};

// ── Helpers ─────────────────────────────────────────────────────────

async fn setup() -> (MockServer, Arc<DeviceClient>) {
    let server = MockServer::start().await;
    let base_url = Url::parse(&server.uri()).unwrap();
    let client = Arc::new(DeviceClient::with_client(
        reqwest::Client::new(),
        base_url,
        SecretString::from("pw".to_string()),
    ));
    (server, client)
}

fn info_payload(battery: u32) -> serde_json::Value {
    json!({
        "deviceName": "Kiosk One",
        "deviceID": "dev-1",
        "batteryLevel": battery,
        "isScreenOn": true,
        "plugged": true
    })
}

fn device_info_mock() -> wiremock::MockBuilder {
    Mock::given(method("GET")).and(query_param("cmd", "deviceInfo"))
}

// ── Snapshot publication ────────────────────────────────────────────

#[tokio::test]
async fn snapshot_equals_last_successful_payload() {
    let (server, client) = setup().await;

    device_info_mock()
        .respond_with(ResponseTemplate::new(200).set_body_json(info_payload(80)))
        .up_to_n_times(1)
        .mount(&server)
        .await;
    device_info_mock()
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;

    let poller = Poller::new(client);

    // First poll succeeds and publishes.
    poller.refresh().await.unwrap();
    assert!(poller.is_healthy());
    assert_eq!(poller.snapshot().unwrap().battery_level(), Some(80.0));

    // Second poll fails: health degrades, snapshot is untouched.
    let err = poller.refresh().await.unwrap_err();
    assert!(matches!(err, CoreError::ConnectionFailed { .. }));
    assert!(!poller.is_healthy());
    assert_eq!(poller.snapshot().unwrap().battery_level(), Some(80.0));
}

#[tokio::test]
async fn health_flag_flips_without_any_health_subscriber() {
    let (server, client) = setup().await;

    device_info_mock()
        .respond_with(ResponseTemplate::new(200).set_body_json(info_payload(40)))
        .mount(&server)
        .await;

    // No `health()` receiver exists; the flag must still flip.
    let poller = Poller::new(client);
    assert!(!poller.is_healthy());

    poller.refresh().await.unwrap();

    assert!(poller.is_healthy());
    assert!(poller.is_available());
    assert!(poller.last_updated().borrow().is_some());
}

#[tokio::test]
async fn no_successful_poll_means_unavailable_not_panic() {
    let (_server, client) = setup().await;
    let poller = Poller::new(client);

    let sensor = Sensor::new(Arc::clone(&poller), "Kiosk One", "Battery Level", "batteryLevel");

    assert!(poller.snapshot().is_none());
    assert_eq!(sensor.state(), EntityState::Unavailable);
}

#[tokio::test]
async fn entity_reads_unavailable_while_degraded_even_with_snapshot() {
    let (server, client) = setup().await;

    device_info_mock()
        .respond_with(ResponseTemplate::new(200).set_body_json(info_payload(55)))
        .up_to_n_times(1)
        .mount(&server)
        .await;
    device_info_mock()
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;

    let poller = Poller::new(client);
    let sensor = Sensor::new(Arc::clone(&poller), "Kiosk One", "Battery Level", "batteryLevel");

    poller.refresh().await.unwrap();
    assert_eq!(sensor.state(), EntityState::Measurement(55.0));

    let _ = poller.refresh().await;
    assert_eq!(sensor.state(), EntityState::Unavailable);
}

// ── Single-flight coalescing ────────────────────────────────────────

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn concurrent_refresh_requests_share_one_device_call() {
    let (server, client) = setup().await;

    device_info_mock()
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(info_payload(70))
                .set_delay(Duration::from_millis(250)),
        )
        .expect(1)
        .mount(&server)
        .await;

    let poller = Poller::new(client);

    let first = tokio::spawn({
        let poller = Arc::clone(&poller);
        async move { poller.request_refresh().await }
    });
    // Let the first request grab the in-flight slot.
    tokio::time::sleep(Duration::from_millis(50)).await;

    let second = poller.request_refresh().await.unwrap();
    let first = first.await.unwrap().unwrap();

    assert_eq!(first.device_id(), Some("dev-1"));
    assert_eq!(second.device_id(), Some("dev-1"));
    // The mock's expect(1) asserts a single device call on drop.
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn coalesced_waiter_sees_failure_outcome() {
    let (server, client) = setup().await;

    device_info_mock()
        .respond_with(ResponseTemplate::new(500).set_delay(Duration::from_millis(250)))
        .expect(1)
        .mount(&server)
        .await;

    let poller = Poller::new(client);

    let first = tokio::spawn({
        let poller = Arc::clone(&poller);
        async move { poller.request_refresh().await }
    });
    tokio::time::sleep(Duration::from_millis(50)).await;

    let second = poller.request_refresh().await;
    let first = first.await.unwrap();

    assert!(first.is_err());
    assert!(matches!(second, Err(CoreError::Unavailable { .. })));
}

// ── Listener fan-out ────────────────────────────────────────────────

#[tokio::test]
async fn listeners_run_after_success_and_failure() {
    let (server, client) = setup().await;

    device_info_mock()
        .respond_with(ResponseTemplate::new(200).set_body_json(info_payload(60)))
        .up_to_n_times(1)
        .mount(&server)
        .await;
    device_info_mock()
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;

    let poller = Poller::new(client);
    let notifications = Arc::new(AtomicUsize::new(0));
    let count = Arc::clone(&notifications);
    let _handle = poller.add_listener(move || {
        count.fetch_add(1, Ordering::SeqCst);
    });

    poller.refresh().await.unwrap();
    assert_eq!(notifications.load(Ordering::SeqCst), 1);

    let _ = poller.refresh().await;
    assert_eq!(notifications.load(Ordering::SeqCst), 2);
}

#[tokio::test]
async fn deregistered_listener_is_not_notified() {
    let (server, client) = setup().await;

    device_info_mock()
        .respond_with(ResponseTemplate::new(200).set_body_json(info_payload(60)))
        .mount(&server)
        .await;

    let poller = Poller::new(client);
    let notifications = Arc::new(AtomicUsize::new(0));
    let count = Arc::clone(&notifications);
    let handle = poller.add_listener(move || {
        count.fetch_add(1, Ordering::SeqCst);
    });

    handle.deregister();
    handle.deregister(); // second call is a no-op

    poller.refresh().await.unwrap();
    assert_eq!(notifications.load(Ordering::SeqCst), 0);
}

// ── Teardown ────────────────────────────────────────────────────────

#[tokio::test]
async fn no_publication_after_shutdown() {
    let (server, client) = setup().await;

    device_info_mock()
        .respond_with(ResponseTemplate::new(200).set_body_json(info_payload(90)))
        .mount(&server)
        .await;

    let poller = Poller::new(client);
    poller.shutdown();

    let result = poller.refresh().await;
    assert!(matches!(result, Err(CoreError::ShuttingDown)));
    assert!(poller.snapshot().is_none());
    assert!(!poller.is_healthy());
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn shutdown_releases_coalesced_waiters() {
    let (server, client) = setup().await;

    device_info_mock()
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(info_payload(90))
                .set_delay(Duration::from_millis(250)),
        )
        .mount(&server)
        .await;

    let poller = Poller::new(client);

    let first = tokio::spawn({
        let poller = Arc::clone(&poller);
        async move { poller.request_refresh().await }
    });
    // Let the first request grab the in-flight slot, then attach a waiter.
    tokio::time::sleep(Duration::from_millis(50)).await;
    let waiter = tokio::spawn({
        let poller = Arc::clone(&poller);
        async move { poller.request_refresh().await }
    });
    tokio::time::sleep(Duration::from_millis(50)).await;

    poller.shutdown();

    // The waiter must not hang on a poll whose result gets discarded.
    let waited = tokio::time::timeout(Duration::from_secs(2), waiter)
        .await
        .expect("waiter still pending after shutdown")
        .unwrap();
    assert!(matches!(waited, Err(CoreError::ShuttingDown)));

    let first = first.await.unwrap();
    assert!(matches!(first, Err(CoreError::ShuttingDown)));
    assert!(poller.snapshot().is_none());
}
