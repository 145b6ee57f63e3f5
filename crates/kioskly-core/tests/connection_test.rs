#![allow(clippy::unwrap_used)]
// Connection lifecycle: fail-fast setup, default entity set, teardown.

use std::sync::Arc;
use std::time::Duration;

use secrecy::SecretString;
use serde_json::json;
use url::Url;
use wiremock::matchers::{method, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

use kioskly_api::DeviceClient;
use kioskly_core::{CoreError, DeviceConfig, EntityId, EntityState, KioskConnection};

// ── Helpers ─────────────────────────────────────────────────────────

fn test_config() -> DeviceConfig {
    let mut config = DeviceConfig::new("kiosk.local", SecretString::from("pw".to_string()));
    config.poll_interval = Duration::from_secs(3600); // keep the task quiet
    config
}

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

fn info_payload() -> serde_json::Value {
    json!({
        "deviceName": "Kiosk One",
        "deviceID": "dev-1",
        "deviceManufacturer": "samsung",
        "deviceModel": "SM-T510",
        "appVersionName": "1.42.5",
        "batteryLevel": 80,
        "isScreenOn": true,
        "plugged": true,
        "kioskMode": true,
        "currentPage": "https://example.com/"
    })
}

// ── Setup ───────────────────────────────────────────────────────────

#[tokio::test]
async fn failed_first_poll_aborts_setup() {
    let (server, client) = setup().await;

    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;

    let result = KioskConnection::connect_with_client(test_config(), client).await;

    assert!(
        matches!(result, Err(CoreError::NotReady { .. })),
        "expected NotReady, got: {result:?}"
    );
}

#[tokio::test]
async fn connect_builds_default_entity_set() {
    let (server, client) = setup().await;

    Mock::given(method("GET"))
        .and(query_param("cmd", "deviceInfo"))
        .respond_with(ResponseTemplate::new(200).set_body_json(info_payload()))
        .mount(&server)
        .await;

    let connection = KioskConnection::connect_with_client(test_config(), client)
        .await
        .unwrap();

    let ids: Vec<&str> = connection
        .entities()
        .iter()
        .map(|e| e.id().as_str())
        .collect();

    assert!(ids.contains(&"sensor.kiosk_one_battery_level"));
    assert!(ids.contains(&"sensor.kiosk_one_current_page"));
    assert!(ids.contains(&"binary_sensor.kiosk_one_plugged_in"));
    assert!(ids.contains(&"binary_sensor.kiosk_one_kiosk_mode"));
    assert!(ids.contains(&"switch.kiosk_one_screensaver"));
    assert!(ids.contains(&"light.kiosk_one_screen"));
    assert!(ids.contains(&"media_player.kiosk_one"));

    let battery = connection
        .entity(&EntityId::from("sensor.kiosk_one_battery_level"))
        .unwrap();
    assert_eq!(battery.state(), EntityState::Measurement(80.0));

    connection.shutdown().await;
}

#[tokio::test]
async fn identity_comes_from_snapshot() {
    let (server, client) = setup().await;

    Mock::given(method("GET"))
        .and(query_param("cmd", "deviceInfo"))
        .respond_with(ResponseTemplate::new(200).set_body_json(info_payload()))
        .mount(&server)
        .await;

    let connection = KioskConnection::connect_with_client(test_config(), client)
        .await
        .unwrap();

    let identity = connection.identity().unwrap();
    assert_eq!(identity.id, "dev-1");
    assert_eq!(identity.name, "Kiosk One");
    assert_eq!(identity.manufacturer.as_deref(), Some("samsung"));
    assert_eq!(identity.model.as_deref(), Some("SM-T510"));
    assert_eq!(identity.sw_version.as_deref(), Some("1.42.5"));

    connection.shutdown().await;
}

#[tokio::test]
async fn shutdown_stops_the_poll_task() {
    let (server, client) = setup().await;

    Mock::given(method("GET"))
        .and(query_param("cmd", "deviceInfo"))
        .respond_with(ResponseTemplate::new(200).set_body_json(info_payload()))
        .mount(&server)
        .await;

    let connection = KioskConnection::connect_with_client(test_config(), client)
        .await
        .unwrap();

    // Idempotent from the caller's perspective: a second shutdown await
    // finds no task handle and returns immediately.
    connection.shutdown().await;
    connection.shutdown().await;
}
