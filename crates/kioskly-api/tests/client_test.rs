#![allow(clippy::unwrap_used)]
// Integration tests for `DeviceClient` using wiremock.

use secrecy::SecretString;
use serde_json::json;
use url::Url;
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

use kioskly_api::{DeviceClient, Error};

// ── Helpers ─────────────────────────────────────────────────────────

async fn setup() -> (MockServer, DeviceClient) {
    let server = MockServer::start().await;
    let base_url = Url::parse(&server.uri()).unwrap();
    let client = DeviceClient::with_client(
        reqwest::Client::new(),
        base_url,
        SecretString::from("test-password".to_string()),
    );
    (server, client)
}

fn ok_envelope(text: &str) -> serde_json::Value {
    json!({ "status": "OK", "statustext": text })
}

// ── Status queries ──────────────────────────────────────────────────

#[tokio::test]
async fn device_info_returns_typed_snapshot() {
    let (server, client) = setup().await;

    let payload = json!({
        "deviceName": "Lobby Tablet",
        "deviceID": "abc123",
        "deviceManufacturer": "samsung",
        "deviceModel": "SM-T510",
        "appVersionName": "1.42.5",
        "batteryLevel": 74,
        "isScreenOn": true,
        "plugged": false,
        "kioskMode": true
    });

    Mock::given(method("GET"))
        .and(path("/"))
        .and(query_param("cmd", "deviceInfo"))
        .and(query_param("type", "json"))
        .and(query_param("password", "test-password"))
        .respond_with(ResponseTemplate::new(200).set_body_json(&payload))
        .mount(&server)
        .await;

    let info = client.device_info().await.unwrap();

    assert_eq!(info.device_name(), Some("Lobby Tablet"));
    assert_eq!(info.device_id(), Some("abc123"));
    assert_eq!(info.battery_level(), Some(74.0));
    assert_eq!(info.screen_on(), Some(true));
    assert_eq!(info.plugged(), Some(false));
}

#[tokio::test]
async fn device_info_wrong_password_is_auth_error() {
    let (server, client) = setup().await;

    Mock::given(method("GET"))
        .and(path("/"))
        .and(query_param("cmd", "deviceInfo"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "status": "Error",
            "statustext": "Please login"
        })))
        .mount(&server)
        .await;

    let result = client.device_info().await;

    assert!(
        matches!(result, Err(Error::Authentication { .. })),
        "expected Authentication error, got: {result:?}"
    );
}

// ── Commands ────────────────────────────────────────────────────────

#[tokio::test]
async fn set_string_setting_sends_key_and_value() {
    let (server, client) = setup().await;

    Mock::given(method("GET"))
        .and(path("/"))
        .and(query_param("cmd", "setStringSetting"))
        .and(query_param("key", "startURL"))
        .and(query_param("value", "https://example.com"))
        .respond_with(ResponseTemplate::new(200).set_body_json(ok_envelope("Setting saved")))
        .expect(1)
        .mount(&server)
        .await;

    client
        .set_string_setting("startURL", "https://example.com")
        .await
        .unwrap();
}

#[tokio::test]
async fn screen_on_unwraps_ok_envelope() {
    let (server, client) = setup().await;

    Mock::given(method("GET"))
        .and(path("/"))
        .and(query_param("cmd", "screenOn"))
        .respond_with(ResponseTemplate::new(200).set_body_json(ok_envelope("Screen on")))
        .mount(&server)
        .await;

    client.screen_on().await.unwrap();
}

#[tokio::test]
async fn command_error_envelope_carries_statustext() {
    let (server, client) = setup().await;

    Mock::given(method("GET"))
        .and(path("/"))
        .and(query_param("cmd", "playSound"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "status": "Error",
            "statustext": "File not found"
        })))
        .mount(&server)
        .await;

    let result = client.play_sound("http://example.com/chime.mp3").await;

    match result {
        Err(Error::Command { command, message }) => {
            assert_eq!(command, "playSound");
            assert_eq!(message, "File not found");
        }
        other => panic!("expected Command error, got: {other:?}"),
    }
}

#[tokio::test]
async fn http_error_status_maps_to_api_error() {
    let (server, client) = setup().await;

    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(500).set_body_string("boom"))
        .mount(&server)
        .await;

    let result = client.device_info().await;

    match result {
        Err(Error::Api { status, message }) => {
            assert_eq!(status, 500);
            assert_eq!(message, "boom");
        }
        other => panic!("expected Api error, got: {other:?}"),
    }
}

#[tokio::test]
async fn malformed_payload_is_deserialization_error() {
    let (server, client) = setup().await;

    Mock::given(method("GET"))
        .and(query_param("cmd", "deviceInfo"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>not json</html>"))
        .mount(&server)
        .await;

    let result = client.device_info().await;

    assert!(
        matches!(result, Err(Error::Deserialization { .. })),
        "expected Deserialization error, got: {result:?}"
    );
}

#[tokio::test]
async fn connection_refused_is_transient_transport_error() {
    // Bind a listener and drop it to get a dead port. (A dropped wiremock
    // server won't do: pooled servers keep listening for the process
    // lifetime, and bare ones shut down asynchronously, racing the request.)
    let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    let port = listener.local_addr().unwrap().port();
    drop(listener);
    let base_url = Url::parse(&format!("http://127.0.0.1:{port}/")).unwrap();

    // No proxy: an HTTP_PROXY in the environment would intercept the
    // request and mask the refused connection.
    let client = DeviceClient::with_client(
        reqwest::Client::builder().no_proxy().build().unwrap(),
        base_url,
        SecretString::from("pw".to_string()),
    );

    let err = client.device_info().await.unwrap_err();
    assert!(err.is_transient(), "expected transient error, got: {err:?}");
}
