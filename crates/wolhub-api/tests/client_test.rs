// Integration tests for `WolClient` using wiremock.
#![allow(clippy::unwrap_used)]

use serde_json::json;
use wiremock::matchers::{body_json, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use wolhub_api::{Device, Error, WolClient};

// ── Helpers ─────────────────────────────────────────────────────────

async fn setup() -> (MockServer, WolClient) {
    let server = MockServer::start().await;
    let client = WolClient::from_reqwest(&server.uri(), reqwest::Client::new()).unwrap();
    (server, client)
}

fn sample_device() -> Device {
    Device {
        name: "printer-1".into(),
        mac_address: "aa:bb:cc:dd:ee:ff".into(),
        ip_address: Some("192.168.1.50".into()),
        broadcast_ip: None,
        port: Some(9),
    }
}

// ── Happy-path tests ────────────────────────────────────────────────

#[tokio::test]
async fn test_list_devices() {
    let (server, client) = setup().await;

    let body = json!([
        {
            "name": "printer-1",
            "mac_address": "aa:bb:cc:dd:ee:ff",
            "ip_address": "192.168.1.50",
            "broadcast_ip": "255.255.255.255",
            "port": 9
        },
        {
            "name": "nas",
            "mac_address": "11:22:33:44:55:66"
        }
    ]);

    Mock::given(method("GET"))
        .and(path("/api/devices"))
        .respond_with(ResponseTemplate::new(200).set_body_json(&body))
        .mount(&server)
        .await;

    let devices = client.list().await.unwrap();

    assert_eq!(devices.len(), 2);
    assert_eq!(devices[0].name, "printer-1");
    assert_eq!(devices[0].port, Some(9));
    // Optional fields absent on the wire deserialize to None
    assert_eq!(devices[1].ip_address, None);
    assert_eq!(devices[1].broadcast_ip, None);
    assert_eq!(devices[1].port, None);
}

#[tokio::test]
async fn test_list_empty() {
    let (server, client) = setup().await;

    Mock::given(method("GET"))
        .and(path("/api/devices"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .mount(&server)
        .await;

    let devices = client.list().await.unwrap();
    assert!(devices.is_empty());
}

#[tokio::test]
async fn test_create_device_sends_payload() {
    let (server, client) = setup().await;
    let device = sample_device();

    Mock::given(method("POST"))
        .and(path("/api/devices"))
        .and(body_json(&device))
        .respond_with(ResponseTemplate::new(200).set_body_json(&device))
        .expect(1)
        .mount(&server)
        .await;

    client.create(&device).await.unwrap();
}

#[tokio::test]
async fn test_wake_returns_server_message_verbatim() {
    let (server, client) = setup().await;

    Mock::given(method("POST"))
        .and(path("/api/wake/aa:bb:cc:dd:ee:ff"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "message": "Wake-on-LAN packet sent to printer-1"
        })))
        .mount(&server)
        .await;

    let receipt = client.wake("aa:bb:cc:dd:ee:ff").await.unwrap();
    assert_eq!(receipt.message, "Wake-on-LAN packet sent to printer-1");
}

#[tokio::test]
async fn test_wake_escapes_identifier() {
    let (server, client) = setup().await;

    // A name-keyed deployment may contain spaces; they must be
    // percent-escaped in the path.
    Mock::given(method("POST"))
        .and(path("/api/wake/office%20printer"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "message": "Wake-on-LAN packet sent to office printer"
        })))
        .expect(1)
        .mount(&server)
        .await;

    client.wake("office printer").await.unwrap();
}

#[tokio::test]
async fn test_remove_device() {
    let (server, client) = setup().await;

    Mock::given(method("DELETE"))
        .and(path("/api/devices/aa:bb:cc:dd:ee:ff"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "message": "Device deleted"
        })))
        .expect(1)
        .mount(&server)
        .await;

    client.remove("aa:bb:cc:dd:ee:ff").await.unwrap();
}

// ── Error tests ─────────────────────────────────────────────────────

#[tokio::test]
async fn test_create_400_extracts_detail() {
    let (server, client) = setup().await;

    Mock::given(method("POST"))
        .and(path("/api/devices"))
        .respond_with(
            ResponseTemplate::new(400).set_body_json(json!({ "detail": "MAC already exists" })),
        )
        .mount(&server)
        .await;

    let err = client.create(&sample_device()).await.unwrap_err();

    match err {
        Error::Api { status, ref detail } => {
            assert_eq!(status, 400);
            assert_eq!(detail.as_deref(), Some("MAC already exists"));
        }
        other => panic!("expected Api error, got: {other:?}"),
    }
    assert!(!err.is_transport());
}

#[tokio::test]
async fn test_error_without_body_has_no_detail() {
    let (server, client) = setup().await;

    Mock::given(method("POST"))
        .and(path("/api/wake/nas"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;

    let err = client.wake("nas").await.unwrap_err();

    match err {
        Error::Api { status, ref detail } => {
            assert_eq!(status, 500);
            assert!(detail.is_none());
        }
        other => panic!("expected Api error, got: {other:?}"),
    }
}

#[tokio::test]
async fn test_wake_404_not_found() {
    let (server, client) = setup().await;

    Mock::given(method("POST"))
        .and(path("/api/wake/ghost"))
        .respond_with(
            ResponseTemplate::new(404).set_body_json(json!({ "detail": "Device not found" })),
        )
        .mount(&server)
        .await;

    let err = client.wake("ghost").await.unwrap_err();

    assert!(err.is_not_found());
    assert_eq!(err.detail(), Some("Device not found"));
}

#[tokio::test]
async fn test_list_non_array_payload_is_failure() {
    let (server, client) = setup().await;

    Mock::given(method("GET"))
        .and(path("/api/devices"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "devices": [] })))
        .mount(&server)
        .await;

    let err = client.list().await.unwrap_err();

    assert!(
        matches!(err, Error::Deserialization { .. }),
        "expected Deserialization, got: {err:?}"
    );
    assert!(err.is_transport());
}
