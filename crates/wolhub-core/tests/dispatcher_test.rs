// Integration tests for the dispatcher against a wiremock server.
//
// These cover the orchestrator's behavioral contracts: single-flight
// mutual exclusion, wholesale snapshot replacement, verbatim server
// messages, and guaranteed guard release on every path.
#![allow(clippy::unwrap_used)]

use std::time::Duration;

use pretty_assertions::assert_eq;
use serde_json::json;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use wolhub_api::WolClient;
use wolhub_core::{Device, DeviceForm, Dispatch, Dispatcher, Feedback, IdentityKey, ListView, NotificationLevel};

// ── Helpers ─────────────────────────────────────────────────────────

async fn setup() -> (MockServer, Dispatcher) {
    let server = MockServer::start().await;
    let client = WolClient::from_reqwest(&server.uri(), reqwest::Client::new()).unwrap();
    (server, Dispatcher::from_client(client, IdentityKey::MacAddress))
}

fn printer() -> Device {
    Device {
        name: "printer-1".into(),
        mac_address: "aa:bb:cc:dd:ee:ff".into(),
        ip_address: Some("192.168.1.50".into()),
        broadcast_ip: Some("255.255.255.255".into()),
        port: Some(9),
    }
}

fn printer_form() -> DeviceForm {
    DeviceForm {
        name: "printer-1".into(),
        mac_address: "aa:bb:cc:dd:ee:ff".into(),
        ip_address: "192.168.1.50".into(),
        broadcast_ip: String::new(),
        port: String::new(),
    }
}

/// Drain all feedback events queued so far.
fn drain(rx: &mut tokio::sync::broadcast::Receiver<Feedback>) -> Vec<Feedback> {
    let mut events = Vec::new();
    while let Ok(ev) = rx.try_recv() {
        events.push(ev);
    }
    events
}

/// Pull the notification messages (with levels) out of an event list.
fn notifications(events: &[Feedback]) -> Vec<(NotificationLevel, String)> {
    events
        .iter()
        .filter_map(|ev| match ev {
            Feedback::Notify(n) => Some((n.level, n.message.clone())),
            _ => None,
        })
        .collect()
}

// ── Wake ────────────────────────────────────────────────────────────

#[tokio::test]
async fn wake_success_surfaces_server_message_verbatim() {
    let (server, dispatcher) = setup().await;
    let mut fb = dispatcher.feedback();

    Mock::given(method("POST"))
        .and(path("/api/wake/printer-1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "message": "Magic packet sent to printer-1"
        })))
        .mount(&server)
        .await;

    let outcome = dispatcher.wake("printer-1").await;

    assert!(outcome.succeeded());
    assert!(!dispatcher.is_busy(), "guard must be released");

    let notes = notifications(&drain(&mut fb));
    assert_eq!(
        notes,
        vec![(
            NotificationLevel::Success,
            "Magic packet sent to printer-1".to_owned()
        )]
    );
}

#[tokio::test]
async fn wake_failure_uses_detail_then_fallback() {
    let (server, dispatcher) = setup().await;
    let mut fb = dispatcher.feedback();

    // First: structured detail. Second: bare 500.
    let scoped = Mock::given(method("POST"))
        .and(path("/api/wake/nas"))
        .respond_with(
            ResponseTemplate::new(404).set_body_json(json!({ "detail": "Device not found" })),
        )
        .mount_as_scoped(&server)
        .await;

    assert!(!dispatcher.wake("nas").await.succeeded());
    drop(scoped);

    Mock::given(method("POST"))
        .and(path("/api/wake/nas"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;

    assert!(!dispatcher.wake("nas").await.succeeded());
    assert!(!dispatcher.is_busy());

    let notes = notifications(&drain(&mut fb));
    assert_eq!(
        notes,
        vec![
            (NotificationLevel::Error, "Device not found".to_owned()),
            (NotificationLevel::Error, "Failed to wake device".to_owned()),
        ]
    );
}

// ── Add ─────────────────────────────────────────────────────────────

#[tokio::test]
async fn add_success_clears_form_and_refreshes_list() {
    let (server, dispatcher) = setup().await;
    let mut fb = dispatcher.feedback();
    let mut view = dispatcher.list_view();

    Mock::given(method("POST"))
        .and(path("/api/devices"))
        .respond_with(ResponseTemplate::new(200).set_body_json(printer()))
        .expect(1)
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path("/api/devices"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([printer()])))
        .expect(1)
        .mount(&server)
        .await;

    let outcome = dispatcher.submit_add(printer_form()).await;

    assert!(outcome.succeeded());
    assert!(!dispatcher.is_busy());
    assert_eq!(
        *view.borrow_and_update(),
        ListView::Loaded(vec![printer()]),
        "snapshot is replaced wholesale with the server's list"
    );

    let events = drain(&mut fb);
    assert!(
        events.iter().any(|ev| matches!(ev, Feedback::ClearForm)),
        "a successful add resets the input form"
    );
    let notes = notifications(&events);
    assert_eq!(
        notes,
        vec![(
            NotificationLevel::Success,
            "Device added successfully!".to_owned()
        )]
    );
}

#[tokio::test]
async fn add_conflict_keeps_form_and_shows_detail() {
    let (server, dispatcher) = setup().await;
    let mut fb = dispatcher.feedback();

    Mock::given(method("POST"))
        .and(path("/api/devices"))
        .respond_with(
            ResponseTemplate::new(400).set_body_json(json!({ "detail": "MAC already exists" })),
        )
        .mount(&server)
        .await;

    // No GET mock mounted: a failed add must not trigger a refresh.
    let outcome = dispatcher.submit_add(printer_form()).await;

    assert_eq!(outcome, Dispatch::Completed { ok: false });
    assert!(!dispatcher.is_busy(), "guard must be released on failure");

    let events = drain(&mut fb);
    assert!(
        !events.iter().any(|ev| matches!(ev, Feedback::ClearForm)),
        "the form is not reset on failure"
    );
    let notes = notifications(&events);
    assert_eq!(
        notes,
        vec![(NotificationLevel::Error, "MAC already exists".to_owned())]
    );
}

// ── Refresh ─────────────────────────────────────────────────────────

#[tokio::test]
async fn refresh_empty_set_loads_empty_snapshot() {
    let (server, dispatcher) = setup().await;
    let mut view = dispatcher.list_view();

    Mock::given(method("GET"))
        .and(path("/api/devices"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .mount(&server)
        .await;

    assert!(dispatcher.refresh().await.succeeded());
    assert_eq!(*view.borrow_and_update(), ListView::Loaded(Vec::new()));
}

#[tokio::test]
async fn refresh_is_idempotent_for_an_unchanged_server_set() {
    let (server, dispatcher) = setup().await;
    let mut view = dispatcher.list_view();

    Mock::given(method("GET"))
        .and(path("/api/devices"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([printer()])))
        .expect(2)
        .mount(&server)
        .await;

    assert!(dispatcher.refresh().await.succeeded());
    let first = view.borrow_and_update().clone();

    assert!(dispatcher.refresh().await.succeeded());
    let second = view.borrow_and_update().clone();

    assert_eq!(first, second, "two refreshes yield identical snapshots");
}

#[tokio::test]
async fn refresh_failure_publishes_inline_error_state() {
    let (server, dispatcher) = setup().await;
    let mut view = dispatcher.list_view();

    let scoped = Mock::given(method("GET"))
        .and(path("/api/devices"))
        .respond_with(ResponseTemplate::new(500))
        .mount_as_scoped(&server)
        .await;

    assert!(!dispatcher.refresh().await.succeeded());
    assert_eq!(
        *view.borrow_and_update(),
        ListView::Failed("Failed to fetch devices".into()),
        "failure is a persistent inline state, not a toast"
    );
    assert!(!dispatcher.is_busy());
    drop(scoped);

    // The error state persists until the next successful refresh.
    Mock::given(method("GET"))
        .and(path("/api/devices"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .mount(&server)
        .await;

    assert!(dispatcher.refresh().await.succeeded());
    assert_eq!(*view.borrow_and_update(), ListView::Loaded(Vec::new()));
}

// ── Single-flight guard ─────────────────────────────────────────────

#[tokio::test]
async fn second_refresh_while_in_flight_is_a_no_op() {
    let (server, dispatcher) = setup().await;

    Mock::given(method("GET"))
        .and(path("/api/devices"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!([]))
                .set_delay(Duration::from_millis(250)),
        )
        .expect(1)
        .mount(&server)
        .await;

    let first = {
        let d = dispatcher.clone();
        tokio::spawn(async move { d.refresh().await })
    };

    // Give the first refresh time to acquire the guard and block on
    // the delayed response.
    tokio::time::sleep(Duration::from_millis(50)).await;
    assert!(dispatcher.is_busy());

    let second = dispatcher.refresh().await;
    assert_eq!(second, Dispatch::Dropped, "no second network call");

    assert!(first.await.unwrap().succeeded());
    assert!(!dispatcher.is_busy());
    // The expect(1) on the mock verifies exactly one GET was observed.
}

#[tokio::test]
async fn any_intent_while_busy_is_dropped_not_queued() {
    let (server, dispatcher) = setup().await;

    Mock::given(method("GET"))
        .and(path("/api/devices"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!([]))
                .set_delay(Duration::from_millis(250)),
        )
        .expect(1)
        .mount(&server)
        .await;

    Mock::given(method("POST"))
        .and(path("/api/wake/printer-1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "message": "sent" })))
        .expect(0)
        .mount(&server)
        .await;

    let refresh = {
        let d = dispatcher.clone();
        tokio::spawn(async move { d.refresh().await })
    };
    tokio::time::sleep(Duration::from_millis(50)).await;

    assert!(dispatcher.wake("printer-1").await.was_dropped());
    assert!(dispatcher.submit_add(printer_form()).await.was_dropped());
    assert!(dispatcher.remove("aa:bb:cc:dd:ee:ff").await.was_dropped());

    assert!(refresh.await.unwrap().succeeded());

    // Dropped intents stay dropped: the guard is free now, but nothing
    // was queued to run.
    assert!(!dispatcher.is_busy());
}

// ── Delete round-trip ───────────────────────────────────────────────

#[tokio::test]
async fn deleted_device_does_not_reappear_after_refresh() {
    let (server, dispatcher) = setup().await;
    let mut view = dispatcher.list_view();

    // Phase 1: the device is registered.
    let phase1 = Mock::given(method("GET"))
        .and(path("/api/devices"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([printer()])))
        .mount_as_scoped(&server)
        .await;

    assert!(dispatcher.refresh().await.succeeded());
    assert_eq!(*view.borrow_and_update(), ListView::Loaded(vec![printer()]));
    drop(phase1);

    // Phase 2: delete succeeds and the follow-up refresh excludes it.
    Mock::given(method("DELETE"))
        .and(path("/api/devices/aa:bb:cc:dd:ee:ff"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "message": "Device deleted" })))
        .expect(1)
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path("/api/devices"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .expect(1)
        .mount(&server)
        .await;

    assert!(dispatcher.remove("aa:bb:cc:dd:ee:ff").await.succeeded());
    assert_eq!(*view.borrow_and_update(), ListView::Loaded(Vec::new()));
    assert!(!dispatcher.is_busy());
}
