#![allow(clippy::unwrap_used)]
// Workflow drivers against a mock backend.

use std::sync::Arc;
use std::time::Duration;

use chrono::{NaiveDate, NaiveTime};
use secrecy::SecretString;
use serde_json::json;
use url::Url;
use wiremock::matchers::{body_json, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

use libseat_api::models::EntityId;
use libseat_api::{ApiClient, DEFAULT_API_BASE};
use libseat_core::{
    AppContext, Applied, BookingStep, CoreError, EventRegistrationSession, Level,
    RegistrationStep, SeatBookingSession, ToastLevel,
};

// ── Helpers ─────────────────────────────────────────────────────────

async fn setup() -> (MockServer, AppContext) {
    let server = MockServer::start().await;
    let root = Url::parse(&server.uri()).unwrap();
    let base = ApiClient::normalize_base_url(&root, DEFAULT_API_BASE).unwrap();
    let client = ApiClient::with_client(reqwest::Client::new(), base);
    client.set_token(SecretString::from("test-token"));
    (server, AppContext::from_client(client, 20))
}

fn api(suffix: &str) -> String {
    format!("/api/v1/{suffix}")
}

fn id(n: u64) -> EntityId {
    EntityId::from(n)
}

fn hm(h: u32, m: u32) -> NaiveTime {
    NaiveTime::from_hms_opt(h, m, 0).unwrap()
}

fn date() -> NaiveDate {
    NaiveDate::from_ymd_opt(2024, 3, 4).unwrap()
}

fn page(results: serde_json::Value) -> serde_json::Value {
    let count = results.as_array().map_or(0, Vec::len);
    json!({ "count": count, "next": null, "previous": null, "results": results })
}

/// Mount the whole resource cascade for library 1 and library 2.
async fn mount_cascade(server: &MockServer) {
    Mock::given(method("GET"))
        .and(path(api("libraries/")))
        .and(query_param("is_active", "true"))
        .respond_with(ResponseTemplate::new(200).set_body_json(page(json!([
            { "id": 1, "name": "Central" },
            { "id": 2, "name": "Annex" },
        ]))))
        .mount(server)
        .await;

    for library in [1_u64, 2] {
        Mock::given(method("GET"))
            .and(path(api(&format!("libraries/{library}/floors/"))))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!([
                { "id": library * 10 + 1, "library": library, "number": 1 },
            ])))
            .mount(server)
            .await;
    }

    Mock::given(method("GET"))
        .and(path(api("libraries/floors/11/sections/")))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            { "id": 111, "floor": 11, "name": "Quiet zone" },
        ])))
        .mount(server)
        .await;

    Mock::given(method("GET"))
        .and(path(api("libraries/sections/111/seats/")))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            { "id": 1111, "section": 111, "seat_number": "Q-1", "status": "AVAILABLE" },
        ])))
        .mount(server)
        .await;

    Mock::given(method("GET"))
        .and(path(api("seats/1111/availability/")))
        .and(query_param("date", "2024-03-04"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            { "start_time": "09:00:00", "end_time": "12:00:00", "is_available": true },
            { "start_time": "13:00:00", "end_time": "17:00:00", "is_available": false },
        ])))
        .mount(server)
        .await;
}

async fn select_through_seat(session: &SeatBookingSession) {
    session.start().await.unwrap();
    session.select_library(&id(1)).await.unwrap();
    session.select_floor(&id(11)).await.unwrap();
    session.select_section(&id(111)).await.unwrap();
    session.select_seat(&id(1111)).await.unwrap();
    session.select_date(date()).await.unwrap();
}

fn booking_response() -> serde_json::Value {
    json!({
        "id": 900,
        "seat": 1111,
        "seat_number": "Q-1",
        "booking_date": "2024-03-04",
        "start_time": "09:00:00",
        "end_time": "11:00:00",
        "status": "CONFIRMED",
        "can_check_in": false,
    })
}

// ── Cascade ─────────────────────────────────────────────────────────

#[tokio::test]
async fn test_cascade_loads_each_level() {
    let (server, ctx) = setup().await;
    mount_cascade(&server).await;
    let session = SeatBookingSession::new(ctx);

    select_through_seat(&session).await;

    let flow = session.snapshot();
    assert_eq!(flow.step(), BookingStep::SelectingTime);
    assert_eq!(flow.libraries().len(), 2);
    assert_eq!(flow.floors().len(), 1);
    assert_eq!(flow.seats()[0].seat_number, "Q-1");
    assert_eq!(flow.slots().len(), 2);
    assert!(!flow.slots()[1].is_available);
}

#[tokio::test]
async fn test_superseded_library_response_is_discarded() {
    let (server, ctx) = setup().await;
    mount_cascade(&server).await;

    // Library 3's floors are slow; library 2 is chosen before they arrive.
    Mock::given(method("GET"))
        .and(path(api("libraries/3/floors/")))
        .respond_with(
            ResponseTemplate::new(200)
                .set_delay(Duration::from_millis(300))
                .set_body_json(json!([{ "id": 31, "library": 3, "number": 1 }])),
        )
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path(api("libraries/")))
        .respond_with(ResponseTemplate::new(200).set_body_json(page(json!([
            { "id": 2, "name": "Annex" },
            { "id": 3, "name": "Archive" },
        ]))))
        .with_priority(1)
        .mount(&server)
        .await;

    let session = SeatBookingSession::new(ctx);
    session.start().await.unwrap();

    let slow_id = id(3);
    let (slow, fast) = tokio::join!(session.select_library(&slow_id), async {
        tokio::time::sleep(Duration::from_millis(50)).await;
        session.select_library(&id(2)).await
    });

    assert_eq!(slow.unwrap(), Applied::Stale);
    assert_eq!(fast.unwrap(), Applied::Fresh);
    let flow = session.snapshot();
    assert_eq!(flow.selection().library, Some(id(2)));
    assert_eq!(flow.floors().len(), 1);
    assert_eq!(flow.floors()[0].library, id(2));
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_concurrent_selections_never_strand_a_level() {
    let (server, ctx) = setup().await;
    mount_cascade(&server).await;
    for library in [1_u64, 2] {
        Mock::given(method("GET"))
            .and(path(api(&format!("libraries/{library}/floors/"))))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_delay(Duration::from_millis(15))
                    .set_body_json(json!([
                        { "id": library * 10 + 1, "library": library, "number": 1 },
                    ])),
            )
            .with_priority(1)
            .mount(&server)
            .await;
    }

    let session = Arc::new(SeatBookingSession::new(ctx));
    session.start().await.unwrap();

    let tasks: Vec<_> = (0..16_u64)
        .map(|n| {
            let session = Arc::clone(&session);
            tokio::spawn(async move { session.select_library(&id(n % 2 + 1)).await })
        })
        .collect();
    let mut fresh = 0;
    for task in tasks {
        if task.await.unwrap().unwrap() == Applied::Fresh {
            fresh += 1;
        }
    }

    // The last ticket issued always owns a live token, so its fetch lands
    // and the level settles.
    assert!(fresh >= 1);
    let flow = session.snapshot();
    assert!(!flow.is_loading(Level::Floors));
    assert_eq!(flow.floors().len(), 1);
    assert_eq!(Some(flow.floors()[0].library.clone()), flow.selection().library);
}

#[tokio::test]
async fn test_failed_fetch_reports_error() {
    let (server, ctx) = setup().await;
    mount_cascade(&server).await;
    Mock::given(method("GET"))
        .and(path(api("libraries/2/floors/")))
        .respond_with(ResponseTemplate::new(500).set_body_json(json!({"detail": "boom"})))
        .with_priority(1)
        .mount(&server)
        .await;

    let session = SeatBookingSession::new(ctx);
    session.start().await.unwrap();
    let err = session.select_library(&id(2)).await.unwrap_err();

    assert!(matches!(err, CoreError::Api { status: Some(500), .. }));
    assert_eq!(session.snapshot().error(), Some("boom"));
}

// ── Submission ──────────────────────────────────────────────────────

#[tokio::test]
async fn test_missing_time_sends_no_request() {
    let (server, ctx) = setup().await;
    mount_cascade(&server).await;
    Mock::given(method("POST"))
        .and(path(api("seats/bookings/")))
        .respond_with(ResponseTemplate::new(201).set_body_json(booking_response()))
        .expect(0)
        .mount(&server)
        .await;

    let session = SeatBookingSession::new(ctx);
    select_through_seat(&session).await;
    session.set_times(None, Some(hm(11, 0))).unwrap();
    session.review().unwrap();

    let err = session.submit().await.unwrap_err();
    assert!(err.is_validation());
    assert_eq!(session.step(), BookingStep::Confirming);
}

#[tokio::test]
async fn test_submit_creates_booking() {
    let (server, ctx) = setup().await;
    mount_cascade(&server).await;
    Mock::given(method("POST"))
        .and(path(api("seats/bookings/")))
        .and(body_json(json!({
            "seat": "1111",
            "booking_date": "2024-03-04",
            "start_time": "09:00",
            "end_time": "11:00",
        })))
        .respond_with(ResponseTemplate::new(201).set_body_json(booking_response()))
        .expect(1)
        .mount(&server)
        .await;

    let session = SeatBookingSession::new(ctx.clone());
    select_through_seat(&session).await;
    session.set_times(Some(hm(9, 0)), Some(hm(11, 0))).unwrap();
    session.review().unwrap();

    let booking = session.submit().await.unwrap();
    assert_eq!(booking.id, id(900));
    assert_eq!(session.step(), BookingStep::Success);
    let toasts = ctx.ui().toasts();
    assert_eq!(toasts.last().unwrap().level, ToastLevel::Success);
}

#[tokio::test]
async fn test_rejected_submit_can_be_retried() {
    let (server, ctx) = setup().await;
    mount_cascade(&server).await;
    Mock::given(method("POST"))
        .and(path(api("seats/bookings/")))
        .respond_with(ResponseTemplate::new(400).set_body_json(json!({
            "non_field_errors": ["This seat is already booked for the selected time."]
        })))
        .up_to_n_times(1)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path(api("seats/bookings/")))
        .respond_with(ResponseTemplate::new(201).set_body_json(booking_response()))
        .mount(&server)
        .await;

    let session = SeatBookingSession::new(ctx.clone());
    select_through_seat(&session).await;
    let slot = session.snapshot().slots()[0].clone();
    session.select_slot(&slot).unwrap();
    session.review().unwrap();

    let err = session.submit().await.unwrap_err();
    assert_eq!(
        err.user_message(),
        "This seat is already booked for the selected time."
    );
    let flow = session.snapshot();
    assert_eq!(flow.step(), BookingStep::Error);
    assert!(flow.summary().is_some());
    assert_eq!(ctx.ui().toasts().last().unwrap().level, ToastLevel::Error);

    session.submit().await.unwrap();
    assert_eq!(session.step(), BookingStep::Success);
}

// ── Event registration ──────────────────────────────────────────────

#[tokio::test]
async fn test_event_registration_flow() {
    let (server, ctx) = setup().await;
    Mock::given(method("GET"))
        .and(path(api("events/")))
        .and(query_param("upcoming", "true"))
        .respond_with(ResponseTemplate::new(200).set_body_json(page(json!([
            {
                "id": 5,
                "title": "Rust reading group",
                "start_datetime": "2024-03-04T17:00:00Z",
                "capacity": 20,
                "registered_count": 4,
                "is_registration_open": true,
            },
        ]))))
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path(api("events/registrations/")))
        .and(body_json(json!({ "event": "5" })))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!({
            "id": 70,
            "event": 5,
            "event_title": "Rust reading group",
            "status": "REGISTERED",
        })))
        .expect(1)
        .mount(&server)
        .await;

    let session = EventRegistrationSession::new(ctx);
    session.start(None).await.unwrap();
    assert_eq!(session.snapshot().events()[0].spots_left(), Some(16));

    session.select_event(&id(5)).unwrap();
    let registration = session.submit().await.unwrap();
    assert_eq!(registration.id, id(70));
    assert_eq!(session.step(), RegistrationStep::Success);
}
