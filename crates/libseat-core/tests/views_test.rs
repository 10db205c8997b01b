#![allow(clippy::unwrap_used)]
// Page view models against a mock backend.

use chrono::NaiveDate;
use secrecy::SecretString;
use serde_json::json;
use url::Url;
use wiremock::matchers::{body_json, header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

use libseat_api::models::{BookingStatus, EntityId};
use libseat_api::{
    ApiClient, BookingQuery, DEFAULT_API_BASE, NotificationQuery, PageParams, UserQuery,
};
use libseat_core::views::admin::UserAdmin;
use libseat_core::views::bookings::{BookingTab, MyBookings};
use libseat_core::views::dashboard::Dashboard;
use libseat_core::views::libraries::{AccessState, LibraryDirectory};
use libseat_core::views::notifications::NotificationCenter;
use libseat_core::{AppContext, AuthCredentials, CoreError, LoadStatus, ToastLevel};

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

fn page(count: u64, results: serde_json::Value) -> serde_json::Value {
    json!({ "count": count, "next": null, "previous": null, "results": results })
}

fn user_json(id: u64, username: &str, approved: bool) -> serde_json::Value {
    json!({ "id": id, "username": username, "role": "STUDENT", "is_approved": approved })
}

fn booking_json(id: u64, status: &str, date: &str) -> serde_json::Value {
    json!({
        "id": id,
        "seat": 12,
        "seat_number": "A-12",
        "booking_date": date,
        "start_time": "09:00:00",
        "end_time": "11:00:00",
        "status": status,
        "can_check_in": status == "CONFIRMED",
        "can_check_out": status == "CHECKED_IN",
    })
}

// ── Session ─────────────────────────────────────────────────────────

#[tokio::test]
async fn test_token_sign_in_publishes_session() {
    let server = MockServer::start().await;
    let root = Url::parse(&server.uri()).unwrap();
    let base = ApiClient::normalize_base_url(&root, DEFAULT_API_BASE).unwrap();
    let ctx = AppContext::from_client(ApiClient::with_client(reqwest::Client::new(), base), 20);

    Mock::given(method("GET"))
        .and(path(api("auth/me/")))
        .and(header("authorization", "Bearer stored"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "id": 3, "username": "grace", "role": "ADMIN"
        })))
        .mount(&server)
        .await;

    let auth = AuthCredentials::Token {
        access: SecretString::from("stored"),
        refresh: None,
    };
    let user = ctx.sign_in(&auth).await.unwrap().unwrap();
    assert_eq!(user.username, "grace");
    assert!(ctx.session().snapshot().is_admin());
}

#[tokio::test]
async fn test_rejected_token_leaves_client_signed_out() {
    let server = MockServer::start().await;
    let root = Url::parse(&server.uri()).unwrap();
    let base = ApiClient::normalize_base_url(&root, DEFAULT_API_BASE).unwrap();
    let ctx = AppContext::from_client(ApiClient::with_client(reqwest::Client::new(), base), 20);

    Mock::given(method("GET"))
        .and(path(api("auth/me/")))
        .respond_with(
            ResponseTemplate::new(401).set_body_json(json!({"detail": "Token is invalid"})),
        )
        .mount(&server)
        .await;

    let auth = AuthCredentials::Token {
        access: SecretString::from("expired"),
        refresh: None,
    };
    let err = ctx.sign_in(&auth).await.unwrap_err();
    assert!(matches!(err, CoreError::AuthenticationFailed { .. }));
    assert!(!ctx.client().has_token());
    assert!(!ctx.session().is_signed_in());
}

#[tokio::test]
async fn test_logout_clears_session_even_when_server_fails() {
    let (server, ctx) = setup().await;
    Mock::given(method("POST"))
        .and(path(api("auth/logout/")))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;

    ctx.logout().await;
    assert!(!ctx.client().has_token());
    assert!(!ctx.session().is_signed_in());
}

// ── Admin mutations ─────────────────────────────────────────────────

async fn loaded_user_admin(server: &MockServer, ctx: &AppContext) -> UserAdmin {
    Mock::given(method("GET"))
        .and(path(api("admin/users/")))
        .respond_with(ResponseTemplate::new(200).set_body_json(page(
            2,
            json!([user_json(1, "ada", false), user_json(2, "alan", false)]),
        )))
        .mount(server)
        .await;
    let admin = UserAdmin::new(ctx.clone());
    admin.load(&UserQuery::default()).await.unwrap();
    admin
}

#[tokio::test]
async fn test_approve_patches_row_from_server() {
    let (server, ctx) = setup().await;
    let admin = loaded_user_admin(&server, &ctx).await;
    Mock::given(method("POST"))
        .and(path(api("admin/users/1/approve/")))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "id": 1, "username": "ada", "role": "MEMBER", "is_approved": true
        })))
        .mount(&server)
        .await;

    let row = admin.approve(&id(1)).await.unwrap();
    assert!(row.is_approved);

    let rows = admin.listing().rows();
    assert_eq!(rows.len(), 2);
    assert_eq!(rows[0].username, "ada");
    assert!(rows[0].is_approved);
    // Server-side changes beyond the approval flag are picked up too.
    assert_eq!(rows[0].role.to_string(), "MEMBER");
    assert!(!rows[1].is_approved);
}

#[tokio::test]
async fn test_failed_delete_keeps_row_and_raises_toast() {
    let (server, ctx) = setup().await;
    let admin = loaded_user_admin(&server, &ctx).await;
    Mock::given(method("DELETE"))
        .and(path(api("admin/users/2/")))
        .respond_with(
            ResponseTemplate::new(403)
                .set_body_json(json!({"detail": "You cannot delete this user"})),
        )
        .mount(&server)
        .await;

    let err = admin.delete(&id(2)).await.unwrap_err();
    assert_eq!(err.status(), Some(403));
    assert_eq!(admin.listing().list().len(), 2);
    assert_eq!(admin.listing().list().count(), 2);

    let toast = ctx.ui().toasts().pop().unwrap();
    assert_eq!(toast.level, ToastLevel::Error);
    assert_eq!(toast.message, "You cannot delete this user");
}

#[tokio::test]
async fn test_delete_removes_row_after_acknowledgement() {
    let (server, ctx) = setup().await;
    let admin = loaded_user_admin(&server, &ctx).await;
    Mock::given(method("DELETE"))
        .and(path(api("admin/users/2/")))
        .respond_with(ResponseTemplate::new(204))
        .mount(&server)
        .await;

    admin.delete(&id(2)).await.unwrap();
    let rows = admin.listing().rows();
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0].username, "ada");
}

// ── Bookings ────────────────────────────────────────────────────────

#[tokio::test]
async fn test_failed_cancel_leaves_status_unchanged() {
    let (server, ctx) = setup().await;
    Mock::given(method("GET"))
        .and(path(api("seats/bookings/")))
        .respond_with(ResponseTemplate::new(200).set_body_json(page(
            1,
            json!([booking_json(7, "CONFIRMED", "2024-03-04")]),
        )))
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path(api("seats/bookings/7/cancel/")))
        .respond_with(ResponseTemplate::new(400).set_body_json(json!({
            "detail": "Bookings can only be cancelled before they start"
        })))
        .mount(&server)
        .await;

    let bookings = MyBookings::new(ctx.clone());
    bookings.load(&BookingQuery::default()).await.unwrap();
    assert!(bookings.cancel(&id(7)).await.is_err());

    let row = bookings.listing().list().get(&id(7)).unwrap();
    assert_eq!(row.status, BookingStatus::Confirmed);
    assert_eq!(ctx.ui().toasts().len(), 1);
}

#[tokio::test]
async fn test_cancel_moves_booking_between_tabs() {
    let (server, ctx) = setup().await;
    Mock::given(method("GET"))
        .and(path(api("seats/bookings/")))
        .respond_with(ResponseTemplate::new(200).set_body_json(page(
            2,
            json!([
                booking_json(7, "CONFIRMED", "2024-03-04"),
                booking_json(8, "CHECKED_IN", "2024-03-04"),
            ]),
        )))
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path(api("seats/bookings/7/cancel/")))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(booking_json(7, "CANCELLED", "2024-03-04")),
        )
        .mount(&server)
        .await;

    let today = NaiveDate::from_ymd_opt(2024, 3, 4).unwrap();
    let bookings = MyBookings::new(ctx);
    bookings.load(&BookingQuery::default()).await.unwrap();
    assert_eq!(bookings.tab(BookingTab::Upcoming, today).len(), 1);
    assert_eq!(bookings.tab(BookingTab::Active, today).len(), 1);

    bookings.cancel(&id(7)).await.unwrap();
    assert!(bookings.tab(BookingTab::Upcoming, today).is_empty());
    assert_eq!(bookings.tab(BookingTab::Cancelled, today).len(), 1);

    // Checked-in bookings are not cancellable; nothing is sent.
    let err = bookings.cancel(&id(8)).await.unwrap_err();
    assert!(err.is_validation());
}

#[tokio::test]
async fn test_load_failure_sets_failed_status() {
    let (server, ctx) = setup().await;
    Mock::given(method("GET"))
        .and(path(api("seats/bookings/")))
        .respond_with(ResponseTemplate::new(503).set_body_string("upstream down"))
        .mount(&server)
        .await;

    let bookings = MyBookings::new(ctx);
    assert!(bookings.load(&BookingQuery::default()).await.is_err());
    assert_eq!(
        bookings.listing().status(),
        LoadStatus::Failed("upstream down".into())
    );
}

#[tokio::test]
async fn test_page_count_uses_requested_page_size() {
    let (server, ctx) = setup().await;
    Mock::given(method("GET"))
        .and(path(api("seats/bookings/")))
        .and(query_param("page_size", "10"))
        .respond_with(ResponseTemplate::new(200).set_body_json(page(
            45,
            json!([booking_json(7, "CONFIRMED", "2024-03-04")]),
        )))
        .expect(1)
        .mount(&server)
        .await;

    let bookings = MyBookings::new(ctx);
    let query = BookingQuery {
        page: PageParams {
            page: Some(1),
            page_size: Some(10),
        },
        ..Default::default()
    };
    bookings.load(&query).await.unwrap();

    let list = bookings.listing().list();
    assert_eq!(list.page_size(), 10);
    assert_eq!(list.total_pages(), 5);
}

#[tokio::test]
async fn test_profile_page_size_is_sent_when_none_requested() {
    let server = MockServer::start().await;
    let root = Url::parse(&server.uri()).unwrap();
    let base = ApiClient::normalize_base_url(&root, DEFAULT_API_BASE).unwrap();
    let client = ApiClient::with_client(reqwest::Client::new(), base);
    client.set_token(SecretString::from("test-token"));
    let ctx = AppContext::from_client(client, 50);

    Mock::given(method("GET"))
        .and(path(api("seats/bookings/")))
        .and(query_param("page_size", "50"))
        .respond_with(ResponseTemplate::new(200).set_body_json(page(
            120,
            json!([booking_json(7, "CONFIRMED", "2024-03-04")]),
        )))
        .expect(1)
        .mount(&server)
        .await;

    let bookings = MyBookings::new(ctx);
    bookings.load(&BookingQuery::default()).await.unwrap();
    assert_eq!(bookings.listing().list().total_pages(), 3);
}

// ── Dashboard ───────────────────────────────────────────────────────

#[tokio::test]
async fn test_dashboard_panels_fail_independently() {
    let (server, ctx) = setup().await;
    Mock::given(method("GET"))
        .and(path(api("seats/bookings/")))
        .and(query_param("booking_date", "2024-01-15"))
        .and(query_param("status", "CONFIRMED,CHECKED_IN"))
        .respond_with(ResponseTemplate::new(200).set_body_json(page(
            1,
            json!([booking_json(7, "CONFIRMED", "2024-01-15")]),
        )))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path(api("notifications/unread_count/")))
        .respond_with(ResponseTemplate::new(500).set_body_json(json!({"detail": "oops"})))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path(api("subscriptions/current/")))
        .respond_with(ResponseTemplate::new(404).set_body_json(json!({"detail": "Not found."})))
        .mount(&server)
        .await;

    let data = Dashboard::new(ctx)
        .load(NaiveDate::from_ymd_opt(2024, 1, 15).unwrap())
        .await
        .unwrap();

    let cards = data.bookings.unwrap();
    assert_eq!(cards.len(), 1);
    assert!(cards[0].actions.can_check_in);
    assert!(cards[0].actions.can_cancel);
    assert!(!cards[0].actions.can_check_out);
    assert_eq!(data.unread_notifications, Err("oops".into()));
    assert_eq!(data.subscription, Ok(None));
}

// ── Libraries ───────────────────────────────────────────────────────

#[tokio::test]
async fn test_directory_joins_applications() {
    let (server, ctx) = setup().await;
    Mock::given(method("GET"))
        .and(path(api("libraries/")))
        .respond_with(ResponseTemplate::new(200).set_body_json(page(
            2,
            json!([{ "id": 1, "name": "Central" }, { "id": 2, "name": "Annex" }]),
        )))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path(api("libraries/applications/")))
        .respond_with(ResponseTemplate::new(200).set_body_json(page(
            1,
            json!([{ "id": 40, "library": 2, "status": "PENDING" }]),
        )))
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path(api("libraries/1/apply/")))
        .and(body_json(json!({ "reason": "Thesis research" })))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!({
            "id": 41, "library": 1, "library_name": "Central", "status": "PENDING"
        })))
        .expect(1)
        .mount(&server)
        .await;

    let directory = LibraryDirectory::new(ctx.clone());
    directory.load(&Default::default()).await.unwrap();
    assert_eq!(directory.access_state(&id(1)), AccessState::NotRequested);
    assert_eq!(directory.access_state(&id(2)), AccessState::Pending);

    directory.apply(&id(1), Some("Thesis research")).await.unwrap();
    assert_eq!(directory.access_state(&id(1)), AccessState::Pending);
    assert_eq!(
        ctx.ui().toasts().last().unwrap().message,
        "Application sent to Central"
    );

    // A second application for a pending library is refused locally.
    assert!(directory.apply(&id(2), None).await.unwrap_err().is_validation());
}

// ── Notifications ───────────────────────────────────────────────────

#[tokio::test]
async fn test_mark_all_read_refetches_list() {
    let (server, ctx) = setup().await;
    Mock::given(method("GET"))
        .and(path(api("notifications/")))
        .respond_with(ResponseTemplate::new(200).set_body_json(page(
            1,
            json!([{ "id": 1, "title": "Booking reminder", "is_read": false }]),
        )))
        .up_to_n_times(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path(api("notifications/")))
        .respond_with(ResponseTemplate::new(200).set_body_json(page(
            1,
            json!([{ "id": 1, "title": "Booking reminder", "is_read": true }]),
        )))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path(api("notifications/unread_count/")))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "count": 1 })))
        .up_to_n_times(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path(api("notifications/unread_count/")))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "count": 0 })))
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path(api("notifications/read_all/")))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "updated": 1 })))
        .expect(1)
        .mount(&server)
        .await;

    let center = NotificationCenter::new(ctx);
    center.load(&NotificationQuery::default()).await.unwrap();
    assert_eq!(center.unread(), 1);

    assert_eq!(center.mark_all_read().await.unwrap(), 1);
    assert_eq!(center.unread(), 0);
    assert!(center.listing().rows()[0].is_read);
}
