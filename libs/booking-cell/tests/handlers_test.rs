use assert_matches::assert_matches;
use axum::{
    extract::{Path, State},
    http::StatusCode,
    Extension, Json,
};
use chrono::{TimeZone, Utc};
use serde_json::json;
use uuid::Uuid;
use wiremock::matchers::{body_partial_json, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

use booking_cell::handlers;
use booking_cell::models::{CreateAppointmentRequest, UpdateStatusRequest};
use shared_models::error::AppError;
use shared_utils::test_utils::{MockStoreRows, TestConfig, TestUser};

fn create_request(specialist_id: Uuid) -> CreateAppointmentRequest {
    CreateAppointmentRequest {
        specialist_id: Some(specialist_id),
        requested_time: Some(Utc.with_ymd_and_hms(2025, 6, 1, 10, 0, 0).unwrap()),
        reason: Some("Feeling anxious".to_string()),
    }
}

#[tokio::test]
async fn test_booking_snapshots_specialist_price() {
    let mock_server = MockServer::start().await;
    let state = TestConfig::with_store_url(&mock_server.uri()).to_state();
    let user = TestUser::user("somsri");
    let specialist_id = Uuid::new_v4();
    let doctor_id = Uuid::new_v4();
    let appointment_id = Uuid::new_v4();

    Mock::given(method("GET"))
        .and(path("/specialists"))
        .and(query_param("id", format!("eq.{}", specialist_id)))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([{
            "id": specialist_id,
            "name": "Dr. Ananya",
            "title": "Psychiatrist",
            "user_id": doctor_id,
            "price": 1500
        }])))
        .mount(&mock_server)
        .await;

    Mock::given(method("POST"))
        .and(path("/appointments"))
        .and(body_partial_json(json!({
            "user_id": user.id,
            "amount": 1500,
            "status": "pending",
            "payment_status": "unpaid"
        })))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!([
            MockStoreRows::appointment_row(
                appointment_id, user.id, specialist_id, "pending", "unpaid", 1500,
            )
        ])))
        .expect(1)
        .mount(&mock_server)
        .await;

    Mock::given(method("POST"))
        .and(path("/notifications"))
        .and(body_partial_json(json!({ "user_id": doctor_id })))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!([
            MockStoreRows::notification_row(Uuid::new_v4(), doctor_id, "New request")
        ])))
        .expect(1)
        .mount(&mock_server)
        .await;

    let (status, Json(body)) = handlers::book_appointment(
        State(state),
        Extension(user.to_auth_user()),
        Json(create_request(specialist_id)),
    )
    .await
    .expect("booking should succeed");

    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["data"]["amount"], 1500);
    assert_eq!(body["data"]["specialist"]["name"], "Dr. Ananya");
}

#[tokio::test]
async fn test_booking_requires_specialist_and_time() {
    let mock_server = MockServer::start().await;
    let state = TestConfig::with_store_url(&mock_server.uri()).to_state();
    let user = TestUser::user("somsri");

    let err = handlers::book_appointment(
        State(state),
        Extension(user.to_auth_user()),
        Json(CreateAppointmentRequest {
            specialist_id: None,
            requested_time: None,
            reason: None,
        }),
    )
    .await
    .unwrap_err();

    assert_matches!(err, AppError::BadRequest(_));
}

#[tokio::test]
async fn test_booking_unknown_specialist_not_found() {
    let mock_server = MockServer::start().await;
    let state = TestConfig::with_store_url(&mock_server.uri()).to_state();
    let user = TestUser::user("somsri");

    Mock::given(method("GET"))
        .and(path("/specialists"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .mount(&mock_server)
        .await;

    let err = handlers::book_appointment(
        State(state),
        Extension(user.to_auth_user()),
        Json(create_request(Uuid::new_v4())),
    )
    .await
    .unwrap_err();

    assert_matches!(err, AppError::NotFound(msg) if msg == "Specialist not found");
}

#[tokio::test]
async fn test_booking_survives_notification_failure() {
    let mock_server = MockServer::start().await;
    let state = TestConfig::with_store_url(&mock_server.uri()).to_state();
    let user = TestUser::user("somsri");
    let specialist_id = Uuid::new_v4();

    Mock::given(method("GET"))
        .and(path("/specialists"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([{
            "id": specialist_id,
            "name": "Dr. Ananya",
            "title": "Psychiatrist",
            "user_id": Uuid::new_v4(),
            "price": 1000
        }])))
        .mount(&mock_server)
        .await;

    Mock::given(method("POST"))
        .and(path("/appointments"))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!([
            MockStoreRows::appointment_row(
                Uuid::new_v4(), user.id, specialist_id, "pending", "unpaid", 1000,
            )
        ])))
        .mount(&mock_server)
        .await;

    // Inbox write blows up; the booking must still come back 201.
    Mock::given(method("POST"))
        .and(path("/notifications"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&mock_server)
        .await;

    let result = handlers::book_appointment(
        State(state),
        Extension(user.to_auth_user()),
        Json(create_request(specialist_id)),
    )
    .await;

    assert!(result.is_ok());
}

#[tokio::test]
async fn test_admin_cannot_reopen_cancelled_appointment() {
    let mock_server = MockServer::start().await;
    let state = TestConfig::with_store_url(&mock_server.uri()).to_state();
    let appointment_id = Uuid::new_v4();

    Mock::given(method("GET"))
        .and(path("/appointments"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            MockStoreRows::appointment_row(
                appointment_id, Uuid::new_v4(), Uuid::new_v4(), "cancelled", "unpaid", 1000,
            )
        ])))
        .mount(&mock_server)
        .await;

    let err = handlers::update_status_admin(
        State(state),
        Path(appointment_id),
        Json(UpdateStatusRequest {
            status: "confirmed".to_string(),
        }),
    )
    .await
    .unwrap_err();

    assert_matches!(err, AppError::BadRequest(msg) if msg.contains("cancelled"));
}

#[tokio::test]
async fn test_admin_confirm_notifies_linked_doctor() {
    let mock_server = MockServer::start().await;
    let state = TestConfig::with_store_url(&mock_server.uri()).to_state();
    let appointment_id = Uuid::new_v4();
    let specialist_id = Uuid::new_v4();
    let doctor_id = Uuid::new_v4();

    Mock::given(method("GET"))
        .and(path("/appointments"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            MockStoreRows::appointment_row(
                appointment_id, Uuid::new_v4(), specialist_id, "pending", "unpaid", 1000,
            )
        ])))
        .mount(&mock_server)
        .await;

    Mock::given(method("PATCH"))
        .and(path("/appointments"))
        .and(body_partial_json(json!({ "status": "confirmed" })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            MockStoreRows::appointment_row(
                appointment_id, Uuid::new_v4(), specialist_id, "confirmed", "unpaid", 1000,
            )
        ])))
        .expect(1)
        .mount(&mock_server)
        .await;

    Mock::given(method("GET"))
        .and(path("/specialists"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([{
            "id": specialist_id,
            "name": "Dr. Ananya",
            "title": "Psychiatrist",
            "user_id": doctor_id,
            "price": 1000
        }])))
        .mount(&mock_server)
        .await;

    Mock::given(method("POST"))
        .and(path("/notifications"))
        .and(body_partial_json(json!({ "user_id": doctor_id })))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!([
            MockStoreRows::notification_row(Uuid::new_v4(), doctor_id, "confirmed")
        ])))
        .expect(1)
        .mount(&mock_server)
        .await;

    let Json(body) = handlers::update_status_admin(
        State(state),
        Path(appointment_id),
        Json(UpdateStatusRequest {
            status: "confirmed".to_string(),
        }),
    )
    .await
    .expect("transition should succeed");

    assert_eq!(body["data"]["status"], "confirmed");
}

#[tokio::test]
async fn test_doctor_cannot_touch_foreign_appointment() {
    let mock_server = MockServer::start().await;
    let state = TestConfig::with_store_url(&mock_server.uri()).to_state();
    let doctor = TestUser::doctor("dr_ananya");
    let own_specialist_id = Uuid::new_v4();
    let appointment_id = Uuid::new_v4();

    Mock::given(method("GET"))
        .and(path("/specialists"))
        .and(query_param("user_id", format!("eq.{}", doctor.id)))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([{
            "id": own_specialist_id,
            "name": "Dr. Ananya",
            "title": "Psychiatrist",
            "user_id": doctor.id,
            "price": 1000
        }])))
        .mount(&mock_server)
        .await;

    // The appointment belongs to a different specialist.
    Mock::given(method("GET"))
        .and(path("/appointments"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            MockStoreRows::appointment_row(
                appointment_id, Uuid::new_v4(), Uuid::new_v4(), "pending", "unpaid", 1000,
            )
        ])))
        .mount(&mock_server)
        .await;

    let err = handlers::update_status_doctor(
        State(state),
        Extension(doctor.to_auth_user()),
        Path(appointment_id),
        Json(UpdateStatusRequest {
            status: "confirmed".to_string(),
        }),
    )
    .await
    .unwrap_err();

    assert_matches!(err, AppError::Forbidden(_));
}

#[tokio::test]
async fn test_doctor_queue_requires_linked_profile() {
    let mock_server = MockServer::start().await;
    let state = TestConfig::with_store_url(&mock_server.uri()).to_state();
    let doctor = TestUser::doctor("dr_unlinked");

    Mock::given(method("GET"))
        .and(path("/specialists"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .mount(&mock_server)
        .await;

    let err = handlers::my_doctor_appointments(State(state), Extension(doctor.to_auth_user()))
        .await
        .unwrap_err();

    assert_matches!(err, AppError::NotFound(_));
}

#[tokio::test]
async fn test_my_appointments_joins_specialist() {
    let mock_server = MockServer::start().await;
    let state = TestConfig::with_store_url(&mock_server.uri()).to_state();
    let user = TestUser::user("somsri");
    let appointment_id = Uuid::new_v4();
    let specialist_id = Uuid::new_v4();

    let mut row =
        MockStoreRows::appointment_row(appointment_id, user.id, specialist_id, "confirmed", "paid", 1200);
    row["specialist"] = json!({ "name": "Dr. Ananya", "title": "Psychiatrist" });

    Mock::given(method("GET"))
        .and(path("/appointments"))
        .and(query_param("user_id", format!("eq.{}", user.id)))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([row])))
        .mount(&mock_server)
        .await;

    let Json(body) = handlers::my_appointments(State(state), Extension(user.to_auth_user()))
        .await
        .expect("listing should succeed");

    assert_eq!(body["data"][0]["specialist"]["title"], "Psychiatrist");
    assert_eq!(body["data"][0]["payment_status"], "paid");
}
