use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use assert_matches::assert_matches;
use serde_json::json;
use uuid::Uuid;
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

use auth_cell::handlers;
use auth_cell::models::{LoginRequest, RegisterRequest, UpdateRoleRequest};
use auth_cell::services::password;
use shared_models::auth::Role;
use shared_models::error::AppError;
use shared_utils::test_utils::{MockStoreRows, TestConfig};
use shared_utils::jwt;

#[tokio::test]
async fn test_register_success() {
    let mock_server = MockServer::start().await;
    let state = TestConfig::with_store_url(&mock_server.uri()).to_state();
    let user_id = Uuid::new_v4();

    Mock::given(method("POST"))
        .and(path("/users"))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!([
            MockStoreRows::user_row(user_id, "alice", "$argon2id$stub", "user")
        ])))
        .expect(1)
        .mount(&mock_server)
        .await;

    let result = handlers::register(
        State(state),
        Json(RegisterRequest {
            username: "alice".to_string(),
            password: "correct-horse".to_string(),
        }),
    )
    .await;

    let (status, Json(body)) = result.expect("register should succeed");
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["message"], "User registered successfully");
    assert_eq!(body["user_id"], json!(user_id));
}

#[tokio::test]
async fn test_register_duplicate_username_conflict() {
    let mock_server = MockServer::start().await;
    let state = TestConfig::with_store_url(&mock_server.uri()).to_state();

    Mock::given(method("POST"))
        .and(path("/users"))
        .respond_with(ResponseTemplate::new(409).set_body_json(json!({
            "message": "duplicate key value violates unique constraint"
        })))
        .mount(&mock_server)
        .await;

    let result = handlers::register(
        State(state),
        Json(RegisterRequest {
            username: "alice".to_string(),
            password: "correct-horse".to_string(),
        }),
    )
    .await;

    assert_matches!(result.unwrap_err(), AppError::Conflict(_));
}

#[tokio::test]
async fn test_register_rejects_empty_fields() {
    let mock_server = MockServer::start().await;
    let state = TestConfig::with_store_url(&mock_server.uri()).to_state();

    let result = handlers::register(
        State(state),
        Json(RegisterRequest {
            username: "  ".to_string(),
            password: "pw".to_string(),
        }),
    )
    .await;

    assert_matches!(result.unwrap_err(), AppError::BadRequest(_));
}

#[tokio::test]
async fn test_login_success_issues_valid_token() {
    let mock_server = MockServer::start().await;
    let config = TestConfig::with_store_url(&mock_server.uri());
    let state = config.to_state();
    let user_id = Uuid::new_v4();
    let hash = password::hash_password("correct-horse").unwrap();

    Mock::given(method("GET"))
        .and(path("/users"))
        .and(query_param("username", "eq.alice"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            MockStoreRows::user_row(user_id, "alice", &hash, "doctor")
        ])))
        .mount(&mock_server)
        .await;

    let Json(body) = handlers::login(
        State(state),
        Json(LoginRequest {
            username: "alice".to_string(),
            password: "correct-horse".to_string(),
        }),
    )
    .await
    .expect("login should succeed");

    assert_eq!(body["message"], "Login successful");
    assert_eq!(body["role"], "doctor");

    let token = body["token"].as_str().expect("token should be a string");
    let decoded = jwt::validate_token(token, &config.jwt_secret).expect("issued token validates");
    assert_eq!(decoded.id, user_id);
    assert_eq!(decoded.role, Role::Doctor);
}

#[tokio::test]
async fn test_login_wrong_password_does_not_leak() {
    let mock_server = MockServer::start().await;
    let state = TestConfig::with_store_url(&mock_server.uri()).to_state();
    let hash = password::hash_password("correct-horse").unwrap();

    Mock::given(method("GET"))
        .and(path("/users"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            MockStoreRows::user_row(Uuid::new_v4(), "alice", &hash, "user")
        ])))
        .mount(&mock_server)
        .await;

    let err = handlers::login(
        State(state),
        Json(LoginRequest {
            username: "alice".to_string(),
            password: "wrong".to_string(),
        }),
    )
    .await
    .unwrap_err();

    assert_matches!(err, AppError::Auth(msg) if msg == "Invalid credentials");
}

#[tokio::test]
async fn test_login_unknown_user_same_error_as_wrong_password() {
    let mock_server = MockServer::start().await;
    let state = TestConfig::with_store_url(&mock_server.uri()).to_state();

    Mock::given(method("GET"))
        .and(path("/users"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .mount(&mock_server)
        .await;

    let err = handlers::login(
        State(state),
        Json(LoginRequest {
            username: "nobody".to_string(),
            password: "anything".to_string(),
        }),
    )
    .await
    .unwrap_err();

    assert_matches!(err, AppError::Auth(msg) if msg == "Invalid credentials");
}

#[tokio::test]
async fn test_update_role_invalid_value_rejected() {
    let mock_server = MockServer::start().await;
    let state = TestConfig::with_store_url(&mock_server.uri()).to_state();

    let err = handlers::update_user_role(
        State(state),
        Path(Uuid::new_v4()),
        Json(UpdateRoleRequest {
            role: "superadmin".to_string(),
        }),
    )
    .await
    .unwrap_err();

    assert_matches!(err, AppError::BadRequest(msg) if msg == "Invalid role");
}

#[tokio::test]
async fn test_update_role_unknown_user_not_found() {
    let mock_server = MockServer::start().await;
    let state = TestConfig::with_store_url(&mock_server.uri()).to_state();

    Mock::given(method("PATCH"))
        .and(path("/users"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .mount(&mock_server)
        .await;

    let err = handlers::update_user_role(
        State(state),
        Path(Uuid::new_v4()),
        Json(UpdateRoleRequest {
            role: "doctor".to_string(),
        }),
    )
    .await
    .unwrap_err();

    assert_matches!(err, AppError::NotFound(_));
}

#[tokio::test]
async fn test_doctors_available_excludes_linked_accounts() {
    let mock_server = MockServer::start().await;
    let state = TestConfig::with_store_url(&mock_server.uri()).to_state();
    let linked_id = Uuid::new_v4();
    let free_id = Uuid::new_v4();

    Mock::given(method("GET"))
        .and(path("/users"))
        .and(query_param("role", "eq.doctor"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            { "id": linked_id, "username": "dr_taken" },
            { "id": free_id, "username": "dr_free" },
        ])))
        .mount(&mock_server)
        .await;

    Mock::given(method("GET"))
        .and(path("/specialists"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(json!([{ "user_id": linked_id }])),
        )
        .mount(&mock_server)
        .await;

    let Json(body) = handlers::doctors_available(State(state))
        .await
        .expect("listing should succeed");

    let doctors = body.as_array().expect("array response");
    assert_eq!(doctors.len(), 1);
    assert_eq!(doctors[0]["username"], "dr_free");
}
