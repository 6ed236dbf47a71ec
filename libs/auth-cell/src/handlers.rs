use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use serde_json::{json, Value};
use uuid::Uuid;

use shared_database::AppState;
use shared_models::error::AppError;
use shared_utils::jwt;

use crate::models::{LoginRequest, RegisterRequest, UpdateRoleRequest};
use crate::services::account::AccountService;

pub async fn register(
    State(state): State<Arc<AppState>>,
    Json(payload): Json<RegisterRequest>,
) -> Result<(StatusCode, Json<Value>), AppError> {
    let service = AccountService::new(state.store.clone());
    let user = service.register(&payload.username, &payload.password).await?;

    Ok((
        StatusCode::CREATED,
        Json(json!({
            "message": "User registered successfully",
            "user_id": user.id,
        })),
    ))
}

pub async fn login(
    State(state): State<Arc<AppState>>,
    Json(payload): Json<LoginRequest>,
) -> Result<Json<Value>, AppError> {
    let service = AccountService::new(state.store.clone());
    let user = service
        .verify_credentials(&payload.username, &payload.password)
        .await?;

    let token = jwt::sign_token(user.id, &user.username, user.role, &state.config.jwt_secret)
        .map_err(AppError::Internal)?;

    Ok(Json(json!({
        "message": "Login successful",
        "token": token,
        "role": user.role,
        "username": user.username,
    })))
}

pub async fn list_users(
    State(state): State<Arc<AppState>>,
) -> Result<Json<Value>, AppError> {
    let service = AccountService::new(state.store.clone());
    let users = service.list_users().await?;
    Ok(Json(json!(users)))
}

pub async fn update_user_role(
    State(state): State<Arc<AppState>>,
    Path(user_id): Path<Uuid>,
    Json(payload): Json<UpdateRoleRequest>,
) -> Result<Json<Value>, AppError> {
    let service = AccountService::new(state.store.clone());
    let user = service.update_role(user_id, &payload.role).await?;
    Ok(Json(json!({
        "message": "Role updated successfully",
        "user": user,
    })))
}

pub async fn delete_user(
    State(state): State<Arc<AppState>>,
    Path(user_id): Path<Uuid>,
) -> Result<Json<Value>, AppError> {
    let service = AccountService::new(state.store.clone());
    service.delete_user(user_id).await?;
    Ok(Json(json!({ "message": "User deleted successfully" })))
}

pub async fn doctors_available(
    State(state): State<Arc<AppState>>,
) -> Result<Json<Value>, AppError> {
    let service = AccountService::new(state.store.clone());
    let doctors = service.doctors_available().await?;
    Ok(Json(json!(doctors)))
}
