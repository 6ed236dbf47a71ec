use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Extension, Json,
};
use serde_json::{json, Value};
use uuid::Uuid;

use shared_database::AppState;
use shared_models::auth::AuthUser;
use shared_models::error::AppError;

use crate::models::{BookingError, CreateAppointmentRequest, UpdateStatusRequest};
use crate::services::booking::BookingService;

pub async fn book_appointment(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
    Json(payload): Json<CreateAppointmentRequest>,
) -> Result<(StatusCode, Json<Value>), AppError> {
    let service = BookingService::new(state);
    let appointment = service.create(&user, payload).await?;

    Ok((
        StatusCode::CREATED,
        Json(json!({
            "message": "Booking request submitted",
            "data": appointment,
        })),
    ))
}

pub async fn my_appointments(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
) -> Result<Json<Value>, AppError> {
    let service = BookingService::new(state);
    let appointments = service.list_mine(user.id).await?;
    Ok(Json(json!({ "data": appointments })))
}

pub async fn all_appointments(
    State(state): State<Arc<AppState>>,
) -> Result<Json<Value>, AppError> {
    let service = BookingService::new(state);
    let appointments = service.list_all().await?;
    Ok(Json(json!({ "data": appointments })))
}

pub async fn my_doctor_appointments(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
) -> Result<Json<Value>, AppError> {
    let service = BookingService::new(state);
    let appointments = service.list_for_doctor(user.id).await.map_err(|e| match e {
        // For the queue listing an unlinked doctor account reads as an
        // absent resource, not a permission problem.
        BookingError::NoLinkedProfile => {
            AppError::NotFound("No specialist profile linked to this account".to_string())
        }
        other => AppError::from(other),
    })?;
    Ok(Json(json!({ "data": appointments })))
}

pub async fn update_status_admin(
    State(state): State<Arc<AppState>>,
    Path(appointment_id): Path<Uuid>,
    Json(payload): Json<UpdateStatusRequest>,
) -> Result<Json<Value>, AppError> {
    let service = BookingService::new(state);
    let appointment = service
        .set_status_admin(appointment_id, &payload.status)
        .await?;
    Ok(Json(json!({
        "message": "Appointment status updated",
        "data": appointment,
    })))
}

pub async fn update_status_doctor(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
    Path(appointment_id): Path<Uuid>,
    Json(payload): Json<UpdateStatusRequest>,
) -> Result<Json<Value>, AppError> {
    let service = BookingService::new(state);
    let appointment = service
        .set_status_doctor(user.id, appointment_id, &payload.status)
        .await?;
    Ok(Json(json!({
        "message": "Appointment status updated",
        "data": appointment,
    })))
}
