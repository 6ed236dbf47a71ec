use std::sync::Arc;

use axum::{
    extract::{Path, State},
    Extension, Json,
};
use serde_json::{json, Value};
use uuid::Uuid;

use shared_database::AppState;
use shared_models::auth::AuthUser;
use shared_models::error::AppError;

use crate::models::{PayRequest, PaymentOutcome};
use crate::services::payment::PaymentService;

pub async fn pay_with_omise(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
    Path(appointment_id): Path<Uuid>,
    Json(payload): Json<PayRequest>,
) -> Result<Json<Value>, AppError> {
    let service = PaymentService::new(state);
    let outcome = service
        .pay(&user, appointment_id, payload.omise_token)
        .await?;

    let body = match outcome {
        PaymentOutcome::Successful => json!({
            "status": "successful",
            "message": "Payment successful",
        }),
        PaymentOutcome::Pending { authorize_uri } => json!({
            "status": "pending",
            "authorize_uri": authorize_uri,
        }),
    };
    Ok(Json(body))
}

/// Gateway callback. Always 200: a non-2xx answer only makes the gateway
/// redeliver an event we already know how to ignore.
pub async fn omise_webhook(
    State(state): State<Arc<AppState>>,
    Json(payload): Json<Value>,
) -> &'static str {
    let service = PaymentService::new(state);
    service.handle_webhook(payload).await;
    "OK"
}
