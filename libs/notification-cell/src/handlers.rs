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

use crate::services::inbox::InboxService;

pub async fn my_notifications(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
) -> Result<Json<Value>, AppError> {
    let service = InboxService::new(state.store.clone());
    let notifications = service.list_unread(user.id).await?;
    Ok(Json(json!(notifications)))
}

pub async fn mark_notification_read(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
    Path(notification_id): Path<Uuid>,
) -> Result<Json<Value>, AppError> {
    let service = InboxService::new(state.store.clone());
    service.mark_read(user.id, notification_id).await?;
    Ok(Json(json!({ "message": "Notification marked as read" })))
}
