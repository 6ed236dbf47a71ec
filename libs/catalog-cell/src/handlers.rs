use std::sync::Arc;

use axum::{
    extract::{Multipart, Path, State},
    http::StatusCode,
    Json,
};
use serde_json::{json, Value};
use uuid::Uuid;

use shared_database::AppState;
use shared_models::error::AppError;

use crate::models::{PodcastUpload, UpdatePodcastRequest, UploadedFile, UpsertSpecialistRequest};
use crate::services::podcast::PodcastService;
use crate::services::specialist::SpecialistService;

pub async fn list_specialists(
    State(state): State<Arc<AppState>>,
) -> Result<Json<Value>, AppError> {
    let service = SpecialistService::new(state.store.clone());
    let specialists = service.list().await?;
    Ok(Json(json!(specialists)))
}

pub async fn create_specialist(
    State(state): State<Arc<AppState>>,
    Json(payload): Json<UpsertSpecialistRequest>,
) -> Result<(StatusCode, Json<Value>), AppError> {
    let service = SpecialistService::new(state.store.clone());
    let specialist = service.create(payload).await?;
    Ok((StatusCode::CREATED, Json(json!(specialist))))
}

pub async fn update_specialist(
    State(state): State<Arc<AppState>>,
    Path(id): Path<Uuid>,
    Json(payload): Json<UpsertSpecialistRequest>,
) -> Result<Json<Value>, AppError> {
    let service = SpecialistService::new(state.store.clone());
    let specialist = service.update(id, payload).await?;
    Ok(Json(json!(specialist)))
}

pub async fn delete_specialist(
    State(state): State<Arc<AppState>>,
    Path(id): Path<Uuid>,
) -> Result<Json<Value>, AppError> {
    let service = SpecialistService::new(state.store.clone());
    service.delete(id).await?;
    Ok(Json(json!({ "message": "Specialist deleted successfully" })))
}

pub async fn list_podcasts(State(state): State<Arc<AppState>>) -> Result<Json<Value>, AppError> {
    let service = PodcastService::new(state);
    let podcasts = service.list().await?;
    Ok(Json(json!(podcasts)))
}

pub async fn get_podcast(
    State(state): State<Arc<AppState>>,
    Path(id): Path<Uuid>,
) -> Result<Json<Value>, AppError> {
    let service = PodcastService::new(state);
    let podcast = service.get(id).await?;
    Ok(Json(json!(podcast)))
}

pub async fn create_podcast(
    State(state): State<Arc<AppState>>,
    multipart: Multipart,
) -> Result<(StatusCode, Json<Value>), AppError> {
    let upload = collect_upload(multipart).await?;
    let service = PodcastService::new(state);
    let podcast = service.create(upload).await?;
    Ok((StatusCode::CREATED, Json(json!(podcast))))
}

pub async fn update_podcast(
    State(state): State<Arc<AppState>>,
    Path(id): Path<Uuid>,
    Json(payload): Json<UpdatePodcastRequest>,
) -> Result<Json<Value>, AppError> {
    let service = PodcastService::new(state);
    let podcast = service.update_metadata(id, payload).await?;
    Ok(Json(json!(podcast)))
}

pub async fn delete_podcast(
    State(state): State<Arc<AppState>>,
    Path(id): Path<Uuid>,
) -> Result<Json<Value>, AppError> {
    let service = PodcastService::new(state);
    service.delete(id).await?;
    Ok(Json(json!({ "message": "Podcast deleted successfully" })))
}

/// Drain the multipart stream into a plain struct. Unknown parts are ignored
/// so older admin frontends can keep sending extra fields.
async fn collect_upload(mut multipart: Multipart) -> Result<PodcastUpload, AppError> {
    let mut upload = PodcastUpload::default();

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::BadRequest(format!("Invalid multipart payload: {}", e)))?
    {
        let name = field.name().unwrap_or_default().to_string();
        match name.as_str() {
            "title" => upload.title = Some(read_text(field).await?),
            "description" => upload.description = Some(read_text(field).await?),
            "type" => upload.kind = Some(read_text(field).await?),
            "youtube_url" => upload.youtube_url = Some(read_text(field).await?),
            "thumbnail_url" => upload.thumbnail_url = Some(read_text(field).await?),
            "media_file" => upload.media_file = Some(read_file(field).await?),
            "thumbnail_file" => upload.thumbnail_file = Some(read_file(field).await?),
            _ => {}
        }
    }

    Ok(upload)
}

async fn read_text(field: axum::extract::multipart::Field<'_>) -> Result<String, AppError> {
    field
        .text()
        .await
        .map_err(|e| AppError::BadRequest(format!("Invalid multipart field: {}", e)))
}

async fn read_file(
    field: axum::extract::multipart::Field<'_>,
) -> Result<UploadedFile, AppError> {
    let file_name = field.file_name().unwrap_or("file").to_string();
    let bytes = field
        .bytes()
        .await
        .map_err(|e| AppError::BadRequest(format!("Invalid multipart file: {}", e)))?
        .to_vec();

    Ok(UploadedFile { file_name, bytes })
}
