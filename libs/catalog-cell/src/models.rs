use serde::{Deserialize, Serialize};
use uuid::Uuid;

use shared_models::error::AppError;

pub const DEFAULT_CONSULTATION_PRICE: i64 = 1000;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Specialist {
    pub id: Uuid,
    pub name: String,
    pub title: String,
    pub specialty: Option<String>,
    pub description: Option<String>,
    pub photo_url: Option<String>,
    pub user_id: Option<Uuid>,
    pub price: i64,
}

#[derive(Debug, Deserialize)]
pub struct UserBrief {
    pub username: String,
}

/// Row shape returned when the user back-reference is embedded in the select.
#[derive(Debug, Deserialize)]
pub struct SpecialistJoinedRow {
    #[serde(flatten)]
    pub specialist: Specialist,
    pub user: Option<UserBrief>,
}

/// Public listing shape: the specialist plus the linked account name, so the
/// admin screen can show which doctor login a profile belongs to.
#[derive(Debug, Serialize)]
pub struct SpecialistView {
    #[serde(flatten)]
    pub specialist: Specialist,
    pub linked_username: Option<String>,
}

impl From<SpecialistJoinedRow> for SpecialistView {
    fn from(row: SpecialistJoinedRow) -> Self {
        Self {
            specialist: row.specialist,
            linked_username: row.user.map(|u| u.username),
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct UpsertSpecialistRequest {
    pub name: Option<String>,
    pub title: Option<String>,
    pub specialty: Option<String>,
    pub description: Option<String>,
    pub photo_url: Option<String>,
    pub user_id: Option<Uuid>,
    pub price: Option<i64>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PodcastType {
    Youtube,
    Upload,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Podcast {
    pub id: Uuid,
    pub title: String,
    pub description: Option<String>,
    #[serde(rename = "type")]
    pub kind: PodcastType,
    pub url: String,
    pub thumbnail_url: Option<String>,
    #[serde(default)]
    pub created_at: Option<chrono::DateTime<chrono::Utc>>,
}

#[derive(Debug, Deserialize)]
pub struct UpdatePodcastRequest {
    pub title: Option<String>,
    pub description: Option<String>,
    pub url: Option<String>,
    pub thumbnail_url: Option<String>,
}

/// Parsed multipart payload for podcast creation. Collected by the handler so
/// the service can stay free of extractor types.
#[derive(Debug, Default)]
pub struct PodcastUpload {
    pub title: Option<String>,
    pub description: Option<String>,
    pub kind: Option<String>,
    pub youtube_url: Option<String>,
    pub thumbnail_url: Option<String>,
    pub media_file: Option<UploadedFile>,
    pub thumbnail_file: Option<UploadedFile>,
}

#[derive(Debug)]
pub struct UploadedFile {
    pub file_name: String,
    pub bytes: Vec<u8>,
}

#[derive(Debug, thiserror::Error)]
pub enum CatalogError {
    #[error("Validation error: {0}")]
    ValidationError(String),

    #[error("{0} not found")]
    NotFound(&'static str),

    #[error("This user is already linked to another specialist")]
    UserAlreadyLinked,

    #[error("Upload error: {0}")]
    UploadError(String),

    #[error("Database error: {0}")]
    DatabaseError(String),
}

impl From<CatalogError> for AppError {
    fn from(err: CatalogError) -> Self {
        match err {
            CatalogError::ValidationError(msg) => AppError::BadRequest(msg),
            CatalogError::NotFound(what) => AppError::NotFound(format!("{} not found", what)),
            CatalogError::UserAlreadyLinked => {
                AppError::Conflict("This user is already linked to another specialist".to_string())
            }
            CatalogError::UploadError(msg) => AppError::Internal(msg),
            CatalogError::DatabaseError(msg) => AppError::Database(msg),
        }
    }
}
