use std::path::PathBuf;
use std::sync::Arc;

use chrono::Utc;
use serde_json::{json, Map, Value};
use tokio::fs;
use tracing::{info, warn};
use uuid::Uuid;

use shared_database::{AppState, StoreError};

use crate::models::{
    CatalogError, Podcast, PodcastType, PodcastUpload, UpdatePodcastRequest, UploadedFile,
};

pub struct PodcastService {
    state: Arc<AppState>,
}

impl PodcastService {
    pub fn new(state: Arc<AppState>) -> Self {
        Self { state }
    }

    pub async fn list(&self) -> Result<Vec<Podcast>, CatalogError> {
        self.state
            .store
            .select("/podcasts?order=created_at.desc")
            .await
            .map_err(|e| CatalogError::DatabaseError(e.to_string()))
    }

    pub async fn get(&self, id: Uuid) -> Result<Podcast, CatalogError> {
        self.state
            .store
            .select_one(&format!("/podcasts?id=eq.{}", id))
            .await
            .map_err(|e| match e {
                StoreError::NotFound(_) => CatalogError::NotFound("Podcast"),
                other => CatalogError::DatabaseError(other.to_string()),
            })
    }

    pub async fn create(&self, upload: PodcastUpload) -> Result<Podcast, CatalogError> {
        let title = upload
            .title
            .as_deref()
            .map(str::trim)
            .filter(|t| !t.is_empty())
            .ok_or_else(|| CatalogError::ValidationError("Title is required".to_string()))?
            .to_string();

        let (url, thumbnail_url, kind) = match upload.kind.as_deref() {
            Some("youtube") => {
                let url = upload.youtube_url.filter(|u| !u.trim().is_empty()).ok_or_else(|| {
                    CatalogError::ValidationError("YouTube URL is required".to_string())
                })?;
                (url, upload.thumbnail_url, PodcastType::Youtube)
            }
            Some("upload") => {
                let media = upload.media_file.ok_or_else(|| {
                    CatalogError::ValidationError("Media file is required".to_string())
                })?;
                let url = self.save_file("media", media).await?;

                let thumbnail_url = match upload.thumbnail_file {
                    Some(file) => Some(self.save_file("thumbnails", file).await?),
                    None => None,
                };
                (url, thumbnail_url, PodcastType::Upload)
            }
            _ => {
                return Err(CatalogError::ValidationError(
                    "Invalid podcast type".to_string(),
                ))
            }
        };

        let podcast: Podcast = self
            .state
            .store
            .insert(
                "podcasts",
                json!({
                    "title": title,
                    "description": upload.description,
                    "type": kind,
                    "url": url,
                    "thumbnail_url": thumbnail_url,
                }),
            )
            .await
            .map_err(|e| CatalogError::DatabaseError(e.to_string()))?;

        info!("Created podcast {} ({})", podcast.title, podcast.id);
        Ok(podcast)
    }

    pub async fn update_metadata(
        &self,
        id: Uuid,
        req: UpdatePodcastRequest,
    ) -> Result<Podcast, CatalogError> {
        let mut patch = Map::new();
        if let Some(title) = req.title {
            patch.insert("title".to_string(), json!(title));
        }
        if let Some(description) = req.description {
            patch.insert("description".to_string(), json!(description));
        }
        if let Some(url) = req.url {
            patch.insert("url".to_string(), json!(url));
        }
        if let Some(thumbnail_url) = req.thumbnail_url {
            patch.insert("thumbnail_url".to_string(), json!(thumbnail_url));
        }

        if patch.is_empty() {
            return Err(CatalogError::ValidationError(
                "No fields to update".to_string(),
            ));
        }

        let mut updated: Vec<Podcast> = self
            .state
            .store
            .update(&format!("/podcasts?id=eq.{}", id), Value::Object(patch))
            .await
            .map_err(|e| CatalogError::DatabaseError(e.to_string()))?;

        if updated.is_empty() {
            return Err(CatalogError::NotFound("Podcast"));
        }
        Ok(updated.remove(0))
    }

    /// Delete the row; for upload-backed podcasts also remove the media and
    /// thumbnail files. A file that is already gone only warrants a warning.
    pub async fn delete(&self, id: Uuid) -> Result<(), CatalogError> {
        let podcast = self.get(id).await?;

        if podcast.kind == PodcastType::Upload {
            self.remove_backing_file(&podcast.url).await;
            if let Some(thumbnail_url) = &podcast.thumbnail_url {
                self.remove_backing_file(thumbnail_url).await;
            }
        }

        self.state
            .store
            .delete(&format!("/podcasts?id=eq.{}", id))
            .await
            .map_err(|e| CatalogError::DatabaseError(e.to_string()))?;

        info!("Deleted podcast {}", id);
        Ok(())
    }

    /// Store an uploaded part under the uploads directory and return the
    /// public URL it will be served from.
    async fn save_file(
        &self,
        subdir: &str,
        file: UploadedFile,
    ) -> Result<String, CatalogError> {
        let dir = PathBuf::from(&self.state.config.upload_dir).join(subdir);
        fs::create_dir_all(&dir)
            .await
            .map_err(|e| CatalogError::UploadError(e.to_string()))?;

        let file_name = format!(
            "{}-{}",
            Utc::now().timestamp_millis(),
            sanitize_file_name(&file.file_name)
        );
        fs::write(dir.join(&file_name), &file.bytes)
            .await
            .map_err(|e| CatalogError::UploadError(e.to_string()))?;

        Ok(format!(
            "{}/uploads/{}/{}",
            self.state.config.public_base_url, subdir, file_name
        ))
    }

    async fn remove_backing_file(&self, url: &str) {
        let Some(path) = self.local_path(url) else {
            return;
        };
        if let Err(e) = fs::remove_file(&path).await {
            warn!("Could not remove backing file {}: {}", path.display(), e);
        }
    }

    /// Map a recorded public URL back to its path under the upload dir.
    /// Returns `None` for external URLs and anything that escapes the dir.
    fn local_path(&self, url: &str) -> Option<PathBuf> {
        let suffix = url.split("/uploads/").nth(1)?;
        if suffix.contains("..") || suffix.is_empty() {
            return None;
        }
        Some(PathBuf::from(&self.state.config.upload_dir).join(suffix))
    }
}

fn sanitize_file_name(name: &str) -> String {
    let cleaned: String = name
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || c == '.' || c == '-' || c == '_' {
                c
            } else {
                '_'
            }
        })
        .collect();

    if cleaned.is_empty() {
        "file".to_string()
    } else {
        cleaned
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use shared_utils::test_utils::TestConfig;

    #[test]
    fn test_sanitize_file_name() {
        assert_eq!(sanitize_file_name("calm talk (1).mp3"), "calm_talk__1_.mp3");
        assert_eq!(sanitize_file_name("ok-name_01.png"), "ok-name_01.png");
        assert_eq!(sanitize_file_name(""), "file");
    }

    #[test]
    fn test_local_path_rejects_external_and_traversal() {
        let service = PodcastService::new(TestConfig::default().to_state());

        assert!(service.local_path("https://youtube.com/watch?v=abc").is_none());
        assert!(service
            .local_path("http://localhost:3001/uploads/../etc/passwd")
            .is_none());

        let path = service
            .local_path("http://localhost:3001/uploads/media/123-talk.mp3")
            .unwrap();
        assert!(path.ends_with("media/123-talk.mp3"));
    }
}
