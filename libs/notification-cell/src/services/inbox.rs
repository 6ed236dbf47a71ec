use std::sync::Arc;

use serde_json::json;
use tracing::debug;
use uuid::Uuid;

use shared_database::StoreClient;

use crate::models::{InboxError, Notification};

/// Append-only inbox. Rows are written as side effects of appointment
/// transitions and only ever mutated to flip the read flag.
pub struct InboxService {
    store: Arc<StoreClient>,
}

impl InboxService {
    pub fn new(store: Arc<StoreClient>) -> Self {
        Self { store }
    }

    pub async fn notify(
        &self,
        user_id: Uuid,
        message: &str,
        link_to: &str,
    ) -> Result<(), InboxError> {
        let _: Notification = self
            .store
            .insert(
                "notifications",
                json!({
                    "user_id": user_id,
                    "message": message,
                    "link_to": link_to,
                    "is_read": false,
                }),
            )
            .await
            .map_err(|e| InboxError::DatabaseError(e.to_string()))?;

        debug!("Notification enqueued for user {}", user_id);
        Ok(())
    }

    pub async fn list_unread(&self, user_id: Uuid) -> Result<Vec<Notification>, InboxError> {
        self.store
            .select(&format!(
                "/notifications?user_id=eq.{}&is_read=eq.false&order=created_at.desc",
                user_id
            ))
            .await
            .map_err(|e| InboxError::DatabaseError(e.to_string()))
    }

    /// Flip the read flag, scoped to the owning user. An id that does not
    /// belong to the caller matches nothing, which is deliberately not an
    /// error.
    pub async fn mark_read(&self, user_id: Uuid, notification_id: Uuid) -> Result<(), InboxError> {
        let _: Vec<Notification> = self
            .store
            .update(
                &format!(
                    "/notifications?id=eq.{}&user_id=eq.{}",
                    notification_id, user_id
                ),
                json!({ "is_read": true }),
            )
            .await
            .map_err(|e| InboxError::DatabaseError(e.to_string()))?;

        Ok(())
    }
}
