use std::collections::HashSet;
use std::sync::Arc;

use serde::Deserialize;
use serde_json::json;
use tracing::{debug, info};
use uuid::Uuid;

use shared_database::{StoreClient, StoreError};
use shared_models::auth::Role;

use crate::models::{AccountError, AvailableDoctor, PublicUser, UserRow};
use crate::services::password;

pub struct AccountService {
    store: Arc<StoreClient>,
}

impl AccountService {
    pub fn new(store: Arc<StoreClient>) -> Self {
        Self { store }
    }

    /// Create a new account with the fixed `user` role. Role elevation only
    /// happens later through the admin role endpoint.
    pub async fn register(
        &self,
        username: &str,
        plain_password: &str,
    ) -> Result<UserRow, AccountError> {
        let username = username.trim();
        if username.is_empty() || plain_password.is_empty() {
            return Err(AccountError::ValidationError(
                "Username and password are required".to_string(),
            ));
        }

        let password_hash = password::hash_password(plain_password)?;

        let user: UserRow = self
            .store
            .insert(
                "users",
                json!({
                    "username": username,
                    "password_hash": password_hash,
                    "role": Role::User,
                }),
            )
            .await
            .map_err(|e| match e {
                StoreError::Conflict(_) => AccountError::UsernameTaken,
                other => AccountError::DatabaseError(other.to_string()),
            })?;

        info!("Registered new user {} ({})", user.username, user.id);
        Ok(user)
    }

    /// Verify a username/password pair. Both an unknown username and a wrong
    /// password collapse into the same `InvalidCredentials` so the response
    /// does not reveal which accounts exist.
    pub async fn verify_credentials(
        &self,
        username: &str,
        plain_password: &str,
    ) -> Result<UserRow, AccountError> {
        let path = format!("/users?username=eq.{}", urlencoding::encode(username));
        let user: UserRow = self.store.select_one(&path).await.map_err(|e| match e {
            StoreError::NotFound(_) => AccountError::InvalidCredentials,
            other => AccountError::DatabaseError(other.to_string()),
        })?;

        if !password::verify_password(plain_password, &user.password_hash) {
            debug!("Password verification failed for {}", username);
            return Err(AccountError::InvalidCredentials);
        }

        Ok(user)
    }

    pub async fn list_users(&self) -> Result<Vec<PublicUser>, AccountError> {
        self.store
            .select("/users?select=id,username,role&order=created_at.desc")
            .await
            .map_err(|e| AccountError::DatabaseError(e.to_string()))
    }

    pub async fn update_role(&self, user_id: Uuid, role: &str) -> Result<PublicUser, AccountError> {
        let role: Role = role
            .parse()
            .map_err(|_| AccountError::ValidationError("Invalid role".to_string()))?;

        let mut updated: Vec<PublicUser> = self
            .store
            .update(&format!("/users?id=eq.{}", user_id), json!({ "role": role }))
            .await
            .map_err(|e| AccountError::DatabaseError(e.to_string()))?;

        if updated.is_empty() {
            return Err(AccountError::NotFound);
        }
        info!("User {} role changed to {}", user_id, role);
        Ok(updated.remove(0))
    }

    pub async fn delete_user(&self, user_id: Uuid) -> Result<(), AccountError> {
        let removed = self
            .store
            .delete(&format!("/users?id=eq.{}", user_id))
            .await
            .map_err(|e| AccountError::DatabaseError(e.to_string()))?;

        if removed == 0 {
            return Err(AccountError::NotFound);
        }
        info!("Deleted user {}", user_id);
        Ok(())
    }

    /// Doctor-role accounts that no specialist profile is linked to yet.
    /// The row store cannot express an anti-join in one filter, so the
    /// linked ids are fetched separately and subtracted here.
    pub async fn doctors_available(&self) -> Result<Vec<AvailableDoctor>, AccountError> {
        #[derive(Deserialize)]
        struct LinkedRow {
            user_id: Uuid,
        }

        let doctors: Vec<AvailableDoctor> = self
            .store
            .select("/users?select=id,username&role=eq.doctor&order=username.asc")
            .await
            .map_err(|e| AccountError::DatabaseError(e.to_string()))?;

        let linked: Vec<LinkedRow> = self
            .store
            .select("/specialists?select=user_id&user_id=not.is.null")
            .await
            .map_err(|e| AccountError::DatabaseError(e.to_string()))?;

        let taken: HashSet<Uuid> = linked.into_iter().map(|row| row.user_id).collect();

        Ok(doctors
            .into_iter()
            .filter(|doc| !taken.contains(&doc.id))
            .collect())
    }
}
