use std::sync::Arc;

use base64::{engine::general_purpose, Engine as _};
use chrono::{Duration, Utc};
use hmac::{Hmac, Mac};
use serde_json::{json, Value};
use sha2::Sha256;
use uuid::Uuid;

use shared_config::AppConfig;
use shared_database::AppState;
use shared_models::auth::{AuthUser, Role};

pub struct TestConfig {
    pub jwt_secret: String,
    pub store_url: String,
    pub store_service_key: String,
    pub omise_base_url: String,
    pub cohere_base_url: String,
    pub upload_dir: String,
}

impl Default for TestConfig {
    fn default() -> Self {
        Self {
            jwt_secret: "test-secret-key-for-jwt-validation-must-be-long-enough".to_string(),
            store_url: "http://localhost:54321".to_string(),
            store_service_key: "test-service-key".to_string(),
            omise_base_url: "http://localhost:54322".to_string(),
            cohere_base_url: "http://localhost:54323".to_string(),
            upload_dir: "public/uploads".to_string(),
        }
    }
}

impl TestConfig {
    /// Point the row store at a wiremock server.
    pub fn with_store_url(store_url: &str) -> Self {
        Self {
            store_url: store_url.to_string(),
            ..Self::default()
        }
    }

    pub fn to_app_config(&self) -> AppConfig {
        AppConfig {
            store_url: self.store_url.clone(),
            store_service_key: self.store_service_key.clone(),
            jwt_secret: self.jwt_secret.clone(),
            omise_secret_key: "skey_test_000000000000".to_string(),
            omise_base_url: self.omise_base_url.clone(),
            cohere_api_key: "test-cohere-key".to_string(),
            cohere_base_url: self.cohere_base_url.clone(),
            upload_dir: self.upload_dir.clone(),
            public_base_url: "http://localhost:3001".to_string(),
            port: 3001,
        }
    }

    pub fn to_state(&self) -> Arc<AppState> {
        Arc::new(AppState::new(self.to_app_config()))
    }
}

pub struct TestUser {
    pub id: Uuid,
    pub username: String,
    pub role: Role,
}

impl Default for TestUser {
    fn default() -> Self {
        Self {
            id: Uuid::new_v4(),
            username: "testuser".to_string(),
            role: Role::User,
        }
    }
}

impl TestUser {
    pub fn new(username: &str, role: Role) -> Self {
        Self {
            id: Uuid::new_v4(),
            username: username.to_string(),
            role,
        }
    }

    pub fn user(username: &str) -> Self {
        Self::new(username, Role::User)
    }

    pub fn admin(username: &str) -> Self {
        Self::new(username, Role::Admin)
    }

    pub fn doctor(username: &str) -> Self {
        Self::new(username, Role::Doctor)
    }

    pub fn to_auth_user(&self) -> AuthUser {
        AuthUser {
            id: self.id,
            username: self.username.clone(),
            role: self.role,
        }
    }
}

pub struct JwtTestUtils;

impl JwtTestUtils {
    pub fn create_test_token(user: &TestUser, secret: &str, exp_hours: Option<i64>) -> String {
        let now = Utc::now();
        let exp = now + Duration::hours(exp_hours.unwrap_or(24));

        let header = json!({
            "alg": "HS256",
            "typ": "JWT"
        });

        let payload = json!({
            "sub": user.id,
            "username": user.username,
            "role": user.role,
            "iat": now.timestamp(),
            "exp": exp.timestamp()
        });

        let header_encoded = general_purpose::URL_SAFE_NO_PAD.encode(header.to_string());
        let payload_encoded = general_purpose::URL_SAFE_NO_PAD.encode(payload.to_string());

        let signing_input = format!("{}.{}", header_encoded, payload_encoded);

        let mut mac = Hmac::<Sha256>::new_from_slice(secret.as_bytes())
            .expect("HMAC can take key of any size");
        mac.update(signing_input.as_bytes());
        let signature = mac.finalize().into_bytes();
        let signature_encoded = general_purpose::URL_SAFE_NO_PAD.encode(signature);

        format!("{}.{}", signing_input, signature_encoded)
    }

    pub fn create_expired_token(user: &TestUser, secret: &str) -> String {
        Self::create_test_token(user, secret, Some(-1))
    }

    pub fn create_invalid_signature_token(user: &TestUser) -> String {
        Self::create_test_token(user, "wrong-secret", Some(24))
    }

    pub fn create_malformed_token() -> String {
        "invalid.token.format".to_string()
    }
}

/// Canned row-store responses for wiremock-backed tests.
pub struct MockStoreRows;

impl MockStoreRows {
    pub fn user_row(id: Uuid, username: &str, password_hash: &str, role: &str) -> Value {
        json!({
            "id": id,
            "username": username,
            "password_hash": password_hash,
            "role": role,
            "created_at": "2024-01-01T00:00:00Z"
        })
    }

    pub fn specialist_row(id: Uuid, name: &str, price: i64, user_id: Option<Uuid>) -> Value {
        json!({
            "id": id,
            "name": name,
            "title": "Psychiatrist",
            "specialty": "Anxiety, Depression",
            "description": "CBT specialist",
            "photo_url": "https://example.com/photo.jpg",
            "user_id": user_id,
            "price": price
        })
    }

    pub fn appointment_row(
        id: Uuid,
        user_id: Uuid,
        specialist_id: Uuid,
        status: &str,
        payment_status: &str,
        amount: i64,
    ) -> Value {
        json!({
            "id": id,
            "user_id": user_id,
            "specialist_id": specialist_id,
            "reason": "Feeling anxious",
            "requested_time": "2025-06-01T10:00:00Z",
            "status": status,
            "created_at": "2025-05-01T00:00:00Z",
            "amount": amount,
            "payment_status": payment_status,
            "gateway_charge_id": null
        })
    }

    pub fn notification_row(id: Uuid, user_id: Uuid, message: &str) -> Value {
        json!({
            "id": id,
            "user_id": user_id,
            "message": message,
            "link_to": "/doctor/dashboard",
            "is_read": false,
            "created_at": "2025-05-01T00:00:00Z"
        })
    }

    pub fn podcast_row(id: Uuid, kind: &str, url: &str, thumbnail_url: &str) -> Value {
        json!({
            "id": id,
            "title": "Managing stress",
            "description": "A short talk",
            "type": kind,
            "url": url,
            "thumbnail_url": thumbnail_url
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::jwt;

    #[test]
    fn test_config_creation() {
        let config = TestConfig::default();
        let app_config = config.to_app_config();

        assert_eq!(app_config.store_url, "http://localhost:54321");
        assert!(!app_config.jwt_secret.is_empty());
        assert!(app_config.is_configured());
    }

    #[test]
    fn test_token_roundtrip() {
        let user = TestUser::doctor("dr_somchai");
        let secret = "test-secret";
        let token = JwtTestUtils::create_test_token(&user, secret, Some(1));

        let decoded = jwt::validate_token(&token, secret).expect("token should validate");
        assert_eq!(decoded.id, user.id);
        assert_eq!(decoded.username, user.username);
        assert_eq!(decoded.role, Role::Doctor);
    }

    #[test]
    fn test_signed_token_matches_test_token_format() {
        let user = TestUser::admin("admin");
        let secret = "another-secret";
        let token = jwt::sign_token(user.id, &user.username, user.role, secret)
            .expect("signing should succeed");

        assert_eq!(token.split('.').count(), 3);
        let decoded = jwt::validate_token(&token, secret).expect("token should validate");
        assert_eq!(decoded.role, Role::Admin);
    }

    #[test]
    fn test_expired_token_rejected() {
        let user = TestUser::default();
        let secret = "test-secret";
        let token = JwtTestUtils::create_expired_token(&user, secret);

        assert!(jwt::validate_token(&token, secret).is_err());
    }
}
