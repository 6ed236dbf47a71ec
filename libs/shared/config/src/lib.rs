use std::env;
use tracing::warn;

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub store_url: String,
    pub store_service_key: String,
    pub jwt_secret: String,
    pub omise_secret_key: String,
    pub omise_base_url: String,
    pub cohere_api_key: String,
    pub cohere_base_url: String,
    pub upload_dir: String,
    pub public_base_url: String,
    pub port: u16,
}

impl AppConfig {
    pub fn from_env() -> Self {
        let config = Self {
            store_url: env::var("STORE_URL")
                .unwrap_or_else(|_| {
                    warn!("STORE_URL not set, using empty value");
                    String::new()
                }),
            store_service_key: env::var("STORE_SERVICE_KEY")
                .unwrap_or_else(|_| {
                    warn!("STORE_SERVICE_KEY not set, using empty value");
                    String::new()
                }),
            jwt_secret: env::var("JWT_SECRET")
                .unwrap_or_else(|_| {
                    warn!("JWT_SECRET not set, using empty value");
                    String::new()
                }),
            omise_secret_key: env::var("OMISE_SECRET_KEY")
                .unwrap_or_else(|_| {
                    warn!("OMISE_SECRET_KEY not set, using empty value");
                    String::new()
                }),
            omise_base_url: env::var("OMISE_BASE_URL")
                .unwrap_or_else(|_| "https://api.omise.co".to_string()),
            cohere_api_key: env::var("COHERE_API_KEY")
                .unwrap_or_else(|_| {
                    warn!("COHERE_API_KEY not set, using empty value");
                    String::new()
                }),
            cohere_base_url: env::var("COHERE_BASE_URL")
                .unwrap_or_else(|_| "https://api.cohere.com".to_string()),
            upload_dir: env::var("UPLOAD_DIR")
                .unwrap_or_else(|_| "public/uploads".to_string()),
            public_base_url: env::var("PUBLIC_BASE_URL")
                .unwrap_or_else(|_| "http://localhost:3001".to_string()),
            port: env::var("PORT")
                .ok()
                .and_then(|p| p.parse().ok())
                .unwrap_or(3001),
        };

        if !config.is_configured() {
            warn!("Application not fully configured - missing environment variables");
        }

        config
    }

    pub fn is_configured(&self) -> bool {
        !self.store_url.is_empty()
            && !self.store_service_key.is_empty()
            && !self.jwt_secret.is_empty()
    }

    pub fn is_payment_configured(&self) -> bool {
        !self.omise_secret_key.is_empty() && !self.omise_base_url.is_empty()
    }

    pub fn is_chat_configured(&self) -> bool {
        !self.cohere_api_key.is_empty() && !self.cohere_base_url.is_empty()
    }
}
