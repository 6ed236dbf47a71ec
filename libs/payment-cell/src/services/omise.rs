use reqwest::Client;
use serde_json::Value;
use tracing::debug;
use uuid::Uuid;

use shared_config::AppConfig;

use crate::models::{OmiseCharge, PaymentError};

/// Thin client for the Omise charges API. Charges are created with the
/// secret key over basic auth and a form-encoded body, as the gateway
/// requires; amounts are in satang.
pub struct OmiseClient {
    client: Client,
    base_url: String,
    secret_key: String,
    return_uri: String,
}

impl OmiseClient {
    pub fn new(config: &AppConfig) -> Self {
        Self {
            client: Client::new(),
            base_url: config.omise_base_url.clone(),
            secret_key: config.omise_secret_key.clone(),
            return_uri: format!("{}/consult", config.public_base_url),
        }
    }

    pub async fn create_charge(
        &self,
        amount_satang: i64,
        card_token: &str,
        appointment_id: Uuid,
        user_id: Uuid,
    ) -> Result<OmiseCharge, PaymentError> {
        let url = format!("{}/charges", self.base_url);
        debug!("Creating charge of {} satang for {}", amount_satang, appointment_id);

        let form = [
            ("amount", amount_satang.to_string()),
            ("currency", "thb".to_string()),
            ("card", card_token.to_string()),
            ("metadata[appointment_id]", appointment_id.to_string()),
            ("metadata[user_id]", user_id.to_string()),
            ("return_uri", self.return_uri.clone()),
        ];

        let response = self
            .client
            .post(&url)
            .basic_auth(&self.secret_key, Some(""))
            .form(&form)
            .send()
            .await
            .map_err(|e| PaymentError::Gateway(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let body: Value = response.json().await.unwrap_or(Value::Null);
            let message = body
                .get("message")
                .and_then(Value::as_str)
                .unwrap_or("Charge creation rejected")
                .to_string();
            return Err(PaymentError::Gateway(format!("{} ({})", message, status)));
        }

        response
            .json::<OmiseCharge>()
            .await
            .map_err(|e| PaymentError::Gateway(format!("Unreadable charge response: {}", e)))
    }
}
