use serde::Deserialize;
use uuid::Uuid;

use shared_models::error::AppError;

#[derive(Debug, Deserialize)]
pub struct PayRequest {
    pub omise_token: Option<String>,
}

/// The subset of an Omise charge object this service acts on.
#[derive(Debug, Clone, Deserialize)]
pub struct OmiseCharge {
    pub id: String,
    pub status: String,
    pub authorize_uri: Option<String>,
    pub failure_message: Option<String>,
}

/// `charge.complete` event as delivered by the gateway.
#[derive(Debug, Deserialize)]
pub struct WebhookEvent {
    pub object: String,
    pub key: String,
    pub data: WebhookCharge,
}

#[derive(Debug, Deserialize)]
pub struct WebhookCharge {
    pub id: String,
    pub status: String,
    #[serde(default)]
    pub metadata: WebhookMetadata,
}

#[derive(Debug, Default, Deserialize)]
pub struct WebhookMetadata {
    pub appointment_id: Option<Uuid>,
    pub user_id: Option<Uuid>,
}

/// What the synchronous pay call tells the frontend.
#[derive(Debug)]
pub enum PaymentOutcome {
    /// Charge settled immediately; the row is already flipped to paid.
    Successful,
    /// 3-D Secure flow; the row stays unpaid until the webhook lands.
    Pending { authorize_uri: String },
}

#[derive(Debug, thiserror::Error)]
pub enum PaymentError {
    #[error("Omise token is required")]
    TokenRequired,

    #[error("Appointment not found or not yours")]
    AppointmentNotFound,

    #[error("This appointment is not confirmed yet")]
    NotConfirmed,

    #[error("This appointment is already paid")]
    AlreadyPaid,

    #[error("{0}")]
    GatewayDeclined(String),

    #[error("Payment gateway error: {0}")]
    Gateway(String),

    #[error("Database error: {0}")]
    DatabaseError(String),
}

impl From<PaymentError> for AppError {
    fn from(err: PaymentError) -> Self {
        match err {
            PaymentError::TokenRequired => {
                AppError::BadRequest("Omise token is required".to_string())
            }
            PaymentError::AppointmentNotFound => {
                AppError::NotFound("Appointment not found or not yours".to_string())
            }
            PaymentError::NotConfirmed => {
                AppError::BadRequest("This appointment is not confirmed yet".to_string())
            }
            PaymentError::AlreadyPaid => {
                AppError::BadRequest("This appointment is already paid".to_string())
            }
            PaymentError::GatewayDeclined(msg) => AppError::BadRequest(msg),
            PaymentError::Gateway(msg) => AppError::ExternalService(msg),
            PaymentError::DatabaseError(msg) => AppError::Database(msg),
        }
    }
}
