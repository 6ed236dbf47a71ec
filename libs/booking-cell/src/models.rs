use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use shared_models::error::AppError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AppointmentStatus {
    Pending,
    Confirmed,
    Cancelled,
}

impl fmt::Display for AppointmentStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AppointmentStatus::Pending => write!(f, "pending"),
            AppointmentStatus::Confirmed => write!(f, "confirmed"),
            AppointmentStatus::Cancelled => write!(f, "cancelled"),
        }
    }
}

impl std::str::FromStr for AppointmentStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "pending" => Ok(AppointmentStatus::Pending),
            "confirmed" => Ok(AppointmentStatus::Confirmed),
            "cancelled" => Ok(AppointmentStatus::Cancelled),
            other => Err(format!("Invalid status: {}", other)),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PaymentStatus {
    Unpaid,
    Paid,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Appointment {
    pub id: Uuid,
    pub user_id: Uuid,
    pub specialist_id: Uuid,
    pub reason: Option<String>,
    pub requested_time: DateTime<Utc>,
    pub status: AppointmentStatus,
    pub created_at: Option<DateTime<Utc>>,
    /// Price snapshot taken from the specialist at booking time.
    pub amount: i64,
    pub payment_status: PaymentStatus,
    pub gateway_charge_id: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct CreateAppointmentRequest {
    pub specialist_id: Option<Uuid>,
    pub requested_time: Option<DateTime<Utc>>,
    pub reason: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct UpdateStatusRequest {
    pub status: String,
}

/// Specialist fields the booking flow needs.
#[derive(Debug, Deserialize)]
pub struct SpecialistRow {
    pub id: Uuid,
    pub name: String,
    pub title: Option<String>,
    pub user_id: Option<Uuid>,
    pub price: i64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SpecialistBrief {
    pub name: String,
    pub title: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserBrief {
    pub username: String,
}

/// A booking user's own row, with the specialist joined in.
#[derive(Debug, Serialize, Deserialize)]
pub struct MyAppointmentRow {
    #[serde(flatten)]
    pub appointment: Appointment,
    pub specialist: Option<SpecialistBrief>,
}

/// Admin view: every row plus who booked it and with whom.
#[derive(Debug, Serialize, Deserialize)]
pub struct AdminAppointmentRow {
    #[serde(flatten)]
    pub appointment: Appointment,
    pub user: Option<UserBrief>,
    pub specialist: Option<SpecialistBrief>,
}

/// Doctor queue view: rows for the linked specialist plus the booking user.
#[derive(Debug, Serialize, Deserialize)]
pub struct DoctorAppointmentRow {
    #[serde(flatten)]
    pub appointment: Appointment,
    pub user: Option<UserBrief>,
}

#[derive(Debug, thiserror::Error)]
pub enum BookingError {
    #[error("Validation error: {0}")]
    ValidationError(String),

    #[error("Specialist not found")]
    SpecialistNotFound,

    #[error("Appointment not found")]
    AppointmentNotFound,

    #[error("Cannot change status from {from} to {to}")]
    InvalidTransition {
        from: AppointmentStatus,
        to: AppointmentStatus,
    },

    #[error("No specialist profile linked to this account")]
    NoLinkedProfile,

    #[error("You cannot update this appointment")]
    NotYourAppointment,

    #[error("Database error: {0}")]
    DatabaseError(String),
}

impl From<BookingError> for AppError {
    fn from(err: BookingError) -> Self {
        match err {
            BookingError::ValidationError(msg) => AppError::BadRequest(msg),
            BookingError::SpecialistNotFound => {
                AppError::NotFound("Specialist not found".to_string())
            }
            BookingError::AppointmentNotFound => {
                AppError::NotFound("Appointment not found".to_string())
            }
            BookingError::InvalidTransition { from, to } => AppError::BadRequest(format!(
                "Cannot change status from {} to {}",
                from, to
            )),
            BookingError::NoLinkedProfile => {
                AppError::Forbidden("No specialist profile linked to this account".to_string())
            }
            BookingError::NotYourAppointment => {
                AppError::Forbidden("You cannot update this appointment".to_string())
            }
            BookingError::DatabaseError(msg) => AppError::Database(msg),
        }
    }
}
