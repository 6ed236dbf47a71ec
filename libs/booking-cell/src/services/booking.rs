use std::sync::Arc;

use serde_json::json;
use tracing::{info, warn};
use uuid::Uuid;

use notification_cell::services::inbox::InboxService;
use shared_database::{AppState, StoreError};
use shared_models::auth::AuthUser;

use crate::models::{
    AdminAppointmentRow, Appointment, AppointmentStatus, BookingError, CreateAppointmentRequest,
    DoctorAppointmentRow, MyAppointmentRow, PaymentStatus, SpecialistBrief, SpecialistRow,
};
use crate::services::lifecycle;

const SPECIALIST_FIELDS: &str = "select=id,name,title,user_id,price";

pub struct BookingService {
    state: Arc<AppState>,
}

impl BookingService {
    pub fn new(state: Arc<AppState>) -> Self {
        Self { state }
    }

    /// Book an appointment. The amount is copied from the specialist's
    /// current price and never recomputed afterwards, so later price edits
    /// do not change what an existing booking owes.
    pub async fn create(
        &self,
        user: &AuthUser,
        req: CreateAppointmentRequest,
    ) -> Result<MyAppointmentRow, BookingError> {
        let (Some(specialist_id), Some(requested_time)) = (req.specialist_id, req.requested_time)
        else {
            return Err(BookingError::ValidationError(
                "Specialist and requested time are required".to_string(),
            ));
        };

        let specialist: SpecialistRow = self
            .state
            .store
            .select_one(&format!(
                "/specialists?id=eq.{}&{}",
                specialist_id, SPECIALIST_FIELDS
            ))
            .await
            .map_err(|e| match e {
                StoreError::NotFound(_) => BookingError::SpecialistNotFound,
                other => BookingError::DatabaseError(other.to_string()),
            })?;

        let appointment: Appointment = self
            .state
            .store
            .insert(
                "appointments",
                json!({
                    "user_id": user.id,
                    "specialist_id": specialist_id,
                    "reason": req.reason,
                    "requested_time": requested_time,
                    "status": AppointmentStatus::Pending,
                    "amount": specialist.price,
                    "payment_status": PaymentStatus::Unpaid,
                }),
            )
            .await
            .map_err(|e| BookingError::DatabaseError(e.to_string()))?;

        info!(
            "Appointment {} booked by {} with specialist {} for {}",
            appointment.id, user.username, specialist_id, appointment.amount
        );

        if let Some(doctor_id) = specialist.user_id {
            let message = format!("You have a new appointment request (ID: {})", appointment.id);
            self.notify_doctor(doctor_id, &message).await;
        }

        Ok(MyAppointmentRow {
            appointment,
            specialist: Some(SpecialistBrief {
                name: specialist.name,
                title: specialist.title,
            }),
        })
    }

    pub async fn list_mine(&self, user_id: Uuid) -> Result<Vec<MyAppointmentRow>, BookingError> {
        self.state
            .store
            .select(&format!(
                "/appointments?user_id=eq.{}&select=*,specialist:specialists(name,title)&order=created_at.desc",
                user_id
            ))
            .await
            .map_err(|e| BookingError::DatabaseError(e.to_string()))
    }

    pub async fn list_all(&self) -> Result<Vec<AdminAppointmentRow>, BookingError> {
        self.state
            .store
            .select(
                "/appointments?select=*,user:users(username),specialist:specialists(name,title)&order=created_at.desc",
            )
            .await
            .map_err(|e| BookingError::DatabaseError(e.to_string()))
    }

    pub async fn list_for_doctor(
        &self,
        doctor_user_id: Uuid,
    ) -> Result<Vec<DoctorAppointmentRow>, BookingError> {
        let specialist = self.linked_specialist(doctor_user_id).await?;

        self.state
            .store
            .select(&format!(
                "/appointments?specialist_id=eq.{}&select=*,user:users(username)&order=created_at.desc",
                specialist.id
            ))
            .await
            .map_err(|e| BookingError::DatabaseError(e.to_string()))
    }

    /// Admin transition: any valid lifecycle move on any appointment.
    pub async fn set_status_admin(
        &self,
        appointment_id: Uuid,
        raw_status: &str,
    ) -> Result<Appointment, BookingError> {
        let to = lifecycle::parse_status(raw_status)?;
        let appointment = self.fetch(appointment_id).await?;
        lifecycle::check_transition(appointment.status, to)?;

        self.apply_status(appointment, to).await
    }

    /// Doctor transition: only on appointments belonging to the doctor's own
    /// linked specialist profile.
    pub async fn set_status_doctor(
        &self,
        doctor_user_id: Uuid,
        appointment_id: Uuid,
        raw_status: &str,
    ) -> Result<Appointment, BookingError> {
        let to = lifecycle::parse_status(raw_status)?;
        let specialist = self.linked_specialist(doctor_user_id).await?;
        let appointment = self.fetch(appointment_id).await?;

        if appointment.specialist_id != specialist.id {
            return Err(BookingError::NotYourAppointment);
        }
        lifecycle::check_transition(appointment.status, to)?;

        self.apply_status(appointment, to).await
    }

    async fn apply_status(
        &self,
        appointment: Appointment,
        to: AppointmentStatus,
    ) -> Result<Appointment, BookingError> {
        let mut updated: Vec<Appointment> = self
            .state
            .store
            .update(
                &format!("/appointments?id=eq.{}", appointment.id),
                json!({ "status": to }),
            )
            .await
            .map_err(|e| BookingError::DatabaseError(e.to_string()))?;

        if updated.is_empty() {
            return Err(BookingError::AppointmentNotFound);
        }
        let updated = updated.remove(0);
        info!(
            "Appointment {} moved from {} to {}",
            updated.id, appointment.status, to
        );

        if to == AppointmentStatus::Confirmed {
            self.notify_confirmation(&updated).await;
        }

        Ok(updated)
    }

    async fn fetch(&self, appointment_id: Uuid) -> Result<Appointment, BookingError> {
        self.state
            .store
            .select_one(&format!("/appointments?id=eq.{}", appointment_id))
            .await
            .map_err(|e| match e {
                StoreError::NotFound(_) => BookingError::AppointmentNotFound,
                other => BookingError::DatabaseError(other.to_string()),
            })
    }

    async fn linked_specialist(
        &self,
        doctor_user_id: Uuid,
    ) -> Result<SpecialistRow, BookingError> {
        self.state
            .store
            .select_one(&format!(
                "/specialists?user_id=eq.{}&{}",
                doctor_user_id, SPECIALIST_FIELDS
            ))
            .await
            .map_err(|e| match e {
                StoreError::NotFound(_) => BookingError::NoLinkedProfile,
                other => BookingError::DatabaseError(other.to_string()),
            })
    }

    /// Tell the linked doctor about a confirmed appointment. Fire-and-forget:
    /// a transition must not fail because the inbox write did.
    async fn notify_confirmation(&self, appointment: &Appointment) {
        let specialist: SpecialistRow = match self
            .state
            .store
            .select_one(&format!(
                "/specialists?id=eq.{}&{}",
                appointment.specialist_id, SPECIALIST_FIELDS
            ))
            .await
        {
            Ok(row) => row,
            Err(e) => {
                warn!("Could not resolve specialist for notification: {}", e);
                return;
            }
        };

        if let Some(doctor_id) = specialist.user_id {
            let message = format!("Appointment (ID: {}) has been confirmed", appointment.id);
            self.notify_doctor(doctor_id, &message).await;
        }
    }

    async fn notify_doctor(&self, doctor_id: Uuid, message: &str) {
        let inbox = InboxService::new(self.state.store.clone());
        if let Err(e) = inbox.notify(doctor_id, message, "/doctor/dashboard").await {
            warn!("Failed to enqueue notification for {}: {}", doctor_id, e);
        }
    }
}
