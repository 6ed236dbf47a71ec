use std::sync::Arc;

use serde_json::json;
use tracing::{error, info, warn};
use uuid::Uuid;

use booking_cell::models::{Appointment, AppointmentStatus, PaymentStatus};
use shared_database::{AppState, StoreError};
use shared_models::auth::AuthUser;

use crate::models::{PaymentError, PaymentOutcome, WebhookEvent};
use crate::services::omise::OmiseClient;

pub struct PaymentService {
    state: Arc<AppState>,
    omise: OmiseClient,
}

impl PaymentService {
    pub fn new(state: Arc<AppState>) -> Self {
        let omise = OmiseClient::new(&state.config);
        Self { state, omise }
    }

    /// Charge a confirmed, unpaid appointment. The paid flip is a filtered
    /// update on `payment_status=unpaid`, so the sync path and the webhook
    /// can race without double-applying.
    pub async fn pay(
        &self,
        user: &AuthUser,
        appointment_id: Uuid,
        omise_token: Option<String>,
    ) -> Result<PaymentOutcome, PaymentError> {
        let token = omise_token
            .filter(|t| !t.trim().is_empty())
            .ok_or(PaymentError::TokenRequired)?;

        let appointment: Appointment = self
            .state
            .store
            .select_one(&format!(
                "/appointments?id=eq.{}&user_id=eq.{}",
                appointment_id, user.id
            ))
            .await
            .map_err(|e| match e {
                StoreError::NotFound(_) => PaymentError::AppointmentNotFound,
                other => PaymentError::DatabaseError(other.to_string()),
            })?;

        if appointment.status != AppointmentStatus::Confirmed {
            return Err(PaymentError::NotConfirmed);
        }
        if appointment.payment_status == PaymentStatus::Paid {
            return Err(PaymentError::AlreadyPaid);
        }

        let amount_satang = appointment.amount * 100;
        let charge = self
            .omise
            .create_charge(amount_satang, &token, appointment.id, user.id)
            .await?;

        self.record_charge_id(appointment.id, &charge.id).await;

        if charge.status == "successful" {
            self.mark_paid(appointment.id, &charge.id).await?;
            info!("Appointment {} paid via charge {}", appointment.id, charge.id);
            return Ok(PaymentOutcome::Successful);
        }

        if let Some(authorize_uri) = charge.authorize_uri {
            info!(
                "Appointment {} charge {} awaiting 3-D Secure",
                appointment.id, charge.id
            );
            return Ok(PaymentOutcome::Pending { authorize_uri });
        }

        let message = charge
            .failure_message
            .unwrap_or_else(|| "Payment failed".to_string());
        warn!(
            "Charge {} for appointment {} declined: {}",
            charge.id, appointment.id, message
        );
        Err(PaymentError::GatewayDeclined(message))
    }

    /// Process a gateway event. Errors are logged, never returned: the
    /// webhook endpoint answers 200 regardless so the gateway stops
    /// retrying, and delivery is at-least-once by contract.
    pub async fn handle_webhook(&self, payload: serde_json::Value) {
        let event: WebhookEvent = match serde_json::from_value(payload) {
            Ok(event) => event,
            Err(e) => {
                warn!("Ignoring unparseable webhook payload: {}", e);
                return;
            }
        };

        if event.object != "event" || event.key != "charge.complete" {
            return;
        }
        if event.data.status != "successful" {
            return;
        }

        let Some(appointment_id) = event.data.metadata.appointment_id else {
            warn!("charge.complete {} carries no appointment id", event.data.id);
            return;
        };

        match self
            .flip_unpaid_or_fallback(appointment_id, &event.data.id)
            .await
        {
            Ok(true) => info!(
                "Webhook: appointment {} marked paid (charge {})",
                appointment_id, event.data.id
            ),
            // Nothing matched even without the charge-id filter: the row is
            // already paid. A duplicate delivery lands here.
            Ok(false) => info!(
                "Webhook: no unpaid row for appointment {} and charge {}",
                appointment_id, event.data.id
            ),
            Err(e) => error!("Webhook: failed to update appointment {}: {}", appointment_id, e),
        }
    }

    async fn mark_paid(&self, appointment_id: Uuid, charge_id: &str) -> Result<(), PaymentError> {
        let flipped = self
            .flip_unpaid_or_fallback(appointment_id, charge_id)
            .await
            .map_err(|e| PaymentError::DatabaseError(e.to_string()))?;

        if !flipped {
            // The webhook beat us to it; the money moved exactly once either
            // way, so the caller still sees success.
            info!(
                "Appointment {} already flipped to paid elsewhere",
                appointment_id
            );
        }
        Ok(())
    }

    /// Flip with the charge-id filter first. The recorded charge id is a
    /// best-effort write, so the column may still be null; when the filtered
    /// update matches nothing, retry on the unpaid filter alone, which still
    /// applies at most once.
    async fn flip_unpaid_or_fallback(
        &self,
        appointment_id: Uuid,
        charge_id: &str,
    ) -> Result<bool, StoreError> {
        if self.flip_unpaid(appointment_id, Some(charge_id)).await? {
            return Ok(true);
        }
        self.flip_unpaid(appointment_id, None).await
    }

    /// Compare-and-set: flip to paid only while still unpaid (and, when
    /// given, only for the matching charge id). Returns whether a row
    /// actually changed.
    async fn flip_unpaid(
        &self,
        appointment_id: Uuid,
        charge_id: Option<&str>,
    ) -> Result<bool, StoreError> {
        let mut path = format!(
            "/appointments?id=eq.{}&payment_status=eq.unpaid",
            appointment_id
        );
        if let Some(charge_id) = charge_id {
            path.push_str(&format!(
                "&gateway_charge_id=eq.{}",
                urlencoding::encode(charge_id)
            ));
        }

        let updated: Vec<Appointment> = self
            .state
            .store
            .update(&path, json!({ "payment_status": PaymentStatus::Paid }))
            .await?;

        Ok(!updated.is_empty())
    }

    /// Record which charge this appointment maps to, before the outcome is
    /// known, so the webhook can reconcile even if we crash mid-flight.
    async fn record_charge_id(&self, appointment_id: Uuid, charge_id: &str) {
        let result: Result<Vec<Appointment>, _> = self
            .state
            .store
            .update(
                &format!("/appointments?id=eq.{}", appointment_id),
                json!({ "gateway_charge_id": charge_id }),
            )
            .await;

        if let Err(e) = result {
            error!(
                "Could not record charge id {} on appointment {}: {}",
                charge_id, appointment_id, e
            );
        }
    }
}
