// libs/appointment-cell/src/services/booking.rs
use reqwest::header::{HeaderMap, HeaderValue};
use reqwest::Method;
use serde_json::{json, Value};
use tracing::{debug, info, warn};

use notification_cell::models::NotificationType;
use notification_cell::services::notify::NotificationService;
use shared_config::AppConfig;
use shared_database::supabase::SupabaseClient;
use shared_models::auth::User;

use crate::models::{
    Appointment, AppointmentAction, AppointmentError, AppointmentStatus,
    CreateAppointmentRequest, VisitRecordRequest,
};
use crate::services::lifecycle::{authorize, validate_status_transition};
use crate::services::validation::{SlotCheck, ValidationService};

pub struct AppointmentBookingService {
    supabase: SupabaseClient,
    validation_service: ValidationService,
    notification_service: NotificationService,
}

impl AppointmentBookingService {
    pub fn new(config: &AppConfig) -> Self {
        Self {
            supabase: SupabaseClient::new(config),
            validation_service: ValidationService::new(config),
            notification_service: NotificationService::new(config),
        }
    }

    /// Book a new appointment. The requested slot is validated against the
    /// vet's live schedule here, regardless of what any slot picker showed
    /// the client earlier.
    pub async fn create(
        &self,
        actor: &User,
        request: CreateAppointmentRequest,
        auth_token: &str,
    ) -> Result<Appointment, AppointmentError> {
        info!(
            "Booking appointment for user {} with vet {} at {}",
            request.user_id, request.vet_id, request.appointment_datetime
        );

        if actor.id != request.user_id.to_string() {
            return Err(AppointmentError::NotAuthorized(
                "Appointments can only be booked for your own account".to_string(),
            ));
        }
        if actor.is_veterinarian() {
            return Err(AppointmentError::NotAuthorized(
                "Veterinarian accounts cannot book appointments".to_string(),
            ));
        }

        self.verify_vet_exists(&request.vet_id.to_string()).await?;

        match self
            .validation_service
            .validate(&request.vet_id.to_string(), request.appointment_datetime)
            .await?
        {
            SlotCheck::Accepted => {}
            SlotCheck::Rejected(reason) => return Err(AppointmentError::SlotRejected(reason)),
        }

        let appointment = self
            .insert_appointment(&request, auth_token)
            .await?;

        // Fan-out is best effort; the booking itself has already committed.
        if let Err(e) = self
            .notification_service
            .create(
                &request.vet_id.to_string(),
                "New appointment request",
                &format!(
                    "You have a new appointment request for {}",
                    request.appointment_datetime.format("%Y-%m-%d %H:%M")
                ),
                NotificationType::Appointment,
                Some(auth_token),
            )
            .await
        {
            warn!("Failed to notify vet {} of new appointment: {}", request.vet_id, e);
        }

        Ok(appointment)
    }

    /// Appointments the actor participates in, newest first. Vets see
    /// their incoming bookings, everyone else their own.
    pub async fn list_for(
        &self,
        actor: &User,
        auth_token: &str,
    ) -> Result<Vec<Appointment>, AppointmentError> {
        let filter = if actor.is_veterinarian() {
            format!("vet_id=eq.{}", actor.id)
        } else {
            format!("user_id=eq.{}", actor.id)
        };

        let path = format!(
            "/rest/v1/appointments?{}&order=appointment_datetime.desc",
            filter
        );
        let result: Vec<Value> = self
            .supabase
            .request(Method::GET, &path, Some(auth_token), None)
            .await
            .map_err(|e| AppointmentError::DatabaseError(e.to_string()))?;

        result
            .into_iter()
            .map(serde_json::from_value)
            .collect::<Result<Vec<Appointment>, _>>()
            .map_err(|e| AppointmentError::DatabaseError(format!("Malformed appointment row: {}", e)))
    }

    /// Fetch one appointment, participants only.
    pub async fn get(
        &self,
        actor: &User,
        appointment_id: &str,
        auth_token: &str,
    ) -> Result<Appointment, AppointmentError> {
        let appointment = self.fetch(appointment_id, auth_token).await?;

        let is_participant = actor.id == appointment.user_id.to_string()
            || actor.id == appointment.vet_id.to_string();
        if !is_participant {
            return Err(AppointmentError::NotAuthorized(
                "Not a participant of this appointment".to_string(),
            ));
        }

        Ok(appointment)
    }

    /// Drive the state machine: policy check, transition check, then a
    /// single-row PATCH. Last write wins.
    pub async fn update_status(
        &self,
        actor: &User,
        appointment_id: &str,
        new_status: AppointmentStatus,
        auth_token: &str,
    ) -> Result<Appointment, AppointmentError> {
        let appointment = self.fetch(appointment_id, auth_token).await?;

        let action = AppointmentAction::for_status(&new_status).ok_or_else(|| {
            AppointmentError::InvalidRequest(format!(
                "An appointment cannot be moved to {}",
                new_status
            ))
        })?;

        authorize(actor, action, &appointment)?;
        validate_status_transition(&appointment.status, &new_status)?;

        let updated = self
            .patch(
                appointment_id,
                json!({
                    "status": new_status.to_string(),
                    "updated_at": chrono::Utc::now().to_rfc3339(),
                }),
                auth_token,
            )
            .await?;

        self.notify_counterparty(actor, &updated, &new_status, auth_token)
            .await;

        info!(
            "Appointment {} moved from {} to {}",
            appointment_id, appointment.status, new_status
        );
        Ok(updated)
    }

    /// Vet fills in diagnosis, prescription and comments after the visit.
    pub async fn record_visit(
        &self,
        actor: &User,
        appointment_id: &str,
        request: VisitRecordRequest,
        auth_token: &str,
    ) -> Result<Appointment, AppointmentError> {
        let appointment = self.fetch(appointment_id, auth_token).await?;

        authorize(actor, AppointmentAction::RecordVisit, &appointment)?;

        let mut fields = serde_json::Map::new();
        if let Some(diagnosis) = request.diagnosis {
            fields.insert("diagnosis".to_string(), json!(diagnosis));
        }
        if let Some(prescription) = request.prescription {
            fields.insert("prescription".to_string(), json!(prescription));
        }
        if let Some(comments) = request.vet_comments {
            fields.insert("vet_comments".to_string(), json!(comments));
        }
        if fields.is_empty() {
            return Err(AppointmentError::InvalidRequest(
                "No visit details provided".to_string(),
            ));
        }
        fields.insert(
            "updated_at".to_string(),
            json!(chrono::Utc::now().to_rfc3339()),
        );

        self.patch(appointment_id, Value::Object(fields), auth_token)
            .await
    }

    async fn verify_vet_exists(&self, vet_id: &str) -> Result<(), AppointmentError> {
        let path = format!("/rest/v1/profiles?id=eq.{}&role=eq.veterinarian", vet_id);
        let result: Vec<Value> = self
            .supabase
            .request(Method::GET, &path, None, None)
            .await
            .map_err(|e| AppointmentError::DatabaseError(e.to_string()))?;

        if result.is_empty() {
            return Err(AppointmentError::VetNotFound);
        }
        Ok(())
    }

    async fn insert_appointment(
        &self,
        request: &CreateAppointmentRequest,
        auth_token: &str,
    ) -> Result<Appointment, AppointmentError> {
        let mut headers = HeaderMap::new();
        headers.insert("Prefer", HeaderValue::from_static("return=representation"));

        let result: Vec<Value> = self
            .supabase
            .request_with_headers(
                Method::POST,
                "/rest/v1/appointments",
                Some(auth_token),
                Some(json!({
                    "user_id": request.user_id,
                    "vet_id": request.vet_id,
                    "appointment_datetime": request.appointment_datetime.to_rfc3339(),
                    "status": AppointmentStatus::Pending.to_string(),
                    "reason": request.reason,
                    "images": request.images,
                })),
                Some(headers),
            )
            .await
            .map_err(|e| AppointmentError::DatabaseError(e.to_string()))?;

        let row = result
            .into_iter()
            .next()
            .ok_or_else(|| AppointmentError::DatabaseError("Insert returned no row".to_string()))?;

        serde_json::from_value(row)
            .map_err(|e| AppointmentError::DatabaseError(format!("Malformed appointment row: {}", e)))
    }

    async fn fetch(
        &self,
        appointment_id: &str,
        auth_token: &str,
    ) -> Result<Appointment, AppointmentError> {
        let path = format!("/rest/v1/appointments?id=eq.{}", appointment_id);
        let result: Vec<Value> = self
            .supabase
            .request(Method::GET, &path, Some(auth_token), None)
            .await
            .map_err(|e| AppointmentError::DatabaseError(e.to_string()))?;

        let row = result.into_iter().next().ok_or(AppointmentError::NotFound)?;
        serde_json::from_value(row)
            .map_err(|e| AppointmentError::DatabaseError(format!("Malformed appointment row: {}", e)))
    }

    async fn patch(
        &self,
        appointment_id: &str,
        body: Value,
        auth_token: &str,
    ) -> Result<Appointment, AppointmentError> {
        let path = format!("/rest/v1/appointments?id=eq.{}", appointment_id);

        let mut headers = HeaderMap::new();
        headers.insert("Prefer", HeaderValue::from_static("return=representation"));

        let result: Vec<Value> = self
            .supabase
            .request_with_headers(Method::PATCH, &path, Some(auth_token), Some(body), Some(headers))
            .await
            .map_err(|e| AppointmentError::DatabaseError(e.to_string()))?;

        let row = result.into_iter().next().ok_or(AppointmentError::NotFound)?;
        serde_json::from_value(row)
            .map_err(|e| AppointmentError::DatabaseError(format!("Malformed appointment row: {}", e)))
    }

    async fn notify_counterparty(
        &self,
        actor: &User,
        appointment: &Appointment,
        new_status: &AppointmentStatus,
        auth_token: &str,
    ) {
        let recipient = if actor.id == appointment.vet_id.to_string() {
            appointment.user_id.to_string()
        } else {
            appointment.vet_id.to_string()
        };

        debug!("Notifying {} of status change to {}", recipient, new_status);

        if let Err(e) = self
            .notification_service
            .create(
                &recipient,
                &format!("Appointment {}", new_status),
                &format!(
                    "Your appointment on {} is now {}",
                    appointment.appointment_datetime.format("%Y-%m-%d %H:%M"),
                    new_status
                ),
                NotificationType::Appointment,
                Some(auth_token),
            )
            .await
        {
            warn!("Failed to notify {} of status change: {}", recipient, e);
        }
    }
}
