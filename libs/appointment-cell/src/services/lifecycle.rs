// libs/appointment-cell/src/services/lifecycle.rs
//
// Appointment state machine and the authorization policy in front of it.
// Every mutation of an existing appointment calls `authorize` first, then
// (for status changes) `validate_status_transition`.

use tracing::{debug, warn};

use shared_models::auth::User;

use crate::models::{Appointment, AppointmentAction, AppointmentError, AppointmentStatus};

/// Valid next states for a given current state. Completed and cancelled
/// are terminal.
pub fn valid_transitions(current: &AppointmentStatus) -> Vec<AppointmentStatus> {
    match current {
        AppointmentStatus::Pending => vec![AppointmentStatus::Approved, AppointmentStatus::Cancelled],
        AppointmentStatus::Approved => {
            vec![AppointmentStatus::Completed, AppointmentStatus::Cancelled]
        }
        AppointmentStatus::Completed => vec![],
        AppointmentStatus::Cancelled => vec![],
    }
}

pub fn validate_status_transition(
    current: &AppointmentStatus,
    new: &AppointmentStatus,
) -> Result<(), AppointmentError> {
    debug!("Validating status transition {} -> {}", current, new);

    if !valid_transitions(current).contains(new) {
        warn!("Invalid status transition attempted: {} -> {}", current, new);
        return Err(AppointmentError::InvalidStatusTransition {
            from: current.clone(),
            to: new.clone(),
        });
    }

    Ok(())
}

/// The single authorization policy for appointment actions:
/// - approve / complete: the assigned vet only
/// - cancel: the assigned vet or the booking client
/// - visit-record edits: the assigned vet, and only once the appointment
///   is approved or completed
pub fn authorize(
    actor: &User,
    action: AppointmentAction,
    appointment: &Appointment,
) -> Result<(), AppointmentError> {
    let is_assigned_vet = actor.id == appointment.vet_id.to_string();
    let is_booking_client = actor.id == appointment.user_id.to_string();

    match action {
        AppointmentAction::Approve => {
            if !is_assigned_vet {
                return Err(AppointmentError::NotAuthorized(
                    "Only the assigned veterinarian can approve an appointment".to_string(),
                ));
            }
        }
        AppointmentAction::Complete => {
            if !is_assigned_vet {
                return Err(AppointmentError::NotAuthorized(
                    "Only the assigned veterinarian can complete an appointment".to_string(),
                ));
            }
        }
        AppointmentAction::Cancel => {
            if !is_assigned_vet && !is_booking_client {
                return Err(AppointmentError::NotAuthorized(
                    "Only the participants can cancel an appointment".to_string(),
                ));
            }
        }
        AppointmentAction::RecordVisit => {
            if !is_assigned_vet {
                return Err(AppointmentError::NotAuthorized(
                    "Only the assigned veterinarian can record visit details".to_string(),
                ));
            }
            if !matches!(
                appointment.status,
                AppointmentStatus::Approved | AppointmentStatus::Completed
            ) {
                return Err(AppointmentError::NotAuthorized(
                    "Visit details can only be recorded on approved or completed appointments"
                        .to_string(),
                ));
            }
        }
    }

    Ok(())
}
