// libs/appointment-cell/src/models.rs
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

// ==============================================================================
// APPOINTMENT MODELS
// ==============================================================================

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "snake_case")]
pub enum AppointmentStatus {
    Pending,
    Approved,
    Cancelled,
    Completed,
}

impl fmt::Display for AppointmentStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AppointmentStatus::Pending => write!(f, "pending"),
            AppointmentStatus::Approved => write!(f, "approved"),
            AppointmentStatus::Cancelled => write!(f, "cancelled"),
            AppointmentStatus::Completed => write!(f, "completed"),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Appointment {
    pub id: Uuid,
    pub user_id: Uuid,
    pub vet_id: Uuid,
    pub appointment_datetime: DateTime<Utc>,
    pub status: AppointmentStatus,
    pub reason: Option<String>,
    pub images: Option<Vec<String>>,
    pub diagnosis: Option<String>,
    pub prescription: Option<String>,
    pub vet_comments: Option<String>,
    pub created_at: Option<DateTime<Utc>>,
    pub updated_at: Option<DateTime<Utc>>,
}

/// Actions gated by the authorization policy. Every status change and
/// post-visit edit goes through exactly one of these.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum AppointmentAction {
    Approve,
    Cancel,
    Complete,
    RecordVisit,
}

impl AppointmentAction {
    pub fn for_status(status: &AppointmentStatus) -> Option<Self> {
        match status {
            AppointmentStatus::Approved => Some(Self::Approve),
            AppointmentStatus::Cancelled => Some(Self::Cancel),
            AppointmentStatus::Completed => Some(Self::Complete),
            AppointmentStatus::Pending => None,
        }
    }
}

// ==============================================================================
// REQUEST / RESPONSE MODELS
// ==============================================================================

#[derive(Debug, Clone, Deserialize)]
pub struct CreateAppointmentRequest {
    pub user_id: Uuid,
    pub vet_id: Uuid,
    pub appointment_datetime: DateTime<Utc>,
    pub reason: Option<String>,
    pub images: Option<Vec<String>>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct UpdateStatusRequest {
    pub status: AppointmentStatus,
}

#[derive(Debug, Clone, Deserialize)]
pub struct VisitRecordRequest {
    pub diagnosis: Option<String>,
    pub prescription: Option<String>,
    pub vet_comments: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct UploadImageRequest {
    pub image_base64: String,
}

// ==============================================================================
// ERROR TYPES
// ==============================================================================

#[derive(Debug, Clone, thiserror::Error)]
pub enum AppointmentError {
    #[error("Appointment not found")]
    NotFound,

    #[error("Veterinarian not found")]
    VetNotFound,

    #[error("{0}")]
    SlotRejected(String),

    #[error("Cannot change appointment from {from} to {to}")]
    InvalidStatusTransition {
        from: AppointmentStatus,
        to: AppointmentStatus,
    },

    #[error("{0}")]
    NotAuthorized(String),

    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    #[error("Media upload failed: {0}")]
    MediaUploadFailed(String),

    #[error("Database error: {0}")]
    DatabaseError(String),
}
