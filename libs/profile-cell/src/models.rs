// libs/profile-cell/src/models.rs
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use vet_cell::models::VerificationStatus;

/// A user's own profile row, any role. The vet-only fields stay `None`
/// for client accounts.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Profile {
    pub id: Uuid,
    pub name: Option<String>,
    pub email: Option<String>,
    pub role: Option<String>,
    pub location: Option<String>,
    pub specialization: Option<String>,
    pub qualifications: Option<String>,
    pub service_regions: Option<String>,
    pub verification_status: Option<VerificationStatus>,
    pub created_at: Option<DateTime<Utc>>,
    pub updated_at: Option<DateTime<Utc>>,
}

/// Self-service profile update. Identity fields (id, email, role) come
/// from the verified token, never from the body; moderation fields
/// (verification_status) are admin territory.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdateProfileRequest {
    pub name: Option<String>,
    pub location: Option<String>,
    pub specialization: Option<String>,
    pub qualifications: Option<String>,
    pub service_regions: Option<String>,
}

impl UpdateProfileRequest {
    pub fn has_professional_fields(&self) -> bool {
        self.specialization.is_some()
            || self.qualifications.is_some()
            || self.service_regions.is_some()
    }
}

#[derive(Debug, Clone, thiserror::Error)]
pub enum ProfileError {
    #[error("Profile not found")]
    NotFound,

    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    #[error("Database error: {0}")]
    DatabaseError(String),
}
