// libs/admin-cell/src/models.rs
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use vet_cell::models::VerificationStatus;

/// A profile row as the moderation views see it, any role.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserAccount {
    pub id: Uuid,
    pub name: Option<String>,
    pub email: Option<String>,
    pub role: Option<String>,
    pub location: Option<String>,
    pub specialization: Option<String>,
    pub verification_status: Option<VerificationStatus>,
    pub previous_role: Option<String>,
    pub created_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct UserSearchFilters {
    pub role: Option<String>,
    pub verification_status: Option<VerificationStatus>,
    pub limit: Option<i32>,
    pub offset: Option<i32>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SetVerificationRequest {
    pub verification_status: VerificationStatus,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SetSuspensionRequest {
    pub suspended: bool,
}

#[derive(Debug, Clone, thiserror::Error)]
pub enum AdminError {
    #[error("User not found")]
    NotFound,

    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    #[error("Database error: {0}")]
    DatabaseError(String),
}
