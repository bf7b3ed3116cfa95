use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Account roles as issued by the identity provider.
pub const ROLE_CLIENT: &str = "farmer_pet_owner";
pub const ROLE_VETERINARIAN: &str = "veterinarian";
pub const ROLE_ADMIN: &str = "admin";
pub const ROLE_SUSPENDED: &str = "suspended";

#[derive(Debug, Serialize, Deserialize)]
pub struct JwtHeader {
    pub alg: String,
    pub typ: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct JwtClaims {
    pub sub: String,
    pub exp: Option<u64>,
    pub email: Option<String>,
    pub role: Option<String>,
    pub app_metadata: Option<serde_json::Value>,
    pub user_metadata: Option<serde_json::Value>,
    pub aud: Option<String>,
    pub iat: Option<u64>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    pub id: String,
    pub email: Option<String>,
    pub role: Option<String>,
    pub metadata: Option<serde_json::Value>,
    pub created_at: Option<DateTime<Utc>>,
}

impl User {
    pub fn is_admin(&self) -> bool {
        self.role.as_deref() == Some(ROLE_ADMIN)
    }

    pub fn is_veterinarian(&self) -> bool {
        self.role.as_deref() == Some(ROLE_VETERINARIAN)
    }

    pub fn is_suspended(&self) -> bool {
        self.role.as_deref() == Some(ROLE_SUSPENDED)
    }
}
