// libs/profile-cell/src/services/profile.rs
use reqwest::header::{HeaderMap, HeaderValue};
use reqwest::Method;
use serde_json::{json, Map, Value};
use tracing::debug;

use shared_config::AppConfig;
use shared_database::supabase::SupabaseClient;
use shared_models::auth::User;

use crate::models::{Profile, ProfileError, UpdateProfileRequest};

pub struct ProfileService {
    supabase: SupabaseClient,
}

impl ProfileService {
    pub fn new(config: &AppConfig) -> Self {
        Self {
            supabase: SupabaseClient::new(config),
        }
    }

    pub async fn get_own(&self, user_id: &str, auth_token: &str) -> Result<Profile, ProfileError> {
        let path = format!("/rest/v1/profiles?id=eq.{}", user_id);

        let result: Vec<Value> = self
            .supabase
            .request(Method::GET, &path, Some(auth_token), None)
            .await
            .map_err(|e| ProfileError::DatabaseError(e.to_string()))?;

        let row = result.into_iter().next().ok_or(ProfileError::NotFound)?;
        serde_json::from_value(row)
            .map_err(|e| ProfileError::DatabaseError(format!("Malformed profile row: {}", e)))
    }

    /// Create or update the caller's own profile row. Identity columns are
    /// taken from the verified token; the body can never reassign them.
    /// Professional fields are accepted from veterinarian accounts only.
    pub async fn upsert_own(
        &self,
        user: &User,
        request: &UpdateProfileRequest,
        auth_token: &str,
    ) -> Result<Profile, ProfileError> {
        if request.has_professional_fields() && !user.is_veterinarian() {
            return Err(ProfileError::InvalidRequest(
                "Professional fields can only be set on a veterinarian profile".to_string(),
            ));
        }

        debug!("Upserting profile for user {}", user.id);

        let mut body = Map::new();
        body.insert("id".to_string(), json!(user.id));
        if let Some(email) = &user.email {
            body.insert("email".to_string(), json!(email));
        }
        if let Some(role) = &user.role {
            body.insert("role".to_string(), json!(role));
        }
        if let Some(name) = &request.name {
            body.insert("name".to_string(), json!(name));
        }
        if let Some(location) = &request.location {
            body.insert("location".to_string(), json!(location));
        }
        if let Some(specialization) = &request.specialization {
            body.insert("specialization".to_string(), json!(specialization));
        }
        if let Some(qualifications) = &request.qualifications {
            body.insert("qualifications".to_string(), json!(qualifications));
        }
        if let Some(service_regions) = &request.service_regions {
            body.insert("service_regions".to_string(), json!(service_regions));
        }

        let mut headers = HeaderMap::new();
        headers.insert(
            "Prefer",
            HeaderValue::from_static("resolution=merge-duplicates,return=representation"),
        );

        let result: Vec<Value> = self
            .supabase
            .request_with_headers(
                Method::POST,
                "/rest/v1/profiles",
                Some(auth_token),
                Some(Value::Object(body)),
                Some(headers),
            )
            .await
            .map_err(|e| ProfileError::DatabaseError(e.to_string()))?;

        let row = result
            .into_iter()
            .next()
            .ok_or_else(|| ProfileError::DatabaseError("Upsert returned no row".to_string()))?;

        serde_json::from_value(row)
            .map_err(|e| ProfileError::DatabaseError(format!("Malformed profile row: {}", e)))
    }
}
