// libs/admin-cell/src/services/moderation.rs
use reqwest::header::{HeaderMap, HeaderValue};
use reqwest::Method;
use serde_json::{json, Value};
use tracing::info;

use shared_config::AppConfig;
use shared_database::supabase::SupabaseClient;
use shared_models::auth::ROLE_CLIENT;
use vet_cell::models::VerificationStatus;

use crate::models::{AdminError, UserAccount, UserSearchFilters};

pub struct ModerationService {
    supabase: SupabaseClient,
}

impl ModerationService {
    pub fn new(config: &AppConfig) -> Self {
        Self {
            supabase: SupabaseClient::new(config),
        }
    }

    pub async fn list_users(
        &self,
        filters: UserSearchFilters,
        auth_token: &str,
    ) -> Result<Vec<UserAccount>, AdminError> {
        let mut path = "/rest/v1/profiles?order=created_at.desc".to_string();

        if let Some(ref role) = filters.role {
            path.push_str(&format!("&role=eq.{}", role));
        }
        if let Some(ref status) = filters.verification_status {
            path.push_str(&format!("&verification_status=eq.{}", status));
        }
        if let Some(limit) = filters.limit {
            path.push_str(&format!("&limit={}", limit));
        }
        if let Some(offset) = filters.offset {
            path.push_str(&format!("&offset={}", offset));
        }

        let result: Vec<Value> = self
            .supabase
            .request(Method::GET, &path, Some(auth_token), None)
            .await
            .map_err(|e| AdminError::DatabaseError(e.to_string()))?;

        result
            .into_iter()
            .map(serde_json::from_value)
            .collect::<Result<Vec<UserAccount>, _>>()
            .map_err(|e| AdminError::DatabaseError(format!("Malformed profile row: {}", e)))
    }

    /// Moderate a vet's listing status. Only veterinarian rows carry a
    /// verification status.
    pub async fn set_verification(
        &self,
        user_id: &str,
        status: VerificationStatus,
        auth_token: &str,
    ) -> Result<UserAccount, AdminError> {
        info!("Setting verification status of {} to {}", user_id, status);

        let path = format!("/rest/v1/profiles?id=eq.{}&role=eq.veterinarian", user_id);
        self.patch_profile(&path, json!({ "verification_status": status.to_string() }), auth_token)
            .await
    }

    /// Suspend or reinstate an account. Suspension swaps the role for the
    /// sentinel value the auth middleware rejects, keeping the prior role
    /// so reinstatement can restore it.
    pub async fn set_suspension(
        &self,
        user_id: &str,
        suspended: bool,
        auth_token: &str,
    ) -> Result<UserAccount, AdminError> {
        let account = self.get_user(user_id, auth_token).await?;
        let path = format!("/rest/v1/profiles?id=eq.{}", user_id);

        if suspended {
            if account.role.as_deref() == Some("suspended") {
                return Ok(account);
            }
            info!("Suspending account {}", user_id);
            self.patch_profile(
                &path,
                json!({
                    "role": "suspended",
                    "previous_role": account.role,
                }),
                auth_token,
            )
            .await
        } else {
            if account.role.as_deref() != Some("suspended") {
                return Ok(account);
            }
            let restored = account
                .previous_role
                .clone()
                .unwrap_or_else(|| ROLE_CLIENT.to_string());
            info!("Reinstating account {} as {}", user_id, restored);
            self.patch_profile(
                &path,
                json!({
                    "role": restored,
                    "previous_role": Value::Null,
                }),
                auth_token,
            )
            .await
        }
    }

    async fn get_user(&self, user_id: &str, auth_token: &str) -> Result<UserAccount, AdminError> {
        let path = format!("/rest/v1/profiles?id=eq.{}", user_id);
        let result: Vec<Value> = self
            .supabase
            .request(Method::GET, &path, Some(auth_token), None)
            .await
            .map_err(|e| AdminError::DatabaseError(e.to_string()))?;

        let row = result.into_iter().next().ok_or(AdminError::NotFound)?;
        serde_json::from_value(row)
            .map_err(|e| AdminError::DatabaseError(format!("Malformed profile row: {}", e)))
    }

    async fn patch_profile(
        &self,
        path: &str,
        body: Value,
        auth_token: &str,
    ) -> Result<UserAccount, AdminError> {
        let mut headers = HeaderMap::new();
        headers.insert("Prefer", HeaderValue::from_static("return=representation"));

        let result: Vec<Value> = self
            .supabase
            .request_with_headers(Method::PATCH, path, Some(auth_token), Some(body), Some(headers))
            .await
            .map_err(|e| AdminError::DatabaseError(e.to_string()))?;

        let row = result.into_iter().next().ok_or(AdminError::NotFound)?;
        serde_json::from_value(row)
            .map_err(|e| AdminError::DatabaseError(format!("Malformed profile row: {}", e)))
    }
}
