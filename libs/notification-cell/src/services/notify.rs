// libs/notification-cell/src/services/notify.rs
use reqwest::header::{HeaderMap, HeaderValue};
use reqwest::Method;
use serde_json::{json, Value};
use tracing::debug;

use shared_config::AppConfig;
use shared_database::supabase::SupabaseClient;

use crate::models::{Notification, NotificationError, NotificationType};

pub struct NotificationService {
    supabase: SupabaseClient,
}

impl NotificationService {
    pub fn new(config: &AppConfig) -> Self {
        Self {
            supabase: SupabaseClient::new(config),
        }
    }

    /// Insert a notification row for one user. Callers that fan out on a
    /// larger event decide themselves whether a failure here is fatal.
    pub async fn create(
        &self,
        user_id: &str,
        title: &str,
        message: &str,
        notification_type: NotificationType,
        auth_token: Option<&str>,
    ) -> Result<Notification, NotificationError> {
        debug!("Creating {} notification for user {}", notification_type, user_id);

        let mut headers = HeaderMap::new();
        headers.insert("Prefer", HeaderValue::from_static("return=representation"));

        let result: Vec<Value> = self
            .supabase
            .request_with_headers(
                Method::POST,
                "/rest/v1/notifications",
                auth_token,
                Some(json!({
                    "user_id": user_id,
                    "title": title,
                    "message": message,
                    "notification_type": notification_type.to_string(),
                    "is_read": false,
                })),
                Some(headers),
            )
            .await
            .map_err(|e| NotificationError::DatabaseError(e.to_string()))?;

        let row = result
            .into_iter()
            .next()
            .ok_or_else(|| NotificationError::DatabaseError("Insert returned no row".to_string()))?;

        serde_json::from_value(row)
            .map_err(|e| NotificationError::DatabaseError(format!("Malformed notification row: {}", e)))
    }

    pub async fn list_for_user(
        &self,
        user_id: &str,
        auth_token: &str,
    ) -> Result<Vec<Notification>, NotificationError> {
        let path = format!(
            "/rest/v1/notifications?user_id=eq.{}&order=created_at.desc",
            user_id
        );
        let result: Vec<Value> = self
            .supabase
            .request(Method::GET, &path, Some(auth_token), None)
            .await
            .map_err(|e| NotificationError::DatabaseError(e.to_string()))?;

        result
            .into_iter()
            .map(serde_json::from_value)
            .collect::<Result<Vec<Notification>, _>>()
            .map_err(|e| NotificationError::DatabaseError(format!("Malformed notification row: {}", e)))
    }

    /// Mark one of the user's own notifications read. The user_id filter
    /// keeps one account from flipping another's rows.
    pub async fn mark_read(
        &self,
        notification_id: &str,
        user_id: &str,
        auth_token: &str,
    ) -> Result<Notification, NotificationError> {
        let path = format!(
            "/rest/v1/notifications?id=eq.{}&user_id=eq.{}",
            notification_id, user_id
        );

        let mut headers = HeaderMap::new();
        headers.insert("Prefer", HeaderValue::from_static("return=representation"));

        let result: Vec<Value> = self
            .supabase
            .request_with_headers(
                Method::PATCH,
                &path,
                Some(auth_token),
                Some(json!({ "is_read": true })),
                Some(headers),
            )
            .await
            .map_err(|e| NotificationError::DatabaseError(e.to_string()))?;

        let row = result.into_iter().next().ok_or(NotificationError::NotFound)?;
        serde_json::from_value(row)
            .map_err(|e| NotificationError::DatabaseError(format!("Malformed notification row: {}", e)))
    }
}
