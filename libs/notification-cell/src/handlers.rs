use std::sync::Arc;

use axum::{
    extract::{Extension, Path, State},
    Json,
};
use axum_extra::TypedHeader;
use headers::{authorization::Bearer, Authorization};
use serde_json::{json, Value};

use shared_config::AppConfig;
use shared_models::auth::User;
use shared_models::error::AppError;

use crate::models::NotificationError;
use crate::services::notify::NotificationService;

fn map_notification_error(e: NotificationError) -> AppError {
    match e {
        NotificationError::NotFound => AppError::NotFound("Notification not found".to_string()),
        NotificationError::DatabaseError(msg) => AppError::Database(msg),
    }
}

#[axum::debug_handler]
pub async fn get_notifications(
    State(state): State<Arc<AppConfig>>,
    TypedHeader(auth): TypedHeader<Authorization<Bearer>>,
    Extension(user): Extension<User>,
) -> Result<Json<Value>, AppError> {
    let service = NotificationService::new(&state);

    let notifications = service
        .list_for_user(&user.id, auth.token())
        .await
        .map_err(map_notification_error)?;

    let unread = notifications.iter().filter(|n| !n.is_read).count();

    Ok(Json(json!({
        "notifications": notifications,
        "unread_count": unread
    })))
}

#[axum::debug_handler]
pub async fn mark_notification_read(
    State(state): State<Arc<AppConfig>>,
    Path(notification_id): Path<String>,
    TypedHeader(auth): TypedHeader<Authorization<Bearer>>,
    Extension(user): Extension<User>,
) -> Result<Json<Value>, AppError> {
    let service = NotificationService::new(&state);

    let notification = service
        .mark_read(&notification_id, &user.id, auth.token())
        .await
        .map_err(map_notification_error)?;

    Ok(Json(json!({
        "success": true,
        "notification": notification
    })))
}
