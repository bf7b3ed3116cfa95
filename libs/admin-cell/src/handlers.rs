use std::sync::Arc;

use axum::{
    extract::{Extension, Path, Query, State},
    Json,
};
use axum_extra::TypedHeader;
use headers::{authorization::Bearer, Authorization};
use serde_json::{json, Value};

use shared_config::AppConfig;
use shared_models::auth::User;
use shared_models::error::AppError;

use crate::models::{AdminError, SetSuspensionRequest, SetVerificationRequest, UserSearchFilters};
use crate::services::moderation::ModerationService;

fn map_admin_error(e: AdminError) -> AppError {
    match e {
        AdminError::NotFound => AppError::NotFound("User not found".to_string()),
        AdminError::InvalidRequest(msg) => AppError::BadRequest(msg),
        AdminError::DatabaseError(msg) => AppError::Database(msg),
    }
}

fn require_admin(user: &User) -> Result<(), AppError> {
    if !user.is_admin() {
        return Err(AppError::Forbidden("Admin access required".to_string()));
    }
    Ok(())
}

#[axum::debug_handler]
pub async fn list_users(
    State(state): State<Arc<AppConfig>>,
    Query(filters): Query<UserSearchFilters>,
    TypedHeader(auth): TypedHeader<Authorization<Bearer>>,
    Extension(user): Extension<User>,
) -> Result<Json<Value>, AppError> {
    require_admin(&user)?;

    let service = ModerationService::new(&state);
    let users = service
        .list_users(filters, auth.token())
        .await
        .map_err(map_admin_error)?;

    Ok(Json(json!({
        "users": users,
        "total": users.len()
    })))
}

#[axum::debug_handler]
pub async fn set_verification(
    State(state): State<Arc<AppConfig>>,
    Path(user_id): Path<String>,
    TypedHeader(auth): TypedHeader<Authorization<Bearer>>,
    Extension(user): Extension<User>,
    Json(request): Json<SetVerificationRequest>,
) -> Result<Json<Value>, AppError> {
    require_admin(&user)?;

    let service = ModerationService::new(&state);
    let account = service
        .set_verification(&user_id, request.verification_status, auth.token())
        .await
        .map_err(map_admin_error)?;

    Ok(Json(json!({
        "success": true,
        "user": account
    })))
}

#[axum::debug_handler]
pub async fn set_suspension(
    State(state): State<Arc<AppConfig>>,
    Path(user_id): Path<String>,
    TypedHeader(auth): TypedHeader<Authorization<Bearer>>,
    Extension(user): Extension<User>,
    Json(request): Json<SetSuspensionRequest>,
) -> Result<Json<Value>, AppError> {
    require_admin(&user)?;

    if user.id == user_id {
        return Err(AppError::BadRequest(
            "Admins cannot suspend their own account".to_string(),
        ));
    }

    let service = ModerationService::new(&state);
    let account = service
        .set_suspension(&user_id, request.suspended, auth.token())
        .await
        .map_err(map_admin_error)?;

    Ok(Json(json!({
        "success": true,
        "user": account
    })))
}
