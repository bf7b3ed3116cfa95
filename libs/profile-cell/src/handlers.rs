use std::sync::Arc;

use axum::{
    extract::{Extension, State},
    Json,
};
use axum_extra::TypedHeader;
use headers::{authorization::Bearer, Authorization};
use serde_json::{json, Value};

use shared_config::AppConfig;
use shared_models::auth::User;
use shared_models::error::AppError;

use crate::models::{ProfileError, UpdateProfileRequest};
use crate::services::profile::ProfileService;

fn map_profile_error(e: ProfileError) -> AppError {
    match e {
        ProfileError::NotFound => AppError::NotFound("Profile not found".to_string()),
        ProfileError::InvalidRequest(msg) => AppError::BadRequest(msg),
        ProfileError::DatabaseError(msg) => AppError::Database(msg),
    }
}

#[axum::debug_handler]
pub async fn get_profile(
    State(state): State<Arc<AppConfig>>,
    TypedHeader(auth): TypedHeader<Authorization<Bearer>>,
    Extension(user): Extension<User>,
) -> Result<Json<Value>, AppError> {
    let service = ProfileService::new(&state);

    let profile = service
        .get_own(&user.id, auth.token())
        .await
        .map_err(map_profile_error)?;

    Ok(Json(json!({ "profile": profile })))
}

#[axum::debug_handler]
pub async fn put_profile(
    State(state): State<Arc<AppConfig>>,
    TypedHeader(auth): TypedHeader<Authorization<Bearer>>,
    Extension(user): Extension<User>,
    Json(request): Json<UpdateProfileRequest>,
) -> Result<Json<Value>, AppError> {
    let service = ProfileService::new(&state);

    let profile = service
        .upsert_own(&user, &request, auth.token())
        .await
        .map_err(map_profile_error)?;

    Ok(Json(json!({
        "success": true,
        "profile": profile
    })))
}
