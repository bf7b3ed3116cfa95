use std::sync::Arc;

use axum::{
    extract::{Extension, Path, Query, State},
    Json,
};
use axum_extra::TypedHeader;
use chrono::{Datelike, NaiveDate, Utc};
use headers::{authorization::Bearer, Authorization};
use serde::Deserialize;
use serde_json::{json, Value};

use shared_config::AppConfig;
use shared_models::auth::User;
use shared_models::error::AppError;

use crate::models::{ReplaceScheduleRequest, VetError, VetSearchFilters};
use crate::services::availability::generate_slots;
use crate::services::directory::DirectoryService;
use crate::services::schedule::ScheduleService;

#[derive(Debug, Deserialize)]
pub struct SlotsQuery {
    pub date: NaiveDate,
}

fn map_vet_error(e: VetError) -> AppError {
    match e {
        VetError::NotFound => AppError::NotFound("Veterinarian not found".to_string()),
        VetError::InvalidSchedule(msg) => AppError::ValidationError(msg),
        VetError::DatabaseError(msg) => AppError::Database(msg),
    }
}

// ==============================================================================
// PUBLIC DIRECTORY HANDLERS
// ==============================================================================

#[axum::debug_handler]
pub async fn list_vets_public(
    State(state): State<Arc<AppConfig>>,
    Query(filters): Query<VetSearchFilters>,
) -> Result<Json<Value>, AppError> {
    let directory_service = DirectoryService::new(&state);

    let vets = directory_service
        .list_with_availability(filters, Utc::now())
        .await
        .map_err(map_vet_error)?;

    Ok(Json(json!({
        "vets": vets,
        "total": vets.len()
    })))
}

#[axum::debug_handler]
pub async fn get_vet_public(
    State(state): State<Arc<AppConfig>>,
    Path(vet_id): Path<String>,
) -> Result<Json<Value>, AppError> {
    let directory_service = DirectoryService::new(&state);

    let vet = directory_service.get_vet(&vet_id).await.map_err(map_vet_error)?;

    Ok(Json(json!(vet)))
}

/// Advisory slot list for the booking page. The appointment validator
/// re-checks whatever the client finally submits.
#[axum::debug_handler]
pub async fn get_vet_slots_public(
    State(state): State<Arc<AppConfig>>,
    Path(vet_id): Path<String>,
    Query(query): Query<SlotsQuery>,
) -> Result<Json<Value>, AppError> {
    let schedule_service = ScheduleService::new(&state);

    let week = schedule_service
        .get_week(&vet_id, None)
        .await
        .map_err(map_vet_error)?;

    let day_of_week = query.date.weekday().num_days_from_sunday() as i32;
    let slots: Vec<String> = week
        .iter()
        .find(|day| day.day_of_week == day_of_week)
        .map(|day| {
            generate_slots(day)
                .into_iter()
                .map(|t| t.format("%H:%M").to_string())
                .collect()
        })
        .unwrap_or_default();

    Ok(Json(json!({
        "vet_id": vet_id,
        "date": query.date,
        "slots": slots,
        "total_slots": slots.len()
    })))
}

// ==============================================================================
// SCHEDULE HANDLERS
// ==============================================================================

#[axum::debug_handler]
pub async fn get_schedule(
    State(state): State<Arc<AppConfig>>,
    Path(vet_id): Path<String>,
) -> Result<Json<Value>, AppError> {
    let schedule_service = ScheduleService::new(&state);

    let schedule = schedule_service
        .get_week(&vet_id, None)
        .await
        .map_err(map_vet_error)?;

    Ok(Json(json!({
        "success": true,
        "schedule": schedule
    })))
}

/// Owning vet's editor load: materializes the default week on first use.
#[axum::debug_handler]
pub async fn get_schedule_for_edit(
    State(state): State<Arc<AppConfig>>,
    Path(vet_id): Path<String>,
    TypedHeader(auth): TypedHeader<Authorization<Bearer>>,
    Extension(user): Extension<User>,
) -> Result<Json<Value>, AppError> {
    let token = auth.token();

    if user.id != vet_id {
        return Err(AppError::Forbidden(
            "Not authorized to manage this veterinarian's schedule".to_string(),
        ));
    }

    let schedule_service = ScheduleService::new(&state);

    let schedule = schedule_service
        .get_or_init_week(&vet_id, token)
        .await
        .map_err(map_vet_error)?;

    Ok(Json(json!({
        "success": true,
        "schedule": schedule
    })))
}

#[axum::debug_handler]
pub async fn put_schedule(
    State(state): State<Arc<AppConfig>>,
    Path(vet_id): Path<String>,
    TypedHeader(auth): TypedHeader<Authorization<Bearer>>,
    Extension(user): Extension<User>,
    Json(request): Json<ReplaceScheduleRequest>,
) -> Result<Json<Value>, AppError> {
    let token = auth.token();

    if user.id != vet_id {
        return Err(AppError::Forbidden(
            "Not authorized to update this veterinarian's schedule".to_string(),
        ));
    }
    if !user.is_veterinarian() {
        return Err(AppError::Forbidden(
            "Only veterinarians can publish a schedule".to_string(),
        ));
    }

    let schedule_service = ScheduleService::new(&state);

    let schedule = schedule_service
        .replace_week(&vet_id, &request.schedule, token)
        .await
        .map_err(map_vet_error)?;

    Ok(Json(json!({
        "success": true,
        "schedule": schedule
    })))
}
