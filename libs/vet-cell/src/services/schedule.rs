// libs/vet-cell/src/services/schedule.rs
use reqwest::Method;
use serde_json::{json, Value};
use tracing::{debug, warn};

use shared_config::AppConfig;
use shared_database::supabase::SupabaseClient;

use crate::models::{default_week, DaySchedule, VetError};

/// Store access for the 7-row weekly schedule. The only write is a
/// whole-week replace; partial patches are not offered anywhere.
pub struct ScheduleService {
    supabase: SupabaseClient,
}

impl ScheduleService {
    pub fn new(config: &AppConfig) -> Self {
        Self {
            supabase: SupabaseClient::new(config),
        }
    }

    /// Fetch the vet's week, ordered by day_of_week ascending. A vet who
    /// has never saved a schedule gets the default all-unavailable week.
    pub async fn get_week(
        &self,
        vet_id: &str,
        auth_token: Option<&str>,
    ) -> Result<Vec<DaySchedule>, VetError> {
        debug!("Fetching weekly schedule for vet: {}", vet_id);

        let path = format!(
            "/rest/v1/veterinarian_schedules?vet_id=eq.{}&order=day_of_week.asc",
            vet_id
        );
        let result: Vec<Value> = self
            .supabase
            .request(Method::GET, &path, auth_token, None)
            .await
            .map_err(|e| VetError::DatabaseError(e.to_string()))?;

        if result.is_empty() {
            debug!("No schedule rows for vet {}, returning default week", vet_id);
            return Ok(default_week());
        }

        let week: Vec<DaySchedule> = result
            .into_iter()
            .map(serde_json::from_value)
            .collect::<Result<Vec<DaySchedule>, _>>()
            .map_err(|e| VetError::DatabaseError(format!("Malformed schedule row: {}", e)))?;

        Ok(week)
    }

    /// First load from the owning vet: persist the default week if nothing
    /// exists yet, so the saved state and the displayed state agree.
    pub async fn get_or_init_week(
        &self,
        vet_id: &str,
        auth_token: &str,
    ) -> Result<Vec<DaySchedule>, VetError> {
        let path = format!(
            "/rest/v1/veterinarian_schedules?vet_id=eq.{}&order=day_of_week.asc",
            vet_id
        );
        let result: Vec<Value> = self
            .supabase
            .request(Method::GET, &path, Some(auth_token), None)
            .await
            .map_err(|e| VetError::DatabaseError(e.to_string()))?;

        if result.is_empty() {
            debug!("Initializing default week for vet {}", vet_id);
            return self.replace_week(vet_id, &default_week(), auth_token).await;
        }

        result
            .into_iter()
            .map(serde_json::from_value)
            .collect::<Result<Vec<DaySchedule>, _>>()
            .map_err(|e| VetError::DatabaseError(format!("Malformed schedule row: {}", e)))
    }

    /// Atomic whole-week replace. The `replace_vet_schedule` function
    /// deletes the vet's rows and reinserts the submitted seven inside one
    /// database transaction, so a failure partway leaves the prior week
    /// intact.
    pub async fn replace_week(
        &self,
        vet_id: &str,
        week: &[DaySchedule],
        auth_token: &str,
    ) -> Result<Vec<DaySchedule>, VetError> {
        validate_week(week)?;

        debug!("Replacing weekly schedule for vet: {}", vet_id);

        let rows: Vec<Value> = week
            .iter()
            .map(|day| {
                json!({
                    "day_of_week": day.day_of_week,
                    "start_time": day.start_time.format("%H:%M").to_string(),
                    "end_time": day.end_time.format("%H:%M").to_string(),
                    "is_available": day.is_available,
                })
            })
            .collect();

        let result: Vec<Value> = self
            .supabase
            .rpc(
                "replace_vet_schedule",
                Some(auth_token),
                json!({
                    "p_vet_id": vet_id,
                    "p_schedule": rows,
                }),
            )
            .await
            .map_err(|e| {
                warn!("Schedule replace failed for vet {}: {}", vet_id, e);
                VetError::DatabaseError(format!("Could not save schedule: {}", e))
            })?;

        result
            .into_iter()
            .map(serde_json::from_value)
            .collect::<Result<Vec<DaySchedule>, _>>()
            .map_err(|e| VetError::DatabaseError(format!("Malformed schedule row: {}", e)))
    }
}

/// A submitted week must be exactly seven rows, one per weekday, with a
/// positive window on every day that is switched on.
pub fn validate_week(week: &[DaySchedule]) -> Result<(), VetError> {
    if week.len() != 7 {
        return Err(VetError::InvalidSchedule(format!(
            "Expected 7 day schedules, got {}",
            week.len()
        )));
    }

    let mut seen = [false; 7];
    for day in week {
        if day.day_of_week < 0 || day.day_of_week > 6 {
            return Err(VetError::InvalidSchedule(format!(
                "Day of week must be between 0 (Sunday) and 6 (Saturday), got {}",
                day.day_of_week
            )));
        }
        if seen[day.day_of_week as usize] {
            return Err(VetError::InvalidSchedule(format!(
                "Duplicate entry for day of week {}",
                day.day_of_week
            )));
        }
        seen[day.day_of_week as usize] = true;

        if day.is_available && day.start_time >= day.end_time {
            return Err(VetError::InvalidSchedule(format!(
                "Start time must be before end time on day {}",
                day.day_of_week
            )));
        }
    }

    Ok(())
}
