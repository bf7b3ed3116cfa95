// libs/appointment-cell/src/services/validation.rs
//
// Server-side slot validation. The slot picker on the client is advisory;
// whatever datetime actually arrives is re-checked here against the vet's
// live week at creation time.

use chrono::{DateTime, Utc};

use shared_config::AppConfig;
use vet_cell::models::DaySchedule;
use vet_cell::services::availability::{day_of_week, time_of_day};
use vet_cell::services::schedule::ScheduleService;

use crate::models::AppointmentError;

/// Outcome of checking a requested datetime against a schedule. A
/// rejection is a computed value with a client-facing reason, not an
/// error.
#[derive(Debug, Clone, PartialEq)]
pub enum SlotCheck {
    Accepted,
    Rejected(String),
}

impl SlotCheck {
    pub fn is_accepted(&self) -> bool {
        matches!(self, SlotCheck::Accepted)
    }
}

/// Pure check of one datetime against a week. Accepts iff the weekday has
/// an available window and the time-of-day falls inside it, both bounds
/// included - the same inclusive rule the availability evaluator uses.
pub fn check_against_schedule(schedule: &[DaySchedule], when: DateTime<Utc>) -> SlotCheck {
    let requested_day = day_of_week(&when);
    let requested_time = time_of_day(&when);

    let day = schedule
        .iter()
        .find(|d| d.day_of_week == requested_day && d.is_available);

    let day = match day {
        Some(day) => day,
        None => {
            return SlotCheck::Rejected(
                "The veterinarian is not available on the selected date".to_string(),
            )
        }
    };

    if requested_time < day.start_time || requested_time > day.end_time {
        return SlotCheck::Rejected(format!(
            "The appointment time is outside the veterinarian's available hours ({} - {})",
            day.start_time.format("%H:%M"),
            day.end_time.format("%H:%M"),
        ));
    }

    SlotCheck::Accepted
}

/// Store-backed wrapper: fetch the vet's current week and apply the pure
/// check.
pub struct ValidationService {
    schedule_service: ScheduleService,
}

impl ValidationService {
    pub fn new(config: &AppConfig) -> Self {
        Self {
            schedule_service: ScheduleService::new(config),
        }
    }

    pub async fn validate(
        &self,
        vet_id: &str,
        when: DateTime<Utc>,
    ) -> Result<SlotCheck, AppointmentError> {
        let week = self
            .schedule_service
            .get_week(vet_id, None)
            .await
            .map_err(|e| AppointmentError::DatabaseError(e.to_string()))?;

        Ok(check_against_schedule(&week, when))
    }
}
