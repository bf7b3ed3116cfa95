// libs/vet-cell/src/models.rs
use chrono::NaiveTime;
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

/// Wall-clock times are stored and exchanged as "HH:MM" strings.
/// PostgREST `time` columns come back as "HH:MM:SS", so the deserializer
/// accepts both.
pub mod timefmt {
    use chrono::NaiveTime;
    use serde::{self, Deserialize, Deserializer, Serializer};

    pub fn serialize<S>(time: &NaiveTime, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&time.format("%H:%M").to_string())
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<NaiveTime, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = String::deserialize(deserializer)?;
        NaiveTime::parse_from_str(&raw, "%H:%M")
            .or_else(|_| NaiveTime::parse_from_str(&raw, "%H:%M:%S"))
            .map_err(serde::de::Error::custom)
    }
}

// ==============================================================================
// WEEKLY SCHEDULE MODELS
// ==============================================================================

/// One weekday's availability window. A vet's schedule is exactly seven of
/// these, day_of_week 0 (Sunday) through 6 (Saturday).
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct DaySchedule {
    pub day_of_week: i32,
    #[serde(with = "timefmt")]
    pub start_time: NaiveTime,
    #[serde(with = "timefmt")]
    pub end_time: NaiveTime,
    pub is_available: bool,
}

impl DaySchedule {
    /// The default row written for a day that has never been configured:
    /// 09:00-17:00 but switched off.
    pub fn default_for_day(day_of_week: i32) -> Self {
        Self {
            day_of_week,
            start_time: NaiveTime::from_hms_opt(9, 0, 0).expect("valid default start"),
            end_time: NaiveTime::from_hms_opt(17, 0, 0).expect("valid default end"),
            is_available: false,
        }
    }
}

/// Seven default rows, all unavailable. Returned when a vet has not saved
/// a schedule yet.
pub fn default_week() -> Vec<DaySchedule> {
    (0..7).map(DaySchedule::default_for_day).collect()
}

#[derive(Debug, Clone, Deserialize)]
pub struct ReplaceScheduleRequest {
    pub schedule: Vec<DaySchedule>,
}

/// Result of scanning a week for the next bookable day.
#[derive(Debug, Clone, Serialize)]
pub struct NextAvailableDay {
    #[serde(flatten)]
    pub day: DaySchedule,
    pub is_today: bool,
}

// ==============================================================================
// VETERINARIAN PROFILE MODELS
// ==============================================================================

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "snake_case")]
pub enum VerificationStatus {
    Pending,
    Verified,
    Rejected,
}

impl fmt::Display for VerificationStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            VerificationStatus::Pending => write!(f, "pending"),
            VerificationStatus::Verified => write!(f, "verified"),
            VerificationStatus::Rejected => write!(f, "rejected"),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VetProfile {
    pub id: Uuid,
    pub name: Option<String>,
    pub email: Option<String>,
    pub location: Option<String>,
    pub specialization: Option<String>,
    pub qualifications: Option<String>,
    pub service_regions: Option<String>,
    pub verification_status: Option<VerificationStatus>,
}

/// Directory listing entry: profile plus the availability summary the
/// browse page shows next to each vet.
#[derive(Debug, Clone, Serialize)]
pub struct VetDirectoryEntry {
    #[serde(flatten)]
    pub profile: VetProfile,
    pub currently_available: bool,
    pub has_weekly_availability: bool,
    pub next_available_day: Option<NextAvailableDay>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct VetSearchFilters {
    pub specialization: Option<String>,
    pub region: Option<String>,
    pub verified_only: Option<bool>,
    pub limit: Option<i32>,
    pub offset: Option<i32>,
}

// ==============================================================================
// ERROR TYPES
// ==============================================================================

#[derive(Debug, Clone, thiserror::Error)]
pub enum VetError {
    #[error("Veterinarian not found")]
    NotFound,

    #[error("Invalid schedule: {0}")]
    InvalidSchedule(String),

    #[error("Database error: {0}")]
    DatabaseError(String),
}
