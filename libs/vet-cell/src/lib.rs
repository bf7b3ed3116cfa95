pub mod handlers;
pub mod models;
pub mod router;
pub mod services;

pub use models::{DaySchedule, NextAvailableDay, VerificationStatus, VetProfile};
pub use services::availability::{
    generate_slots, has_weekly_availability, is_currently_available, next_available_day,
    SLOT_INTERVAL_MINUTES,
};
pub use services::schedule::ScheduleService;
