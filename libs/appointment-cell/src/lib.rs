pub mod handlers;
pub mod models;
pub mod router;
pub mod services;

pub use models::{Appointment, AppointmentAction, AppointmentStatus};
pub use services::lifecycle::{authorize, validate_status_transition};
pub use services::validation::{check_against_schedule, SlotCheck};
