pub mod availability;
pub mod directory;
pub mod schedule;
