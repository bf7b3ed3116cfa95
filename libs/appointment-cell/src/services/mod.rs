pub mod booking;
pub mod lifecycle;
pub mod media;
pub mod validation;
