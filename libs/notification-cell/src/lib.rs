pub mod handlers;
pub mod models;
pub mod router;
pub mod services;

pub use models::{Notification, NotificationType};
pub use services::notify::NotificationService;
