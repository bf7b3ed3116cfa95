pub mod handlers;
pub mod models;
pub mod router;
pub mod services;

pub use models::{Conversation, Message};
pub use services::messaging::MessagingService;
