// libs/messaging-cell/src/models.rs
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// One conversation per (client, vet) pair.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Conversation {
    pub id: Uuid,
    pub client_id: Uuid,
    pub vet_id: Uuid,
    pub created_at: Option<DateTime<Utc>>,
}

impl Conversation {
    pub fn is_participant(&self, user_id: &str) -> bool {
        self.client_id.to_string() == user_id || self.vet_id.to_string() == user_id
    }

    /// The participant who is not `user_id`.
    pub fn counterparty(&self, user_id: &str) -> String {
        if self.client_id.to_string() == user_id {
            self.vet_id.to_string()
        } else {
            self.client_id.to_string()
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Message {
    pub id: Uuid,
    pub conversation_id: Uuid,
    pub sender_id: Uuid,
    pub content: String,
    pub is_read: bool,
    pub created_at: Option<DateTime<Utc>>,
}

/// Open (or reopen) a conversation with the other party.
#[derive(Debug, Clone, Deserialize)]
pub struct OpenConversationRequest {
    pub participant_id: Uuid,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SendMessageRequest {
    pub content: String,
}

#[derive(Debug, Clone, thiserror::Error)]
pub enum MessagingError {
    #[error("Conversation not found")]
    NotFound,

    #[error("{0}")]
    NotAuthorized(String),

    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    #[error("Database error: {0}")]
    DatabaseError(String),
}
