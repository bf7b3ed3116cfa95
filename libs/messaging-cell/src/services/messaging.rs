// libs/messaging-cell/src/services/messaging.rs
use reqwest::header::{HeaderMap, HeaderValue};
use reqwest::Method;
use serde_json::{json, Value};
use tracing::{debug, warn};

use notification_cell::models::NotificationType;
use notification_cell::services::notify::NotificationService;
use shared_config::AppConfig;
use shared_database::supabase::SupabaseClient;
use shared_models::auth::User;

use crate::models::{Conversation, Message, MessagingError};

pub struct MessagingService {
    supabase: SupabaseClient,
    notification_service: NotificationService,
}

impl MessagingService {
    pub fn new(config: &AppConfig) -> Self {
        Self {
            supabase: SupabaseClient::new(config),
            notification_service: NotificationService::new(config),
        }
    }

    /// Find the (client, vet) conversation for this pair, creating it if
    /// it does not exist yet. The actor's role decides which side it sits
    /// on.
    pub async fn open_conversation(
        &self,
        actor: &User,
        participant_id: &str,
        auth_token: &str,
    ) -> Result<Conversation, MessagingError> {
        if actor.id == participant_id {
            return Err(MessagingError::InvalidRequest(
                "Cannot open a conversation with yourself".to_string(),
            ));
        }

        let (client_id, vet_id) = if actor.is_veterinarian() {
            (participant_id.to_string(), actor.id.clone())
        } else {
            (actor.id.clone(), participant_id.to_string())
        };

        let path = format!(
            "/rest/v1/conversations?client_id=eq.{}&vet_id=eq.{}",
            client_id, vet_id
        );
        let existing: Vec<Value> = self
            .supabase
            .request(Method::GET, &path, Some(auth_token), None)
            .await
            .map_err(|e| MessagingError::DatabaseError(e.to_string()))?;

        if let Some(row) = existing.into_iter().next() {
            return serde_json::from_value(row)
                .map_err(|e| MessagingError::DatabaseError(format!("Malformed conversation row: {}", e)));
        }

        debug!("Creating conversation between client {} and vet {}", client_id, vet_id);

        let mut headers = HeaderMap::new();
        headers.insert("Prefer", HeaderValue::from_static("return=representation"));

        let result: Vec<Value> = self
            .supabase
            .request_with_headers(
                Method::POST,
                "/rest/v1/conversations",
                Some(auth_token),
                Some(json!({
                    "client_id": client_id,
                    "vet_id": vet_id,
                })),
                Some(headers),
            )
            .await
            .map_err(|e| MessagingError::DatabaseError(e.to_string()))?;

        let row = result
            .into_iter()
            .next()
            .ok_or_else(|| MessagingError::DatabaseError("Insert returned no row".to_string()))?;
        serde_json::from_value(row)
            .map_err(|e| MessagingError::DatabaseError(format!("Malformed conversation row: {}", e)))
    }

    /// All conversations the actor participates in, newest first.
    pub async fn list_conversations(
        &self,
        actor: &User,
        auth_token: &str,
    ) -> Result<Vec<Conversation>, MessagingError> {
        let path = format!(
            "/rest/v1/conversations?or=(client_id.eq.{id},vet_id.eq.{id})&order=created_at.desc",
            id = actor.id
        );
        let result: Vec<Value> = self
            .supabase
            .request(Method::GET, &path, Some(auth_token), None)
            .await
            .map_err(|e| MessagingError::DatabaseError(e.to_string()))?;

        result
            .into_iter()
            .map(serde_json::from_value)
            .collect::<Result<Vec<Conversation>, _>>()
            .map_err(|e| MessagingError::DatabaseError(format!("Malformed conversation row: {}", e)))
    }

    pub async fn list_messages(
        &self,
        actor: &User,
        conversation_id: &str,
        auth_token: &str,
    ) -> Result<Vec<Message>, MessagingError> {
        self.get_conversation_as_participant(actor, conversation_id, auth_token)
            .await?;

        let path = format!(
            "/rest/v1/messages?conversation_id=eq.{}&order=created_at.asc",
            conversation_id
        );
        let result: Vec<Value> = self
            .supabase
            .request(Method::GET, &path, Some(auth_token), None)
            .await
            .map_err(|e| MessagingError::DatabaseError(e.to_string()))?;

        result
            .into_iter()
            .map(serde_json::from_value)
            .collect::<Result<Vec<Message>, _>>()
            .map_err(|e| MessagingError::DatabaseError(format!("Malformed message row: {}", e)))
    }

    pub async fn send_message(
        &self,
        actor: &User,
        conversation_id: &str,
        content: &str,
        auth_token: &str,
    ) -> Result<Message, MessagingError> {
        if content.trim().is_empty() {
            return Err(MessagingError::InvalidRequest(
                "Message content cannot be empty".to_string(),
            ));
        }

        let conversation = self
            .get_conversation_as_participant(actor, conversation_id, auth_token)
            .await?;

        let mut headers = HeaderMap::new();
        headers.insert("Prefer", HeaderValue::from_static("return=representation"));

        let result: Vec<Value> = self
            .supabase
            .request_with_headers(
                Method::POST,
                "/rest/v1/messages",
                Some(auth_token),
                Some(json!({
                    "conversation_id": conversation_id,
                    "sender_id": actor.id,
                    "content": content,
                    "is_read": false,
                })),
                Some(headers),
            )
            .await
            .map_err(|e| MessagingError::DatabaseError(e.to_string()))?;

        let row = result
            .into_iter()
            .next()
            .ok_or_else(|| MessagingError::DatabaseError("Insert returned no row".to_string()))?;
        let message: Message = serde_json::from_value(row)
            .map_err(|e| MessagingError::DatabaseError(format!("Malformed message row: {}", e)))?;

        // Best effort, the message itself has already committed.
        let recipient = conversation.counterparty(&actor.id);
        if let Err(e) = self
            .notification_service
            .create(
                &recipient,
                "New message",
                "You have received a new message",
                NotificationType::Message,
                Some(auth_token),
            )
            .await
        {
            warn!("Failed to notify {} of new message: {}", recipient, e);
        }

        Ok(message)
    }

    /// Mark everything the other party sent in this conversation as read.
    pub async fn mark_conversation_read(
        &self,
        actor: &User,
        conversation_id: &str,
        auth_token: &str,
    ) -> Result<(), MessagingError> {
        self.get_conversation_as_participant(actor, conversation_id, auth_token)
            .await?;

        let path = format!(
            "/rest/v1/messages?conversation_id=eq.{}&sender_id=neq.{}&is_read=eq.false",
            conversation_id, actor.id
        );
        let mut headers = HeaderMap::new();
        headers.insert("Prefer", HeaderValue::from_static("return=representation"));

        let _: Vec<Value> = self
            .supabase
            .request_with_headers(
                Method::PATCH,
                &path,
                Some(auth_token),
                Some(json!({ "is_read": true })),
                Some(headers),
            )
            .await
            .map_err(|e| MessagingError::DatabaseError(e.to_string()))?;

        Ok(())
    }

    async fn get_conversation_as_participant(
        &self,
        actor: &User,
        conversation_id: &str,
        auth_token: &str,
    ) -> Result<Conversation, MessagingError> {
        let path = format!("/rest/v1/conversations?id=eq.{}", conversation_id);
        let result: Vec<Value> = self
            .supabase
            .request(Method::GET, &path, Some(auth_token), None)
            .await
            .map_err(|e| MessagingError::DatabaseError(e.to_string()))?;

        let row = result.into_iter().next().ok_or(MessagingError::NotFound)?;
        let conversation: Conversation = serde_json::from_value(row)
            .map_err(|e| MessagingError::DatabaseError(format!("Malformed conversation row: {}", e)))?;

        if !conversation.is_participant(&actor.id) {
            return Err(MessagingError::NotAuthorized(
                "Not a participant of this conversation".to_string(),
            ));
        }

        Ok(conversation)
    }
}
