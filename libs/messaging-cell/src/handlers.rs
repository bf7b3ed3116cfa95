use std::sync::Arc;

use axum::{
    extract::{Extension, Path, State},
    Json,
};
use axum_extra::TypedHeader;
use headers::{authorization::Bearer, Authorization};
use serde_json::{json, Value};

use shared_config::AppConfig;
use shared_models::auth::User;
use shared_models::error::AppError;

use crate::models::{MessagingError, OpenConversationRequest, SendMessageRequest};
use crate::services::messaging::MessagingService;

fn map_messaging_error(e: MessagingError) -> AppError {
    match e {
        MessagingError::NotFound => AppError::NotFound("Conversation not found".to_string()),
        MessagingError::NotAuthorized(msg) => AppError::Forbidden(msg),
        MessagingError::InvalidRequest(msg) => AppError::BadRequest(msg),
        MessagingError::DatabaseError(msg) => AppError::Database(msg),
    }
}

#[axum::debug_handler]
pub async fn list_conversations(
    State(state): State<Arc<AppConfig>>,
    TypedHeader(auth): TypedHeader<Authorization<Bearer>>,
    Extension(user): Extension<User>,
) -> Result<Json<Value>, AppError> {
    let service = MessagingService::new(&state);

    let conversations = service
        .list_conversations(&user, auth.token())
        .await
        .map_err(map_messaging_error)?;

    Ok(Json(json!({
        "conversations": conversations,
        "total": conversations.len()
    })))
}

#[axum::debug_handler]
pub async fn open_conversation(
    State(state): State<Arc<AppConfig>>,
    TypedHeader(auth): TypedHeader<Authorization<Bearer>>,
    Extension(user): Extension<User>,
    Json(request): Json<OpenConversationRequest>,
) -> Result<Json<Value>, AppError> {
    let service = MessagingService::new(&state);

    let conversation = service
        .open_conversation(&user, &request.participant_id.to_string(), auth.token())
        .await
        .map_err(map_messaging_error)?;

    Ok(Json(json!({
        "success": true,
        "conversation": conversation
    })))
}

#[axum::debug_handler]
pub async fn list_messages(
    State(state): State<Arc<AppConfig>>,
    Path(conversation_id): Path<String>,
    TypedHeader(auth): TypedHeader<Authorization<Bearer>>,
    Extension(user): Extension<User>,
) -> Result<Json<Value>, AppError> {
    let service = MessagingService::new(&state);

    let messages = service
        .list_messages(&user, &conversation_id, auth.token())
        .await
        .map_err(map_messaging_error)?;

    Ok(Json(json!({
        "messages": messages,
        "total": messages.len()
    })))
}

#[axum::debug_handler]
pub async fn send_message(
    State(state): State<Arc<AppConfig>>,
    Path(conversation_id): Path<String>,
    TypedHeader(auth): TypedHeader<Authorization<Bearer>>,
    Extension(user): Extension<User>,
    Json(request): Json<SendMessageRequest>,
) -> Result<Json<Value>, AppError> {
    let service = MessagingService::new(&state);

    let message = service
        .send_message(&user, &conversation_id, &request.content, auth.token())
        .await
        .map_err(map_messaging_error)?;

    Ok(Json(json!({
        "success": true,
        "message": message
    })))
}

#[axum::debug_handler]
pub async fn mark_conversation_read(
    State(state): State<Arc<AppConfig>>,
    Path(conversation_id): Path<String>,
    TypedHeader(auth): TypedHeader<Authorization<Bearer>>,
    Extension(user): Extension<User>,
) -> Result<Json<Value>, AppError> {
    let service = MessagingService::new(&state);

    service
        .mark_conversation_read(&user, &conversation_id, auth.token())
        .await
        .map_err(map_messaging_error)?;

    Ok(Json(json!({ "success": true })))
}
