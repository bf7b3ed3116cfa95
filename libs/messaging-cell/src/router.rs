use std::sync::Arc;

use axum::{
    middleware,
    routing::{get, post},
    Router,
};

use shared_config::AppConfig;
use shared_utils::extractor::auth_middleware;

use crate::handlers;

pub fn messaging_routes(state: Arc<AppConfig>) -> Router {
    Router::new()
        .route("/conversations", get(handlers::list_conversations))
        .route("/conversations", post(handlers::open_conversation))
        .route("/conversations/{conversation_id}/messages", get(handlers::list_messages))
        .route("/conversations/{conversation_id}/messages", post(handlers::send_message))
        .route("/conversations/{conversation_id}/read", post(handlers::mark_conversation_read))
        .layer(middleware::from_fn_with_state(state.clone(), auth_middleware))
        .with_state(state)
}
