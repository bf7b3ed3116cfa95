use std::sync::Arc;

use axum::{
    middleware,
    routing::{get, patch},
    Router,
};

use shared_config::AppConfig;
use shared_utils::extractor::auth_middleware;

use crate::handlers;

pub fn admin_routes(state: Arc<AppConfig>) -> Router {
    Router::new()
        .route("/users", get(handlers::list_users))
        .route("/users/{user_id}/verification", patch(handlers::set_verification))
        .route("/users/{user_id}/suspension", patch(handlers::set_suspension))
        .layer(middleware::from_fn_with_state(state.clone(), auth_middleware))
        .with_state(state)
}
