use std::sync::Arc;

use axum::{
    middleware,
    routing::{get, put},
    Router,
};

use shared_config::AppConfig;
use shared_utils::extractor::auth_middleware;

use crate::handlers;

/// Public veterinarian directory: browse, profile, advisory slots.
pub fn vet_routes(state: Arc<AppConfig>) -> Router {
    Router::new()
        .route("/", get(handlers::list_vets_public))
        .route("/{vet_id}", get(handlers::get_vet_public))
        .route("/{vet_id}/slots", get(handlers::get_vet_slots_public))
        .with_state(state)
}

/// Weekly schedule: reads are public so booking pages can render without a
/// session; edits require the owning vet's token.
pub fn schedule_routes(state: Arc<AppConfig>) -> Router {
    let public_routes = Router::new().route("/{vet_id}", get(handlers::get_schedule));

    let protected_routes = Router::new()
        .route("/{vet_id}/edit", get(handlers::get_schedule_for_edit))
        .route("/{vet_id}", put(handlers::put_schedule))
        .layer(middleware::from_fn_with_state(state.clone(), auth_middleware));

    Router::new()
        .merge(public_routes)
        .merge(protected_routes)
        .with_state(state)
}
