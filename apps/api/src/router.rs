use std::sync::Arc;

use axum::{routing::get, Router};

use admin_cell::router::admin_routes;
use appointment_cell::router::appointment_routes;
use messaging_cell::router::messaging_routes;
use notification_cell::router::notification_routes;
use profile_cell::router::profile_routes;
use shared_config::AppConfig;
use vet_cell::router::{schedule_routes, vet_routes};

pub fn create_router(state: Arc<AppConfig>) -> Router {
    Router::new()
        .route("/", get(|| async { "Pawcall API is running!" }))
        .nest("/vets", vet_routes(state.clone()))
        .nest("/schedule", schedule_routes(state.clone()))
        .nest("/profile", profile_routes(state.clone()))
        .nest("/appointments", appointment_routes(state.clone()))
        .nest("/messages", messaging_routes(state.clone()))
        .nest("/notifications", notification_routes(state.clone()))
        .nest("/admin", admin_routes(state))
}
