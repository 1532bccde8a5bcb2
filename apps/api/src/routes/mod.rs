pub mod health;

use axum::{
    routing::{get, post},
    Router,
};

use crate::analysis::handlers;
use crate::state::AppState;

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health::health_handler))
        // Stateless scoring
        .route("/api/v1/analysis/normalize", post(handlers::handle_normalize))
        .route("/api/v1/analysis/impact", post(handlers::handle_impact))
        // Streaming sessions
        .route(
            "/api/v1/analysis/sessions",
            post(handlers::handle_create_session),
        )
        .route(
            "/api/v1/analysis/sessions/:id",
            get(handlers::handle_get_session).delete(handlers::handle_delete_session),
        )
        .route(
            "/api/v1/analysis/sessions/:id/events",
            post(handlers::handle_apply_event),
        )
        .with_state(state)
}
