pub mod health;

use axum::{
    routing::{get, post},
    Router,
};

use crate::generation::handlers;
use crate::state::AppState;

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health::health_handler))
        // Content API
        .route("/api/v1/content/generate", post(handlers::handle_generate))
        .route(
            "/api/v1/content/history",
            get(handlers::handle_history).delete(handlers::handle_clear),
        )
        .route("/api/v1/content/export", get(handlers::handle_export))
        .with_state(state)
}
