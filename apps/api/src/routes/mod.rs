pub mod health;

use axum::{
    routing::{get, post},
    Router,
};

use crate::state::AppState;
use crate::triage::handlers;

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health::health_handler))
        .route("/api/v1/assessments", post(handlers::handle_assess))
        .route(
            "/api/v1/assessments/backend",
            get(handlers::handle_backend),
        )
        .with_state(state)
}
