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
        // Single-page UI
        .route("/", get(handlers::handle_index))
        .route("/analyze", post(handlers::handle_analyze_form))
        // JSON API
        .route("/api/analyze", post(handlers::handle_analyze_api))
        .with_state(state)
}
