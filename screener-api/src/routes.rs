//! API route configuration.

use std::sync::Arc;

use axum::{
    routing::{get, post},
    Router,
};

use crate::handlers;
use crate::state::AppState;

/// Creates the API router with all routes configured.
pub fn create_router(state: Arc<AppState>) -> Router {
    Router::new()
        // Endpoint guide and liveness
        .route("/", get(handlers::service_info))
        .route("/health", get(handlers::health_check))
        // Screening
        .route("/check", get(handlers::check_wallet))
        .route("/status", get(handlers::status))
        .route("/refresh", post(handlers::manual_refresh))
        .with_state(state)
}
