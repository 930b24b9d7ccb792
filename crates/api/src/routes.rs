use crate::handlers;
use crate::state::AppState;
use axum::{routing::get, Router};

/// Creates the management routes with state
pub fn create_management_routes(state: AppState) -> Router {
    Router::new()
        .route("/", get(handlers::get_status))
        .route("/refresh", get(handlers::refresh).post(handlers::refresh))
        .route("/metrics", get(handlers::get_metrics))
        .with_state(state)
}
