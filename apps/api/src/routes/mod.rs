pub mod health;

use axum::{
    routing::{get, post},
    Router,
};

use crate::magazine::handlers;
use crate::state::AppState;

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health::health_handler))
        // Biography API
        .route("/api/v1/biography/pdf", post(handlers::handle_export_pdf))
        .route(
            "/api/v1/biography/layout",
            post(handlers::handle_preview_layout),
        )
        .with_state(state)
}
