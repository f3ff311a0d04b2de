pub mod health;

use axum::{
    routing::{get, post},
    Router,
};

use crate::cv::handlers;
use crate::state::AppState;

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health::health_handler))
        // Document load/save
        .route(
            "/api/v1/cv",
            get(handlers::handle_get_document).put(handlers::handle_put_document),
        )
        // Paginated projection
        .route("/api/v1/cv/pages", get(handlers::handle_get_pages))
        .route("/api/v1/cv/pages/:page", get(handlers::handle_get_page))
        .route("/api/v1/cv/preview/:page", get(handlers::handle_get_preview))
        // Export
        .route("/api/v1/cv/export", post(handlers::handle_export))
        .with_state(state)
}
