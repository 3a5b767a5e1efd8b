use axum::{routing::get, Router};

use crate::handler::detection_handler::{adjust_color_handler, category_handler, health_handler};

/// Stateless helpers for the editor UI, plus the health check.
pub fn detection_router() -> Router {
    Router::new()
        .route("/categories", get(category_handler))
        .route("/colors/adjust", get(adjust_color_handler))
        .route("/health", get(health_handler))
}
