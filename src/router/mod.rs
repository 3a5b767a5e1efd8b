pub mod detection_router;
pub mod profile_router;
pub mod quote_router;

use axum::Router;
use std::sync::Arc;

use crate::service::{ProfileServiceImpl, QuoteServiceImpl};

/// Every route of the service.
pub fn app_router(quote_service: Arc<QuoteServiceImpl>, profile_service: Arc<ProfileServiceImpl>) -> Router {
    Router::new()
        .merge(quote_router::quote_router(quote_service))
        .merge(profile_router::profile_router(profile_service))
        .merge(detection_router::detection_router())
}
