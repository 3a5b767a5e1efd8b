use axum::{
    extract::DefaultBodyLimit,
    middleware,
    routing::{get, post},
    Router,
};
use std::sync::Arc;

use crate::handler::profile_handler::{
    branding_state_handler, discard_branding_handler, edit_branding_handler, get_profile_handler,
    save_profile_handler, upload_logo_handler,
};
use crate::middlewares::owner_middleware::owner_context;
use crate::service::profile_service::ProfileServiceImpl;

/// Room for multipart boundaries and headers around the logo bytes.
const MULTIPART_OVERHEAD: usize = 64 * 1024;

pub fn profile_router(service: Arc<ProfileServiceImpl>) -> Router {
    let body_limit = service.config.max_logo_bytes + MULTIPART_OVERHEAD;

    Router::new()
        .route("/profile", get(get_profile_handler).put(save_profile_handler))
        .route(
            "/profile/logo",
            post(upload_logo_handler).layer(DefaultBodyLimit::max(body_limit)),
        )
        .route(
            "/profile/branding",
            get(branding_state_handler)
                .patch(edit_branding_handler)
                .delete(discard_branding_handler),
        )
        .route_layer(middleware::from_fn(owner_context))
        .with_state(service)
}
