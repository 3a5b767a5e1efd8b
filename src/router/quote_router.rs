use axum::{
    middleware,
    routing::{get, put},
    Router,
};
use std::sync::Arc;

use crate::handler::quote_handler::{
    create_quote_handler, delete_quote_handler, get_quote_handler, list_quotes_handler, render_plan_handler,
    replace_items_handler, update_quote_status_handler,
};
use crate::middlewares::owner_middleware::owner_context;
use crate::service::quote_service::QuoteServiceImpl;

pub fn quote_router(service: Arc<QuoteServiceImpl>) -> Router {
    // Reached through the link shared with the customer
    let public = Router::new()
        .route("/quotes/{id}/status", put(update_quote_status_handler))
        .route("/quotes/{id}/render-plan", get(render_plan_handler));

    let owner = Router::new()
        .route("/quotes", get(list_quotes_handler).post(create_quote_handler))
        .route("/quotes/{id}", get(get_quote_handler).delete(delete_quote_handler))
        .route("/quotes/{id}/items", put(replace_items_handler))
        .route_layer(middleware::from_fn(owner_context));

    public.merge(owner).with_state(service)
}
