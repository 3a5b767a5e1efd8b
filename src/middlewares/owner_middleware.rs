use axum::{body::Body, http::Request, http::StatusCode, middleware::Next, response::Response};
use bson::oid::ObjectId;
use tracing::debug;

/// Header carrying the authenticated user's id, set by the gateway.
pub const OWNER_HEADER: &str = "x-user-id";

/// The user a request acts for. Inserted as a request extension.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OwnerContext {
    pub owner_id: ObjectId,
}

pub async fn owner_context(mut req: Request<Body>, next: Next) -> Result<Response, StatusCode> {
    let owner_id = req
        .headers()
        .get(OWNER_HEADER)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| ObjectId::parse_str(v.trim()).ok());

    let Some(owner_id) = owner_id else {
        debug!("Missing or invalid {} header", OWNER_HEADER);
        return Err(StatusCode::UNAUTHORIZED);
    };

    req.extensions_mut().insert(OwnerContext { owner_id });
    Ok(next.run(req).await)
}
