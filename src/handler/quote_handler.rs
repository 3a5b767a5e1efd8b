use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    Extension, Json,
};
use bson::oid::ObjectId;
use chrono::Utc;
use std::sync::Arc;
use tracing::{error, info};
use validator::Validate;

use crate::dto::quote_dto::{CreateQuoteRequest, QuoteResponseDto, ReplaceItemsRequest, UpdateQuoteStatusRequest};
use crate::middlewares::owner_middleware::OwnerContext;
use crate::model::quote::QuoteStatus;
use crate::service::quote_service::{QuoteService, QuoteServiceImpl};
use crate::util::error::{HandlerError, ServiceError};

pub(crate) fn parse_object_id(raw: &str, what: &str) -> Result<ObjectId, HandlerError> {
    ObjectId::parse_str(raw).map_err(|_| HandlerError::bad_request(format!("Invalid {} id", what)))
}

pub async fn create_quote_handler(
    State(service): State<Arc<QuoteServiceImpl>>,
    Extension(owner): Extension<OwnerContext>,
    Json(payload): Json<CreateQuoteRequest>,
) -> Result<impl IntoResponse, HandlerError> {
    info!("[create_quote_handler] Handler called");
    payload.validate().map_err(HandlerError::validation)?;

    let created = service.create_quote(owner.owner_id, payload).await.map_err(|e| {
        error!("[create_quote_handler] Failed to create quote: {}", e);
        HandlerError::from(e)
    })?;
    Ok((StatusCode::CREATED, Json(QuoteResponseDto::from(created))))
}

pub async fn list_quotes_handler(
    State(service): State<Arc<QuoteServiceImpl>>,
    Extension(owner): Extension<OwnerContext>,
) -> Result<impl IntoResponse, HandlerError> {
    let quotes = service.list_quotes(owner.owner_id).await?;
    let body: Vec<QuoteResponseDto> = quotes.into_iter().map(QuoteResponseDto::from).collect();
    Ok(Json(body))
}

pub async fn get_quote_handler(
    State(service): State<Arc<QuoteServiceImpl>>,
    Extension(owner): Extension<OwnerContext>,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, HandlerError> {
    let id = parse_object_id(&id, "quote")?;
    let quote = service.get_quote(owner.owner_id, id).await?;
    Ok(Json(QuoteResponseDto::from(quote)))
}

pub async fn replace_items_handler(
    State(service): State<Arc<QuoteServiceImpl>>,
    Extension(owner): Extension<OwnerContext>,
    Path(id): Path<String>,
    Json(payload): Json<ReplaceItemsRequest>,
) -> Result<impl IntoResponse, HandlerError> {
    let id = parse_object_id(&id, "quote")?;
    payload.validate().map_err(HandlerError::validation)?;
    let updated = service.replace_items(owner.owner_id, id, payload.items).await?;
    Ok(Json(QuoteResponseDto::from(updated)))
}

pub async fn delete_quote_handler(
    State(service): State<Arc<QuoteServiceImpl>>,
    Extension(owner): Extension<OwnerContext>,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, HandlerError> {
    let id = parse_object_id(&id, "quote")?;
    service.delete_quote(owner.owner_id, id).await?;
    Ok(StatusCode::NO_CONTENT)
}

// Public: the customer approves or rejects through the shared link
pub async fn update_quote_status_handler(
    State(service): State<Arc<QuoteServiceImpl>>,
    Path(id): Path<String>,
    Json(payload): Json<UpdateQuoteStatusRequest>,
) -> Result<impl IntoResponse, HandlerError> {
    let id = parse_object_id(&id, "quote")?;
    payload.validate().map_err(HandlerError::validation)?;
    let status: QuoteStatus = payload.status.parse().map_err(ServiceError::from)?;

    let updated = service.change_status(id, status).await.map_err(|e| {
        error!("[update_quote_status_handler] Failed to update status: {}", e);
        HandlerError::from(e)
    })?;
    Ok(Json(QuoteResponseDto::from(updated)))
}

// Public: the shared document view
pub async fn render_plan_handler(
    State(service): State<Arc<QuoteServiceImpl>>,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, HandlerError> {
    let id = parse_object_id(&id, "quote")?;
    let plan = service.render_plan(id, Utc::now()).await?;
    Ok(Json(plan))
}
