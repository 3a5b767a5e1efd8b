use axum::{extract::Query, response::IntoResponse, Json};
use validator::Validate;

use crate::detection::category::{adjust_color_brightness, detect_category};
use crate::dto::detection_dto::{CategoryQuery, CategoryResponse, ColorAdjustQuery, ColorAdjustResponse};
use crate::model::color::HexColor;
use crate::util::error::{HandlerError, ServiceError};

pub async fn category_handler(Query(query): Query<CategoryQuery>) -> Result<impl IntoResponse, HandlerError> {
    query.validate().map_err(HandlerError::validation)?;
    let category = detect_category(&query.description);
    Ok(Json(CategoryResponse {
        description: query.description,
        category,
    }))
}

pub async fn adjust_color_handler(Query(query): Query<ColorAdjustQuery>) -> Result<impl IntoResponse, HandlerError> {
    query.validate().map_err(HandlerError::validation)?;
    let input = HexColor::parse(&query.hex).map_err(ServiceError::from)?;
    let hex = adjust_color_brightness(&query.hex, query.percent).map_err(ServiceError::from)?;
    Ok(Json(ColorAdjustResponse {
        input,
        percent: query.percent.clamp(-100.0, 100.0),
        hex,
    }))
}

pub async fn health_handler() -> impl IntoResponse {
    Json(serde_json::json!({ "status": "ok" }))
}
