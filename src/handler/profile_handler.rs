use axum::{
    extract::{Multipart, State},
    http::StatusCode,
    response::IntoResponse,
    Extension, Json,
};
use std::sync::Arc;
use tracing::{debug, error, info};
use validator::Validate;

use crate::dto::profile_dto::{EditBrandingRequest, LogoUpload, ProfileResponseDto, SaveProfileRequest};
use crate::middlewares::owner_middleware::OwnerContext;
use crate::model::color::HexColor;
use crate::service::profile_service::{ProfileService, ProfileServiceImpl};
use crate::util::error::{HandlerError, ServiceError};

pub async fn get_profile_handler(
    State(service): State<Arc<ProfileServiceImpl>>,
    Extension(owner): Extension<OwnerContext>,
) -> Result<impl IntoResponse, HandlerError> {
    let profile = service.get_profile(owner.owner_id).await?;
    Ok(Json(ProfileResponseDto::from(profile)))
}

pub async fn save_profile_handler(
    State(service): State<Arc<ProfileServiceImpl>>,
    Extension(owner): Extension<OwnerContext>,
    Json(payload): Json<SaveProfileRequest>,
) -> Result<impl IntoResponse, HandlerError> {
    payload.validate().map_err(HandlerError::validation)?;
    let saved = service.save_profile(owner.owner_id, payload).await?;
    Ok(Json(ProfileResponseDto::from(saved)))
}

/// Expects a multipart body with the image in a field named `file`.
pub async fn upload_logo_handler(
    State(service): State<Arc<ProfileServiceImpl>>,
    Extension(owner): Extension<OwnerContext>,
    mut multipart: Multipart,
) -> Result<impl IntoResponse, HandlerError> {
    info!("[upload_logo_handler] Handler called");
    let mut upload: Option<LogoUpload> = None;

    while let Some(field) = multipart.next_field().await.map_err(|e| {
        error!("[upload_logo_handler] Error getting next field: {}", e);
        HandlerError::bad_request(format!("Failed to get next field: {}", e))
    })? {
        let name = field.name().unwrap_or_default().to_string();
        debug!("[upload_logo_handler] Processing field: {}", name);
        if name != "file" {
            continue;
        }

        let filename = field.file_name().unwrap_or("logo").to_string();
        let content_type = field.content_type().unwrap_or("application/octet-stream").to_string();
        let content = field.bytes().await.map_err(|e| {
            error!("[upload_logo_handler] Failed to read file field: {}", e);
            HandlerError::bad_request(format!("Failed to read file field: {}", e))
        })?;
        upload = Some(LogoUpload {
            filename,
            content_type,
            content: content.to_vec(),
        });
    }

    let upload = upload.ok_or_else(|| HandlerError::bad_request("Missing 'file' field"))?;
    let response = service.upload_logo(owner.owner_id, upload).await?;
    Ok((StatusCode::ACCEPTED, Json(response)))
}

pub async fn branding_state_handler(
    State(service): State<Arc<ProfileServiceImpl>>,
    Extension(owner): Extension<OwnerContext>,
) -> Result<impl IntoResponse, HandlerError> {
    Ok(Json(service.branding_state(owner.owner_id).await?))
}

pub async fn edit_branding_handler(
    State(service): State<Arc<ProfileServiceImpl>>,
    Extension(owner): Extension<OwnerContext>,
    Json(payload): Json<EditBrandingRequest>,
) -> Result<impl IntoResponse, HandlerError> {
    payload.validate().map_err(HandlerError::validation)?;
    let color = payload
        .theme_color
        .as_deref()
        .map(HexColor::parse)
        .transpose()
        .map_err(ServiceError::from)?;
    let snapshot = service.edit_branding(owner.owner_id, color, payload.layout_style).await?;
    Ok(Json(snapshot))
}

pub async fn discard_branding_handler(
    State(service): State<Arc<ProfileServiceImpl>>,
    Extension(owner): Extension<OwnerContext>,
) -> Result<impl IntoResponse, HandlerError> {
    if service.discard_session(owner.owner_id) {
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(ServiceError::NotFound("No branding session open".to_string()).into())
    }
}
