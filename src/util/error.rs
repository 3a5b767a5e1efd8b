use axum::{response::{IntoResponse, Response}, http::StatusCode};
use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum HandlerErrorKind {
    NotFound,
    Validation,
    Internal,
    Unauthorized,
    Conflict,
    BadRequest,
}

impl std::fmt::Display for HandlerErrorKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            HandlerErrorKind::NotFound => "NotFound",
            HandlerErrorKind::Validation => "Validation",
            HandlerErrorKind::Internal => "Internal",
            HandlerErrorKind::Unauthorized => "Unauthorized",
            HandlerErrorKind::Conflict => "Conflict",
            HandlerErrorKind::BadRequest => "BadRequest",
        };
        write!(f, "{}", s)
    }
}

#[derive(Debug, Serialize)]
pub struct HandlerError {
    pub error: HandlerErrorKind,
    pub message: String,
    pub details: Option<String>,
}

impl HandlerError {
    pub fn bad_request(message: impl Into<String>) -> Self {
        HandlerError {
            error: HandlerErrorKind::BadRequest,
            message: message.into(),
            details: None,
        }
    }

    pub fn validation(details: impl std::fmt::Display) -> Self {
        HandlerError {
            error: HandlerErrorKind::Validation,
            message: "Validation error".to_string(),
            details: Some(details.to_string()),
        }
    }
}

impl std::fmt::Display for HandlerError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.error, self.message)
    }
}

impl std::error::Error for HandlerError {}

impl IntoResponse for HandlerError {
    fn into_response(self) -> Response {
        let status = match self.error {
            HandlerErrorKind::NotFound => StatusCode::NOT_FOUND,
            HandlerErrorKind::Validation | HandlerErrorKind::BadRequest => StatusCode::BAD_REQUEST,
            HandlerErrorKind::Unauthorized => StatusCode::UNAUTHORIZED,
            HandlerErrorKind::Conflict => StatusCode::CONFLICT,
            HandlerErrorKind::Internal => StatusCode::INTERNAL_SERVER_ERROR,
        };
        let body = axum::Json(self);
        (status, body).into_response()
    }
}

impl From<ServiceError> for HandlerError {
    fn from(err: ServiceError) -> Self {
        let error = match &err {
            ServiceError::NotFound(_) => HandlerErrorKind::NotFound,
            ServiceError::InvalidInput(_) => HandlerErrorKind::BadRequest,
            ServiceError::Conflict(_) => HandlerErrorKind::Conflict,
            ServiceError::InternalError(_) => HandlerErrorKind::Internal,
        };
        HandlerError {
            error,
            message: err.to_string(),
            details: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ServiceError {
    NotFound(String),
    InvalidInput(String),
    InternalError(String),
    Conflict(String),
}

impl std::fmt::Display for ServiceError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ServiceError::NotFound(msg) => write!(f, "Not Found: {}", msg),
            ServiceError::InvalidInput(msg) => write!(f, "Invalid Input: {}", msg),
            ServiceError::InternalError(msg) => write!(f, "Internal Error: {}", msg),
            ServiceError::Conflict(msg) => write!(f, "Conflict: {}", msg),
        }
    }
}

impl std::error::Error for ServiceError {}

// Allow conversion from RepositoryError to ServiceError
impl From<crate::repository::repository_error::RepositoryError> for ServiceError {
    fn from(err: crate::repository::repository_error::RepositoryError) -> Self {
        use crate::repository::repository_error::RepositoryError;
        match err {
            RepositoryError::NotFound(msg) => ServiceError::NotFound(msg),
            RepositoryError::ValidationError(msg) => ServiceError::InvalidInput(msg),
            RepositoryError::AlreadyExists(msg) => ServiceError::Conflict(msg),
            RepositoryError::DatabaseError(msg) => ServiceError::InternalError(msg),
            RepositoryError::ConnectionError(msg) => ServiceError::InternalError(msg),
            RepositoryError::SerializationError(msg) => ServiceError::InternalError(msg),
            RepositoryError::Generic(e) => ServiceError::InternalError(e.to_string()),
        }
    }
}

impl From<crate::model::quote::QuoteError> for ServiceError {
    fn from(err: crate::model::quote::QuoteError) -> Self {
        use crate::model::quote::QuoteError;
        match err {
            QuoteError::UnknownStatus(_) => ServiceError::InvalidInput(err.to_string()),
            QuoteError::AlreadyFinalized { .. } | QuoteError::InvalidTransition { .. } => {
                ServiceError::Conflict(err.to_string())
            }
        }
    }
}

impl From<crate::util::money::MoneyError> for ServiceError {
    fn from(err: crate::util::money::MoneyError) -> Self {
        ServiceError::InvalidInput(err.to_string())
    }
}

impl From<crate::model::color::ColorError> for ServiceError {
    fn from(err: crate::model::color::ColorError) -> Self {
        ServiceError::InvalidInput(err.to_string())
    }
}

impl From<crate::util::minio::MinioError> for ServiceError {
    fn from(err: crate::util::minio::MinioError) -> Self {
        ServiceError::InternalError(format!("Object storage error: {}", err))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::quote::{QuoteError, QuoteStatus};

    #[test]
    fn test_quote_error_mapping() {
        let err: ServiceError = QuoteError::AlreadyFinalized {
            current: QuoteStatus::Approved,
            requested: QuoteStatus::Rejected,
        }
        .into();
        assert!(matches!(err, ServiceError::Conflict(_)));

        let err: ServiceError = QuoteError::UnknownStatus("archived".to_string()).into();
        assert!(matches!(err, ServiceError::InvalidInput(_)));
    }

    #[test]
    fn test_handler_error_status_codes() {
        let resp = HandlerError::from(ServiceError::NotFound("quote".to_string())).into_response();
        assert_eq!(resp.status(), StatusCode::NOT_FOUND);
        let resp = HandlerError::from(ServiceError::Conflict("final".to_string())).into_response();
        assert_eq!(resp.status(), StatusCode::CONFLICT);
        let resp = HandlerError::validation("client_name: too short").into_response();
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    }
}
