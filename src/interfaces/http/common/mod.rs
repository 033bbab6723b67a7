//! Response envelope, error mapping and extractors shared by all handlers

pub mod validated_json;

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;
use tracing::{error, warn};
use utoipa::ToSchema;

use crate::application::BookingError;
use crate::shared::DomainError;

pub use validated_json::ValidatedJson;

/// Uniform JSON envelope: `{"success": true, "data": ...}` or
/// `{"success": false, "message": "..."}`
#[derive(Debug, Serialize, ToSchema)]
pub struct ApiResponse<T> {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl<T> ApiResponse<T> {
    pub fn success(data: T) -> Self {
        Self {
            success: true,
            data: Some(data),
            message: None,
        }
    }

    pub fn with_message(data: T, message: impl Into<String>) -> Self {
        Self {
            success: true,
            data: Some(data),
            message: Some(message.into()),
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self {
            success: false,
            data: None,
            message: Some(message.into()),
        }
    }
}

/// Client-facing failure. Always rendered as a 4xx with the error envelope.
#[derive(Debug)]
pub enum ApiError {
    BadRequest(String),
    Unauthorized(String),
    Forbidden(String),
    NotFound(String),
    Conflict(String),
    Unprocessable(String),
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            Self::BadRequest(_) => StatusCode::BAD_REQUEST,
            Self::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            Self::Forbidden(_) => StatusCode::FORBIDDEN,
            Self::NotFound(_) => StatusCode::NOT_FOUND,
            Self::Conflict(_) => StatusCode::CONFLICT,
            Self::Unprocessable(_) => StatusCode::UNPROCESSABLE_ENTITY,
        }
    }

    pub fn message(&self) -> &str {
        match self {
            Self::BadRequest(m)
            | Self::Unauthorized(m)
            | Self::Forbidden(m)
            | Self::NotFound(m)
            | Self::Conflict(m)
            | Self::Unprocessable(m) => m,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        let body = ApiResponse::<()>::error(self.message());
        (status, Json(body)).into_response()
    }
}

impl From<DomainError> for ApiError {
    fn from(err: DomainError) -> Self {
        let message = err.reason();
        match err {
            DomainError::NotFound { .. } => Self::NotFound(message),
            DomainError::Validation(_) => Self::BadRequest(message),
            DomainError::Conflict(_) => Self::Conflict(message),
            DomainError::Unauthorized(_) => Self::Unauthorized(message),
            DomainError::Forbidden(_) => Self::Forbidden(message),
            DomainError::Storage(cause) => {
                error!(error = %cause, "Storage failure while handling request");
                Self::BadRequest(message)
            }
        }
    }
}

impl From<BookingError> for ApiError {
    fn from(err: BookingError) -> Self {
        match err {
            // Unknown catalog ids and bad input are both a bad cart
            BookingError::Rejected(inner) => match inner {
                DomainError::NotFound { .. } | DomainError::Validation(_) => {
                    Self::BadRequest(inner.reason())
                }
                other => other.into(),
            },
            BookingError::Failed { stage, source } => {
                warn!(stage = %stage, error = %source, "Booking failed");
                Self::BadRequest("Failed to create booking".to_string())
            }
        }
    }
}
