//! HTTP error mapping shared by the REST and stream endpoints.
//!
//! | ErrorCode | Status |
//! |-----------|--------|
//! | `VALIDATION_FAILED` | 400 Bad Request |
//! | `CAMPAIGN_NOT_FOUND` | 404 Not Found |
//! | `INVALID_TRANSITION` | 409 Conflict |
//! | `TRANSPORT_WRITE_FAILURE` | 500 Internal Server Error |
//! | `INTERNAL_ERROR` | 500 Internal Server Error |

use std::collections::HashMap;

use axum::extract::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::Serialize;

use crate::domain::campaign::ProgressError;
use crate::domain::foundation::{DomainError, ErrorCode, ValidationError};

/// Error response body.
#[derive(Debug, Clone, Serialize)]
pub struct ErrorResponse {
    pub error_code: String,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<HashMap<String, String>>,
}

impl ErrorResponse {
    pub fn new(error_code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            error_code: error_code.into(),
            message: message.into(),
            details: None,
        }
    }
}

impl From<&DomainError> for ErrorResponse {
    fn from(err: &DomainError) -> Self {
        Self {
            error_code: err.code.to_string(),
            message: err.message.clone(),
            details: (!err.details.is_empty()).then(|| err.details.clone()),
        }
    }
}

/// Domain error on its way out as an HTTP response.
#[derive(Debug)]
pub struct ApiError(pub DomainError);

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self.0.code {
            ErrorCode::ValidationFailed => StatusCode::BAD_REQUEST,
            ErrorCode::CampaignNotFound => StatusCode::NOT_FOUND,
            ErrorCode::InvalidTransition => StatusCode::CONFLICT,
            ErrorCode::TransportWriteFailure | ErrorCode::InternalError => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }
}

impl From<DomainError> for ApiError {
    fn from(err: DomainError) -> Self {
        Self(err)
    }
}

impl From<ProgressError> for ApiError {
    fn from(err: ProgressError) -> Self {
        Self(err.into())
    }
}

impl From<ValidationError> for ApiError {
    fn from(err: ValidationError) -> Self {
        Self(err.into())
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            tracing::error!(error = %self.0, "Request failed");
        }
        (status, Json(ErrorResponse::from(&self.0))).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::foundation::CampaignId;

    #[test]
    fn not_found_maps_to_404() {
        let id = CampaignId::new("c-1").unwrap();
        let err = ApiError::from(ProgressError::not_found(&id));
        assert_eq!(err.status(), StatusCode::NOT_FOUND);
    }

    #[test]
    fn invalid_transition_maps_to_409() {
        let id = CampaignId::new("c-1").unwrap();
        let err = ApiError::from(ProgressError::invalid_transition(&id, None, "no pending"));
        assert_eq!(err.status(), StatusCode::CONFLICT);
    }

    #[test]
    fn validation_maps_to_400_with_field_detail() {
        let err = ApiError::from(ValidationError::empty_field("campaign_id"));
        let body = ErrorResponse::from(&err.0);

        assert_eq!(err.status(), StatusCode::BAD_REQUEST);
        assert_eq!(body.error_code, "VALIDATION_FAILED");
        assert_eq!(body.details.unwrap().get("field").unwrap(), "campaign_id");
    }

    #[test]
    fn error_response_omits_empty_details() {
        let body = ErrorResponse::new("INTERNAL_ERROR", "boom");
        let json = serde_json::to_value(&body).unwrap();
        assert!(json.get("details").is_none());
        assert_eq!(json["error_code"], "INTERNAL_ERROR");
    }
}
