//! JSON error responses for the API routes.
//!
//! Body shape: `{ "error": { "code": "...", "message": "..." } }`. Messages are
//! short and human-readable; upstream detail is logged, never returned.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;

use crate::application::handlers::subscription::BillingError;
use crate::domain::billing::WebhookError;
use crate::domain::foundation::{DomainError, ErrorCode, ValidationError};

/// Standard error envelope for API errors.
#[derive(Debug, Clone, Serialize)]
pub struct ErrorResponse {
    pub error: ErrorBody,
}

#[derive(Debug, Clone, Serialize)]
pub struct ErrorBody {
    /// Error code for programmatic handling.
    pub code: String,
    /// Human-readable error message.
    pub message: String,
}

impl ErrorResponse {
    pub fn new(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            error: ErrorBody {
                code: code.into(),
                message: message.into(),
            },
        }
    }
}

/// API error that converts application errors to HTTP responses.
#[derive(Debug)]
pub struct ApiError {
    status: StatusCode,
    code: String,
    message: String,
}

impl ApiError {
    pub fn new(status: StatusCode, code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            status,
            code: code.into(),
            message: message.into(),
        }
    }

    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::new(StatusCode::BAD_REQUEST, ErrorCode::ValidationFailed.to_string(), message)
    }

    pub fn status(&self) -> StatusCode {
        self.status
    }
}

impl From<ValidationError> for ApiError {
    fn from(err: ValidationError) -> Self {
        Self::bad_request(err.to_string())
    }
}

impl From<DomainError> for ApiError {
    fn from(err: DomainError) -> Self {
        let status = match err.code {
            ErrorCode::ValidationFailed | ErrorCode::EmptyField | ErrorCode::InvalidFormat => {
                StatusCode::BAD_REQUEST
            }
            ErrorCode::ProfileNotFound
            | ErrorCode::PriceNotFound
            | ErrorCode::SubscriptionNotFound => StatusCode::NOT_FOUND,
            ErrorCode::Forbidden => StatusCode::FORBIDDEN,
            ErrorCode::PaymentProviderError => StatusCode::BAD_GATEWAY,
            ErrorCode::DatabaseError => StatusCode::INTERNAL_SERVER_ERROR,
        };

        let message = if status.is_server_error() {
            tracing::error!(error = %err, "Request failed");
            "Something went wrong. Please try again.".to_string()
        } else {
            err.message.clone()
        };

        Self::new(status, err.code.to_string(), message)
    }
}

impl From<BillingError> for ApiError {
    fn from(err: BillingError) -> Self {
        let (status, code) = match &err {
            BillingError::Validation(_) => (StatusCode::BAD_REQUEST, ErrorCode::ValidationFailed),
            BillingError::Forbidden => (StatusCode::FORBIDDEN, ErrorCode::Forbidden),
            BillingError::PriceNotFound(_) => (StatusCode::NOT_FOUND, ErrorCode::PriceNotFound),
            BillingError::SubscriptionNotFound => {
                (StatusCode::NOT_FOUND, ErrorCode::SubscriptionNotFound)
            }
            BillingError::ProfileNotFound => (StatusCode::NOT_FOUND, ErrorCode::ProfileNotFound),
            BillingError::Payment(e) => {
                tracing::error!(error = %e, "Payment provider call failed");
                (StatusCode::BAD_GATEWAY, ErrorCode::PaymentProviderError)
            }
            BillingError::Repository(e) => {
                tracing::error!(error = %e, "Billing store call failed");
                (StatusCode::INTERNAL_SERVER_ERROR, ErrorCode::DatabaseError)
            }
        };
        Self::new(status, code.to_string(), err.user_message())
    }
}

impl From<WebhookError> for ApiError {
    fn from(err: WebhookError) -> Self {
        let status = err.status_code();
        let code = if err.is_signature_failure() {
            "INVALID_SIGNATURE"
        } else if status.is_server_error() {
            "WEBHOOK_PROCESSING_FAILED"
        } else {
            "INVALID_WEBHOOK"
        };
        let message = if status.is_server_error() {
            "Webhook processing failed".to_string()
        } else {
            err.to_string()
        };
        Self::new(status, code, message)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (self.status, Json(ErrorResponse::new(self.code, self.message))).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ports::PaymentError;

    #[test]
    fn domain_not_found_is_404() {
        let err = ApiError::from(DomainError::new(ErrorCode::ProfileNotFound, "no profile"));
        assert_eq!(err.status(), StatusCode::NOT_FOUND);
    }

    #[test]
    fn database_detail_is_not_returned() {
        let err = ApiError::from(DomainError::database("relation user_profiles does not exist"));
        assert_eq!(err.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert!(!err.message.contains("user_profiles"));
    }

    #[test]
    fn billing_errors_map_to_statuses() {
        assert_eq!(ApiError::from(BillingError::Forbidden).status(), StatusCode::FORBIDDEN);
        assert_eq!(
            ApiError::from(BillingError::from(PaymentError::network("timeout"))).status(),
            StatusCode::BAD_GATEWAY
        );
    }

    #[test]
    fn signature_failures_are_400() {
        let err = ApiError::from(WebhookError::InvalidSignature);
        assert_eq!(err.status(), StatusCode::BAD_REQUEST);
        assert_eq!(err.code, "INVALID_SIGNATURE");
    }

    #[test]
    fn error_body_shape() {
        let body = serde_json::to_value(ErrorResponse::new("FORBIDDEN", "no")).unwrap();
        assert_eq!(body["error"]["code"], "FORBIDDEN");
        assert_eq!(body["error"]["message"], "no");
    }
}
