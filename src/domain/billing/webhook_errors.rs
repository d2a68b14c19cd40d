//! Failures while accepting a payment-processor webhook.
//!
//! A 4xx response tells the processor the delivery itself is bad and should
//! not be resent. A 5xx asks for redelivery.

use http::StatusCode;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum WebhookError {
    #[error("Invalid signature")]
    InvalidSignature,

    /// Signed longer ago than the configured tolerance.
    #[error("Timestamp out of range")]
    TimestampOutOfRange,

    /// Signed too far in the future to be clock skew.
    #[error("Invalid timestamp")]
    InvalidTimestamp,

    #[error("Parse error: {0}")]
    ParseError(String),

    #[error("Missing field: {0}")]
    MissingField(&'static str),

    /// A test-mode event reached a live deployment, or the reverse.
    #[error("Livemode mismatch: event livemode={0}")]
    LivemodeMismatch(bool),

    #[error("Payment provider error: {0}")]
    PaymentProvider(String),

    #[error("Database error: {0}")]
    Database(String),
}

impl WebhookError {
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::PaymentProvider(_) | Self::Database(_))
    }

    /// The delivery could not be shown to come from the processor.
    pub fn is_signature_failure(&self) -> bool {
        matches!(
            self,
            Self::InvalidSignature | Self::TimestampOutOfRange | Self::InvalidTimestamp
        )
    }

    pub fn status_code(&self) -> StatusCode {
        if self.is_retryable() {
            StatusCode::INTERNAL_SERVER_ERROR
        } else {
            StatusCode::BAD_REQUEST
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_field_names_the_field() {
        assert_eq!(
            WebhookError::MissingField("customer").to_string(),
            "Missing field: customer"
        );
    }

    #[test]
    fn bad_deliveries_get_400_and_no_redelivery() {
        let bad = [
            WebhookError::InvalidSignature,
            WebhookError::TimestampOutOfRange,
            WebhookError::InvalidTimestamp,
            WebhookError::ParseError("eof".into()),
            WebhookError::MissingField("customer"),
            WebhookError::LivemodeMismatch(true),
        ];
        for err in bad {
            assert_eq!(err.status_code(), StatusCode::BAD_REQUEST, "{err}");
            assert!(!err.is_retryable());
        }
    }

    #[test]
    fn only_authenticity_failures_count_as_signature_failures() {
        assert!(WebhookError::TimestampOutOfRange.is_signature_failure());
        assert!(!WebhookError::ParseError("eof".into()).is_signature_failure());
        assert!(!WebhookError::LivemodeMismatch(false).is_signature_failure());
    }

    #[test]
    fn upstream_outages_ask_for_redelivery() {
        for err in [
            WebhookError::Database("connection reset".into()),
            WebhookError::PaymentProvider("timeout".into()),
        ] {
            assert_eq!(err.status_code(), StatusCode::INTERNAL_SERVER_ERROR);
            assert!(err.is_retryable());
        }
    }
}
