//! Domain error types.
//!
//! `ValidationError` messages are shown to users verbatim in form
//! redirects, so they name the offending field the way the form does.

use std::fmt;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("{field} is required")]
    EmptyField { field: String },

    #[error("Missing required fields: {}", fields.join(", "))]
    MissingFields { fields: Vec<String> },

    #[error("{field}: {reason}")]
    InvalidFormat { field: String, reason: String },
}

impl ValidationError {
    pub fn empty_field(field: impl Into<String>) -> Self {
        ValidationError::EmptyField { field: field.into() }
    }

    /// Lists every absent field in submission order.
    pub fn missing_fields<I, S>(fields: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        ValidationError::MissingFields {
            fields: fields.into_iter().map(Into::into).collect(),
        }
    }

    pub fn invalid_format(field: impl Into<String>, reason: impl Into<String>) -> Self {
        ValidationError::InvalidFormat {
            field: field.into(),
            reason: reason.into(),
        }
    }
}

/// Stable codes carried in API error bodies.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorCode {
    ValidationFailed,
    EmptyField,
    InvalidFormat,
    ProfileNotFound,
    PriceNotFound,
    SubscriptionNotFound,
    Forbidden,
    PaymentProviderError,
    DatabaseError,
}

impl ErrorCode {
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorCode::ValidationFailed => "VALIDATION_FAILED",
            ErrorCode::EmptyField => "EMPTY_FIELD",
            ErrorCode::InvalidFormat => "INVALID_FORMAT",
            ErrorCode::ProfileNotFound => "PROFILE_NOT_FOUND",
            ErrorCode::PriceNotFound => "PRICE_NOT_FOUND",
            ErrorCode::SubscriptionNotFound => "SUBSCRIPTION_NOT_FOUND",
            ErrorCode::Forbidden => "FORBIDDEN",
            ErrorCode::PaymentProviderError => "PAYMENT_PROVIDER_ERROR",
            ErrorCode::DatabaseError => "DATABASE_ERROR",
        }
    }

    /// Codes whose message is safe to show to the caller.
    pub fn is_client_error(&self) -> bool {
        !matches!(
            self,
            ErrorCode::PaymentProviderError | ErrorCode::DatabaseError
        )
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Failure of a command or query, tagged with a stable code.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("[{code}] {message}")]
pub struct DomainError {
    pub code: ErrorCode,
    pub message: String,
}

impl DomainError {
    pub fn new(code: ErrorCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
        }
    }

    pub fn database(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::DatabaseError, message)
    }
}

impl From<ValidationError> for DomainError {
    fn from(err: ValidationError) -> Self {
        let code = match &err {
            ValidationError::EmptyField { .. } => ErrorCode::EmptyField,
            ValidationError::InvalidFormat { .. } => ErrorCode::InvalidFormat,
            ValidationError::MissingFields { .. } => ErrorCode::ValidationFailed,
        };
        DomainError::new(code, err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_fields_are_listed_in_order() {
        let err = ValidationError::missing_fields(["organization_type", "last_name"]);
        assert_eq!(
            err.to_string(),
            "Missing required fields: organization_type, last_name"
        );
    }

    #[test]
    fn field_errors_name_the_field() {
        assert_eq!(ValidationError::empty_field("email").to_string(), "email is required");
        assert_eq!(
            ValidationError::invalid_format("password", "must be at least 8 characters")
                .to_string(),
            "password: must be at least 8 characters"
        );
    }

    #[test]
    fn domain_error_shows_code() {
        let err = DomainError::new(ErrorCode::ProfileNotFound, "no profile for user");
        assert_eq!(err.to_string(), "[PROFILE_NOT_FOUND] no profile for user");
    }

    #[test]
    fn validation_converts_with_matching_code() {
        let err: DomainError = ValidationError::empty_field("phone").into();
        assert_eq!(err.code, ErrorCode::EmptyField);
        assert_eq!(err.message, "phone is required");

        let err: DomainError = ValidationError::missing_fields(["email"]).into();
        assert_eq!(err.code, ErrorCode::ValidationFailed);
    }

    #[test]
    fn infrastructure_codes_are_not_client_errors() {
        assert!(ErrorCode::Forbidden.is_client_error());
        assert!(!ErrorCode::DatabaseError.is_client_error());
    }
}
