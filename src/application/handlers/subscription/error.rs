//! Errors raised by checkout and subscription management.

use thiserror::Error;

use crate::domain::foundation::{DomainError, ValidationError};
use crate::ports::{PaymentError, PaymentErrorCode};

#[derive(Debug, Error)]
pub enum BillingError {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    /// The caller asked to act on another user's billing.
    #[error("You can only manage your own subscription")]
    Forbidden,

    #[error("Price {0} is not available")]
    PriceNotFound(String),

    #[error("Subscription not found")]
    SubscriptionNotFound,

    #[error("Account profile not found")]
    ProfileNotFound,

    #[error("Payment provider error: {0}")]
    Payment(PaymentError),

    #[error("Database error: {0}")]
    Repository(#[from] DomainError),
}

impl From<PaymentError> for BillingError {
    fn from(err: PaymentError) -> Self {
        match err.code {
            PaymentErrorCode::NotFound => BillingError::SubscriptionNotFound,
            _ => BillingError::Payment(err),
        }
    }
}

impl BillingError {
    /// Message safe to return to the browser.
    pub fn user_message(&self) -> String {
        match self {
            BillingError::Payment(_) => {
                "The payment provider is unavailable. Please try again.".to_string()
            }
            BillingError::Repository(_) => "Something went wrong. Please try again.".to_string(),
            other => other.to_string(),
        }
    }
}
