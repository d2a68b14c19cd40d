//! Errors raised by the account actions.

use thiserror::Error;

use crate::domain::foundation::{DomainError, ValidationError};
use crate::ports::IdentityError;

#[derive(Debug, Error)]
pub enum AccountError {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error(transparent)]
    Identity(#[from] IdentityError),

    #[error("Profile store error: {0}")]
    Profile(#[from] DomainError),
}

impl AccountError {
    /// Short message shown in the redirect after a failed action.
    ///
    /// Provider rejections are shown verbatim; outages and store failures
    /// collapse to a generic message.
    pub fn user_message(&self) -> String {
        match self {
            AccountError::Validation(err) => err.to_string(),
            AccountError::Identity(err) => err.user_message(),
            AccountError::Profile(_) => {
                "We could not save your profile. Please try again.".to_string()
            }
        }
    }

    pub fn is_upstream_failure(&self) -> bool {
        matches!(
            self,
            AccountError::Identity(IdentityError::Unavailable(_)) | AccountError::Profile(_)
        )
    }
}
