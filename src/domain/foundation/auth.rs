//! Identity of the caller, as established from a session token.

use super::UserId;
use thiserror::Error;

/// A signed-in user, built from verified access-token claims.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthenticatedUser {
    pub id: UserId,
    pub email: String,
    pub email_verified: bool,
}

impl AuthenticatedUser {
    pub fn new(id: UserId, email: impl Into<String>, email_verified: bool) -> Self {
        Self {
            id,
            email: email.into(),
            email_verified,
        }
    }
}

/// Why a session token was not accepted.
///
/// Expiry is reported separately so the caller can try the refresh token.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AuthError {
    #[error("Invalid or expired token")]
    InvalidToken,

    #[error("Token expired")]
    TokenExpired,

    #[error("Auth service unavailable: {0}")]
    ServiceUnavailable(String),
}

impl AuthError {
    pub fn service_unavailable(message: impl Into<String>) -> Self {
        Self::ServiceUnavailable(message.into())
    }
}
