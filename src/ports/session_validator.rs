use async_trait::async_trait;

use crate::domain::foundation::{AuthError, AuthenticatedUser};

/// Turns an access token (Bearer header or session cookie) into a user.
///
/// Expired tokens must yield `AuthError::TokenExpired` rather than
/// `InvalidToken`; the HTTP layer refreshes the session only on expiry.
/// Outages of a remote verifier are `ServiceUnavailable`.
#[async_trait]
pub trait SessionValidator: Send + Sync {
    async fn validate(&self, token: &str) -> Result<AuthenticatedUser, AuthError>;
}
