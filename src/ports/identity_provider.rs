//! Identity provider port for the hosted auth service.
//!
//! Covers the account lifecycle the server actions need: registration,
//! password sign-in, sign-out, session refresh and password recovery.

use async_trait::async_trait;
use secrecy::SecretString;
use thiserror::Error;

use crate::domain::foundation::UserId;
use crate::domain::profile::ProfileDetails;

#[async_trait]
pub trait IdentityProvider: Send + Sync {
    /// Registers a new account. Profile details travel as user metadata.
    async fn sign_up(&self, request: SignUpRequest) -> Result<SignUpOutcome, IdentityError>;

    async fn sign_in_with_password(
        &self,
        email: &str,
        password: &SecretString,
    ) -> Result<AuthSession, IdentityError>;

    /// Revokes the session behind `access_token`.
    async fn sign_out(&self, access_token: &SecretString) -> Result<(), IdentityError>;

    async fn refresh_session(
        &self,
        refresh_token: &SecretString,
    ) -> Result<AuthSession, IdentityError>;

    /// Sends a recovery email whose link lands on `redirect_to`.
    async fn send_password_reset(&self, email: &str, redirect_to: &str)
        -> Result<(), IdentityError>;

    /// Sets a new password for the user owning `access_token`.
    async fn update_password(
        &self,
        access_token: &SecretString,
        new_password: &SecretString,
    ) -> Result<(), IdentityError>;

    /// Admin lookup of the raw account record, used by data export.
    async fn get_user(&self, user_id: &UserId) -> Result<Option<serde_json::Value>, IdentityError>;
}

#[derive(Debug, Clone)]
pub struct SignUpRequest {
    pub email: String,
    pub password: SecretString,
    pub details: ProfileDetails,
    /// Where the confirmation link should land.
    pub email_redirect_to: Option<String>,
}

#[derive(Debug, Clone)]
pub struct SignUpOutcome {
    pub user_id: UserId,
    pub email: String,
    /// Absent when the provider requires email confirmation first.
    pub session: Option<AuthSession>,
}

/// Tokens for a signed-in browser.
#[derive(Debug, Clone)]
pub struct AuthSession {
    pub access_token: SecretString,
    pub refresh_token: SecretString,
    /// Access-token lifetime in seconds.
    pub expires_in: i64,
    pub user_id: UserId,
    pub email: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum IdentityError {
    /// The provider refused the request; the message is safe to show.
    #[error("{0}")]
    Rejected(String),

    /// The token presented is invalid or expired.
    #[error("Session expired. Please sign in again.")]
    Unauthorized,

    /// The provider could not be reached or failed internally.
    #[error("Auth provider unavailable: {0}")]
    Unavailable(String),
}

impl IdentityError {
    pub fn rejected(message: impl Into<String>) -> Self {
        Self::Rejected(message.into())
    }

    pub fn unavailable(message: impl Into<String>) -> Self {
        Self::Unavailable(message.into())
    }

    /// Message to show the user. Outages get a generic message.
    pub fn user_message(&self) -> String {
        match self {
            IdentityError::Rejected(message) => message.clone(),
            IdentityError::Unauthorized => self.to_string(),
            IdentityError::Unavailable(_) => {
                "Authentication is temporarily unavailable. Please try again.".to_string()
            }
        }
    }
}
