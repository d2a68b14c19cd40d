//! SignInHandler, SignOutHandler - email/password sessions.

use std::sync::Arc;

use secrecy::SecretString;

use crate::domain::account::SignInForm;
use crate::ports::{AuthSession, IdentityProvider};

use super::AccountError;

#[derive(Debug, Clone)]
pub struct SignInCommand {
    pub form: SignInForm,
}

#[derive(Debug, Clone)]
pub struct SignInResult {
    pub session: AuthSession,
    /// Same-site path to continue to, if the form asked for one.
    pub redirect_to: Option<String>,
}

pub struct SignInHandler {
    identity: Arc<dyn IdentityProvider>,
}

impl SignInHandler {
    pub fn new(identity: Arc<dyn IdentityProvider>) -> Self {
        Self { identity }
    }

    pub async fn handle(&self, cmd: SignInCommand) -> Result<SignInResult, AccountError> {
        let credentials = cmd.form.validate()?;

        let session = self
            .identity
            .sign_in_with_password(&credentials.email, &credentials.password)
            .await?;

        tracing::info!(user_id = %session.user_id, "User signed in");

        Ok(SignInResult {
            session,
            redirect_to: credentials.redirect_to,
        })
    }
}

#[derive(Debug, Clone)]
pub struct SignOutCommand {
    /// The access token from the request, if there was one.
    pub access_token: Option<SecretString>,
}

pub struct SignOutHandler {
    identity: Arc<dyn IdentityProvider>,
}

impl SignOutHandler {
    pub fn new(identity: Arc<dyn IdentityProvider>) -> Self {
        Self { identity }
    }

    /// Revokes the session at the provider. Local cookies are cleared by the
    /// caller regardless, so a provider failure is logged and swallowed.
    pub async fn handle(&self, cmd: SignOutCommand) {
        let Some(token) = cmd.access_token else {
            return;
        };

        if let Err(e) = self.identity.sign_out(&token).await {
            tracing::warn!(error = %e, "Provider sign-out failed");
        }
    }
}
