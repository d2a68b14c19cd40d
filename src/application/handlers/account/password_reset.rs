//! RequestPasswordResetHandler, ResetPasswordHandler - password recovery.

use std::sync::Arc;

use secrecy::SecretString;

use crate::domain::account::{ForgotPasswordForm, ResetPasswordForm};
use crate::ports::IdentityProvider;

use super::AccountError;

#[derive(Debug, Clone)]
pub struct RequestPasswordResetCommand {
    pub form: ForgotPasswordForm,
    /// Page the recovery email links back to.
    pub redirect_to: String,
}

pub struct RequestPasswordResetHandler {
    identity: Arc<dyn IdentityProvider>,
}

impl RequestPasswordResetHandler {
    pub fn new(identity: Arc<dyn IdentityProvider>) -> Self {
        Self { identity }
    }

    pub async fn handle(&self, cmd: RequestPasswordResetCommand) -> Result<(), AccountError> {
        let request = cmd.form.validate()?;

        self.identity
            .send_password_reset(&request.email, &cmd.redirect_to)
            .await?;

        tracing::info!("Password recovery email requested");
        Ok(())
    }
}

#[derive(Debug, Clone)]
pub struct ResetPasswordCommand {
    /// Recovery session issued when the user followed the email link.
    pub access_token: SecretString,
    pub form: ResetPasswordForm,
}

pub struct ResetPasswordHandler {
    identity: Arc<dyn IdentityProvider>,
}

impl ResetPasswordHandler {
    pub fn new(identity: Arc<dyn IdentityProvider>) -> Self {
        Self { identity }
    }

    pub async fn handle(&self, cmd: ResetPasswordCommand) -> Result<(), AccountError> {
        let reset = cmd.form.validate()?;

        self.identity
            .update_password(&cmd.access_token, &reset.password)
            .await?;

        tracing::info!("Password updated");
        Ok(())
    }
}
