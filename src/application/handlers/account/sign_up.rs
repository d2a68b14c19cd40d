//! SignUpHandler - registers an account with the hosted auth service and
//! records the firm profile.

use std::sync::Arc;

use crate::domain::foundation::UserId;
use crate::domain::profile::SignUpForm;
use crate::ports::{AuthSession, IdentityProvider, ProfileRepository, SignUpRequest};

use super::AccountError;

/// Command to register a new account.
#[derive(Debug, Clone)]
pub struct SignUpCommand {
    pub form: SignUpForm,
    /// Where the confirmation email should send the user back to.
    pub email_redirect_to: Option<String>,
}

/// Result of a successful registration.
#[derive(Debug, Clone)]
pub struct SignUpResult {
    pub user_id: UserId,
    pub email: String,
    /// `None` when the auth service requires email confirmation first.
    pub session: Option<AuthSession>,
}

impl SignUpResult {
    pub fn needs_confirmation(&self) -> bool {
        self.session.is_none()
    }
}

pub struct SignUpHandler {
    identity: Arc<dyn IdentityProvider>,
    profiles: Arc<dyn ProfileRepository>,
}

impl SignUpHandler {
    pub fn new(identity: Arc<dyn IdentityProvider>, profiles: Arc<dyn ProfileRepository>) -> Self {
        Self { identity, profiles }
    }

    pub async fn handle(&self, cmd: SignUpCommand) -> Result<SignUpResult, AccountError> {
        // 1. Validate before anything reaches the auth service
        let account = cmd.form.validate()?;

        // 2. Create the identity, carrying the profile as user metadata
        let outcome = self
            .identity
            .sign_up(SignUpRequest {
                email: account.email.clone(),
                password: account.password,
                details: account.details.clone(),
                email_redirect_to: cmd.email_redirect_to,
            })
            .await?;

        // 3. Write the profile row
        self.profiles
            .upsert_details(&outcome.user_id, &outcome.email, &account.details)
            .await
            .map_err(|e| {
                tracing::error!(user_id = %outcome.user_id, error = %e, "Profile upsert failed after sign-up");
                e
            })?;

        tracing::info!(user_id = %outcome.user_id, "Account registered");

        Ok(SignUpResult {
            user_id: outcome.user_id,
            email: outcome.email,
            session: outcome.session,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::auth::MockIdentityProvider;
    use crate::adapters::memory::InMemoryProfileRepository;
    use crate::domain::foundation::ValidationError;
    use crate::domain::profile::OrganizationType;
    use crate::ports::IdentityError;

    fn form() -> SignUpForm {
        SignUpForm {
            email: Some("Analyst@Fund.example".to_string()),
            password: Some("correct horse".to_string()),
            first_name: Some("Dana".to_string()),
            last_name: Some("Reyes".to_string()),
            organization_name: Some("Harbor Capital".to_string()),
            organization_type: Some("hedge_fund".to_string()),
            job_title: Some("Analyst".to_string()),
            phone: None,
        }
    }

    fn setup() -> (SignUpHandler, Arc<MockIdentityProvider>, InMemoryProfileRepository) {
        let identity = Arc::new(MockIdentityProvider::new());
        let profiles = InMemoryProfileRepository::new();
        let handler = SignUpHandler::new(identity.clone(), Arc::new(profiles.clone()));
        (handler, identity, profiles)
    }

    #[tokio::test]
    async fn registers_account_and_profile() {
        let (handler, identity, profiles) = setup();

        let result = handler
            .handle(SignUpCommand {
                form: form(),
                email_redirect_to: None,
            })
            .await
            .unwrap();

        assert_eq!(result.email, "analyst@fund.example");
        assert!(!result.needs_confirmation());
        assert_eq!(identity.account_count(), 1);

        let profile = profiles.get(&result.user_id).await.unwrap();
        assert_eq!(profile.organization_name.as_deref(), Some("Harbor Capital"));
        assert_eq!(profile.organization_type, Some(OrganizationType::HedgeFund));
        assert_eq!(profile.job_title.as_deref(), Some("Analyst"));
    }

    #[tokio::test]
    async fn missing_organization_type_creates_nothing() {
        let (handler, identity, profiles) = setup();
        let mut incomplete = form();
        incomplete.organization_type = None;

        let err = handler
            .handle(SignUpCommand {
                form: incomplete,
                email_redirect_to: None,
            })
            .await
            .unwrap_err();

        match err {
            AccountError::Validation(ValidationError::MissingFields { fields }) => {
                assert_eq!(fields, vec!["organization_type".to_string()]);
            }
            other => panic!("unexpected error: {:?}", other),
        }
        assert_eq!(identity.account_count(), 0);
        assert_eq!(profiles.count().await, 0);
    }

    #[tokio::test]
    async fn duplicate_email_is_rejected_by_provider() {
        let (handler, _identity, _profiles) = setup();
        let cmd = SignUpCommand {
            form: form(),
            email_redirect_to: None,
        };
        handler.handle(cmd.clone()).await.unwrap();

        let err = handler.handle(cmd).await.unwrap_err();
        assert_eq!(err.user_message(), "User already registered");
    }

    #[tokio::test]
    async fn confirmation_flow_returns_no_session() {
        let identity = Arc::new(MockIdentityProvider::new().requiring_confirmation());
        let profiles = InMemoryProfileRepository::new();
        let handler = SignUpHandler::new(identity, Arc::new(profiles.clone()));

        let result = handler
            .handle(SignUpCommand {
                form: form(),
                email_redirect_to: Some("https://research.example/auth/callback".to_string()),
            })
            .await
            .unwrap();

        assert!(result.needs_confirmation());
        assert_eq!(profiles.count().await, 1);
    }

    #[tokio::test]
    async fn provider_outage_is_reported_generically() {
        let identity =
            Arc::new(MockIdentityProvider::new().with_error(IdentityError::unavailable("503")));
        let handler = SignUpHandler::new(identity, Arc::new(InMemoryProfileRepository::new()));

        let err = handler
            .handle(SignUpCommand {
                form: form(),
                email_redirect_to: None,
            })
            .await
            .unwrap_err();
        assert!(err.is_upstream_failure());
    }
}
