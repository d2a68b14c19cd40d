//! Mock authentication adapters for testing.
//!
//! `MockSessionValidator` maps tokens to users. `MockIdentityProvider` keeps
//! accounts in memory and, when linked to a validator, registers every token
//! it issues so HTTP tests can sign in and then call protected routes.
//!
//! # Example
//!
//! ```ignore
//! let validator = Arc::new(MockSessionValidator::new());
//! let identity = MockIdentityProvider::new().linked_to(validator.clone());
//! ```

use std::collections::HashMap;
use std::sync::{Arc, RwLock};

use async_trait::async_trait;
use secrecy::{ExposeSecret, SecretString};

use crate::domain::foundation::{AuthError, AuthenticatedUser, UserId};
use crate::ports::{
    AuthSession, IdentityError, IdentityProvider, SessionValidator, SignUpOutcome, SignUpRequest,
};

/// Mock session validator for testing.
///
/// Tokens not in the map return `InvalidToken`.
#[derive(Debug, Default)]
pub struct MockSessionValidator {
    tokens: RwLock<HashMap<String, AuthenticatedUser>>,
    /// Tokens that validate as `TokenExpired`.
    expired: RwLock<Vec<String>>,
    force_error: RwLock<Option<AuthError>>,
}

impl MockSessionValidator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a valid token that maps to a user.
    pub fn with_user(self, token: impl Into<String>, user: AuthenticatedUser) -> Self {
        self.add_token(token, user);
        self
    }

    /// Adds a valid token for a fresh user with a derived test email.
    pub fn with_test_user(self, token: impl Into<String>, user_id: UserId) -> Self {
        let user = AuthenticatedUser::new(user_id, format!("{}@test.example.com", user_id), true);
        self.with_user(token, user)
    }

    /// Forces all validations to return the specified error.
    pub fn with_error(self, error: AuthError) -> Self {
        *self.force_error.write().unwrap() = Some(error);
        self
    }

    pub fn clear_error(&self) {
        *self.force_error.write().unwrap() = None;
    }

    pub fn add_token(&self, token: impl Into<String>, user: AuthenticatedUser) {
        self.tokens.write().unwrap().insert(token.into(), user);
    }

    /// Marks a token as expired.
    pub fn expire_token(&self, token: &str) {
        self.tokens.write().unwrap().remove(token);
        self.expired.write().unwrap().push(token.to_string());
    }

    pub fn remove_token(&self, token: &str) {
        self.tokens.write().unwrap().remove(token);
    }

    pub fn token_count(&self) -> usize {
        self.tokens.read().unwrap().len()
    }
}

#[async_trait]
impl SessionValidator for MockSessionValidator {
    async fn validate(&self, token: &str) -> Result<AuthenticatedUser, AuthError> {
        if let Some(error) = self.force_error.read().unwrap().clone() {
            return Err(error);
        }

        if self.expired.read().unwrap().iter().any(|t| t == token) {
            return Err(AuthError::TokenExpired);
        }

        self.tokens
            .read()
            .unwrap()
            .get(token)
            .cloned()
            .ok_or(AuthError::InvalidToken)
    }
}

#[derive(Debug, Clone)]
struct Account {
    user_id: UserId,
    password: String,
    metadata: serde_json::Value,
}

#[derive(Debug, Default)]
struct IdentityState {
    accounts: HashMap<String, Account>,
    /// refresh token -> email
    refresh_tokens: HashMap<String, String>,
    /// access token -> email
    access_tokens: HashMap<String, String>,
    password_resets: Vec<(String, String)>,
    signed_out: Vec<String>,
    issued: u64,
    force_error: Option<IdentityError>,
}

/// In-memory identity provider for testing.
#[derive(Debug, Default)]
pub struct MockIdentityProvider {
    state: RwLock<IdentityState>,
    /// Sign-up returns no session, as when email confirmation is on.
    require_confirmation: bool,
    validator: Option<Arc<MockSessionValidator>>,
}

impl MockIdentityProvider {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers issued access tokens with `validator`.
    pub fn linked_to(mut self, validator: Arc<MockSessionValidator>) -> Self {
        self.validator = Some(validator);
        self
    }

    pub fn requiring_confirmation(mut self) -> Self {
        self.require_confirmation = true;
        self
    }

    /// Seeds an existing account.
    pub fn with_account(self, email: &str, password: &str, user_id: UserId) -> Self {
        self.state.write().unwrap().accounts.insert(
            email.to_lowercase(),
            Account {
                user_id,
                password: password.to_string(),
                metadata: serde_json::Value::Null,
            },
        );
        self
    }

    pub fn with_error(self, error: IdentityError) -> Self {
        self.state.write().unwrap().force_error = Some(error);
        self
    }

    pub fn account_count(&self) -> usize {
        self.state.read().unwrap().accounts.len()
    }

    /// User metadata recorded at sign-up.
    pub fn metadata_for(&self, email: &str) -> Option<serde_json::Value> {
        self.state
            .read()
            .unwrap()
            .accounts
            .get(&email.to_lowercase())
            .map(|a| a.metadata.clone())
    }

    /// `(email, redirect_to)` pairs for every recovery email sent.
    pub fn password_resets(&self) -> Vec<(String, String)> {
        self.state.read().unwrap().password_resets.clone()
    }

    pub fn signed_out_tokens(&self) -> Vec<String> {
        self.state.read().unwrap().signed_out.clone()
    }

    pub fn password_for(&self, email: &str) -> Option<String> {
        self.state
            .read()
            .unwrap()
            .accounts
            .get(&email.to_lowercase())
            .map(|a| a.password.clone())
    }

    fn check_error(&self) -> Result<(), IdentityError> {
        match self.state.read().unwrap().force_error.clone() {
            Some(error) => Err(error),
            None => Ok(()),
        }
    }

    fn issue_session(&self, email: &str, user_id: UserId) -> AuthSession {
        let mut state = self.state.write().unwrap();
        state.issued += 1;
        let access = format!("access-{}-{}", user_id, state.issued);
        let refresh = format!("refresh-{}-{}", user_id, state.issued);
        state.access_tokens.insert(access.clone(), email.to_string());
        state.refresh_tokens.insert(refresh.clone(), email.to_string());
        drop(state);

        if let Some(validator) = &self.validator {
            validator.add_token(access.clone(), AuthenticatedUser::new(user_id, email, true));
        }

        AuthSession {
            access_token: SecretString::new(access),
            refresh_token: SecretString::new(refresh),
            expires_in: 3600,
            user_id,
            email: email.to_string(),
        }
    }
}

#[async_trait]
impl IdentityProvider for MockIdentityProvider {
    async fn sign_up(&self, request: SignUpRequest) -> Result<SignUpOutcome, IdentityError> {
        self.check_error()?;
        let email = request.email.to_lowercase();
        let user_id = {
            let mut state = self.state.write().unwrap();
            if state.accounts.contains_key(&email) {
                return Err(IdentityError::rejected("User already registered"));
            }
            let user_id = UserId::new();
            state.accounts.insert(
                email.clone(),
                Account {
                    user_id,
                    password: request.password.expose_secret().clone(),
                    metadata: serde_json::to_value(&request.details)
                        .unwrap_or(serde_json::Value::Null),
                },
            );
            user_id
        };

        let session = if self.require_confirmation {
            None
        } else {
            Some(self.issue_session(&email, user_id))
        };

        Ok(SignUpOutcome {
            user_id,
            email,
            session,
        })
    }

    async fn sign_in_with_password(
        &self,
        email: &str,
        password: &SecretString,
    ) -> Result<AuthSession, IdentityError> {
        self.check_error()?;
        let email = email.to_lowercase();
        let account = self.state.read().unwrap().accounts.get(&email).cloned();
        match account {
            Some(account) if account.password == *password.expose_secret() => {
                Ok(self.issue_session(&email, account.user_id))
            }
            _ => Err(IdentityError::rejected("Invalid login credentials")),
        }
    }

    async fn sign_out(&self, access_token: &SecretString) -> Result<(), IdentityError> {
        self.check_error()?;
        let token = access_token.expose_secret().clone();
        {
            let mut state = self.state.write().unwrap();
            state.access_tokens.remove(&token);
            state.signed_out.push(token.clone());
        }
        if let Some(validator) = &self.validator {
            validator.remove_token(&token);
        }
        Ok(())
    }

    async fn refresh_session(
        &self,
        refresh_token: &SecretString,
    ) -> Result<AuthSession, IdentityError> {
        self.check_error()?;
        let (email, user_id) = {
            let mut state = self.state.write().unwrap();
            let email = state
                .refresh_tokens
                .remove(refresh_token.expose_secret())
                .ok_or(IdentityError::Unauthorized)?;
            let user_id = state
                .accounts
                .get(&email)
                .map(|a| a.user_id)
                .ok_or(IdentityError::Unauthorized)?;
            (email, user_id)
        };
        Ok(self.issue_session(&email, user_id))
    }

    async fn send_password_reset(
        &self,
        email: &str,
        redirect_to: &str,
    ) -> Result<(), IdentityError> {
        self.check_error()?;
        self.state
            .write()
            .unwrap()
            .password_resets
            .push((email.to_string(), redirect_to.to_string()));
        Ok(())
    }

    async fn update_password(
        &self,
        access_token: &SecretString,
        new_password: &SecretString,
    ) -> Result<(), IdentityError> {
        self.check_error()?;
        let mut state = self.state.write().unwrap();
        let email = state
            .access_tokens
            .get(access_token.expose_secret())
            .cloned()
            .ok_or(IdentityError::Unauthorized)?;
        if let Some(account) = state.accounts.get_mut(&email) {
            account.password = new_password.expose_secret().clone();
        }
        Ok(())
    }

    async fn get_user(&self, user_id: &UserId) -> Result<Option<serde_json::Value>, IdentityError> {
        self.check_error()?;
        let state = self.state.read().unwrap();
        Ok(state
            .accounts
            .iter()
            .find(|(_, a)| a.user_id == *user_id)
            .map(|(email, a)| {
                serde_json::json!({
                    "id": a.user_id,
                    "email": email,
                    "user_metadata": a.metadata,
                })
            }))
    }
}
