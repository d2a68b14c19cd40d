use secrecy::SecretString;
use serde::Deserialize;

use crate::domain::foundation::ValidationError;
use crate::domain::profile::is_plausible_email;

const MIN_PASSWORD_LEN: usize = 8;

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SignInForm {
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub password: Option<String>,
    /// Where to land after signing in; only same-site paths are honoured.
    #[serde(default)]
    pub redirect_to: Option<String>,
}

#[derive(Debug, Clone)]
pub struct SignIn {
    pub email: String,
    pub password: SecretString,
    pub redirect_to: Option<String>,
}

impl SignInForm {
    pub fn validate(self) -> Result<SignIn, ValidationError> {
        let email = self
            .email
            .map(|e| e.trim().to_ascii_lowercase())
            .filter(|e| !e.is_empty());
        let password = self.password.filter(|p| !p.is_empty());

        match (email, password) {
            (Some(email), Some(password)) => Ok(SignIn {
                email,
                password: SecretString::new(password),
                redirect_to: self.redirect_to.filter(|p| is_local_path(p)),
            }),
            (email, password) => {
                let mut missing = Vec::new();
                if email.is_none() {
                    missing.push("email");
                }
                if password.is_none() {
                    missing.push("password");
                }
                Err(ValidationError::missing_fields(missing))
            }
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ForgotPasswordForm {
    #[serde(default)]
    pub email: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PasswordResetRequest {
    pub email: String,
}

impl ForgotPasswordForm {
    pub fn validate(self) -> Result<PasswordResetRequest, ValidationError> {
        let email = self
            .email
            .map(|e| e.trim().to_ascii_lowercase())
            .filter(|e| !e.is_empty())
            .ok_or_else(|| ValidationError::empty_field("email"))?;
        if !is_plausible_email(&email) {
            return Err(ValidationError::invalid_format(
                "email",
                "must be a valid email address",
            ));
        }
        Ok(PasswordResetRequest { email })
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ResetPasswordForm {
    #[serde(default)]
    pub password: Option<String>,
    #[serde(default)]
    pub confirm_password: Option<String>,
}

#[derive(Debug, Clone)]
pub struct PasswordReset {
    pub password: SecretString,
}

impl ResetPasswordForm {
    pub fn validate(self) -> Result<PasswordReset, ValidationError> {
        let password = self
            .password
            .filter(|p| !p.is_empty())
            .ok_or_else(|| ValidationError::empty_field("password"))?;
        if password.chars().count() < MIN_PASSWORD_LEN {
            return Err(ValidationError::invalid_format(
                "password",
                format!("must be at least {} characters", MIN_PASSWORD_LEN),
            ));
        }
        if self.confirm_password.as_deref() != Some(password.as_str()) {
            return Err(ValidationError::invalid_format(
                "confirm_password",
                "passwords do not match",
            ));
        }
        Ok(PasswordReset {
            password: SecretString::new(password),
        })
    }
}

/// True for `/path` but not `//host` or absolute URLs.
pub(crate) fn is_local_path(path: &str) -> bool {
    path.starts_with('/') && !path.starts_with("//") && !path.contains("://") && !path.contains('\\')
}
