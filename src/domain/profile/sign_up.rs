//! Sign-up form validation.

use secrecy::SecretString;
use serde::Deserialize;

use crate::domain::foundation::ValidationError;

use super::{OrganizationType, ProfileDetails};

const MIN_PASSWORD_LEN: usize = 8;

/// Raw sign-up form, as posted by the browser.
///
/// Every field is optional here so that all missing fields can be
/// reported together; unknown fields are rejected outright.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SignUpForm {
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub password: Option<String>,
    #[serde(default)]
    pub first_name: Option<String>,
    #[serde(default)]
    pub last_name: Option<String>,
    #[serde(default)]
    pub organization_name: Option<String>,
    #[serde(default)]
    pub organization_type: Option<String>,
    #[serde(default)]
    pub job_title: Option<String>,
    #[serde(default)]
    pub phone: Option<String>,
}

/// A validated registration.
#[derive(Debug, Clone)]
pub struct NewAccount {
    pub email: String,
    pub password: SecretString,
    pub details: ProfileDetails,
}

fn present(value: &Option<String>) -> Option<String> {
    value
        .as_ref()
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

impl SignUpForm {
    /// Validates the form.
    ///
    /// # Errors
    ///
    /// `MissingFields` listing every absent required field, otherwise the
    /// first format problem found.
    pub fn validate(self) -> Result<NewAccount, ValidationError> {
        let required = [
            ("email", present(&self.email)),
            // Passwords are not trimmed, only checked for presence.
            ("password", self.password.clone().filter(|p| !p.is_empty())),
            ("first_name", present(&self.first_name)),
            ("last_name", present(&self.last_name)),
            ("organization_name", present(&self.organization_name)),
            ("organization_type", present(&self.organization_type)),
        ];

        let missing: Vec<&str> = required
            .iter()
            .filter(|(_, value)| value.is_none())
            .map(|(name, _)| *name)
            .collect();
        if !missing.is_empty() {
            return Err(ValidationError::missing_fields(missing));
        }

        let [email, password, first_name, last_name, organization_name, organization_type] =
            required.map(|(_, value)| value.unwrap_or_default());

        let email = email.to_ascii_lowercase();
        if !is_plausible_email(&email) {
            return Err(ValidationError::invalid_format(
                "email",
                "must be a valid email address",
            ));
        }
        if password.chars().count() < MIN_PASSWORD_LEN {
            return Err(ValidationError::invalid_format(
                "password",
                format!("must be at least {} characters", MIN_PASSWORD_LEN),
            ));
        }
        let organization_type: OrganizationType = organization_type.parse()?;

        Ok(NewAccount {
            email,
            password: SecretString::new(password),
            details: ProfileDetails {
                first_name,
                last_name,
                organization_name,
                organization_type,
                job_title: present(&self.job_title),
                phone: present(&self.phone),
            },
        })
    }
}

pub(crate) fn is_plausible_email(email: &str) -> bool {
    match email.split_once('@') {
        Some((local, domain)) => {
            !local.is_empty()
                && domain.contains('.')
                && !domain.starts_with('.')
                && !domain.ends_with('.')
                && !email.chars().any(char::is_whitespace)
        }
        None => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use secrecy::ExposeSecret;

    fn complete_form() -> SignUpForm {
        SignUpForm {
            email: Some(" PM@Fund.Example ".to_string()),
            password: Some("correct horse".to_string()),
            first_name: Some("Ada".to_string()),
            last_name: Some("Byron".to_string()),
            organization_name: Some("Analytical Capital".to_string()),
            organization_type: Some("hedge_fund".to_string()),
            job_title: Some("Portfolio Manager".to_string()),
            phone: None,
        }
    }

    #[test]
    fn complete_form_validates() {
        let account = complete_form().validate().unwrap();

        assert_eq!(account.email, "pm@fund.example");
        assert_eq!(account.password.expose_secret(), "correct horse");
        assert_eq!(account.details.organization_type, OrganizationType::HedgeFund);
        assert_eq!(account.details.job_title.as_deref(), Some("Portfolio Manager"));
        assert!(account.details.phone.is_none());
    }

    #[test]
    fn missing_organization_type_is_reported() {
        let form = SignUpForm {
            organization_type: None,
            ..complete_form()
        };

        assert_eq!(
            form.validate().unwrap_err(),
            ValidationError::missing_fields(["organization_type"])
        );
    }

    #[test]
    fn every_missing_field_is_listed() {
        let err = SignUpForm::default().validate().unwrap_err();
        let message = err.to_string();

        for field in [
            "email",
            "password",
            "first_name",
            "last_name",
            "organization_name",
            "organization_type",
        ] {
            assert!(message.contains(field), "{} not in {}", field, message);
        }
    }

    #[test]
    fn whitespace_only_counts_as_missing() {
        let form = SignUpForm {
            last_name: Some("   ".to_string()),
            ..complete_form()
        };
        assert_eq!(
            form.validate().unwrap_err(),
            ValidationError::missing_fields(["last_name"])
        );
    }

    #[test]
    fn short_password_is_rejected() {
        let form = SignUpForm {
            password: Some("short".to_string()),
            ..complete_form()
        };
        assert!(matches!(
            form.validate(),
            Err(ValidationError::InvalidFormat { field, .. }) if field == "password"
        ));
    }

    #[test]
    fn malformed_email_is_rejected() {
        for email in ["no-at-sign", "a@b", "@fund.example", "a b@fund.example"] {
            let form = SignUpForm {
                email: Some(email.to_string()),
                ..complete_form()
            };
            assert!(form.validate().is_err(), "{}", email);
        }
    }

    #[test]
    fn unknown_organization_type_is_rejected() {
        let form = SignUpForm {
            organization_type: Some("bakery".to_string()),
            ..complete_form()
        };
        assert!(matches!(
            form.validate(),
            Err(ValidationError::InvalidFormat { field, .. }) if field == "organization_type"
        ));
    }

    #[test]
    fn unknown_form_fields_are_rejected() {
        let parsed: Result<SignUpForm, _> =
            serde_urlencoded::from_str("email=a%40b.co&is_admin=true");
        assert!(parsed.is_err());
    }
}
