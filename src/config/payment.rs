//! Payment configuration

use secrecy::{ExposeSecret, SecretString};
use serde::Deserialize;

use super::error::{require, ValidationError};

/// Payment configuration (Stripe)
#[derive(Debug, Clone, Deserialize)]
pub struct PaymentConfig {
    /// Stripe secret API key
    pub stripe_api_key: SecretString,

    /// Stripe webhook signing secret
    pub stripe_webhook_secret: SecretString,

    /// Maximum webhook age in seconds
    #[serde(default = "default_webhook_tolerance")]
    pub webhook_tolerance_secs: i64,

    /// Reject test-mode events
    #[serde(default)]
    pub require_livemode: bool,

    /// Stripe API base URL, overridable for local mocks
    #[serde(default = "default_api_base_url")]
    pub api_base_url: String,
}

impl PaymentConfig {
    /// Check if using Stripe test mode
    pub fn is_test_mode(&self) -> bool {
        self.stripe_api_key.expose_secret().starts_with("sk_test_")
    }

    /// Check if using Stripe live mode
    pub fn is_live_mode(&self) -> bool {
        self.stripe_api_key.expose_secret().starts_with("sk_live_")
    }

    /// Validate payment configuration
    pub fn validate(&self) -> Result<(), ValidationError> {
        let api_key = self.stripe_api_key.expose_secret();
        let webhook_secret = self.stripe_webhook_secret.expose_secret();

        require("PAYMENT__STRIPE_API_KEY", api_key)?;
        require("PAYMENT__STRIPE_WEBHOOK_SECRET", webhook_secret)?;

        // Publishable keys cannot call the API.
        if !(api_key.starts_with("sk_") || api_key.starts_with("rk_")) {
            return Err(ValidationError::invalid(
                "PAYMENT__STRIPE_API_KEY",
                "must be a secret (sk_) or restricted (rk_) key",
            ));
        }
        if !webhook_secret.starts_with("whsec_") {
            return Err(ValidationError::invalid(
                "PAYMENT__STRIPE_WEBHOOK_SECRET",
                "must start with whsec_",
            ));
        }
        if !(1..=3600).contains(&self.webhook_tolerance_secs) {
            return Err(ValidationError::invalid(
                "PAYMENT__WEBHOOK_TOLERANCE_SECS",
                "must be between 1 and 3600",
            ));
        }

        Ok(())
    }
}

fn default_webhook_tolerance() -> i64 {
    300
}

fn default_api_base_url() -> String {
    "https://api.stripe.com".to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config(api_key: &str, webhook_secret: &str) -> PaymentConfig {
        PaymentConfig {
            stripe_api_key: SecretString::new(api_key.to_string()),
            stripe_webhook_secret: SecretString::new(webhook_secret.to_string()),
            webhook_tolerance_secs: default_webhook_tolerance(),
            require_livemode: false,
            api_base_url: default_api_base_url(),
        }
    }

    #[test]
    fn test_is_test_mode() {
        let config = config("sk_test_xxx", "whsec_xxx");
        assert!(config.is_test_mode());
        assert!(!config.is_live_mode());
    }

    #[test]
    fn test_is_live_mode() {
        let config = config("sk_live_xxx", "whsec_xxx");
        assert!(config.is_live_mode());
        assert!(!config.is_test_mode());
    }

    #[test]
    fn test_validation_missing_api_key() {
        assert_eq!(
            config("", "whsec_xxx").validate(),
            Err(ValidationError::Missing("PAYMENT__STRIPE_API_KEY"))
        );
    }

    #[test]
    fn test_validation_invalid_key_prefix() {
        assert!(config("pk_test_xxx", "whsec_xxx").validate().is_err());
    }

    #[test]
    fn test_validation_invalid_webhook_secret_prefix() {
        assert!(config("sk_test_xxx", "secret").validate().is_err());
    }

    #[test]
    fn test_validation_tolerance_bounds() {
        let mut cfg = config("sk_test_xxx", "whsec_xxx");
        cfg.webhook_tolerance_secs = 0;
        assert!(cfg.validate().is_err());
    }

    #[test]
    fn test_validation_valid_config() {
        assert!(config("sk_test_xxx", "whsec_xxx").validate().is_ok());
    }
}
