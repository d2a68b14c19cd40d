//! Authentication configuration (hosted auth service)

use secrecy::{ExposeSecret, SecretString};
use serde::Deserialize;

use super::error::{require, require_url, ValidationError};
use super::server::Environment;

/// Authentication configuration for the hosted, GoTrue-compatible auth API.
#[derive(Debug, Clone, Deserialize)]
pub struct AuthConfig {
    /// Project URL, e.g. `https://abcd.supabase.co`
    pub supabase_url: String,

    /// Public anon key, sent as `apikey` on every auth request
    pub anon_key: SecretString,

    /// Service-role key for admin lookups
    pub service_role_key: SecretString,

    /// HS256 secret that signs access tokens
    pub jwt_secret: SecretString,

    /// Expected `aud` claim
    #[serde(default = "default_jwt_audience")]
    pub jwt_audience: String,

    /// Force the `Secure` cookie attribute; defaults to on in production
    #[serde(default)]
    pub secure_cookies: Option<bool>,
}

impl AuthConfig {
    /// Base URL of the auth REST API.
    pub fn auth_api_url(&self) -> String {
        format!("{}/auth/v1", self.supabase_url.trim_end_matches('/'))
    }

    pub fn cookies_secure(&self, environment: &Environment) -> bool {
        self.secure_cookies
            .unwrap_or(*environment == Environment::Production)
    }

    /// Production deployments must reach the auth API over HTTPS.
    pub fn validate(&self, environment: &Environment) -> Result<(), ValidationError> {
        require_url(
            "AUTH__SUPABASE_URL",
            &self.supabase_url,
            *environment == Environment::Production,
        )?;
        require("AUTH__ANON_KEY", self.anon_key.expose_secret())?;
        require("AUTH__SERVICE_ROLE_KEY", self.service_role_key.expose_secret())?;
        require("AUTH__JWT_SECRET", self.jwt_secret.expose_secret())
    }
}

fn default_jwt_audience() -> String {
    "authenticated".to_string()
}
