//! HS256 access-token validation for the hosted auth service.
//!
//! The auth service signs access tokens with a shared project secret, so
//! validation is local: signature, audience and expiry are checked without a
//! network round trip.

use async_trait::async_trait;
use jsonwebtoken::{decode, errors::ErrorKind, Algorithm, DecodingKey, Validation};
use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};

use crate::domain::foundation::{AuthError, AuthenticatedUser, UserId};
use crate::ports::SessionValidator;

/// Access-token claims issued by the auth service.
#[derive(Debug, Serialize, Deserialize)]
pub(crate) struct AccessClaims {
    /// Subject - the user ID
    pub sub: String,

    #[serde(default)]
    pub aud: Option<String>,

    pub exp: i64,

    #[serde(default)]
    pub email: Option<String>,

    /// `authenticated` for signed-in users, `anon` for the public key.
    #[serde(default)]
    pub role: Option<String>,

    #[serde(default)]
    pub user_metadata: UserMetadata,
}

#[derive(Debug, Default, Serialize, Deserialize)]
pub(crate) struct UserMetadata {
    #[serde(default)]
    pub email_verified: Option<bool>,
}

/// Validates access tokens signed with the project JWT secret.
pub struct JwtSessionValidator {
    decoding_key: DecodingKey,
    validation: Validation,
}

impl JwtSessionValidator {
    pub fn new(secret: &SecretString, audience: &str) -> Self {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.set_audience(&[audience]);
        validation.set_required_spec_claims(&["exp", "sub", "aud"]);
        validation.leeway = 0;

        Self {
            decoding_key: DecodingKey::from_secret(secret.expose_secret().as_bytes()),
            validation,
        }
    }
}

#[async_trait]
impl SessionValidator for JwtSessionValidator {
    async fn validate(&self, token: &str) -> Result<AuthenticatedUser, AuthError> {
        let data = decode::<AccessClaims>(token, &self.decoding_key, &self.validation).map_err(
            |e| match e.kind() {
                ErrorKind::ExpiredSignature => {
                    tracing::debug!("Access token expired");
                    AuthError::TokenExpired
                }
                ErrorKind::InvalidAudience => {
                    tracing::warn!("Invalid audience in access token");
                    AuthError::InvalidToken
                }
                _ => {
                    tracing::debug!("Access token rejected: {}", e);
                    AuthError::InvalidToken
                }
            },
        )?;
        let claims = data.claims;

        if claims.role.as_deref() == Some("anon") {
            return Err(AuthError::InvalidToken);
        }

        let email = claims.email.filter(|e| !e.is_empty()).ok_or_else(|| {
            tracing::warn!("Access token missing email claim");
            AuthError::InvalidToken
        })?;

        let user_id = UserId::parse(&claims.sub).map_err(|_| {
            tracing::warn!("Invalid user ID in access token: {}", claims.sub);
            AuthError::InvalidToken
        })?;

        Ok(AuthenticatedUser::new(
            user_id,
            email,
            claims.user_metadata.email_verified.unwrap_or(false),
        ))
    }
}

impl std::fmt::Debug for JwtSessionValidator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("JwtSessionValidator")
            .field("audience", &self.validation.aud)
            .finish_non_exhaustive()
    }
}
