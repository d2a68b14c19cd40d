//! Hosted auth service adapter (GoTrue REST API).
//!
//! Implements `IdentityProvider` over the `/auth/v1` endpoints:
//!
//! | Operation | Endpoint |
//! |-----------|----------|
//! | sign up | `POST /signup` |
//! | password sign-in | `POST /token?grant_type=password` |
//! | refresh | `POST /token?grant_type=refresh_token` |
//! | sign out | `POST /logout` |
//! | recovery email | `POST /recover` |
//! | password update | `PUT /user` |
//! | admin lookup | `GET /admin/users/{id}` |

use std::time::Duration;

use async_trait::async_trait;
use secrecy::{ExposeSecret, SecretString};
use serde::Deserialize;
use serde_json::json;

use crate::config::AuthConfig;
use crate::domain::foundation::UserId;
use crate::ports::{AuthSession, IdentityError, IdentityProvider, SignUpOutcome, SignUpRequest};

/// Client for the hosted auth REST API.
pub struct SupabaseAuthClient {
    base_url: String,
    anon_key: SecretString,
    service_role_key: SecretString,
    http_client: reqwest::Client,
}

impl SupabaseAuthClient {
    pub fn new(
        base_url: impl Into<String>,
        anon_key: SecretString,
        service_role_key: SecretString,
    ) -> Result<Self, reqwest::Error> {
        let http_client = reqwest::Client::builder()
            .timeout(Duration::from_secs(10))
            .build()?;

        Ok(Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            anon_key,
            service_role_key,
            http_client,
        })
    }

    pub fn from_config(config: &AuthConfig) -> Result<Self, reqwest::Error> {
        Self::new(
            config.auth_api_url(),
            config.anon_key.clone(),
            config.service_role_key.clone(),
        )
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    /// Request with the public key as both `apikey` and bearer.
    fn public(&self, method: reqwest::Method, path: &str) -> reqwest::RequestBuilder {
        self.http_client
            .request(method, self.url(path))
            .header("apikey", self.anon_key.expose_secret())
    }

    /// Request acting as the user owning `access_token`.
    fn as_user(
        &self,
        method: reqwest::Method,
        path: &str,
        access_token: &SecretString,
    ) -> reqwest::RequestBuilder {
        self.public(method, path)
            .bearer_auth(access_token.expose_secret())
    }

    async fn send(&self, request: reqwest::RequestBuilder) -> Result<reqwest::Response, IdentityError> {
        let response = request.send().await.map_err(|e| {
            tracing::error!("Auth service request failed: {}", e);
            IdentityError::unavailable(e.to_string())
        })?;

        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        let body = response.text().await.unwrap_or_default();
        let error = error_from_response(status, &body);
        tracing::warn!(status = status.as_u16(), error = %error, "Auth service rejected request");
        Err(error)
    }
}

/// GoTrue error bodies vary by version and endpoint.
#[derive(Debug, Default, Deserialize)]
struct ErrorBody {
    #[serde(default)]
    error_description: Option<String>,
    #[serde(default)]
    msg: Option<String>,
    #[serde(default)]
    message: Option<String>,
    #[serde(default)]
    error: Option<String>,
}

impl ErrorBody {
    fn into_message(self) -> Option<String> {
        self.error_description
            .or(self.msg)
            .or(self.message)
            .or(self.error)
            .filter(|m| !m.trim().is_empty())
    }
}

fn error_from_response(status: reqwest::StatusCode, body: &str) -> IdentityError {
    let message = serde_json::from_str::<ErrorBody>(body)
        .ok()
        .and_then(ErrorBody::into_message);

    match status.as_u16() {
        401 | 403 => IdentityError::Unauthorized,
        429 => IdentityError::rejected("Too many attempts. Please wait a moment and try again."),
        400..=499 => IdentityError::rejected(
            message.unwrap_or_else(|| "The request could not be completed.".to_string()),
        ),
        _ => IdentityError::unavailable(format!("auth service returned {}", status)),
    }
}

#[derive(Debug, Deserialize)]
struct UserBody {
    id: String,
    #[serde(default)]
    email: Option<String>,
}

#[derive(Debug, Deserialize)]
struct SessionBody {
    access_token: String,
    refresh_token: String,
    #[serde(default = "default_expires_in")]
    expires_in: i64,
    user: UserBody,
}

fn default_expires_in() -> i64 {
    3600
}

/// `/signup` returns a session when auto-confirm is on, otherwise the bare user.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum SignUpBody {
    Session(SessionBody),
    User(UserBody),
}

impl SessionBody {
    fn into_session(self, fallback_email: &str) -> Result<AuthSession, IdentityError> {
        let user_id = parse_user_id(&self.user.id)?;
        Ok(AuthSession {
            access_token: SecretString::new(self.access_token),
            refresh_token: SecretString::new(self.refresh_token),
            expires_in: self.expires_in,
            user_id,
            email: self.user.email.unwrap_or_else(|| fallback_email.to_string()),
        })
    }
}

fn parse_user_id(raw: &str) -> Result<UserId, IdentityError> {
    UserId::parse(raw)
        .map_err(|_| IdentityError::unavailable(format!("auth service returned invalid user id {}", raw)))
}

fn parse_json_error(e: reqwest::Error) -> IdentityError {
    IdentityError::unavailable(format!("Failed to parse auth response: {}", e))
}

#[async_trait]
impl IdentityProvider for SupabaseAuthClient {
    async fn sign_up(&self, request: SignUpRequest) -> Result<SignUpOutcome, IdentityError> {
        let mut builder = self.public(reqwest::Method::POST, "/signup").json(&json!({
            "email": request.email,
            "password": request.password.expose_secret(),
            "data": request.details,
        }));
        if let Some(redirect_to) = &request.email_redirect_to {
            builder = builder.query(&[("redirect_to", redirect_to)]);
        }

        let body: SignUpBody = self.send(builder).await?.json().await.map_err(parse_json_error)?;

        match body {
            SignUpBody::Session(session) => {
                let session = session.into_session(&request.email)?;
                Ok(SignUpOutcome {
                    user_id: session.user_id,
                    email: session.email.clone(),
                    session: Some(session),
                })
            }
            SignUpBody::User(user) => Ok(SignUpOutcome {
                user_id: parse_user_id(&user.id)?,
                email: user.email.unwrap_or(request.email),
                session: None,
            }),
        }
    }

    async fn sign_in_with_password(
        &self,
        email: &str,
        password: &SecretString,
    ) -> Result<AuthSession, IdentityError> {
        let builder = self
            .public(reqwest::Method::POST, "/token")
            .query(&[("grant_type", "password")])
            .json(&json!({ "email": email, "password": password.expose_secret() }));

        let body: SessionBody = self.send(builder).await?.json().await.map_err(parse_json_error)?;
        body.into_session(email)
    }

    async fn sign_out(&self, access_token: &SecretString) -> Result<(), IdentityError> {
        let builder = self.as_user(reqwest::Method::POST, "/logout", access_token);
        self.send(builder).await?;
        Ok(())
    }

    async fn refresh_session(
        &self,
        refresh_token: &SecretString,
    ) -> Result<AuthSession, IdentityError> {
        let builder = self
            .public(reqwest::Method::POST, "/token")
            .query(&[("grant_type", "refresh_token")])
            .json(&json!({ "refresh_token": refresh_token.expose_secret() }));

        let body: SessionBody = match self.send(builder).await {
            Ok(response) => response.json().await.map_err(parse_json_error)?,
            // a revoked or reused refresh token comes back as 400
            Err(IdentityError::Rejected(_)) => return Err(IdentityError::Unauthorized),
            Err(e) => return Err(e),
        };
        body.into_session("")
    }

    async fn send_password_reset(
        &self,
        email: &str,
        redirect_to: &str,
    ) -> Result<(), IdentityError> {
        let builder = self
            .public(reqwest::Method::POST, "/recover")
            .query(&[("redirect_to", redirect_to)])
            .json(&json!({ "email": email }));
        self.send(builder).await?;
        Ok(())
    }

    async fn update_password(
        &self,
        access_token: &SecretString,
        new_password: &SecretString,
    ) -> Result<(), IdentityError> {
        let builder = self
            .as_user(reqwest::Method::PUT, "/user", access_token)
            .json(&json!({ "password": new_password.expose_secret() }));
        self.send(builder).await?;
        Ok(())
    }

    async fn get_user(&self, user_id: &UserId) -> Result<Option<serde_json::Value>, IdentityError> {
        let builder = self
            .http_client
            .get(self.url(&format!("/admin/users/{}", user_id)))
            .header("apikey", self.service_role_key.expose_secret())
            .bearer_auth(self.service_role_key.expose_secret());

        match self.send(builder).await {
            Ok(response) => Ok(Some(response.json().await.map_err(parse_json_error)?)),
            Err(IdentityError::Rejected(_)) => Ok(None),
            Err(e) => Err(e),
        }
    }
}

impl std::fmt::Debug for SupabaseAuthClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SupabaseAuthClient")
            .field("base_url", &self.base_url)
            .finish_non_exhaustive()
    }
}
