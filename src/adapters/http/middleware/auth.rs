//! Authentication middleware and extractors for axum.
//!
//! This module provides:
//! - `auth_middleware` - Layer that resolves the caller from a Bearer token or
//!   the session cookies and injects the user into extensions
//! - `RequireAuth` - Extractor that requires authentication
//! - `OptionalAuth` - Extractor for optional authentication
//! - `SessionToken` - Extractor for the raw access token (sign-out, password reset)
//!
//! # Architecture
//!
//! ```text
//! Request → auth_middleware → injects AuthenticatedUser (+ access token) into extensions
//!                                      ↓
//!                              Handler → RequireAuth extractor reads from extensions
//! ```
//!
//! Browser sessions live in two HTTP-only cookies. When the access token has
//! expired the middleware trades the refresh token for a new session and
//! writes the rotated cookies onto the response.

use std::fmt;
use std::sync::Arc;

use async_trait::async_trait;
use axum::{
    extract::{FromRequestParts, Request, State},
    http::{header, request::Parts, StatusCode},
    middleware::Next,
    response::{IntoResponse, Response},
    Json,
};
use axum_extra::extract::cookie::{Cookie, CookieJar, SameSite};
use secrecy::{ExposeSecret, SecretString};

use crate::domain::foundation::{AuthError, AuthenticatedUser};
use crate::ports::{AuthSession, IdentityProvider, SessionValidator};

use super::super::error::ErrorResponse;

pub const ACCESS_TOKEN_COOKIE: &str = "sb-access-token";
pub const REFRESH_TOKEN_COOKIE: &str = "sb-refresh-token";

/// Refresh cookies outlive the access token; the auth service rotates them.
const REFRESH_COOKIE_DAYS: i64 = 30;

/// Auth middleware state.
#[derive(Clone)]
pub struct AuthState {
    pub validator: Arc<dyn SessionValidator>,
    pub identity: Arc<dyn IdentityProvider>,
    pub secure_cookies: bool,
}

/// The access token the request was authenticated with.
#[derive(Clone)]
struct AccessToken(String);

impl fmt::Debug for AccessToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("AccessToken([REDACTED])")
    }
}

/// Authentication middleware.
///
/// 1. A `Bearer` token in the `Authorization` header is validated; an invalid
///    header token is rejected with 401.
/// 2. Otherwise the access-token cookie is validated. An expired cookie is
///    refreshed once with the refresh-token cookie.
/// 3. Requests without a usable session continue unauthenticated; handlers
///    enforce authentication with `RequireAuth`.
pub async fn auth_middleware(
    State(auth): State<AuthState>,
    jar: CookieJar,
    mut request: Request,
    next: Next,
) -> Response {
    let bearer = request
        .headers()
        .get("Authorization")
        .and_then(|h| h.to_str().ok())
        .and_then(|h| h.strip_prefix("Bearer "))
        .map(str::to_string);

    if let Some(token) = bearer {
        return match auth.validator.validate(&token).await {
            Ok(user) => {
                request.extensions_mut().insert(user);
                request.extensions_mut().insert(AccessToken(token));
                next.run(request).await
            }
            Err(e) => auth_failure(&e).into_response(),
        };
    }

    let Some(access) = jar.get(ACCESS_TOKEN_COOKIE).map(|c| c.value().to_string()) else {
        return next.run(request).await;
    };

    match auth.validator.validate(&access).await {
        Ok(user) => {
            request.extensions_mut().insert(user);
            request.extensions_mut().insert(AccessToken(access));
            next.run(request).await
        }
        Err(AuthError::TokenExpired) => {
            let Some(session) = refresh(&auth, &jar).await else {
                let jar = clear_session_cookies(jar);
                return merge_session_cookies(jar, next.run(request).await);
            };
            let token = session.access_token.expose_secret().clone();
            match auth.validator.validate(&token).await {
                Ok(user) => {
                    tracing::debug!(user_id = %user.id, "Session refreshed");
                    request.extensions_mut().insert(user);
                    request.extensions_mut().insert(AccessToken(token));
                    let jar = set_session_cookies(jar, &session, auth.secure_cookies);
                    merge_session_cookies(jar, next.run(request).await)
                }
                Err(e) => {
                    tracing::warn!(error = %e, "Refreshed session failed validation");
                    next.run(request).await
                }
            }
        }
        Err(AuthError::ServiceUnavailable(msg)) => {
            tracing::error!("Auth service unavailable: {}", msg);
            next.run(request).await
        }
        Err(AuthError::InvalidToken) => next.run(request).await,
    }
}

/// Attaches the middleware's cookie changes unless the handler already wrote
/// the session cookies itself (sign-in, sign-out); the handler's say is final.
fn merge_session_cookies(jar: CookieJar, response: Response) -> Response {
    if writes_session_cookie(&response) {
        return response;
    }
    (jar, response).into_response()
}

fn writes_session_cookie(response: &Response) -> bool {
    response
        .headers()
        .get_all(header::SET_COOKIE)
        .iter()
        .filter_map(|value| value.to_str().ok())
        .filter_map(|value| value.split_once('='))
        .any(|(name, _)| {
            let name = name.trim();
            name == ACCESS_TOKEN_COOKIE || name == REFRESH_TOKEN_COOKIE
        })
}

async fn refresh(auth: &AuthState, jar: &CookieJar) -> Option<AuthSession> {
    let refresh_token = jar.get(REFRESH_TOKEN_COOKIE)?.value().to_string();
    match auth
        .identity
        .refresh_session(&SecretString::new(refresh_token))
        .await
    {
        Ok(session) => Some(session),
        Err(e) => {
            tracing::info!(error = %e, "Session refresh refused");
            None
        }
    }
}

fn auth_failure(error: &AuthError) -> (StatusCode, Json<ErrorResponse>) {
    let (status, message) = match error {
        AuthError::TokenExpired => (StatusCode::UNAUTHORIZED, "Token expired"),
        AuthError::InvalidToken => (StatusCode::UNAUTHORIZED, "Invalid token"),
        AuthError::ServiceUnavailable(msg) => {
            tracing::error!("Auth service unavailable: {}", msg);
            (
                StatusCode::SERVICE_UNAVAILABLE,
                "Authentication service unavailable",
            )
        }
    };
    (status, Json(ErrorResponse::new("AUTH_ERROR", message)))
}

/// Writes both session cookies for a freshly issued session.
pub fn set_session_cookies(jar: CookieJar, session: &AuthSession, secure: bool) -> CookieJar {
    let mut access = session_cookie(
        ACCESS_TOKEN_COOKIE,
        session.access_token.expose_secret().clone(),
        secure,
    );
    access.set_max_age(time::Duration::seconds(session.expires_in.max(0)));
    let mut refresh = session_cookie(
        REFRESH_TOKEN_COOKIE,
        session.refresh_token.expose_secret().clone(),
        secure,
    );
    refresh.set_max_age(time::Duration::days(REFRESH_COOKIE_DAYS));

    jar.add(access).add(refresh)
}

/// Expires both session cookies.
pub fn clear_session_cookies(jar: CookieJar) -> CookieJar {
    jar.remove(Cookie::build(ACCESS_TOKEN_COOKIE).path("/"))
        .remove(Cookie::build(REFRESH_TOKEN_COOKIE).path("/"))
}

fn session_cookie(name: &'static str, value: String, secure: bool) -> Cookie<'static> {
    Cookie::build((name, value))
        .path("/")
        .http_only(true)
        .secure(secure)
        .same_site(SameSite::Lax)
        .build()
}

/// Extractor that requires authentication.
///
/// If the auth middleware did not resolve a user, returns 401 Unauthorized.
///
/// # Example
///
/// ```ignore
/// async fn my_handler(RequireAuth(user): RequireAuth) -> impl IntoResponse {
///     format!("Hello, {}!", user.email)
/// }
/// ```
#[derive(Debug, Clone)]
pub struct RequireAuth(pub AuthenticatedUser);

#[async_trait]
impl<S> FromRequestParts<S> for RequireAuth
where
    S: Send + Sync,
{
    type Rejection = AuthRejection;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<AuthenticatedUser>()
            .cloned()
            .map(RequireAuth)
            .ok_or(AuthRejection::Unauthenticated)
    }
}

/// Extractor for optional authentication.
#[derive(Debug, Clone)]
pub struct OptionalAuth(pub Option<AuthenticatedUser>);

#[async_trait]
impl<S> FromRequestParts<S> for OptionalAuth
where
    S: Send + Sync,
{
    type Rejection = std::convert::Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        Ok(OptionalAuth(parts.extensions.get::<AuthenticatedUser>().cloned()))
    }
}

/// Extractor for the access token behind the current session, if any.
pub struct SessionToken(pub Option<SecretString>);

#[async_trait]
impl<S> FromRequestParts<S> for SessionToken
where
    S: Send + Sync,
{
    type Rejection = std::convert::Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let token = parts
            .extensions
            .get::<AccessToken>()
            .map(|t| SecretString::new(t.0.clone()));
        Ok(SessionToken(token))
    }
}

/// Rejection type for authentication failures.
#[derive(Debug, Clone)]
pub enum AuthRejection {
    /// No valid authentication token was provided.
    Unauthenticated,
}

impl IntoResponse for AuthRejection {
    fn into_response(self) -> Response {
        match self {
            AuthRejection::Unauthenticated => (
                StatusCode::UNAUTHORIZED,
                Json(ErrorResponse::new("UNAUTHENTICATED", "Authentication required")),
            )
                .into_response(),
        }
    }
}
