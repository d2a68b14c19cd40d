//! HTTP middleware for axum.
//!
//! - `auth` - Authentication middleware, session cookies and extractors

pub mod auth;

pub use auth::{
    auth_middleware, clear_session_cookies, set_session_cookies, AuthRejection, AuthState,
    OptionalAuth, RequireAuth, SessionToken, ACCESS_TOKEN_COOKIE, REFRESH_TOKEN_COOKIE,
};
